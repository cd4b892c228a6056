//! Credential verification.
//!
//! Passwords are compared in constant time to mitigate timing attacks.
//! Storage-side hashing is deliberately out of scope for this service.

use subtle::ConstantTimeEq;

/// Check a login attempt against the stored password in constant time.
pub fn verify_password(provided: &str, stored: &str) -> bool {
    constant_time_compare(provided, stored)
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    a_bytes.ct_eq(b_bytes).into()
}
