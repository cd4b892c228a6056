//! Grocery item model and the scheduling rules deciding list membership.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Day of the week, fixed to full English names end-to-end.
///
/// Not chrono's `Weekday`, which displays abbreviated names ("Mon") and would
/// silently change the wire convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Monday" => Some(Weekday::Monday),
            "Tuesday" => Some(Weekday::Tuesday),
            "Wednesday" => Some(Weekday::Wednesday),
            "Thursday" => Some(Weekday::Thursday),
            "Friday" => Some(Weekday::Friday),
            "Saturday" => Some(Weekday::Saturday),
            "Sunday" => Some(Weekday::Sunday),
            _ => None,
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

/// When an item is due for purchase.
///
/// Tagged so each schedule kind carries only its own payload; a "regular"
/// item with a specific date is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "scheduleType", rename_all = "lowercase")]
pub enum Schedule {
    /// Always on the shopping list.
    #[default]
    None,
    /// Recurs weekly on the given days.
    Regular { days: BTreeSet<Weekday> },
    /// Due on a single calendar date.
    Specific {
        #[serde(with = "calendar_date")]
        date: NaiveDate,
    },
}

impl Schedule {
    /// Stable tag string, as stored in the database.
    pub fn type_name(&self) -> &'static str {
        match self {
            Schedule::None => "none",
            Schedule::Regular { .. } => "regular",
            Schedule::Specific { .. } => "specific",
        }
    }
}

/// Calendar-date (de)serialization that tolerates a time-of-day.
///
/// Clients send either "2025-06-01" or a full RFC 3339 timestamp; only the
/// calendar day is meaningful, so any time component is discarded.
pub mod calendar_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse(s: &str) -> Result<NaiveDate, String> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
            .map_err(|_| format!("Invalid date: {}", s))
    }
}

/// A grocery item shared by the household.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Free-form, not numeric ("2 liters").
    pub quantity: String,
    pub added_by: String,
    #[serde(default)]
    pub description: String,
    pub is_purchased: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchased_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_bought: Option<String>,
    #[serde(default)]
    pub schedule: Schedule,
    pub created_at: String,
    pub updated_at: String,
}

impl Item {
    /// Whether the item belongs on the shopping list for `date`.
    ///
    /// Purchased items are never active. Unscheduled items always are;
    /// regular items when `date` falls on one of their days; specific items
    /// exactly on their calendar date.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        if self.is_purchased {
            return false;
        }
        match &self.schedule {
            Schedule::None => true,
            Schedule::Regular { days } => days.contains(&Weekday::from(date.weekday())),
            Schedule::Specific { date: scheduled } => *scheduled == date,
        }
    }

    /// Membership in the "Regular" future view: every unpurchased regular
    /// item, whether or not today is one of its days. An item can be both
    /// active today and listed here; the views serve different screens.
    pub fn is_future_regular(&self) -> bool {
        !self.is_purchased && matches!(self.schedule, Schedule::Regular { .. })
    }

    /// Membership in the "Specific" future view.
    pub fn is_future_specific(&self) -> bool {
        !self.is_purchased && matches!(self.schedule, Schedule::Specific { .. })
    }

    /// Purchased items make up the history view.
    pub fn is_history(&self) -> bool {
        self.is_purchased
    }
}

/// Which future view to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FutureKind {
    Regular,
    Specific,
}

impl FutureKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(FutureKind::Regular),
            "specific" => Some(FutureKind::Specific),
            _ => None,
        }
    }
}

/// Request body for creating a new item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    pub quantity: String,
    pub added_by: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schedule: Option<Schedule>,
}

/// Request body for marking an item purchased (or un-purchasing it).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkPurchasedRequest {
    pub is_purchased: bool,
    #[serde(default)]
    pub purchased_by: Option<String>,
}

/// Request body for re-adding a history item to the active list.
///
/// Carries the fields the client already holds from the history view; the
/// source record itself is never touched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayItemRequest {
    pub name: String,
    pub quantity: String,
    #[serde(default)]
    pub description: Option<String>,
    pub requested_by: String,
}

/// Request body for deleting several items in one call.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchDeleteRequest {
    pub ids: Vec<String>,
}

/// Per-item outcome of a batch delete. Deletes are independent; one missing
/// id does not fail the rest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteOutcome {
    pub id: String,
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
