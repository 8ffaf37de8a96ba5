//! Todoist task payloads and their domain view

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Task priority, `P1` being the most urgent.
///
/// Todoist's API numbers priorities the other way round (`4` is urgent,
/// `1` is the default), so the wire value is flipped when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum Priority {
    P1,
    P2,
    P3,
    P4,
}

impl Priority {
    /// Priority assumed for tasks that carry none.
    pub const LOWEST: Priority = Priority::P4;

    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            4 => Some(Priority::P1),
            3 => Some(Priority::P2),
            2 => Some(Priority::P3),
            1 => Some(Priority::P4),
            _ => None,
        }
    }

    /// 1 for `P1` through 4 for `P4`.
    pub fn level(self) -> u8 {
        match self {
            Priority::P1 => 1,
            Priority::P2 => 2,
            Priority::P3 => 3,
            Priority::P4 => 4,
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Priority::from_wire(value).ok_or_else(|| format!("priority {} out of range 1-4", value))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.level())
    }
}

/// The `date` field of a Todoist due object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum DueDate {
    /// All-day task: `2024-05-01`
    Date(NaiveDate),
    /// Time without a zone, read as local time: `2024-05-01T09:30:00`
    Floating(NaiveDateTime),
    /// Fixed instant: `2024-05-01T07:30:00Z`
    Instant(DateTime<Utc>),
}

impl DueDate {
    /// Local calendar day the task is due on.
    pub fn calendar_date(&self) -> NaiveDate {
        match self {
            DueDate::Date(date) => *date,
            DueDate::Floating(datetime) => datetime.date(),
            DueDate::Instant(instant) => instant.with_timezone(&Local).date_naive(),
        }
    }
}

impl FromStr for DueDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(DueDate::Date(date));
        }
        if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
            return Ok(DueDate::Instant(instant.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(DueDate::Floating)
    }
}

impl TryFrom<String> for DueDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .parse()
            .map_err(|e| format!("invalid due date '{}': {}", value, e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Due {
    pub date: DueDate,

    /// Human phrasing as typed by the user, e.g. "every friday".
    #[serde(default)]
    pub string: String,

    #[serde(default)]
    pub is_recurring: bool,

    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Task {
    pub id: String,
    pub content: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, deserialize_with = "lenient")]
    pub due: Option<Due>,

    #[serde(default, deserialize_with = "lenient")]
    pub priority: Option<Priority>,
}

/// Decodes an optional field, reading a value that does not parse as absent.
/// A task with an odd priority or due format still lands on the page.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            debug!("Ignoring malformed task field: {}", e);
            Ok(None)
        }
    }
}

impl Task {
    pub fn new(id: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            content: content.to_string(),
            description: String::new(),
            due: None,
            priority: None,
        }
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due = Some(Due {
            date: DueDate::Date(date),
            string: String::new(),
            is_recurring: false,
            timezone: None,
        });
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due.as_ref().map(|due| due.date.calendar_date())
    }

    pub fn effective_priority(&self) -> Priority {
        self.priority.unwrap_or(Priority::LOWEST)
    }
}

/// One page of `GET /tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPage {
    pub results: Vec<Task>,

    #[serde(default)]
    pub next_cursor: Option<String>,
}
