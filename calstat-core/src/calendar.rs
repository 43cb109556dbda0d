//! Calendar identity.

use serde::{Deserialize, Serialize};

/// Name used when the provider's calendar listing has no summary.
pub const UNNAMED_CALENDAR: &str = "No Name";

/// A remote calendar, used to tag events when merging across calendars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    pub name: String,
}

impl Calendar {
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Calendar {
            id: id.into(),
            name: name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNNAMED_CALENDAR.to_string()),
        }
    }
}

impl std::fmt::Display for Calendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
