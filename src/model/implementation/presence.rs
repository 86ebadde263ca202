use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::presence::{ConnectionId, PresenceRecord, TeacherStatus};

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
#[error("Unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl TeacherStatus {
    pub const ALL: [TeacherStatus; 4] = [
        TeacherStatus::Available,
        TeacherStatus::Absent,
        TeacherStatus::InClass,
        TeacherStatus::InMeeting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TeacherStatus::Available => "Available",
            TeacherStatus::Absent => "Absent",
            TeacherStatus::InClass => "In Class",
            TeacherStatus::InMeeting => "In Meeting",
        }
    }
}

impl FromStr for TeacherStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

impl Display for TeacherStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PresenceRecord {
    /// A freshly logged-in teacher: `Available`, stamped with `now`.
    pub fn new(identity: String, display_name: String, now: DateTime<Utc>) -> Self {
        Self {
            identity,
            display_name,
            status: TeacherStatus::Available,
            last_updated: now,
        }
    }
}

/// Local part of an email-like identity, or the whole identity when the
/// local part is empty.
pub fn derive_display_name(identity: &str) -> String {
    match identity.split('@').next() {
        Some(local) if !local.is_empty() => local.to_string(),
        _ => identity.to_string(),
    }
}

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
