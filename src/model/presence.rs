use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum TeacherStatus {
    #[default]
    Available,
    Absent,
    #[serde(rename = "In Class")]
    InClass,
    #[serde(rename = "In Meeting")]
    InMeeting,
}

#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecord {
    pub identity: String,
    pub display_name: String,
    pub status: TeacherStatus,
    pub last_updated: DateTime<Utc>,
}

/// Handle for one live websocket connection. Never reused after disconnect.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ConnectionId(pub Uuid);

/// Full ordered roster, shared between every subscriber of one broadcast.
pub type RosterSnapshot = Arc<Vec<PresenceRecord>>;
