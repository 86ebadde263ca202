use serde::{Deserialize, Serialize};

use super::presence::RosterSnapshot;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub identity: String,
    pub credential: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UpdateStatusPayload {
    pub status: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDisplayNamePayload {
    pub display_name: String,
}

/// Frames a client may send, as `{"event": ..., "data": ...}`.
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    Login(LoginPayload),
    UpdateStatus(UpdateStatusPayload),
    UpdateDisplayName(UpdateDisplayNamePayload),
    Logout,
}

impl ClientMessage {
    pub fn request(&self) -> RequestKind {
        match self {
            ClientMessage::Login(_) => RequestKind::Login,
            ClientMessage::UpdateStatus(_) => RequestKind::UpdateStatus,
            ClientMessage::UpdateDisplayName(_) => RequestKind::UpdateDisplayName,
            ClientMessage::Logout => RequestKind::Logout,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum RequestKind {
    Login,
    UpdateStatus,
    UpdateDisplayName,
    Logout,
}

#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    AuthError,
    NotAuthenticated,
    InvalidInput,
}

/// The one response a client gets for each request it sends.
#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl Ack {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            identity: None,
            kind: None,
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            identity: None,
            kind: Some(kind),
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }
}

/// Frames the server sends, as `{"event": ..., "data": ...}`.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    RosterUpdate(RosterSnapshot),
    Ack { request: RequestKind, result: Ack },
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::model::presence::PresenceRecord;

    #[test]
    fn parses_login_with_and_without_display_name() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"event":"login","data":{"identity":"a@b.com","credential":"x","displayName":"Ann"}}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::Login(payload) => {
                assert_eq!(payload.identity, "a@b.com");
                assert_eq!(payload.display_name.as_deref(), Some("Ann"));
            }
            other => panic!("unexpected message {other:?}"),
        }

        let msg: ClientMessage = serde_json::from_str(
            r#"{"event":"login","data":{"identity":"a@b.com","credential":"x"}}"#,
        )
        .unwrap();
        assert!(matches!(msg, ClientMessage::Login(LoginPayload { display_name: None, .. })));
    }

    #[test]
    fn parses_logout_without_data() {
        let msg: ClientMessage = serde_json::from_str(r#"{"event":"logout"}"#).unwrap();
        assert_eq!(msg.request(), RequestKind::Logout);
    }

    #[test]
    fn rejects_unknown_event() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"event":"dance","data":{}}"#).is_err());
    }

    #[test]
    fn ack_omits_empty_fields() {
        let frame = ServerMessage::Ack {
            request: RequestKind::UpdateStatus,
            result: Ack::success("Status updated"),
        };
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({
                "event": "ack",
                "data": {
                    "request": "updateStatus",
                    "result": { "success": true, "message": "Status updated" }
                }
            })
        );

        let failure = Ack::failure(ErrorKind::NotAuthenticated, "Not authenticated");
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({ "success": false, "message": "Not authenticated", "kind": "not_authenticated" })
        );
    }

    #[test]
    fn roster_update_is_a_list() {
        let now = Utc::now();
        let snapshot = Arc::new(vec![PresenceRecord::new("t@x.com".into(), "t".into(), now)]);
        let value = serde_json::to_value(ServerMessage::RosterUpdate(snapshot)).unwrap();
        assert_eq!(value["event"], "rosterUpdate");
        assert_eq!(value["data"][0]["identity"], "t@x.com");
        assert_eq!(value["data"][0]["status"], "Available");
    }
}
