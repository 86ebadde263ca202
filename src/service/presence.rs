use std::sync::Arc;

use chrono::Utc;
use macros::ErrorAck;
use tokio::sync::broadcast;

use crate::{
    events::{Event, EventChannel},
    model::{
        implementation::presence::derive_display_name,
        message::{Ack, ErrorKind},
        presence::{ConnectionId, PresenceRecord, RosterSnapshot, TeacherStatus},
    },
    repo::{roster::RosterRepo, session::SessionRepo},
    service::auth::Authenticator,
};

/// Owns the roster and the session table. Every mutation validates first,
/// then changes state, then publishes the full roster; a failed operation
/// leaves both stores untouched and publishes nothing.
///
/// Callers share one instance behind a mutex so that the publish order
/// matches the mutation order.
pub struct PresenceService {
    roster: RosterRepo,
    sessions: SessionRepo,
    authenticator: Arc<dyn Authenticator>,
    event_channel: EventChannel,
}

impl PresenceService {
    pub fn new(authenticator: Arc<dyn Authenticator>, event_channel: EventChannel) -> Self {
        Self {
            roster: RosterRepo::new(),
            sessions: SessionRepo::new(),
            authenticator,
            event_channel,
        }
    }

    pub fn login(
        &mut self,
        connection_id: ConnectionId,
        identity: &str,
        credential: &str,
        display_name: Option<&str>,
    ) -> PresenceResult<String> {
        let identity = identity.trim();
        if identity.is_empty() || credential.is_empty() {
            return Err(PresenceError::MissingCredentials);
        }
        if !self.authenticator.authenticate(identity, credential) {
            tracing::debug!("Rejected login for {identity} on {connection_id}");
            return Err(PresenceError::InvalidCredentials);
        }

        let display_name = match display_name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => derive_display_name(identity),
        };

        if self
            .sessions
            .connections_for(identity)
            .any(|other| other != connection_id)
        {
            // The older connection keeps its binding and can still act as this identity.
            tracing::warn!("{identity} logged in again from {connection_id} while another connection is still bound");
        }

        self.roster.upsert(
            identity.to_string(),
            PresenceRecord::new(identity.to_string(), display_name, Utc::now()),
        );
        if let Some(previous) = self.sessions.bind(connection_id, identity.to_string()) {
            if previous != identity && self.sessions.connections_for(&previous).next().is_none() {
                self.roster.remove(&previous);
                tracing::info!("{previous} replaced by {identity} on {connection_id}");
            }
        }

        self.broadcast();
        tracing::info!("Teacher logged in: {identity}");
        Ok(identity.to_string())
    }

    pub fn update_status(
        &mut self,
        connection_id: ConnectionId,
        status: &str,
    ) -> PresenceResult<TeacherStatus> {
        let identity = self.authenticated_identity(connection_id)?;
        let status: TeacherStatus = status
            .parse()
            .map_err(|_| PresenceError::InvalidStatus(status.to_string()))?;

        let record = self
            .roster
            .get_mut(&identity)
            .ok_or(PresenceError::NotAuthenticated)?;
        record.status = status;
        record.last_updated = Utc::now();

        self.broadcast();
        tracing::info!("{identity} status updated to: {status}");
        Ok(status)
    }

    pub fn update_display_name(
        &mut self,
        connection_id: ConnectionId,
        display_name: &str,
    ) -> PresenceResult<String> {
        let identity = self.authenticated_identity(connection_id)?;
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(PresenceError::InvalidName);
        }

        let record = self
            .roster
            .get_mut(&identity)
            .ok_or(PresenceError::NotAuthenticated)?;
        record.display_name = display_name.to_string();
        record.last_updated = Utc::now();

        self.broadcast();
        tracing::info!("{identity} display name updated to: {display_name}");
        Ok(display_name.to_string())
    }

    /// Returns `false` (and publishes nothing) if the connection was not
    /// logged in.
    pub fn logout(&mut self, connection_id: ConnectionId) -> bool {
        match self.end_session(connection_id) {
            Some(identity) => {
                tracing::info!("Teacher logged out: {identity}");
                true
            }
            None => false,
        }
    }

    pub fn handle_disconnect(&mut self, connection_id: ConnectionId) -> bool {
        match self.end_session(connection_id) {
            Some(identity) => {
                tracing::info!("Teacher disconnected: {identity}");
                true
            }
            None => false,
        }
    }

    /// Subscribes to roster updates and captures the roster they start from.
    /// Both happen under the caller's lock, so no update falls between them.
    pub fn attach_viewer(&self) -> (broadcast::Receiver<Event>, RosterSnapshot) {
        (self.event_channel.subscribe(), self.snapshot())
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        Arc::new(self.roster.snapshot())
    }

    fn end_session(&mut self, connection_id: ConnectionId) -> Option<String> {
        let identity = self.sessions.unbind(connection_id)?;
        self.roster.remove(&identity);
        self.broadcast();
        Some(identity)
    }

    fn authenticated_identity(&self, connection_id: ConnectionId) -> PresenceResult<String> {
        match self.sessions.lookup(connection_id) {
            Some(identity) if self.roster.get(identity).is_some() => Ok(identity.to_string()),
            _ => Err(PresenceError::NotAuthenticated),
        }
    }

    fn broadcast(&self) {
        // Ignore the result, because this errors if there are no receivers in the channel
        let _ = self.event_channel.publish(Event::RosterUpdate(self.snapshot()));
    }
}

#[derive(thiserror::Error, Debug, Eq, PartialEq, ErrorAck)]
pub enum PresenceError {
    #[error("Identity and credential are required")]
    #[kind(ErrorKind::AuthError)]
    MissingCredentials,

    #[error("Invalid credentials")]
    #[kind(ErrorKind::AuthError)]
    InvalidCredentials,

    #[error("Not authenticated")]
    #[kind(ErrorKind::NotAuthenticated)]
    NotAuthenticated,

    #[error("Invalid status: {0}")]
    #[kind(ErrorKind::InvalidInput)]
    InvalidStatus(String),

    #[error("Display name must not be empty")]
    #[kind(ErrorKind::InvalidInput)]
    InvalidName,
}

pub type PresenceResult<T> = Result<T, PresenceError>;
