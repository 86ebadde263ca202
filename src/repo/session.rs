use std::collections::HashMap;

use crate::model::presence::ConnectionId;

/// Which identity each live connection is logged in as.
#[derive(Default, Debug)]
pub struct SessionRepo {
    bindings: HashMap<ConnectionId, String>,
}

impl SessionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identity the connection was bound to before, if any.
    pub fn bind(&mut self, connection_id: ConnectionId, identity: String) -> Option<String> {
        self.bindings.insert(connection_id, identity)
    }

    pub fn lookup(&self, connection_id: ConnectionId) -> Option<&str> {
        self.bindings.get(&connection_id).map(String::as_str)
    }

    pub fn unbind(&mut self, connection_id: ConnectionId) -> Option<String> {
        self.bindings.remove(&connection_id)
    }

    pub fn connections_for<'a>(
        &'a self,
        identity: &'a str,
    ) -> impl Iterator<Item = ConnectionId> + 'a {
        self.bindings
            .iter()
            .filter(move |(_, bound)| bound.as_str() == identity)
            .map(|(connection_id, _)| *connection_id)
    }
}
