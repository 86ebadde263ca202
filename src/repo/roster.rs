use indexmap::IndexMap;

use crate::model::presence::PresenceRecord;

/// Presence records keyed by identity, in login order.
#[derive(Default, Debug)]
pub struct RosterRepo {
    records: IndexMap<String, PresenceRecord>,
}

impl RosterRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replacing an existing identity keeps its position in the roster.
    pub fn upsert(&mut self, identity: String, record: PresenceRecord) -> Option<PresenceRecord> {
        self.records.insert(identity, record)
    }

    pub fn get(&self, identity: &str) -> Option<&PresenceRecord> {
        self.records.get(identity)
    }

    pub fn get_mut(&mut self, identity: &str) -> Option<&mut PresenceRecord> {
        self.records.get_mut(identity)
    }

    pub fn remove(&mut self, identity: &str) -> Option<PresenceRecord> {
        self.records.shift_remove(identity)
    }

    pub fn snapshot(&self) -> Vec<PresenceRecord> {
        self.records.values().cloned().collect()
    }
}
