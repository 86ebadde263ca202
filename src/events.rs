use tokio::sync::broadcast::{self};

use crate::{config::DEFAULT_ROSTER_CHANNEL_CAPACITY, model::presence::RosterSnapshot};

#[derive(Clone)]
pub struct EventChannel {
    sender: broadcast::Sender<Event>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ROSTER_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> Result<usize, broadcast::error::SendError<Event>> {
        self.sender.send(event)
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub enum Event {
    RosterUpdate(RosterSnapshot),
}
