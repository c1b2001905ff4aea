use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use rosc::{OscMessage, OscPacket};
use tracing::debug;

use crate::codec::{self, Endpoint};
use crate::messages::OscEvent;

/// Callback invoked on the receive thread for each matching event.
pub type Handler = Arc<dyn Fn(&OscEvent) + Send + Sync>;

/// Routes decoded events to the handlers registered for their endpoint.
#[derive(Default)]
pub struct Dispatcher {
    handlers: RwLock<HashMap<Endpoint, Vec<Handler>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the list for `endpoint`. Handlers run in
    /// registration order.
    pub fn register(&self, endpoint: Endpoint, handler: Handler) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(endpoint)
            .or_default()
            .push(handler);
    }

    pub fn handler_count(&self, endpoint: Endpoint) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&endpoint)
            .map_or(0, Vec::len)
    }

    /// Invokes every handler for the event's endpoint and returns how many ran.
    pub fn dispatch(&self, event: &OscEvent) -> usize {
        // Snapshot so handlers can register more handlers without deadlocking.
        let handlers: Vec<Handler> = match self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event.endpoint())
        {
            Some(list) => list.clone(),
            None => return 0,
        };
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Decodes and dispatches one message. Unknown and malformed messages are skipped.
    pub fn handle_message(&self, msg: &OscMessage) -> usize {
        match codec::decode(msg) {
            Some(event) => {
                let count = self.dispatch(&event);
                debug!(addr = %msg.addr, handlers = count, "dispatched OSC message");
                count
            }
            None => {
                debug!(addr = %msg.addr, args = ?msg.args, "skipping unknown or malformed OSC message");
                0
            }
        }
    }

    pub fn handle_packet(&self, packet: OscPacket) -> usize {
        let mut messages = Vec::new();
        codec::flatten(packet, &mut messages);
        messages.iter().map(|msg| self.handle_message(msg)).sum()
    }
}
