//! UDP transport: the send socket, the receive loop and the handler registry.

pub mod dispatcher;
pub mod osc_listener;
pub mod osc_sender;

pub use dispatcher::{Dispatcher, Handler};
pub use osc_listener::OscListener;
pub use osc_sender::OscSender;
