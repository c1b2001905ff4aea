//! Client library for the ChilloutVR OSC mod.
//!
//! [`OscInterface`] sends typed events to the mod over UDP and runs a receive
//! loop that dispatches the mod's messages to registered callbacks:
//!
//! ```no_run
//! use cvr_osc::{AvatarChangeSend, OscConfig, OscInterface, StartOptions};
//!
//! let osc = OscInterface::new(OscConfig::default());
//! osc.on_avatar_changed(|data| println!("now wearing {}", data.avatar_guid));
//! osc.start(StartOptions::default())?;
//! osc.send_config_reset()?;
//! osc.send_avatar_change(&AvatarChangeSend {
//!     avatar_guid: "6b86cced-e17c-4f57-8bdf-812615773ce6".into(),
//! })?;
//! # Ok::<(), cvr_osc::OscError>(())
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod general;
pub mod interface;
pub mod logging;
pub mod messages;
pub mod remote;

pub use codec::Endpoint;
pub use config::{Config, LogConfig, OscConfig};
pub use error::{CodecError, ConfigError, OscError};
pub use interface::{OscInterface, StartOptions, TransportState};
pub use messages::*;
