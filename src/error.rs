//! Error types for the OSC interface.

use std::io;
use std::path::PathBuf;

/// Errors raised while turning events into datagrams and back.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// rosc refused to encode the packet.
    #[error("encode failed: {0}")]
    Encode(#[source] rosc::OscError),

    /// The datagram is not a valid OSC packet.
    #[error("decode failed: {0}")]
    Decode(#[source] rosc::OscError),
}

/// Errors raised while loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced by [`OscInterface`](crate::OscInterface).
#[derive(Debug, thiserror::Error)]
pub enum OscError {
    /// The configured host/port does not resolve to a socket address.
    #[error("cannot resolve {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Binding the receive socket (or the ephemeral send socket) failed.
    #[error("bind failed on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Connecting the send socket to the mod failed.
    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Writing a datagram failed.
    #[error("send to {addr} failed: {source}")]
    Send {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The receive thread could not be spawned.
    #[error("failed to spawn receiver thread: {0}")]
    Spawn(#[source] io::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
