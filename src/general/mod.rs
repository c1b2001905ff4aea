//! Console helpers: colored banners, command parsing and the stdin loop.

pub mod banner;
pub mod commands;
pub mod stdin_handler;
