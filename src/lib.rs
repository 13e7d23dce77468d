//! Two small HTTP servers sharing one connection layer:
//! a static file server with an in-memory cache, and an image streamer.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
