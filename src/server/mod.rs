// Server module entry point
// Listener binding, connection handling, accept loop and process lifecycle

pub mod connection;
pub mod launch;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use launch::{run, serve};
pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;
