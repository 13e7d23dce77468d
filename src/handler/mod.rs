//! Request handler module
//!
//! The two servers plug into the shared connection layer through [`Handler`].
//! - [`static_files`]: files under a root directory, cached in memory
//! - [`image`]: one fixed image streamed to every requester

pub mod file_cache;
pub mod image;
pub mod static_files;

use crate::http::ResponseBody;
use hyper::http::request::Parts;
use hyper::Response;
use std::future::Future;

pub use file_cache::{CacheStats, FileCache};
pub use image::ImageStream;
pub use static_files::StaticFiles;

/// Turns a request head into a response
///
/// Request bodies are never consulted, so handlers only see the head.
/// Futures run on a `LocalSet` and need not be `Send`.
pub trait Handler: 'static {
    fn handle(&self, req: &Parts) -> impl Future<Output = Response<ResponseBody>>;

    /// Short description for the startup banner
    fn describe(&self) -> String;
}
