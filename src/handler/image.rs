//! Fixed image streaming
//!
//! Answers every request, whatever the method or path, with the same file
//! streamed from disk. Nothing is cached; each request opens the file anew.

use super::Handler;
use crate::config::ImageConfig;
use crate::http::{self, body, ResponseBody};
use hyper::http::request::Parts;
use hyper::Response;
use std::path::PathBuf;

pub struct ImageStream {
    path: PathBuf,
    content_type: String,
}

impl ImageStream {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            path: PathBuf::from(&config.path),
            content_type: config.content_type.clone(),
        }
    }
}

impl Handler for ImageStream {
    // A missing file is only noticed once the body is polled, after the 200
    // head went out; the connection is then aborted.
    async fn handle(&self, _req: &Parts) -> Response<ResponseBody> {
        http::build_stream_response(body::stream_file(self.path.clone()), &self.content_type)
    }

    fn describe(&self) -> String {
        format!("{} as {}", self.path.display(), self.content_type)
    }
}
