//! Response body module
//!
//! One boxed body type shared by in-memory and streamed responses.

use futures_util::{stream, TryStreamExt};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io;
use std::path::PathBuf;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// Body type returned by every handler
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// Body holding the whole payload in memory
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Empty body
pub fn empty() -> ResponseBody {
    full(Bytes::new())
}

/// Body that streams a file from disk chunk by chunk
///
/// The file is opened when the body is first polled, after the response
/// head has been written. Open and read errors end the body with an error,
/// which makes hyper abort the connection instead of finishing the response.
pub fn stream_file(path: PathBuf) -> ResponseBody {
    let chunks = stream::once(File::open(path))
        .map_ok(ReaderStream::new)
        .try_flatten()
        .map_ok(Frame::data);

    StreamBody::new(chunks).boxed_unsync()
}
