//! HTTP protocol layer module
//!
//! Content-type lookup, body types and response builders shared by both servers.

pub mod body;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use body::ResponseBody;
pub use response::{
    build_404_response, build_file_response, build_stream_response, NOT_FOUND_BODY,
};
