//! # req - Build One HTTP Request From the Command Line
//!
//! ```text
//! req [flags] <method> <host-or-path>... [-- key=value ...]
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! args ──▶ cmd_args ──▶ Draft ──┬──▶ request_url ──┐
//!                               └──▶ encoder ──────┴──▶ emitter ──▶ transport
//! ```
//!
//! - [`cmd_args`]: state machine over the argument list
//! - [`value`]: classifies `key=value` right-hand sides
//! - [`draft`]: the request being assembled
//! - [`request_url`]: target URL, with GET fields folded into the query
//! - [`encoder`]: JSON, form or multipart body
//! - [`emitter`]: prepared request, wire dump, send, response passthrough

pub mod cmd_args;
pub mod config;
pub mod draft;
pub mod emitter;
pub mod encoder;
pub mod error;
pub mod request_url;
pub mod value;

pub use cmd_args::{parse_args, ParseState, USAGE};
pub use config::Defaults;
pub use draft::{Draft, Format, Headers};
pub use emitter::{execute, PreparedRequest};
pub use encoder::{AttachmentSource, FsAttachments};
pub use error::{ReqError, Result};
