#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Logging primitives shared across Sehha binaries.
//!
//! Layout: `init.rs` (subscriber installation and format selection),
//! `context.rs` (per-invocation span carrying the request id and locale).

pub mod context;
pub mod init;

pub use context::{InvocationContext, new_request_id};
pub use init::{
    DEFAULT_LOG_LEVEL, LOG_FORMAT_ENV, LogFormat, LoggingConfig, init_logging,
    log_format_from_env,
};
