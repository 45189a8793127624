//! The editor-facing completion and navigation service.
//!
//! [`SourceService`] is constructed once per editor session. It owns a
//! [`Pipeline`](ccx_pipeline::Pipeline) whose worker thread holds both
//! translation-unit caches and their engine handles, and exposes the
//! operations the editor calls:
//!
//! - [`on_complete`](SourceService::on_complete): asynchronous completion,
//!   delivered through [`Host::complete`]; superseded requests are dropped.
//! - [`find_declaration`](SourceService::find_declaration): synchronous
//!   go-to-definition.
//! - [`cache_add`](SourceService::cache_add) and
//!   [`cache_del`](SourceService::cache_del): warm up or drop a file's units.
//! - [`args_dir`](SourceService::args_dir): the compiler arguments and run
//!   directory a file is parsed with.

#![warn(missing_docs)]

pub mod args;
pub mod context;
pub mod error;
pub mod host;
pub mod service;

pub use args::{compiler_args, CompilerArgs};
pub use context::{BufferContext, Language};
pub use error::ServiceError;
pub use host::Host;
pub use service::SourceService;

pub use ccx_flags::FlagOrigin;
