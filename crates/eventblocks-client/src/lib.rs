//! CLI, upstream API client, journal block insertion
//!
//! This crate provides the `eventblocks` command-line interface.

pub mod api;
pub mod blocks;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod journal;
pub mod source;

pub use api::{EventsApi, EventsApiConfig, FetchError};
pub use blocks::{BlockId, BlockSink, MemorySink, OutlineSink};
pub use cli::Cli;
pub use config::Settings;
pub use error::{ClientError, ClientResult};
pub use journal::JournalContext;
pub use source::{EventSource, FileSource};
