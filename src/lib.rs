// src/lib.rs
//! notion-cli library: a command-line client for the Notion workspace API.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `Cli`, `Command`, `OutputFormat`, credential storage
//! - **Domain model**: `Page`, `Database`, `Block`, `PropertyValue`, `PropertySchema`
//! - **Domain types**: `NotionId`, `ApiKey`, `RichTextItem`
//! - **API client**: `NotionTransport`, `NotionHttpClient`, `NotionApi`, pagination
//! - **Formatting**: property codec, Markdown transcoder, block renderers
//! - **Query**: filter and sort expression compilers
//! - **Commands**: `dispatch` and the `Session` it writes through

pub mod api;
pub mod commands;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod formatting;
pub mod model;
pub mod output;
pub mod query;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode, Result, ResultExt};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{Cli, Command, OutputFormat};
pub use crate::credentials::{resolve_token, CredentialStore, Credentials};

// --- Domain Model ---
pub use crate::model::{
    Block, BlockContent, Database, Page, PropertyKind, PropertySchema, PropertyValue,
};

// --- Domain Types ---
pub use crate::types::{resolve_id, ApiKey, NotionId, RichTextItem};

// --- API Client ---
pub use crate::api::{
    collect_all, fetch_block_tree, Method, NotionApi, NotionHttpClient, NotionTransport,
    PaginatedResponse, UploadPart,
};

// --- Formatting ---
pub use crate::formatting::{
    parse_markdown, render_blocks_markdown, render_blocks_terminal, render_markdown,
    render_terminal,
};

// --- Query ---
pub use crate::query::{compile_filter, compile_filters, compile_sort, DatabaseQuery};

// --- Commands ---
pub use crate::commands::{dispatch, Session};
pub use crate::output::Printer;
