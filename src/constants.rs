// src/constants.rs
//! Domain constants that define the operational boundaries of the client.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// Base URL of the Notion REST API.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com";

/// Value of the `Notion-Version` header sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// Base URL for opening pages and databases in a browser.
pub const NOTION_WEB_BASE_URL: &str = "https://www.notion.so";

/// The single per-request deadline. There is no retry after it fires.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Maximum number of blocks one append call accepts.
pub const MAX_BLOCKS_PER_APPEND: usize = 100;

// ---------------------------------------------------------------------------
// Block trees
// ---------------------------------------------------------------------------

/// Nesting depth fetched for `page view` and `block list --depth` defaults.
pub const DEFAULT_BLOCK_DEPTH: usize = 3;

/// Number of spaces per indentation level in rendered block trees.
pub const INDENT_SPACES: usize = 2;

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Display width after which a table cell is cut and ends in `…`.
pub const TABLE_MAX_CELL_WIDTH: usize = 60;

/// Width of the label column in `Field: value` output.
pub const FIELD_LABEL_WIDTH: usize = 16;

/// Length of the `━` separator rule printed under titles.
pub const SEPARATOR_WIDTH: usize = 40;

/// Title shown for pages and databases without one.
pub const UNTITLED: &str = "(untitled)";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Environment variable that overrides the stored token.
pub const TOKEN_ENV_VAR: &str = "NOTION_TOKEN";

/// Directory under the user config dir that holds the credential file.
pub const CONFIG_DIR_NAME: &str = "notion-cli";

/// Credential file name.
pub const CONFIG_FILE_NAME: &str = "config.json";
