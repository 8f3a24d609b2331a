// src/config.rs
//! The command table: every subcommand and flag the `notion` binary accepts.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Work seamlessly with Notion from the command line.
#[derive(Parser, Debug)]
#[command(name = "notion", author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,

    /// Show HTTP request/response details
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    /// Enable verbose logging (debug level, timestamped)
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// How command results are printed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable tables and fields
    #[default]
    Auto,
    /// The API's JSON, pretty-printed
    Json,
    Table,
    Text,
    /// Markdown for page and block content
    #[value(alias = "md")]
    Markdown,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        self == OutputFormat::Json
    }

    pub fn is_markdown(self) -> bool {
        self == OutputFormat::Markdown
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Authenticate with Notion
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Search pages and databases
    Search(SearchArgs),
    /// Work with pages
    #[command(subcommand)]
    Page(PageCommand),
    /// Work with databases
    #[command(subcommand)]
    Db(DbCommand),
    /// Work with blocks
    #[command(subcommand)]
    Block(BlockCommand),
    /// Work with users
    #[command(subcommand)]
    User(UserCommand),
    /// Work with comments
    #[command(subcommand)]
    Comment(CommentCommand),
    /// Work with file uploads
    #[command(subcommand)]
    File(FileCommand),
    /// Make an authenticated API request
    Api(ApiArgs),
}

/// Cursor flags shared by list commands.
#[derive(Args, Debug, Clone, Default)]
pub struct PageFlags {
    /// Pagination cursor from previous results
    #[arg(long)]
    pub cursor: Option<String>,

    /// Fetch all pages of results
    #[arg(long, default_value_t = false)]
    pub all: bool,
}

// --- auth ---

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Log in with an integration token
    Login {
        /// Read the token from standard input without prompting
        #[arg(long, default_value_t = false)]
        with_token: bool,
    },
    /// Show authentication status
    Status,
    /// Forget the stored token
    Logout,
}

// --- search ---

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Words to search for in titles
    pub query: Vec<String>,

    /// Only return this kind of object
    #[arg(short = 't', long = "type", value_enum)]
    pub object_type: Option<ObjectType>,

    /// Maximum results per request
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    #[command(flatten)]
    pub paging: PageFlags,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Page,
    Database,
}

impl ObjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Page => "page",
            ObjectType::Database => "database",
        }
    }
}

// --- page ---

#[derive(Subcommand, Debug)]
pub enum PageCommand {
    /// Show a page and its content
    View {
        /// Page ID or URL
        page: String,
        /// Levels of nested blocks to fetch
        #[arg(long, default_value_t = crate::constants::DEFAULT_BLOCK_DEPTH)]
        depth: usize,
    },
    /// List pages in the workspace
    List {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
        #[command(flatten)]
        paging: PageFlags,
    },
    /// Create a page under a page, or a row in a database with --db
    Create {
        /// Parent page or database ID or URL
        parent: String,
        /// Properties as key=value (with --db)
        properties: Vec<String>,
        /// Page title (required for a page parent)
        #[arg(long)]
        title: Option<String>,
        /// Page body text
        #[arg(long)]
        body: Option<String>,
        /// The parent is a database
        #[arg(long, default_value_t = false)]
        db: bool,
    },
    /// Archive a page
    Delete { page: String },
    /// Restore an archived page
    Restore { page: String },
    /// Move a page under another page
    Move {
        page: String,
        /// Target parent page ID or URL
        #[arg(long)]
        to: String,
    },
    /// Open a page in the browser
    Open { page: String },
    /// Set page properties
    Set {
        page: String,
        /// Properties as key=value
        #[arg(required = true)]
        properties: Vec<String>,
    },
    /// Show page properties, or one property item by ID
    Props {
        page: String,
        property_id: Option<String>,
    },
    /// Add a page to a relation property
    Link {
        page: String,
        /// Relation property name
        #[arg(long)]
        prop: String,
        /// Page ID or URL to link
        #[arg(long)]
        to: String,
    },
    /// Remove a page from a relation property
    Unlink {
        page: String,
        /// Relation property name
        #[arg(long)]
        prop: String,
        /// Page ID or URL to unlink
        #[arg(long)]
        from: String,
    },
}

// --- db ---

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// List databases
    List {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
        #[command(flatten)]
        paging: PageFlags,
    },
    /// Show a database schema
    View { database: String },
    /// Create a database under a page
    Create {
        /// Parent page ID or URL
        parent: String,
        /// Database title
        #[arg(long)]
        title: String,
        /// Additional properties as name:type,... (e.g. Status:select,Date:date)
        #[arg(long)]
        props: Option<String>,
    },
    /// Rename a database or add properties
    Update {
        database: String,
        /// New database title
        #[arg(long)]
        title: Option<String>,
        /// Properties to add as name:type,...
        #[arg(long)]
        add_prop: Option<String>,
    },
    /// Add a row
    Add {
        database: String,
        /// Properties as key=value
        #[arg(required = true)]
        properties: Vec<String>,
    },
    /// Add rows from a JSON file holding an array of objects
    AddBulk {
        database: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Query rows with filters and sorts
    Query {
        database: String,
        /// Filter expression (e.g. 'Status=Done'), repeatable
        #[arg(short = 'F', long = "filter")]
        filters: Vec<String>,
        /// Sort expression (e.g. 'Date:desc'), repeatable
        #[arg(short, long = "sort")]
        sorts: Vec<String>,
        /// Maximum results per request
        #[arg(short, long)]
        limit: Option<usize>,
        #[command(flatten)]
        paging: PageFlags,
    },
    /// Open a database in the browser
    Open { database: String },
}

// --- block ---

/// Content flags shared by `block append` and `block insert`.
#[derive(Args, Debug, Clone)]
pub struct BlockContentArgs {
    /// Text of the new block
    pub text: Option<String>,

    /// Block type: paragraph, h1, h2, h3, todo, bullet, numbered, quote, code, callout, divider
    #[arg(short = 't', long = "type", default_value = "paragraph")]
    pub block_type: String,

    /// Language for code blocks
    #[arg(long, default_value = crate::model::PLAIN_TEXT_LANGUAGE)]
    pub lang: String,

    /// Read blocks from a Markdown file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum BlockCommand {
    /// List child blocks
    List {
        /// Parent page or block ID or URL
        parent: String,
        /// Levels of nested blocks to fetch
        #[arg(long, default_value_t = 1)]
        depth: usize,
        /// Print Markdown
        #[arg(long, default_value_t = false)]
        md: bool,
        #[command(flatten)]
        paging: PageFlags,
    },
    /// Show one block
    Get { block: String },
    /// Append blocks to a page or block
    Append {
        parent: String,
        #[command(flatten)]
        content: BlockContentArgs,
    },
    /// Insert blocks after a sibling
    Insert {
        parent: String,
        /// Block ID to insert after
        #[arg(long)]
        after: String,
        #[command(flatten)]
        content: BlockContentArgs,
    },
    /// Replace a block's text
    Update {
        block: String,
        /// New text content
        #[arg(long)]
        text: String,
        /// Block type (looked up when omitted)
        #[arg(short = 't', long = "type")]
        block_type: Option<String>,
    },
    /// Delete one or more blocks
    Delete {
        #[arg(required = true)]
        blocks: Vec<String>,
    },
}

// --- user / comment / file ---

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Show the integration's bot user
    Me,
    /// List workspace users
    List {
        #[command(flatten)]
        paging: PageFlags,
    },
    /// Show a user
    Get { user: String },
}

#[derive(Subcommand, Debug)]
pub enum CommentCommand {
    /// List comments on a page or block
    List {
        page: String,
        #[command(flatten)]
        paging: PageFlags,
    },
    /// Comment on a page
    Add { page: String, text: String },
}

#[derive(Subcommand, Debug)]
pub enum FileCommand {
    /// List file uploads
    List,
    /// Upload a file
    Upload {
        path: PathBuf,
        /// Page to attach the file to
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct ApiArgs {
    /// HTTP method
    pub method: String,
    /// Request path, e.g. /v1/users/me
    pub path: String,
    /// JSON request body (read from piped stdin when omitted)
    #[arg(long)]
    pub body: Option<String>,
}
