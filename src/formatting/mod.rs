// src/formatting/mod.rs
//! Converts between Notion data and text: property values, block trees and
//! Markdown input.

pub mod block_renderer;
pub mod markdown;
pub mod properties;

pub use self::block_renderer::{
    render_blocks_markdown, render_blocks_terminal, render_markdown, render_terminal,
};
pub use self::markdown::parse_markdown;
