// src/formatting/block_renderer.rs
//! Block rendering engine: converts block trees to terminal text or Markdown.
//!
//! Both renderers walk the tree depth-first, indenting each nesting level by
//! two spaces. Every line they produce ends with a newline.

use crate::constants::INDENT_SPACES;
use crate::model::{Block, BlockContent, PLAIN_TEXT_LANGUAGE};
use crate::types::concat_plain_text;
use std::fmt::Write;

const DEFAULT_CALLOUT_ICON: &str = "💡";

/// Renders a sequence of top-level blocks for the terminal.
pub fn render_blocks_terminal(blocks: &[Block]) -> String {
    blocks.iter().map(|block| render_terminal(block, 0)).collect()
}

/// Renders a sequence of top-level blocks as Markdown.
pub fn render_blocks_markdown(blocks: &[Block]) -> String {
    blocks.iter().map(|block| render_markdown(block, 0)).collect()
}

/// Renders one block and its children with terminal glyphs.
pub fn render_terminal(block: &Block, indent: usize) -> String {
    let mut out = String::new();
    write_terminal(&mut out, block, indent);
    out
}

/// Renders one block and its children as Markdown.
pub fn render_markdown(block: &Block, indent: usize) -> String {
    let mut out = String::new();
    write_markdown(&mut out, block, indent);
    out
}

fn prefix(indent: usize) -> String {
    " ".repeat(indent * INDENT_SPACES)
}

// Writing into a String can't fail, so the fmt::Result values below are ignored.

fn write_terminal(out: &mut String, block: &Block, indent: usize) {
    let p = prefix(indent);
    let text = block.content.plain_text();

    let _ = match &block.content {
        BlockContent::Paragraph { .. } if text.is_empty() => writeln!(out),
        BlockContent::Paragraph { .. } => writeln!(out, "{}{}", p, text),
        BlockContent::Heading { level, .. } => {
            writeln!(out, "{}{} {}", p, "#".repeat(*level as usize), text)
        }
        BlockContent::BulletedListItem { .. } => writeln!(out, "{}• {}", p, text),
        BlockContent::NumberedListItem { .. } => writeln!(out, "{}  {}", p, text),
        BlockContent::ToDo { checked, .. } => {
            let mark = if *checked { "☑" } else { "☐" };
            writeln!(out, "{}{} {}", p, mark, text)
        }
        BlockContent::Toggle { .. } => writeln!(out, "{}▸ {}", p, text),
        BlockContent::Code { language, .. } => {
            writeln!(out, "{p}```{}\n{p}{}\n{p}```", language, text, p = p)
        }
        BlockContent::Quote { .. } => writeln!(out, "{}│ {}", p, text),
        BlockContent::Callout { .. } => writeln!(out, "{}{} {}", p, DEFAULT_CALLOUT_ICON, text),
        BlockContent::Divider => writeln!(out, "{}───", p),
        BlockContent::Bookmark { url, .. } => writeln!(out, "{}🔗 {}", p, url),
        BlockContent::Image { .. } => writeln!(out, "{}🖼  [image]", p),
        _ if !text.is_empty() => writeln!(out, "{}{}", p, text),
        _ => Ok(()),
    };

    for child in &block.children {
        write_terminal(out, child, indent + 1);
    }
}

fn write_markdown(out: &mut String, block: &Block, indent: usize) {
    let p = prefix(indent);
    let text = block.content.plain_text();

    let _ = match &block.content {
        BlockContent::Paragraph { .. } if text.is_empty() => writeln!(out),
        BlockContent::Paragraph { .. } => write!(out, "{}{}\n\n", p, text),
        BlockContent::Heading { level, .. } => {
            write!(out, "{}{} {}\n\n", p, "#".repeat(*level as usize), text)
        }
        BlockContent::BulletedListItem { .. } | BlockContent::Toggle { .. } => {
            writeln!(out, "{}- {}", p, text)
        }
        BlockContent::NumberedListItem { .. } => writeln!(out, "{}1. {}", p, text),
        BlockContent::ToDo { checked, .. } => {
            let mark = if *checked { "x" } else { " " };
            writeln!(out, "{}- [{}] {}", p, mark, text)
        }
        BlockContent::Code { language, .. } => {
            let language = if language == PLAIN_TEXT_LANGUAGE {
                ""
            } else {
                language.as_str()
            };
            write!(out, "{p}```{}\n{}\n{p}```\n\n", language, text, p = p)
        }
        BlockContent::Quote { .. } => write!(out, "{}> {}\n\n", p, text),
        BlockContent::Callout { icon, .. } => {
            let icon = icon.as_deref().unwrap_or(DEFAULT_CALLOUT_ICON);
            write!(out, "{}> {} {}\n\n", p, icon, text)
        }
        BlockContent::Divider => write!(out, "{}---\n\n", p),
        BlockContent::Bookmark { url, caption } => {
            let caption = concat_plain_text(caption);
            let label = if caption.is_empty() { url } else { &caption };
            write!(out, "{}[{}]({})\n\n", p, label, url)
        }
        BlockContent::Image { url } if !url.is_empty() => {
            write!(out, "{}![image]({})\n\n", p, url)
        }
        BlockContent::Embed { url } => write!(out, "{}[embed]({})\n\n", p, url),
        BlockContent::Video { url } if !url.is_empty() => {
            write!(out, "{}[video]({})\n\n", p, url)
        }
        BlockContent::TableOfContents => write!(out, "{}[TOC]\n\n", p),
        BlockContent::Equation { expression } => {
            write!(out, "{p}$$\n{p}{}\n{p}$$\n\n", expression, p = p)
        }
        BlockContent::Image { .. }
        | BlockContent::Video { .. }
        | BlockContent::ColumnList
        | BlockContent::Column
        | BlockContent::SyncedBlock => Ok(()),
        BlockContent::Unsupported { .. } if !text.is_empty() => {
            write!(out, "{}{}\n\n", p, text)
        }
        BlockContent::Unsupported { .. } => Ok(()),
    };

    for child in &block.children {
        write_markdown(out, child, indent + 1);
    }
}
