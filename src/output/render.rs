// src/output/render.rs
//! Terminal presentation: titles, fields, tables and pretty JSON.
//!
//! Everything goes through a [`Printer`] over any `Write`, so commands can be
//! run against a buffer in tests.

use crate::constants::{FIELD_LABEL_WIDTH, SEPARATOR_WIDTH, TABLE_MAX_CELL_WIDTH};
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const COLUMN_GAP: &str = "  ";

pub struct Printer<'a> {
    out: &'a mut dyn Write,
}

impl<'a> Printer<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }

    /// `icon text`, bold.
    pub fn title(&mut self, icon: &str, text: &str) -> Result<()> {
        writeln!(self.out, "{}", format!("{} {}", icon, text).bold())?;
        Ok(())
    }

    /// A dimmed line.
    pub fn subtitle(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text.dimmed())?;
        Ok(())
    }

    pub fn separator(&mut self) -> Result<()> {
        writeln!(self.out, "{}", "━".repeat(SEPARATOR_WIDTH))?;
        Ok(())
    }

    /// `Key:` padded to a fixed label column, then the value.
    pub fn field(&mut self, key: &str, value: &str) -> Result<()> {
        let label = pad_to_width(&format!("{}:", key), FIELD_LABEL_WIDTH);
        writeln!(self.out, "{}{}", label.cyan(), value)?;
        Ok(())
    }

    pub fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    pub fn blank(&mut self) -> Result<()> {
        writeln!(self.out)?;
        Ok(())
    }

    /// Writes pre-rendered text as is.
    pub fn raw(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Text with no newline, flushed so it shows before input is read.
    pub fn prompt(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value)?;
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    /// Aligned columns separated by two spaces, a `─` rule under the
    /// headers. Columns are as wide as their widest cell, capped at 60
    /// display columns; longer cells end in `…`.
    pub fn table<S: AsRef<str>>(&mut self, headers: &[&str], rows: &[Vec<S>]) -> Result<()> {
        if rows.is_empty() {
            return self.line("No results.");
        }

        let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.as_ref().width());
            }
        }
        for width in &mut widths {
            *width = (*width).min(TABLE_MAX_CELL_WIDTH);
        }

        let header_line = join_columns(headers.iter().copied(), &widths);
        writeln!(self.out, "{}", header_line.bold())?;

        let rule = join_columns(widths.iter().map(|w| "─".repeat(*w)), &widths);
        writeln!(self.out, "{}", rule)?;

        for row in rows {
            let line = join_columns(row.iter().map(AsRef::as_ref), &widths);
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }
}

fn join_columns<I, S>(cells: I, widths: &[usize]) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let line = cells
        .into_iter()
        .zip(widths)
        .map(|(cell, width)| pad_to_width(&truncate_to_width(cell.as_ref(), *width), *width))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    line.trim_end().to_string()
}

fn pad_to_width(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}

/// Cuts `text` to `max_width` display columns, ending in `…` when cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let limit = max_width.saturating_sub(1);
    let mut result = String::new();
    let mut current_width = 0;
    for c in text.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
