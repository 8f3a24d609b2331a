// src/output/mod.rs
//! Everything that leaves the process other than HTTP: terminal output and
//! browser launches.

mod browser;
mod render;

pub use browser::{browser_url, open_in_browser};
pub use render::{truncate_to_width, Printer};
