// src/formatting/markdown.rs
//! Markdown text to blocks, for `block append --file` and friends.
//!
//! Line-oriented and deliberately small: headings, lists, to-dos, quotes,
//! fenced code and dividers. Inline formatting is kept as literal text.

use crate::model::{Block, BlockContent, PLAIN_TEXT_LANGUAGE};
use crate::types::single_run;

const FENCE: &str = "```";

/// Parses Markdown into a flat list of blocks, one per non-blank line
/// (one per fenced region for code).
pub fn parse_markdown(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        if let Some(rest) = line.strip_prefix(FENCE) {
            let language = match rest.trim() {
                "" => PLAIN_TEXT_LANGUAGE,
                lang => lang,
            };
            let body: Vec<&str> = lines
                .by_ref()
                .take_while(|line| !line.starts_with(FENCE))
                .collect();
            blocks.push(Block::new(BlockContent::Code {
                text: single_run(&body.join("\n")),
                language: language.to_string(),
            }));
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        blocks.push(Block::new(classify_line(line)));
    }

    log::debug!("Parsed {} blocks from markdown", blocks.len());
    blocks
}

/// Picks the block type of a single non-blank, non-fence line.
fn classify_line(line: &str) -> BlockContent {
    let text = |s: &str| single_run(s.trim());

    if let Some(rest) = line.strip_prefix("### ") {
        return BlockContent::Heading { level: 3, text: text(rest) };
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return BlockContent::Heading { level: 2, text: text(rest) };
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return BlockContent::Heading { level: 1, text: text(rest) };
    }

    if let Some(rest) = line.strip_prefix("- [ ] ") {
        return BlockContent::ToDo { text: text(rest), checked: false };
    }
    if let Some(rest) = line
        .strip_prefix("- [x] ")
        .or_else(|| line.strip_prefix("- [X] "))
    {
        return BlockContent::ToDo { text: text(rest), checked: true };
    }

    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return BlockContent::BulletedListItem { text: text(rest) };
    }

    if let Some(rest) = numbered_item(line) {
        return BlockContent::NumberedListItem { text: text(rest) };
    }

    if let Some(rest) = line.strip_prefix("> ") {
        return BlockContent::Quote { text: text(rest) };
    }

    if matches!(line, "---" | "***" | "___") {
        return BlockContent::Divider;
    }

    BlockContent::Paragraph { text: text(line) }
}

/// `1. item`: a leading digit and `". "` within the first five characters.
/// Returns the text after the first `". "`.
fn numbered_item(line: &str) -> Option<&str> {
    if !line.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let head_end = line
        .char_indices()
        .nth(5)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len());
    let idx = line[..head_end].find(". ")?;
    Some(&line[idx + 2..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(blocks: &[Block]) -> Vec<&str> {
        blocks.iter().map(|b| b.content.kind()).collect()
    }

    #[test]
    fn test_line_precedence() {
        let blocks = parse_markdown(
            "# One\n## Two\n### Three\n- [ ] open\n- [X] done\n- bullet\n* star\n12. twelve\n> quoted\n***\nplain",
        );
        assert_eq!(
            kinds(&blocks),
            vec![
                "heading_1",
                "heading_2",
                "heading_3",
                "to_do",
                "to_do",
                "bulleted_list_item",
                "bulleted_list_item",
                "numbered_list_item",
                "quote",
                "divider",
                "paragraph"
            ]
        );
        assert_eq!(blocks[4].content, BlockContent::ToDo { text: single_run("done"), checked: true });
        assert_eq!(blocks[7].content.plain_text(), "twelve");
    }

    #[test]
    fn test_numbered_marker_must_be_near_start() {
        assert_eq!(numbered_item("1. a"), Some("a"));
        assert_eq!(numbered_item("123. a"), Some("a"));
        assert_eq!(numbered_item("12345. a"), None);
        assert_eq!(numbered_item("a. b"), None);
        assert_eq!(numbered_item("2026 was fine. really"), None);
    }

    #[test]
    fn test_fenced_code() {
        let blocks = parse_markdown("```rust\nfn main() {\n\n}\n```\nafter");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0].content,
            BlockContent::Code { text: single_run("fn main() {\n\n}"), language: "rust".into() }
        );
        assert_eq!(blocks[1].content.plain_text(), "after");
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let blocks = parse_markdown("```\nline one\n# not a heading");
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0].content,
            BlockContent::Code {
                text: single_run("line one\n# not a heading"),
                language: "plain text".into()
            }
        );
    }

    #[test]
    fn test_paragraphs_are_trimmed() {
        let blocks = parse_markdown("   indented text   \n\t\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content.plain_text(), "indented text");
    }

    #[test]
    fn test_hash_without_space_is_paragraph() {
        let blocks = parse_markdown("#hashtag\n-dash");
        assert_eq!(kinds(&blocks), vec!["paragraph", "paragraph"]);
    }
}
