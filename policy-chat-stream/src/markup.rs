//! Lightweight block structure for rendering accumulated chat text.
//!
//! Answers use a small markdown subset: paragraphs and `*`/`-` bullet lists.
//! Re-run [`blocks`] on every render event; partial text is fine.

/// A renderable block of chat text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A trimmed, non-empty line.
    Paragraph(String),
    /// Consecutive bullet items, markers stripped.
    List(Vec<String>),
}

/// Split text into paragraphs and bullet lists.
///
/// Lines starting with `* ` or `- ` (after trimming) collect into a list.
/// Any other non-blank line closes the open list and becomes a paragraph;
/// blank lines only close the list. Non-empty text that yields no blocks
/// (whitespace only) is returned as a single paragraph.
#[must_use]
pub fn blocks(text: &str) -> Vec<Block> {
    let mut out = Vec::new();
    let mut list: Vec<String> = Vec::new();

    for line in text.split('\n') {
        let trimmed = line.trim();
        if let Some(item) = trimmed.strip_prefix("* ").or_else(|| trimmed.strip_prefix("- ")) {
            list.push(item.to_string());
            continue;
        }
        if !list.is_empty() {
            out.push(Block::List(std::mem::take(&mut list)));
        }
        if !trimmed.is_empty() {
            out.push(Block::Paragraph(trimmed.to_string()));
        }
    }
    if !list.is_empty() {
        out.push(Block::List(list));
    }

    if out.is_empty() && !text.is_empty() {
        out.push(Block::Paragraph(text.to_string()));
    }
    out
}
