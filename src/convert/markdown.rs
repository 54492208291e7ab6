//! Markdown rendering of extracted page text
//!
//! Works on a plain intermediate form (pages → blocks → lines) so the
//! layout heuristics can be exercised without the PDF engine.

use std::collections::HashMap;

/// Blocks longer than this are never promoted to headings
const MAX_HEADING_CHARS: usize = 200;

/// Glyphs that open a list item when they start a line
const BULLETS: &[char] = &['•', '◦', '▪', '‣', '●', '○'];

/// A run of lines the engine grouped together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    /// Dominant character size in points
    pub font_size: f32,
}

/// Text blocks of one page, in reading order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageText {
    pub blocks: Vec<TextBlock>,
}

impl TextBlock {
    pub fn new(lines: Vec<String>, font_size: f32) -> Self {
        Self { lines, font_size }
    }

    fn char_count(&self) -> usize {
        self.lines.iter().map(|l| l.trim().chars().count()).sum()
    }

    fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }
}

/// Render extracted pages as markdown.
///
/// Returns an empty string when no text was extracted; otherwise the
/// output ends with exactly one newline.
pub fn render_markdown(pages: &[PageText]) -> String {
    let blocks: Vec<&TextBlock> = pages
        .iter()
        .flat_map(|p| p.blocks.iter())
        .filter(|b| !b.is_blank())
        .collect();

    let Some(body_size) = body_font_size(&blocks) else {
        return String::new();
    };

    let rendered: Vec<String> = blocks
        .iter()
        .map(|block| render_block(block, body_size))
        .filter(|s| !s.is_empty())
        .collect();

    if rendered.is_empty() {
        return String::new();
    }

    let mut out = rendered.join("\n\n");
    out.push('\n');
    out
}

/// Most frequent font size (to the nearest half point), weighted by characters.
fn body_font_size(blocks: &[&TextBlock]) -> Option<f32> {
    let mut weights: HashMap<i32, usize> = HashMap::new();
    for block in blocks {
        let bucket = (block.font_size * 2.0).round() as i32;
        *weights.entry(bucket).or_default() += block.char_count();
    }

    weights
        .into_iter()
        .max_by(|(a_size, a_weight), (b_size, b_weight)| {
            // ties go to the smaller size
            a_weight.cmp(b_weight).then(b_size.cmp(a_size))
        })
        .map(|(bucket, _)| bucket as f32 / 2.0)
}

fn heading_level(font_size: f32, body_size: f32) -> Option<usize> {
    if body_size <= 0.0 {
        return None;
    }

    let ratio = font_size / body_size;
    if ratio >= 1.5 {
        Some(1)
    } else if ratio >= 1.25 {
        Some(2)
    } else if ratio >= 1.1 {
        Some(3)
    } else {
        None
    }
}

fn render_block(block: &TextBlock, body_size: f32) -> String {
    if block.char_count() <= MAX_HEADING_CHARS {
        if let Some(level) = heading_level(block.font_size, body_size) {
            let text = join_lines(block.lines.iter().map(String::as_str));
            if !text.is_empty() {
                return format!("{} {}", "#".repeat(level), text);
            }
        }
    }

    let mut groups: Vec<String> = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut list: Vec<Vec<&str>> = Vec::new();

    for line in block.lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        if let Some(item) = strip_bullet(line) {
            flush_paragraph(&mut paragraph, &mut groups);
            list.push(vec![item]);
        } else if let Some(current) = list.last_mut() {
            // wrapped continuation of the previous item
            current.push(line);
        } else {
            paragraph.push(line);
        }
    }

    flush_paragraph(&mut paragraph, &mut groups);
    flush_list(&mut list, &mut groups);

    groups.join("\n\n")
}

fn flush_paragraph(paragraph: &mut Vec<&str>, groups: &mut Vec<String>) {
    let text = join_lines(paragraph.drain(..));
    if !text.is_empty() {
        groups.push(text);
    }
}

fn flush_list(list: &mut Vec<Vec<&str>>, groups: &mut Vec<String>) {
    if list.is_empty() {
        return;
    }

    let items: Vec<String> = list
        .drain(..)
        .map(|lines| format!("- {}", join_lines(lines)))
        .collect();
    groups.push(items.join("\n"));
}

/// Return the item text if `line` opens a list item.
fn strip_bullet(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    let first = chars.next()?;
    let rest = chars.as_str();

    let is_bullet = BULLETS.contains(&first)
        || ((first == '-' || first == '*') && rest.starts_with(char::is_whitespace));

    if !is_bullet {
        return None;
    }

    let item = rest.trim_start();
    (!item.is_empty()).then_some(item)
}

/// Join wrapped lines with spaces, undoing end-of-line hyphenation.
fn join_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if !out.is_empty() {
            if out.ends_with('-') && line.starts_with(char::is_lowercase) {
                out.pop();
            } else {
                out.push(' ');
            }
        }
        out.push_str(line);
    }

    out
}
