//! Reconstructed document output.
//!
//! The pipeline's product is a flat ordered sequence of typed nodes per
//! page: titles with their inferred level, paragraphs, and tables.
//! Rendering those nodes to markup is a downstream concern; the only
//! text-level repair applied here is bullet regrouping, which joins a
//! `:`-introduced run of same-pattern fragments into one paragraph.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::layout::{Element, Page};

/// One node of the reconstructed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Title {
        page: usize,
        text: String,
        level: usize,
    },
    Paragraph {
        page: usize,
        text: String,
    },
    Table {
        page: usize,
        /// Absent when the cell service supplied no grid; renders as a
        /// placeholder marker downstream.
        rows: Option<Vec<Vec<String>>>,
    },
}

/// A fully reconstructed document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub name: String,
    pub content: Vec<Node>,
}

/// Flattens classified pages into the node sequence. Empty text is
/// dropped; everything else keeps its page of origin.
pub fn assemble(pages: &[Page], group_bullets: bool) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (p, page) in pages.iter().enumerate() {
        for elem in page.iter() {
            match elem {
                Element::Text(block) => {
                    let text = block.get_text().trim().to_string();
                    if text.is_empty() {
                        continue;
                    }
                    match block.title_level {
                        Some(level) => nodes.push(Node::Title {
                            page: p,
                            text,
                            level,
                        }),
                        None => nodes.push(Node::Paragraph { page: p, text }),
                    }
                }
                Element::Table(table) => nodes.push(Node::Table {
                    page: p,
                    rows: table.grid.as_ref().map(|g| g.rows.clone()),
                }),
                _ => {}
            }
        }
    }
    if group_bullets {
        nodes = group_bullet_runs(nodes);
    }
    nodes
}

// Character class the bullet-pattern alphabet reduces words to. Covers
// Latin, Hangul and CJK, like the documents this was tuned on.
const WORD_CLASS: &str = "[a-zA-Z0-9가-힣ㅏ-ㅣㄱ-ㅎ\u{4e00}-\u{9fff}]+";

static BRACKET_OPEN: &[char] = &['(', '[', '{'];

/// Derives a regex describing the bullet shape of a line's first token:
/// punctuation stays literal, alphanumeric runs generalize to a word
/// class. A token without punctuation (or a simple bracketed word) is
/// not a bullet and yields an empty pattern.
fn bullet_pattern(line: &str) -> String {
    let trimmed = line.trim();
    let Some(first) = trimmed.split_whitespace().next() else {
        return String::new();
    };
    let chars: Vec<char> = first.chars().collect();
    if chars.len() > 1 && BRACKET_OPEN.contains(&chars[0]) && chars[1..].iter().all(|c| c.is_alphanumeric())
    {
        return String::new();
    }

    let mut parts: Vec<String> = Vec::new();
    let mut has_punctuation = false;
    for c in chars {
        if c.is_alphanumeric() {
            if parts.last().map(String::as_str) != Some(WORD_CLASS) {
                parts.push(WORD_CLASS.to_string());
            }
        } else {
            parts.push(regex::escape(&c.to_string()));
            has_punctuation = true;
        }
    }
    if has_punctuation {
        parts.concat()
    } else {
        String::new()
    }
}

fn compile_anchored(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("^{pattern}")).ok()
}

static TERMINATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*$").unwrap());

/// Groups a run of consecutive paragraphs: a `:`-terminated introducer
/// followed by fragments sharing a bullet pattern becomes one paragraph,
/// fragments joined with newlines.
fn group_bullets(items: Vec<(String, usize)>) -> Vec<(String, usize)> {
    let items: Vec<(String, usize)> = items
        .into_iter()
        .map(|(t, p)| (t.trim().to_string(), p))
        .filter(|(t, _)| !t.is_empty())
        .collect();

    let mut grouped: Vec<Vec<(String, usize)>> = Vec::new();
    let mut pending: Vec<(String, usize)> = Vec::new();
    let mut patterns: Vec<String> = Vec::new();
    let mut compiled: Vec<Regex> = Vec::new();
    let mut in_group = false;

    let push_pattern = |pattern: String, patterns: &mut Vec<String>, compiled: &mut Vec<Regex>| {
        if !patterns.contains(&pattern) {
            if let Some(re) = compile_anchored(&pattern) {
                patterns.push(pattern);
                compiled.push(re);
            }
        }
    };

    for n in 0..items.len() {
        let (text, page) = items[n].clone();
        if TERMINATORS.is_match(&text) && n + 1 < items.len() {
            let next_pattern = bullet_pattern(&items[n + 1].0);
            if !next_pattern.is_empty() && bullet_pattern(&text) != next_pattern {
                pending.push((text, page));
                push_pattern(next_pattern, &mut patterns, &mut compiled);
                in_group = true;
            } else if !pending.is_empty() {
                pending.push((text, page));
                push_pattern(next_pattern, &mut patterns, &mut compiled);
            } else {
                grouped.push(vec![(text, page)]);
            }
        } else if in_group {
            if compiled.iter().any(|re| re.is_match(&text)) {
                pending.push((text, page));
            } else {
                grouped.push(std::mem::take(&mut pending));
                grouped.push(vec![(text, page)]);
                in_group = false;
                patterns.clear();
                compiled.clear();
            }
        } else {
            grouped.push(vec![(text, page)]);
        }
    }
    if in_group && !pending.is_empty() {
        grouped.push(pending);
    }

    grouped
        .into_iter()
        .filter(|g| !g.is_empty())
        .map(|group| {
            let page = group[0].1;
            let text = group
                .iter()
                .map(|(t, _)| t.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            (text, page)
        })
        .collect()
}

/// Applies bullet grouping to every maximal run of paragraph nodes.
fn group_bullet_runs(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::new();
    let mut run: Vec<(String, usize)> = Vec::new();

    let flush = |run: &mut Vec<(String, usize)>, out: &mut Vec<Node>| {
        if run.is_empty() {
            return;
        }
        for (text, page) in group_bullets(std::mem::take(run)) {
            out.push(Node::Paragraph { page, text });
        }
    };

    for node in nodes {
        match node {
            Node::Paragraph { page, text } => run.push((text, page)),
            other => {
                flush(&mut run, &mut out);
                out.push(other);
            }
        }
    }
    flush(&mut run, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullet_pattern_generalizes_tokens() {
        assert!(!bullet_pattern("- item one").is_empty());
        assert!(!bullet_pattern("1.2 nested item").is_empty());
        assert_eq!(bullet_pattern("plain text"), "");
        assert_eq!(bullet_pattern("(a) bracketed"), "");
    }

    #[test]
    fn grouping_joins_introduced_bullets() {
        let items = vec![
            ("The works include:".to_string(), 0),
            ("- excavation".to_string(), 0),
            ("- backfill".to_string(), 0),
            ("A separate paragraph.".to_string(), 0),
        ];
        let grouped = group_bullets(items);
        assert_eq!(grouped.len(), 2);
        assert!(grouped[0].0.contains("excavation"));
        assert!(grouped[0].0.contains("backfill"));
        assert_eq!(grouped[1].0, "A separate paragraph.");
    }

    #[test]
    fn ungrouped_runs_pass_through() {
        let items = vec![
            ("First paragraph.".to_string(), 0),
            ("Second paragraph.".to_string(), 1),
        ];
        let grouped = group_bullets(items);
        assert_eq!(grouped.len(), 2);
    }
}
