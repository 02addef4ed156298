use comrak::nodes::{AstNode, NodeValue};
use tracing::debug;

use crate::domain::slug::AnchorSlugger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeadingInfo {
    pub(crate) level: u8,
    /// `None` when the heading text cannot produce a slug.
    pub(crate) slug: Option<String>,
}

/// Collect headings in document order with their anchor slugs.
///
/// A heading ending in `{#custom-id}` uses that id verbatim; the marker is
/// removed from the tree so it never reaches the rendered HTML.
pub(crate) fn collect_headings<'a>(root: &'a AstNode<'a>) -> Vec<HeadingInfo> {
    let mut slugger = AnchorSlugger::new();

    root.descendants()
        .filter_map(|node| {
            let level = heading_level(node)?;
            if let Some(explicit) = take_explicit_id(node) {
                return Some(HeadingInfo {
                    level,
                    slug: Some(slugger.claim(&explicit)),
                });
            }

            let text = collect_inline_text(node);
            let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
            let slug = match slugger.anchor_for(&normalized) {
                Ok(slug) => Some(slug),
                Err(err) => {
                    debug!(
                        target = "md2html::render",
                        level,
                        error = %err,
                        "heading left without anchor"
                    );
                    None
                }
            };
            Some(HeadingInfo { level, slug })
        })
        .collect()
}

/// Strip a trailing `{#id}` from the heading's last text node and return the
/// id. Ids are non-empty and free of whitespace and braces.
fn take_explicit_id(heading: &AstNode<'_>) -> Option<String> {
    let last = heading.last_child()?;
    let mut data = last.data.borrow_mut();
    let NodeValue::Text(text) = &mut data.value else {
        return None;
    };

    let trimmed = text.trim_end();
    let open = trimmed.strip_suffix('}')?.rfind("{#")?;
    let id = &trimmed[open + 2..trimmed.len() - 1];
    if id.is_empty() || id.chars().any(|ch| ch.is_whitespace() || ch == '{' || ch == '}') {
        return None;
    }

    let id = id.to_string();
    let remaining = trimmed[..open].trim_end().to_string();
    *text = remaining.into();
    Some(id)
}

fn heading_level(node: &AstNode<'_>) -> Option<u8> {
    let data = node.data.borrow();
    if let NodeValue::Heading(heading) = &data.value {
        Some(heading.level)
    } else {
        None
    }
}

fn collect_inline_text(node: &AstNode<'_>) -> String {
    fn walk(node: &AstNode<'_>, buffer: &mut String) {
        {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Text(text) => buffer.push_str(text),
                NodeValue::Code(code) => buffer.push_str(&code.literal),
                NodeValue::Math(math) => buffer.push_str(&math.literal),
                NodeValue::LineBreak | NodeValue::SoftBreak => buffer.push(' '),
                _ => {}
            }
        }
        let mut child = node.first_child();
        while let Some(next) = child {
            walk(next, buffer);
            child = next.next_sibling();
        }
    }

    let mut text = String::new();
    let mut child = node.first_child();
    while let Some(next) = child {
        walk(next, &mut text);
        child = next.next_sibling();
    }
    text
}
