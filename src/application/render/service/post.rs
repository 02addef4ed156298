use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use lol_html::{RewriteStrSettings, element, rewrite_str};

use crate::application::render::types::RenderError;

use super::headings::HeadingInfo;

const EXTERNAL_LINK_TARGET: &str = "_blank";
const EXTERNAL_LINK_REL: [&str; 2] = ["noopener", "noreferrer"];

#[derive(Debug, Default)]
pub(crate) struct ProcessedHtml {
    pub(crate) html: String,
    pub(crate) anchored_headings: u32,
    pub(crate) external_links: u32,
}

#[derive(Default)]
struct PostProcessState {
    heading_index: usize,
    anchored_headings: u32,
    external_links: u32,
}

/// Attach heading ids and open absolute links in a new browsing context.
///
/// Headings are matched to `headings` by position; an element whose level
/// disagrees with the collected heading is left untouched.
pub(crate) fn post_process(
    html: &str,
    headings: &[HeadingInfo],
) -> Result<ProcessedHtml, RenderError> {
    if html.is_empty() {
        return Ok(ProcessedHtml::default());
    }

    let headings_shared = Rc::new(headings.to_vec());
    let state = Rc::new(RefCell::new(PostProcessState::default()));

    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("h1, h2, h3, h4, h5, h6", {
                    let headings_shared = Rc::clone(&headings_shared);
                    let state = Rc::clone(&state);
                    move |el| {
                        let mut state = state.borrow_mut();
                        let Some(info) = headings_shared.get(state.heading_index) else {
                            return Ok(());
                        };
                        state.heading_index += 1;

                        let level = el
                            .tag_name()
                            .strip_prefix('h')
                            .and_then(|value| value.parse::<u8>().ok())
                            .unwrap_or(0);
                        if level != info.level {
                            return Ok(());
                        }

                        if let Some(slug) = info.slug.as_deref() {
                            el.set_attribute("id", slug)?;
                            state.anchored_headings = state.anchored_headings.saturating_add(1);
                        }
                        Ok(())
                    }
                }),
                element!("a[href]", {
                    let state = Rc::clone(&state);
                    move |el| {
                        let Some(href) = el.get_attribute("href") else {
                            return Ok(());
                        };
                        if let LinkKind::Absolute = classify_link(&href) {
                            el.set_attribute("target", EXTERNAL_LINK_TARGET)?;
                            let rel = merge_rel(el.get_attribute("rel"), &EXTERNAL_LINK_REL);
                            el.set_attribute("rel", &rel)?;

                            let mut state = state.borrow_mut();
                            state.external_links = state.external_links.saturating_add(1);
                        }
                        Ok(())
                    }
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| RenderError::Document {
        message: err.to_string(),
    })?;

    let state = state.borrow();
    Ok(ProcessedHtml {
        html: rewritten,
        anchored_headings: state.anchored_headings,
        external_links: state.external_links,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    Fragment,
    Relative,
    Absolute,
}

fn classify_link(href: &str) -> LinkKind {
    if href.is_empty() || href.starts_with('#') {
        return LinkKind::Fragment;
    }

    if is_relative_path(href) {
        return LinkKind::Relative;
    }

    LinkKind::Absolute
}

fn is_relative_path(href: &str) -> bool {
    (href.starts_with('/') && !href.starts_with("//"))
        || href.starts_with("./")
        || href.starts_with("../")
}

fn merge_rel(existing: Option<String>, required: &[&str]) -> String {
    let mut tokens: BTreeSet<String> = existing
        .unwrap_or_default()
        .split_whitespace()
        .map(|token| token.to_string())
        .collect();
    for &token in required {
        tokens.insert(token.to_string());
    }
    tokens.into_iter().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: u8, slug: &str) -> HeadingInfo {
        HeadingInfo {
            level,
            slug: Some(slug.to_string()),
        }
    }

    #[test]
    fn classifies_links_by_destination() {
        assert_eq!(classify_link("#intro"), LinkKind::Fragment);
        assert_eq!(classify_link(""), LinkKind::Fragment);
        assert_eq!(classify_link("/docs"), LinkKind::Relative);
        assert_eq!(classify_link("/"), LinkKind::Relative);
        assert_eq!(classify_link("./a.md"), LinkKind::Relative);
        assert_eq!(classify_link("../b.md"), LinkKind::Relative);
        assert_eq!(classify_link("//cdn.example.com/x"), LinkKind::Absolute);
        assert_eq!(classify_link("https://example.com"), LinkKind::Absolute);
        assert_eq!(classify_link("mailto:me@example.com"), LinkKind::Absolute);
        assert_eq!(classify_link("page.html"), LinkKind::Absolute);
    }

    #[test]
    fn merge_rel_deduplicates_and_sorts() {
        assert_eq!(
            merge_rel(Some("noreferrer nofollow".into()), &EXTERNAL_LINK_REL),
            "nofollow noopener noreferrer"
        );
        assert_eq!(merge_rel(None, &EXTERNAL_LINK_REL), "noopener noreferrer");
    }

    #[test]
    fn applies_heading_ids_in_order() {
        let html = "<h1>One</h1>\n<h2>Two</h2>\n";
        let processed =
            post_process(html, &[heading(1, "one"), heading(2, "two")]).expect("processed");
        assert_eq!(
            processed.html,
            "<h1 id=\"one\">One</h1>\n<h2 id=\"two\">Two</h2>\n"
        );
        assert_eq!(processed.anchored_headings, 2);
    }

    #[test]
    fn mismatched_heading_level_is_left_alone() {
        let processed = post_process("<h3>Three</h3>\n", &[heading(1, "one")]).expect("processed");
        assert_eq!(processed.html, "<h3>Three</h3>\n");
        assert_eq!(processed.anchored_headings, 0);
    }

    #[test]
    fn absolute_links_open_in_new_context() {
        let html = "<p><a href=\"http://example.com\">x</a> <a href=\"#top\">top</a></p>\n";
        let processed = post_process(html, &[]).expect("processed");
        assert!(processed.html.contains(
            "<a href=\"http://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">x</a>"
        ));
        assert!(processed.html.contains("<a href=\"#top\">top</a>"));
        assert_eq!(processed.external_links, 1);
    }

    #[test]
    fn empty_input_stays_empty() {
        let processed = post_process("", &[]).expect("processed");
        assert_eq!(processed.html, "");
    }
}
