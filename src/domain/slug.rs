//! Deterministic, human-friendly anchor slugs for rendered headings.
//!
//! ASCII slugification comes from the `slug` crate; Chinese text is
//! transliterated with `pinyin` first so a heading like “基线对齐” becomes
//! `ji-xian-dui-qi` instead of disappearing.

use std::collections::{HashMap, HashSet};

use pinyin::{Pinyin, ToPinyin};
use slug::slugify;
use thiserror::Error;

/// Errors that can occur while generating a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive a base slug from the provided human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let transliterated = transliterate_to_ascii(input);
    let candidate = slugify(&transliterated);

    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Deterministically generate unique anchor slugs within a single document.
///
/// Headings processed in order receive monotonic suffixes when duplicates
/// occur (e.g. `section`, `section-2`, `section-3`). A suffixed slug that a
/// later heading derives naturally is skipped over, so every anchor handed
/// out stays distinct.
#[derive(Default, Debug)]
pub struct AnchorSlugger {
    issued: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl AnchorSlugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an author-supplied anchor so later generated slugs avoid it.
    /// The anchor is returned unchanged even if it was already issued.
    pub fn claim(&mut self, anchor: &str) -> String {
        self.issued.insert(anchor.to_string());
        anchor.to_string()
    }

    /// Generate a slug for the provided heading text, unique within this
    /// slugger. Fails when the heading cannot produce a slug.
    pub fn anchor_for(&mut self, heading: &str) -> Result<String, SlugError> {
        let base = derive_slug(heading)?;
        if self.issued.insert(base.clone()) {
            return Ok(base);
        }

        let suffix = self.next_suffix.entry(base.clone()).or_insert(2);
        loop {
            let candidate = format!("{base}-{suffix}");
            *suffix += 1;
            if self.issued.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }
    }
}

fn transliterate_to_ascii(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for ch in input.chars() {
        if ch.is_ascii() {
            output.push(ch);
            continue;
        }

        match ch.to_pinyin() {
            Some(py) => append_pinyin(&mut output, py),
            None if ch.is_whitespace() => output.push(' '),
            // slugify decides how to filter anything left over
            None => output.push(ch),
        }
    }

    output
}

fn append_pinyin(buffer: &mut String, pinyin: Pinyin) {
    if !buffer.is_empty() && !buffer.ends_with(' ') {
        buffer.push(' ');
    }
    buffer.push_str(pinyin.plain());
}
