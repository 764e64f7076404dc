//! # Word Counter
//!
//! Reduces raw title text to a word count. A "word" is a maximal run of
//! Unicode word characters (`\w+`): letters, digits, marks and connector
//! punctuation. This is a token-shape rule, not a linguistic one.
//!
//! ## Paths
//!
//! 1. **Markup.** The text is read as XML. Text and CDATA nodes are counted
//!    one node at a time, so adjacent elements never fuse into one word.
//!    Tags, attributes, comments and processing instructions are ignored.
//! 2. **Fallback.** Any parse failure (mismatched or unclosed tags, bad
//!    entities, invalid UTF-8 in CDATA) switches to stripping every `<...>`
//!    run to a single space and counting the remainder. The fallback cannot
//!    fail.
//!
//! The function is pure: no I/O, no shared state.

use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

#[derive(Debug, thiserror::Error)]
enum MarkupError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("CDATA is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("closing tag without a matching opening tag")]
    UnmatchedClose,
    #[error("{0} element(s) left open at end of input")]
    Unclosed(usize),
}

/// Count the words in `content`. `None` and the empty string count as zero.
pub fn count_words(content: Option<&str>) -> usize {
    let Some(text) = content else {
        return 0;
    };
    if text.is_empty() {
        return 0;
    }

    match count_markup_words(text) {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(error = %e, "markup parse failed, falling back to tag stripping");
            count_stripped_words(text)
        }
    }
}

/// Count maximal word-character runs in plain text.
pub fn count_plain_words(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

fn count_stripped_words(text: &str) -> usize {
    count_plain_words(&TAG_RE.replace_all(text, " "))
}

fn count_markup_words(xml: &str) -> Result<usize, MarkupError> {
    let mut reader = Reader::from_str(xml);
    let mut open: usize = 0;
    let mut count: usize = 0;

    loop {
        match reader.read_event()? {
            Event::Start(_) => open += 1,
            Event::End(_) => {
                open = open.checked_sub(1).ok_or(MarkupError::UnmatchedClose)?;
            }
            Event::Text(text) => count += count_plain_words(&text.unescape()?),
            Event::CData(cdata) => {
                let bytes = cdata.into_inner();
                count += count_plain_words(std::str::from_utf8(&bytes)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if open != 0 {
        return Err(MarkupError::Unclosed(open));
    }
    Ok(count)
}
