//! Title and author normalization for catalog keyword queries.

use std::sync::OnceLock;

use regex::Regex;

use crate::extract::QueryError;

/// Storefront boilerplate stripped from scraped titles before searching.
const BOILERPLATE_SUFFIXES: &[&str] = &[
    r"\s*-\s*Amazon\.co\.jp$",
    r"\s*:\s*本$",
    r"\s*-\s*楽天ブックス$",
];

/// Role markers that terminate an author statement. Longer markers first
/// so 編著 is not half-stripped to 編.
const AUTHOR_ROLE_MARKERS: &[&str] = &["編著", "共著", "監修", "著", "編", "訳", "監"];

/// Scraped "author" strings that are really UI labels, not names.
const AUTHOR_PLACEHOLDERS: &[&str] = &["フォロー", "詳細", "more", "…"];

fn boilerplate_rules() -> &'static Vec<Regex> {
    static RULES: OnceLock<Vec<Regex>> = OnceLock::new();
    RULES.get_or_init(|| {
        BOILERPLATE_SUFFIXES
            .iter()
            .map(|p| Regex::new(p).expect("static boilerplate rule must compile"))
            .collect()
    })
}

fn edition_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"第?[0-9]+版?").expect("static edition rule must compile"))
}

fn paren_annotation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\([^)]*\)").expect("static paren rule must compile"))
}

fn bracket_annotation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"【[^】]*】").expect("static bracket rule must compile"))
}

fn strip_boilerplate(title: &str) -> String {
    let mut cleaned = title.trim().to_string();
    for rule in boilerplate_rules() {
        if let Some(start) = rule.find(&cleaned).map(|m| m.start()) {
            cleaned.truncate(start);
        }
    }
    cleaned.trim().to_string()
}

/// Subtitle separators: full/half-width colons, dash variants and whitespace.
fn is_subtitle_separator(c: char) -> bool {
    matches!(c, '：' | ':' | '―' | '－') || c.is_whitespace()
}

/// Normalize a scraped title for a full-title keyword search.
///
/// Only storefront boilerplate is removed; subtitles and annotations are
/// kept so the precise form is tried before anything looser. Already
/// normalized text is a fixed point.
pub fn normalize_title(raw_title: &str) -> Result<String, QueryError> {
    let cleaned = strip_boilerplate(raw_title);
    if cleaned.is_empty() {
        return Err(QueryError::EmptyQuery);
    }
    Ok(cleaned)
}

/// Reduce an author string to its leading name token, or `None` when the
/// scrape produced a placeholder instead of a name.
fn author_token(raw_author: &str) -> Option<String> {
    let token = raw_author
        .split(|c: char| c == ',' || c == '、' || c == '・' || c.is_whitespace())
        .next()
        .unwrap_or("")
        .trim();

    let mut name = token;
    for marker in AUTHOR_ROLE_MARKERS {
        if let Some(stripped) = name.strip_suffix(marker) {
            name = stripped.trim_end();
            break;
        }
    }

    if name.chars().count() < 2 {
        return None;
    }
    if AUTHOR_PLACEHOLDERS
        .iter()
        .any(|p| name.eq_ignore_ascii_case(p))
    {
        return None;
    }
    Some(name.to_string())
}

/// Build the loosest keyword query: the main title with edition markers and
/// annotations removed, plus the author name token when one survives
/// normalization.
pub fn main_title_and_author(
    raw_title: &str,
    raw_author: Option<&str>,
) -> Result<String, QueryError> {
    let cleaned = strip_boilerplate(raw_title);

    // A separator at position 0 carries no main title before it; keep the
    // whole string in that case rather than searching on nothing.
    let main = match cleaned
        .char_indices()
        .find(|(_, c)| is_subtitle_separator(*c))
    {
        Some((0, _)) | None => cleaned.as_str(),
        Some((idx, _)) => &cleaned[..idx],
    };

    let main = edition_marker().replace_all(main, "");
    let main = paren_annotation().replace_all(&main, "");
    let main = bracket_annotation().replace_all(&main, "");
    let main = main.trim();

    let mut query = main.to_string();
    if let Some(author) = raw_author.and_then(author_token) {
        if !query.is_empty() {
            query.push(' ');
        }
        query.push_str(&author);
    }

    let query = query.trim().to_string();
    if query.is_empty() {
        return Err(QueryError::EmptyQuery);
    }
    Ok(query)
}
