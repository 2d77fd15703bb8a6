//! ISBN extraction from free-form page text.
//!
//! The scanner is an ordered list of extraction rules evaluated as a total
//! order: labeled occurrences outrank bare digit runs, and every 13-digit
//! rule outranks every 10-digit rule, so the first validating 13-digit
//! candidate short-circuits the whole scan. Candidates are validated
//! structurally only; check digits are deliberately NOT verified, because
//! marketplace pages occasionally carry identifiers that fail the checksum
//! yet resolve fine in the catalog.

use std::sync::OnceLock;

use regex::Regex;

/// Rules matching 13-digit candidates, in priority order.
const ISBN13_RULES: &[&str] = &[
    // Explicit ISBN-13 label, digits possibly hyphen/space separated
    r"(?i)ISBN[\- ]?13[^0-9]*((?:978|979)(?:[\- ]?[0-9]){10})",
    // Generic ISBN label directly followed by a 978/979 run
    r"(?i)ISBN[^0-9]*((?:978|979)(?:[\- ]?[0-9]){10})",
    // Bare 978/979 run anywhere in the text
    r"((?:978|979)(?:[\- ]?[0-9]){10})",
];

/// Rules matching 10-digit candidates, in priority order.
const ISBN10_RULES: &[&str] = &[
    // Explicit ISBN-10 label; the check character may be X
    r"(?i)ISBN[\- ]?10[^0-9]*([0-9](?:[\- ]?[0-9]){8}[\- ]?[0-9Xx])",
    // Generic ISBN label
    r"(?i)ISBN[^0-9]*([0-9](?:[\- ]?[0-9]){8}[\- ]?[0-9Xx])",
    // Bare contiguous 10-character run; a plain \b would miss runs flanked
    // by CJK text, so the boundary is spelled out as "not another digit"
    r"(?:^|[^0-9])([0-9]{9}[0-9Xx])(?:[^0-9]|$)",
];

fn isbn13_rules() -> &'static Vec<Regex> {
    static RULES: OnceLock<Vec<Regex>> = OnceLock::new();
    RULES.get_or_init(|| {
        ISBN13_RULES
            .iter()
            .map(|p| Regex::new(p).expect("static ISBN-13 rule must compile"))
            .collect()
    })
}

fn isbn10_rules() -> &'static Vec<Regex> {
    static RULES: OnceLock<Vec<Regex>> = OnceLock::new();
    RULES.get_or_init(|| {
        ISBN10_RULES
            .iter()
            .map(|p| Regex::new(p).expect("static ISBN-10 rule must compile"))
            .collect()
    })
}

/// Strip separator characters from a raw candidate.
fn strip_separators(candidate: &str) -> String {
    candidate
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Structural ISBN-13 validation: 978/979 prefix plus ten digits.
fn is_valid_isbn13(candidate: &str) -> bool {
    candidate.len() == 13
        && (candidate.starts_with("978") || candidate.starts_with("979"))
        && candidate.chars().all(|c| c.is_ascii_digit())
}

/// Structural ISBN-10 validation: nine digits plus a digit or X check character.
fn is_valid_isbn10(candidate: &str) -> bool {
    if candidate.len() != 10 {
        return false;
    }
    let (head, tail) = candidate.split_at(9);
    head.chars().all(|c| c.is_ascii_digit())
        && tail.chars().all(|c| c.is_ascii_digit() || c == 'X' || c == 'x')
}

/// First validating candidate for a rule set, rules in priority order and
/// matches left-to-right within a rule.
fn scan(text: &str, rules: &[Regex], validate: fn(&str) -> bool) -> Option<String> {
    for rule in rules {
        for captures in rule.captures_iter(text) {
            if let Some(raw) = captures.get(1) {
                let candidate = strip_separators(raw.as_str());
                if validate(&candidate) {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

/// Scan free text for a book identifier and return it with separators removed.
///
/// 13-digit candidates always win over 10-digit candidates, even when the
/// 10-digit one appears earlier in the text. Returns `None` when nothing
/// validates.
pub fn extract_identifier(text: &str) -> Option<String> {
    scan(text, isbn13_rules(), is_valid_isbn13)
        .or_else(|| scan(text, isbn10_rules(), is_valid_isbn10))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_isbn13_with_hyphens() {
        let text = "登録情報 ISBN-13 : 978-4-297-10033-9 発売日 2021/4/1";
        assert_eq!(extract_identifier(text).as_deref(), Some("9784297100339"));
    }

    #[test]
    fn test_labeled_isbn13_with_invisible_marks() {
        // Amazon detail rows interleave direction marks between label and digits
        let text = "ISBN-13 \u{200f} : \u{200e} 9784798179339";
        assert_eq!(extract_identifier(text).as_deref(), Some("9784798179339"));
    }

    #[test]
    fn test_generic_isbn_label() {
        let text = "ISBN: 979-8-6024-0545-3";
        assert_eq!(extract_identifier(text).as_deref(), Some("9798602405453"));
    }

    #[test]
    fn test_bare_thirteen_digit_run() {
        let text = "商品コード 9784274068765 在庫あり";
        assert_eq!(extract_identifier(text).as_deref(), Some("9784274068765"));
    }

    #[test]
    fn test_prefers_isbn13_over_isbn10() {
        let text = "ISBN-10 : 4274068765 / ISBN-13 : 978-4-274-06876-5";
        assert_eq!(extract_identifier(text).as_deref(), Some("9784274068765"));
    }

    #[test]
    fn test_prefers_isbn13_even_when_isbn10_differs() {
        // Noisy pages can carry two unrelated identifiers; the first valid
        // 13-digit match wins without any reconciliation.
        let text = "ISBN-10: 4061486519 とにかく ISBN-13: 9784297100339";
        assert_eq!(extract_identifier(text).as_deref(), Some("9784297100339"));
    }

    #[test]
    fn test_isbn10_with_check_x() {
        let text = "ISBN-10 : 409126719X";
        assert_eq!(extract_identifier(text).as_deref(), Some("409126719X"));
    }

    #[test]
    fn test_labeled_old_style_isbn10() {
        let text = "ISBN 4-06-148651-9 定価780円";
        assert_eq!(extract_identifier(text).as_deref(), Some("4061486519"));
    }

    #[test]
    fn test_skips_invalid_candidate_and_keeps_scanning() {
        // The first 978 run is one digit short; the later one validates
        let text = "type 978123456789 real 9784297100339";
        assert_eq!(extract_identifier(text).as_deref(), Some("9784297100339"));
    }

    #[test]
    fn test_no_candidate() {
        assert_eq!(extract_identifier("この本はとても面白い"), None);
        assert_eq!(extract_identifier(""), None);
        assert_eq!(extract_identifier("ISBN: coming soon"), None);
    }

    #[test]
    fn test_no_checksum_verification() {
        // 9784297100330 has a wrong check digit but is structurally valid
        // and must still be accepted.
        let text = "ISBN-13: 9784297100330";
        assert_eq!(extract_identifier(text).as_deref(), Some("9784297100330"));
    }
}
