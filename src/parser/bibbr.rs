//! Decomposition of a single catalog citation string.
//!
//! The catalog packs one record's bibliography into a single delimited
//! blob, e.g.
//!
//! ```text
//! データ構造入門 / 山田太郎著 -- 第3版. -- 技術書房, 2021 -- (情報科学シリーズ)
//! ```
//!
//! Fields are scanned independently; a field that fails to match is simply
//! left empty. The blob comes from an uncontracted legacy page, so partial
//! extraction is always preferred over failing the record.

use std::sync::OnceLock;

use regex::Regex;

/// Segment delimiter between the title and the statement of responsibility.
const TITLE_DELIMITER: &str = " / ";

/// Fields decomposed from one citation string. Only `title` decides record
/// validity; everything else is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationFields {
    pub title: String,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<String>,
    pub edition: Option<String>,
    pub series: Option<String>,
}

fn author_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Longest prefix ending in a role marker, not crossing a ';' boundary
    RE.get_or_init(|| {
        Regex::new(r"^([^;]+(?:著|編|訳|監修|監|編著|共著))")
            .expect("static author rule must compile")
    })
}

fn edition_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"--\s*([^.]*版[^.]*)").expect("static edition rule must compile"))
}

fn publisher_year_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Optionally skip an edition-qualified marker, then "publisher, YYYY"
    RE.get_or_init(|| {
        Regex::new(r"--\s*(?:[^.]*版[^.]*\.\s*--\s*)?([^,]+),\s*([0-9]{4})")
            .expect("static publisher rule must compile")
    })
}

fn publisher_only_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // No year present: publisher runs up to the next comma/period/dash
    RE.get_or_init(|| {
        Regex::new(r"--\s*(?:[^.]*版[^.]*\.\s*--\s*)?([^,，.．\-]+)")
            .expect("static publisher fallback rule must compile")
    })
}

fn series_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"--\s*\(([^)]+)\)").expect("static series rule must compile"))
}

/// Decompose one citation string into its bibliographic fields.
pub fn parse_citation(citation: &str) -> CitationFields {
    let mut segments = citation.split(TITLE_DELIMITER);
    let title = segments.next().unwrap_or("").trim().to_string();
    let remaining = segments.collect::<Vec<_>>().join(TITLE_DELIMITER);

    let mut fields = CitationFields {
        title,
        ..CitationFields::default()
    };
    if remaining.is_empty() {
        return fields;
    }

    if let Some(captures) = author_rule().captures(&remaining) {
        fields.author = Some(captures[1].trim().to_string());
    }

    if let Some(captures) = edition_rule().captures(&remaining) {
        fields.edition = Some(captures[1].trim().to_string());
    }

    if let Some(captures) = publisher_year_rule().captures(&remaining) {
        fields.publisher = Some(captures[1].trim().to_string());
        fields.year = Some(captures[2].to_string());
    } else if let Some(captures) = publisher_only_rule().captures(&remaining) {
        let publisher = captures[1].trim().to_string();
        // The fallback can land on the edition segment or a series opener;
        // neither is a publisher.
        if !publisher.is_empty()
            && !publisher.starts_with('(')
            && fields.edition.as_deref() != Some(publisher.as_str())
        {
            fields.publisher = Some(publisher);
        }
    }

    if let Some(captures) = series_rule().captures(&remaining) {
        fields.series = Some(captures[1].trim().to_string());
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_citation() {
        let fields =
            parse_citation("データ構造入門 / 山田太郎著 -- 第3版. -- 技術書房, 2021");
        assert_eq!(fields.title, "データ構造入門");
        assert_eq!(fields.author.as_deref(), Some("山田太郎著"));
        assert_eq!(fields.edition.as_deref(), Some("第3版"));
        assert_eq!(fields.publisher.as_deref(), Some("技術書房"));
        assert_eq!(fields.year.as_deref(), Some("2021"));
        assert_eq!(fields.series, None);
    }

    #[test]
    fn test_citation_with_series() {
        let fields = parse_citation(
            "微分積分学 / 鈴木一郎編 -- 培風館, 2019 -- (理工系の数学入門コース)",
        );
        assert_eq!(fields.title, "微分積分学");
        assert_eq!(fields.author.as_deref(), Some("鈴木一郎編"));
        assert_eq!(fields.publisher.as_deref(), Some("培風館"));
        assert_eq!(fields.year.as_deref(), Some("2019"));
        assert_eq!(fields.series.as_deref(), Some("理工系の数学入門コース"));
    }

    #[test]
    fn test_author_does_not_cross_semicolon() {
        let fields = parse_citation("信号処理 / 佐藤次郎著 ; 田中三郎訳 -- 工学社, 2020");
        assert_eq!(fields.author.as_deref(), Some("佐藤次郎著"));
    }

    #[test]
    fn test_author_longest_prefix_wins() {
        // Two role markers inside the first segment: the later one ends the
        // longer prefix and wins.
        let fields = parse_citation("言語学概論 / 高橋花子監修 山本五郎著 -- 出版舎, 2018");
        assert_eq!(fields.author.as_deref(), Some("高橋花子監修 山本五郎著"));
    }

    #[test]
    fn test_title_only() {
        let fields = parse_citation("タイトルだけの本");
        assert_eq!(fields.title, "タイトルだけの本");
        assert_eq!(fields.author, None);
        assert_eq!(fields.publisher, None);
        assert_eq!(fields.year, None);
    }

    #[test]
    fn test_empty_citation() {
        let fields = parse_citation("");
        assert_eq!(fields.title, "");
        assert_eq!(fields, CitationFields::default());
    }

    #[test]
    fn test_publisher_without_year() {
        let fields = parse_citation("化学実験法 / 中村六郎著 -- 理科書院");
        assert_eq!(fields.publisher.as_deref(), Some("理科書院"));
        assert_eq!(fields.year, None);
    }

    #[test]
    fn test_edition_only_is_not_a_publisher() {
        let fields = parse_citation("物理学 / 伊藤七海著 -- 新版");
        assert_eq!(fields.edition.as_deref(), Some("新版"));
        assert_eq!(fields.publisher, None);
    }

    #[test]
    fn test_slash_inside_later_segment_preserved() {
        let fields = parse_citation("AとB / 編者X編 / 続き -- 某社, 2022");
        assert_eq!(fields.title, "AとB");
        // Remaining segments are rejoined before scanning
        assert_eq!(fields.publisher.as_deref(), Some("某社"));
        assert_eq!(fields.year.as_deref(), Some("2022"));
    }
}
