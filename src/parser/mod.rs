//! Catalog response parsing.
//!
//! The catalog has no API; a search POST answers with one of two legacy
//! page shapes. A query that matches exactly one holding redirects to a
//! **detail page** describing that single record, while everything else
//! (including zero hits) answers with a **list page** whose hits live in a
//! hidden reservation-form region plus a visible table region.
//!
//! Parsing never fails: unexpected markup degrades to fewer extracted
//! fields or an empty record set, because the page layout is outside this
//! crate's control.

pub mod bibbr;
pub mod reconcile;

use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::models::{BibliographicRecord, RecordBuilder};
use crate::parser::bibbr::parse_citation;
use crate::parser::reconcile::{FormRecord, TableEntry};

/// Section heading present only on single-record detail pages.
const DETAIL_HEADING: &str = "書誌詳細";

/// Field label for the title and statement of responsibility.
const DETAIL_TITLE_LABEL: &str = "標題および責任表示";

/// Page shape of one catalog response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Exactly one matched record, rendered as a bibliographic detail page
    Detail,
    /// Zero or more matched records in tabular/form form
    List,
}

/// Everything extracted from one response body.
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Records in display order
    pub records: Vec<BibliographicRecord>,
    /// Catalog-reported result total (0 when the page carries no counter)
    pub total_count: usize,
}

/// Classify a response body by page shape.
///
/// A response is a detail page iff it carries both the detail section
/// heading and the title label; anything else is treated as a list page.
pub fn classify(body: &str) -> PageKind {
    if body.contains(DETAIL_HEADING) && body.contains(DETAIL_TITLE_LABEL) {
        PageKind::Detail
    } else {
        PageKind::List
    }
}

fn detail_record_id_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The detail page assigns the record id to an inline script variable
    RE.get_or_init(|| {
        Regex::new(r#"var\s+bibid\s*=\s*['"]([^'"]+)['"]"#)
            .expect("static record-id rule must compile")
    })
}

fn detail_title_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<th[^>]*>\s*標題および責任表示\s*</th>\s*<td[^>]*>\s*([^<]+)")
            .expect("static detail-title rule must compile")
    })
}

fn detail_author_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "<name>著" immediately preceded by the responsibility slash
    RE.get_or_init(|| Regex::new(r"/\s*([^</]+)著").expect("static detail-author rule must compile"))
}

fn total_count_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"全([0-9]+)件").expect("static total-count rule must compile"))
}

fn leading_number_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("static row-number rule must compile"))
}

/// Parse one catalog response body into records plus the reported total.
pub fn parse_response(body: &str) -> ParsedPage {
    match classify(body) {
        PageKind::Detail => parse_detail_page(body),
        PageKind::List => parse_list_page(body),
    }
}

/// Extract the single record of a detail page.
///
/// A detail page without a record id is treated as no match, not as an
/// error. The title cell holds "title / responsibility"; the citation
/// split yields the title proper while the full cell is retained as the
/// raw citation.
fn parse_detail_page(body: &str) -> ParsedPage {
    let Some(record_id) = detail_record_id_rule()
        .captures(body)
        .map(|c| c[1].to_string())
    else {
        tracing::debug!("detail page carries no record id, treating as no match");
        return ParsedPage::default();
    };

    let Some(cell) = detail_title_rule()
        .captures(body)
        .map(|c| c[1].trim().to_string())
    else {
        tracing::debug!(%record_id, "detail page carries no title cell, discarding record");
        return ParsedPage::default();
    };

    let title = cell
        .split(" / ")
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    if title.is_empty() {
        tracing::debug!(%record_id, "detail page title is empty, discarding record");
        return ParsedPage::default();
    }

    let mut builder = RecordBuilder::new(record_id, title)
        .raw_citation(&cell)
        .ordinal(1);
    if let Some(captures) = detail_author_rule().captures(&cell) {
        builder = builder.author(captures[1].trim().to_string());
    }

    ParsedPage {
        records: vec![builder.build()],
        total_count: 1,
    }
}

/// Extract records from the hidden-form region of a list page.
fn collect_form_records(document: &Html) -> Vec<FormRecord> {
    let Ok(form_selector) = Selector::parse(r#"form[id^="orderRSV_Ajax_Form"]"#) else {
        return Vec::new();
    };
    let Ok(bibbr_selector) = Selector::parse(r#"input[name="bibbr"]"#) else {
        return Vec::new();
    };
    let Ok(bibid_selector) = Selector::parse(r#"input[name="bibid"]"#) else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for form in document.select(&form_selector) {
        let citation = form
            .select(&bibbr_selector)
            .next()
            .and_then(|input| input.value().attr("value"));
        let record_id = form
            .select(&bibid_selector)
            .next()
            .and_then(|input| input.value().attr("value"));

        let (Some(citation), Some(record_id)) = (citation, record_id) else {
            continue;
        };

        records.push(FormRecord {
            record_id: record_id.to_string(),
            fields: parse_citation(citation),
            raw_citation: citation.to_string(),
        });
    }
    records
}

/// Extract display numbers from the visible-table region of a list page.
fn collect_table_entries(document: &Html) -> Vec<TableEntry> {
    let Ok(row_selector) = Selector::parse(r#"th[class*="opac_list_no_area"]"#) else {
        return Vec::new();
    };
    let Ok(bibid_selector) = Selector::parse(r#"input[name="bibid"]"#) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for row in document.select(&row_selector) {
        let text = row.text().collect::<String>();
        let number = leading_number_rule()
            .find(&text)
            .and_then(|m| m.as_str().parse::<usize>().ok());
        let record_id = row
            .select(&bibid_selector)
            .next()
            .and_then(|input| input.value().attr("value"));

        let (Some(display_number), Some(record_id)) = (number, record_id) else {
            continue;
        };

        entries.push(TableEntry {
            record_id: record_id.to_string(),
            display_number,
        });
    }
    entries
}

/// Extract every record of a list page and merge the two markup regions.
fn parse_list_page(body: &str) -> ParsedPage {
    let total_count = total_count_rule()
        .captures(body)
        .and_then(|c| c[1].parse::<usize>().ok())
        .unwrap_or(0);

    let document = Html::parse_document(body);
    let form_records = collect_form_records(&document);
    let table_entries = collect_table_entries(&document);

    tracing::debug!(
        total_count,
        forms = form_records.len(),
        rows = table_entries.len(),
        "parsed list page regions"
    );

    ParsedPage {
        records: reconcile::merge(form_records, &table_entries),
        total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_PAGE: &str = r#"<html><head>
<script type="text/javascript">
var bibid = 'B12345';
var isbn_issn = '9784000000000';
</script></head>
<body>
<h2>書誌詳細</h2>
<table>
<tr><th class="detail_label">標題および責任表示</th><td>サンプル本 / 山田太郎著</td></tr>
<tr><th>出版・頒布事項</th><td>東京 : 技術書房, 2021</td></tr>
</table>
</body></html>"#;

    const LIST_PAGE: &str = r#"<html><body>
<div>検索結果 全25件</div>
<table>
<tr>
<th class="opac_list_no_area">2<br/><input type="hidden" name="bibid" value="BB20002"/></th>
<td>二冊目の本</td>
</tr>
<tr>
<th class="opac_list_no_area">1<br/><input type="hidden" name="bibid" value="BB20001"/></th>
<td>一冊目の本</td>
</tr>
</table>
<form id="orderRSV_Ajax_Form1" action="/webopac12/rsv.do">
<input type="hidden" name="bibbr" value="二冊目の本 / 鈴木一郎編 -- 培風館, 2019"/>
<input type="hidden" name="bibid" value="BB20002"/>
</form>
<form id="orderRSV_Ajax_Form2" action="/webopac12/rsv.do">
<input type="hidden" name="bibbr" value="一冊目の本 / 山田太郎著 -- 第3版. -- 技術書房, 2021"/>
<input type="hidden" name="bibid" value="BB20001"/>
</form>
</body></html>"#;

    const EMPTY_LIST_PAGE: &str = r#"<html><body>
<div>該当する資料は見つかりませんでした</div>
</body></html>"#;

    #[test]
    fn test_classify_detail() {
        assert_eq!(classify(DETAIL_PAGE), PageKind::Detail);
    }

    #[test]
    fn test_classify_list() {
        assert_eq!(classify(LIST_PAGE), PageKind::List);
        assert_eq!(classify(EMPTY_LIST_PAGE), PageKind::List);
        assert_eq!(classify(""), PageKind::List);
    }

    #[test]
    fn test_detail_page_round_trip() {
        let page = parse_response(DETAIL_PAGE);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.total_count, 1);

        let record = &page.records[0];
        assert_eq!(record.record_id, "B12345");
        assert_eq!(record.title, "サンプル本");
        assert_eq!(record.author.as_deref(), Some("山田太郎"));
        assert_eq!(record.ordinal, 1);
        assert_eq!(record.raw_citation, "サンプル本 / 山田太郎著");
    }

    #[test]
    fn test_detail_page_without_record_id() {
        let body = DETAIL_PAGE.replace("var bibid = 'B12345';", "");
        let page = parse_response(&body);
        assert!(page.records.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn test_list_page_records_in_table_order() {
        let page = parse_response(LIST_PAGE);
        assert_eq!(page.total_count, 25);
        assert_eq!(page.records.len(), 2);

        // Table numbers invert the form discovery order
        assert_eq!(page.records[0].record_id, "BB20001");
        assert_eq!(page.records[0].ordinal, 1);
        assert_eq!(page.records[0].title, "一冊目の本");
        assert_eq!(page.records[0].edition.as_deref(), Some("第3版"));
        assert_eq!(page.records[0].year.as_deref(), Some("2021"));

        assert_eq!(page.records[1].record_id, "BB20002");
        assert_eq!(page.records[1].ordinal, 2);
        assert_eq!(page.records[1].author.as_deref(), Some("鈴木一郎編"));
    }

    #[test]
    fn test_empty_list_page() {
        let page = parse_response(EMPTY_LIST_PAGE);
        assert!(page.records.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn test_malformed_markup_degrades_instead_of_failing() {
        let page = parse_response("<html><form id=\"orderRSV_Ajax_Form1\"><input name=\"bibbr\"");
        assert!(page.records.is_empty());
    }

    #[test]
    fn test_form_without_bibid_skipped() {
        let body = r#"<form id="orderRSV_Ajax_FormX">
<input type="hidden" name="bibbr" value="本 / 著者著"/>
</form>"#;
        let page = parse_response(body);
        assert!(page.records.is_empty());
    }

    #[test]
    fn test_entity_decoding_in_citation() {
        let body = r#"<div>全1件</div>
<form id="orderRSV_Ajax_Form1">
<input type="hidden" name="bibbr" value="C&amp;C言語入門 / 田中三郎著 -- 工学社, 2020"/>
<input type="hidden" name="bibid" value="BB30001"/>
</form>"#;
        let page = parse_response(body);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].title, "C&C言語入門");
    }
}
