//! Renders a [`SeriesData`] into the task-submission TSV layout
//!
//! The document has three fixed preamble lines (control header, metadata
//! row, task detail header) followed by one task detail row per
//! non-empty field. Only emitted rows consume a task_detail_id and a
//! record_seq.

use crate::config::FormatConfig;
use crate::error::{Error, Result};
use crate::extractor::SeriesData;

/// Column names of the control header (line 1)
pub const CONTROL_HEADER: [&str; 10] = [
    "anken_id",
    "duplication_manage_id",
    "department_code",
    "category_code",
    "brand_code",
    "from_subsidiary_code",
    "from_language_code",
    "to_subsidiary_code",
    "to_language_code",
    "translate_status",
];

/// Column names of the task detail header (line 3)
pub const TASK_DETAIL_HEADER: [&str; 8] = [
    "task_detail_id",
    "record_seq",
    "series_code",
    "additional_item",
    "reference_url",
    "item_name",
    "from_value",
    "to_value",
];

/// Number of lines before the first task detail row
pub const PREAMBLE_LINES: usize = 3;

pub const ITEM_SERIES_NAME: &str = "シリーズ名称";
pub const ITEM_CATCHCOPY: &str = "キャッチコピー";
pub const ITEM_NOTICES: [&str; 5] = [
    "商品注意案内文1",
    "商品注意案内文2",
    "商品注意案内文3",
    "商品注意案内文4",
    "商品注意案内文5",
];
pub const ITEM_HTML: &str = "HTML";

/// One emitted task detail row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow<'a> {
    pub task_detail_id: u64,
    pub record_seq: u64,
    pub item_name: &'static str,
    pub from_value: &'a str,
}

/// A rendered task file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDocument {
    /// Full TSV text, no trailing newline
    pub text: String,
    /// Number of task detail rows written
    pub rows_emitted: usize,
    /// First task_detail_id available to the next document
    pub next_id: u64,
}

/// Build the task detail rows for a series, numbering from `start_id`.
///
/// Fails with [`Error::TaskIdOverflow`] when the ids would pass `u64::MAX`.
pub fn task_rows(series: &SeriesData, start_id: u64) -> Result<Vec<TaskRow<'_>>> {
    let scalar_fields = [
        (ITEM_SERIES_NAME, series.series_name.as_str()),
        (ITEM_CATCHCOPY, series.catchcopy.as_str()),
    ]
    .into_iter()
    .chain(
        ITEM_NOTICES
            .into_iter()
            .zip(series.notices.iter().map(String::as_str)),
    )
    .filter(|(_, value)| !value.is_empty());

    let html_fields = series
        .html_list
        .iter()
        .map(|html| (ITEM_HTML, html.as_str()));

    let fields: Vec<(&'static str, &str)> = scalar_fields.chain(html_fields).collect();
    next_task_id(start_id, fields.len())?;

    Ok(fields
        .into_iter()
        .zip(0u64..)
        .map(|((item_name, from_value), offset)| TaskRow {
            task_detail_id: start_id + offset,
            record_seq: offset + 1,
            item_name,
            from_value,
        })
        .collect())
}

/// First id after `rows` ids starting at `start_id`
fn next_task_id(start_id: u64, rows: usize) -> Result<u64> {
    u64::try_from(rows)
        .ok()
        .and_then(|n| start_id.checked_add(n))
        .ok_or(Error::TaskIdOverflow { start_id, rows })
}

/// Render one series into task file text
pub fn generate_output(
    series: &SeriesData,
    start_id: u64,
    config: &FormatConfig,
) -> Result<TaskDocument> {
    let rows = task_rows(series, start_id)?;
    let reference_url = config.reference_url(&series.series_code);

    let mut lines: Vec<String> = Vec::with_capacity(PREAMBLE_LINES + rows.len());
    lines.push(CONTROL_HEADER.join("\t"));
    lines.push(
        [
            config.anken_id.as_str(),
            config.duplication_manage_id.as_str(),
            config.department_code.as_str(),
            series.category_code.as_str(),
            series.brand_code.as_str(),
            config.from_subsidiary_code.as_str(),
            config.from_language_code.as_str(),
            config.to_subsidiary_code.as_str(),
            config.to_language_code.as_str(),
            config.translate_status.as_str(),
        ]
        .join("\t"),
    );
    lines.push(TASK_DETAIL_HEADER.join("\t"));

    for row in &rows {
        let task_detail_id = row.task_detail_id.to_string();
        let record_seq = row.record_seq.to_string();
        lines.push(
            [
                task_detail_id.as_str(),
                record_seq.as_str(),
                series.series_code.as_str(),
                config.additional_item.as_str(),
                reference_url.as_str(),
                row.item_name,
                row.from_value,
                "",
            ]
            .join("\t"),
        );
    }

    Ok(TaskDocument {
        text: lines.join("\n"),
        rows_emitted: rows.len(),
        next_id: next_task_id(start_id, rows.len())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(notice_1: &str, html_list: &[&str]) -> SeriesData {
        SeriesData {
            series_code: "S1".into(),
            series_name: "Name1".into(),
            catchcopy: "Catch1".into(),
            notices: [
                notice_1.into(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ],
            html_list: html_list.iter().map(|h| h.to_string()).collect(),
            brand_code: "B1".into(),
            category_code: "C1".into(),
        }
    }

    #[test]
    fn test_generate_output_layout() {
        let config = FormatConfig::default();
        let doc = generate_output(&series("Notice1", &["<p>HTML1</p>"]), 100, &config).unwrap();
        let lines: Vec<&str> = doc.text.split('\n').collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], CONTROL_HEADER.join("\t"));
        assert_eq!(
            lines[1],
            "ECSI01202509173395\tDUP1000000215574\tel\tC1\tB1\tMJP\tJPN\tCOM\tENG\t1"
        );
        assert_eq!(lines[2], TASK_DETAIL_HEADER.join("\t"));
        assert_eq!(
            lines[3],
            "100\t1\tS1\t種類\thttps://jp.misumi-ec.com/vona2/detail/S1/\tシリーズ名称\tName1\t"
        );
        assert!(lines[4].starts_with("101\t2\tS1\t"));
        assert!(lines[4].contains("\tキャッチコピー\tCatch1\t"));
        assert!(lines[5].starts_with("102\t3\t"));
        assert!(lines[5].contains("\t商品注意案内文1\tNotice1\t"));
        assert!(lines[6].starts_with("103\t4\t"));
        assert!(lines[6].ends_with("\tHTML\t<p>HTML1</p>\t"));

        assert_eq!(doc.rows_emitted, 4);
        assert_eq!(doc.next_id, 104);
    }

    #[test]
    fn test_empty_fields_do_not_consume_ids() {
        let mut data = series("", &["<p>only</p>"]);
        data.series_name.clear();
        data.catchcopy.clear();
        data.notices[3] = "Notice4".into();

        let rows = task_rows(&data, 500).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item_name, "商品注意案内文4");
        assert_eq!((rows[0].task_detail_id, rows[0].record_seq), (500, 1));
        assert_eq!(rows[1].item_name, ITEM_HTML);
        assert_eq!((rows[1].task_detail_id, rows[1].record_seq), (501, 2));
    }

    #[test]
    fn test_only_html_row() {
        let mut data = series("", &["<p>A</p>"]);
        data.series_name.clear();
        data.catchcopy.clear();

        let doc = generate_output(&data, 7, &FormatConfig::default()).unwrap();
        let lines: Vec<&str> = doc.text.split('\n').collect();

        assert_eq!(lines.len(), PREAMBLE_LINES + 1);
        assert!(lines[3].starts_with("7\t1\tS1\t"));
        assert_eq!(doc.rows_emitted, 1);
        assert_eq!(doc.next_id, 8);
    }

    #[test]
    fn test_no_rows_still_has_preamble() {
        let mut data = series("", &[]);
        data.series_name.clear();
        data.catchcopy.clear();

        let doc = generate_output(&data, 1, &FormatConfig::default()).unwrap();
        assert_eq!(doc.text.split('\n').count(), PREAMBLE_LINES);
        assert_eq!(doc.rows_emitted, 0);
        assert_eq!(doc.next_id, 1);
    }

    #[test]
    fn test_ids_past_u64_max_are_rejected() {
        let data = series("Notice1", &["<p>A</p>"]);
        let config = FormatConfig::default();

        let err = generate_output(&data, u64::MAX - 2, &config).unwrap_err();
        assert!(matches!(
            err,
            Error::TaskIdOverflow {
                start_id,
                rows: 4
            } if start_id == u64::MAX - 2
        ));
        assert!(task_rows(&data, u64::MAX).is_err());

        let doc = generate_output(&data, u64::MAX - 4, &config).unwrap();
        assert_eq!(doc.next_id, u64::MAX);
    }

    #[test]
    fn test_html_order_and_duplicates() {
        let data = series("", &["<p>B</p>", "<p>A</p>", "<p>B</p>"]);
        let rows = task_rows(&data, 0).unwrap();
        let html: Vec<&str> = rows
            .iter()
            .filter(|r| r.item_name == ITEM_HTML)
            .map(|r| r.from_value)
            .collect();
        assert_eq!(html, vec!["<p>B</p>", "<p>A</p>", "<p>B</p>"]);
    }

    #[test]
    fn test_generate_output_is_deterministic() {
        let config = FormatConfig::default();
        let data = series("Notice1", &["<p>A</p>", "<p>B</p>"]);
        assert_eq!(
            generate_output(&data, 42, &config).unwrap(),
            generate_output(&data, 42, &config).unwrap()
        );
    }

    #[test]
    fn test_configured_metadata() {
        let config = FormatConfig {
            to_subsidiary_code: "CHN".into(),
            to_language_code: "ZHO".into(),
            reference_url_template: "https://example.com/{series_code}".into(),
            ..FormatConfig::default()
        };
        let doc = generate_output(&series("", &[]), 1, &config).unwrap();
        let lines: Vec<&str> = doc.text.split('\n').collect();

        assert!(lines[1].ends_with("\tMJP\tJPN\tCHN\tZHO\t1"));
        assert!(lines[3].contains("\thttps://example.com/S1\t"));
        assert!(!doc.text.ends_with('\n'));
    }
}
