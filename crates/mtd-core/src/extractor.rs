//! Join of language content, WYSIWYG html and lookup tables into
//! per-series records

use crate::error::Result;
use crate::lookup::{resolve_or_default, LookupTable, SERIES_CODE_COLUMN};
use crate::table::Table;
use crate::warnings::WarningSink;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of `series_notice_top_N` columns
pub const NOTICE_COUNT: usize = 5;

const NOTICE_COLUMNS: [&str; NOTICE_COUNT] = [
    "series_notice_top_1",
    "series_notice_top_2",
    "series_notice_top_3",
    "series_notice_top_4",
    "series_notice_top_5",
];

/// One product series ready for formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesData {
    pub series_code: String,
    pub series_name: String,
    pub catchcopy: String,
    /// `series_notice_top_1` through `series_notice_top_5`
    pub notices: [String; NOTICE_COUNT],
    /// Html fragments in source order, duplicates kept
    pub html_list: Vec<String>,
    pub brand_code: String,
    pub category_code: String,
}

/// Lookups and labels used while extracting
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'a> {
    pub brand_codes: &'a LookupTable,
    /// `None` behaves like an empty table
    pub category_codes: Option<&'a LookupTable>,
    /// Region named in missing-lookup warnings
    pub region: Option<&'a str>,
    pub default_brand_code: &'a str,
    pub default_category_code: &'a str,
}

/// Join the language and html sources into one record per qualifying
/// language row, in language-source order.
///
/// Rows without a series code or series name are skipped. Brand and
/// category codes missing from their lookups produce one warning each and
/// fall back to the context defaults.
pub fn extract_series_data(
    language: &Table,
    html: &Table,
    ctx: &ExtractContext<'_>,
    warnings: &mut dyn WarningSink,
) -> Result<Vec<SeriesData>> {
    let [code_idx, name_idx, catchcopy_idx] =
        language.require_columns([SERIES_CODE_COLUMN, "series_name", "catchcopy"])?;
    let notice_idx = NOTICE_COLUMNS.map(|name| language.optional_column(name));

    let html_by_series = collect_html(html)?;
    let empty = LookupTable::new();
    let category_codes = ctx.category_codes.unwrap_or(&empty);

    let mut series_list = Vec::new();
    for row in &language.rows {
        let series_code = row.cell(code_idx);
        let series_name = row.cell(name_idx);
        if series_code.is_empty() || series_name.is_empty() {
            continue;
        }

        let brand_code = resolve_or_default(
            ctx.brand_codes.lookup(series_code),
            ctx.default_brand_code,
            || warnings.warn(&missing_message("Brand", series_code, ctx.region)),
        )?;
        let category_code = resolve_or_default(
            category_codes.lookup(series_code),
            ctx.default_category_code,
            || warnings.warn(&missing_message("Category", series_code, ctx.region)),
        )?;

        series_list.push(SeriesData {
            series_code: series_code.to_string(),
            series_name: series_name.to_string(),
            catchcopy: row.cell(catchcopy_idx).to_string(),
            notices: notice_idx.map(|idx| row.optional_cell(idx).to_string()),
            html_list: html_by_series.get(series_code).cloned().unwrap_or_default(),
            brand_code,
            category_code,
        });
    }

    Ok(series_list)
}

/// Group html fragments by series code, keeping source order
fn collect_html(html: &Table) -> Result<HashMap<&str, Vec<String>>> {
    let [code_idx, html_idx] = html.require_columns([SERIES_CODE_COLUMN, "html"])?;

    let mut by_series: HashMap<&str, Vec<String>> = HashMap::new();
    for row in &html.rows {
        let series_code = row.cell(code_idx);
        let fragment = row.cell(html_idx);
        if series_code.is_empty() || fragment.is_empty() {
            continue;
        }
        by_series
            .entry(series_code)
            .or_default()
            .push(fragment.to_string());
    }

    Ok(by_series)
}

fn missing_message(kind: &str, series_code: &str, region: Option<&str>) -> String {
    match region {
        Some(region) => format!(
            "{} code not found for series: {} (Region: {})",
            kind, series_code, region
        ),
        None => format!("{} code not found for series: {}", kind, series_code),
    }
}
