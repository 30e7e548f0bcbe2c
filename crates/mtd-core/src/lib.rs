//! mtd-core: Core library for generating translation task files from
//! product series master data
//!
//! This library provides functionality to:
//! - Filter large TSV dumps down to a whitelist of series codes
//! - Parse TSV dumps into header-indexed tables
//! - Load brand and category lookups (with soft-delete handling)
//! - Join language, html and lookup sources into per-series records
//! - Render each record into the task-submission TSV layout

pub mod config;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod formatter;
pub mod lookup;
pub mod parser;
pub mod pipeline;
pub mod table;
pub mod warnings;

pub use config::FormatConfig;
pub use error::{Error, Result};
pub use extractor::{extract_series_data, ExtractContext, SeriesData};
pub use filter::{extract_series, filter_lines, load_series_codes, ExtractReport, FilterSummary};
pub use formatter::{generate_output, task_rows, TaskDocument, TaskRow};
pub use lookup::{
    load_brand_codes, load_category_codes, resolve_or_default, LookupOutcome, LookupTable,
};
pub use parser::{parse_tsv, parse_tsv_str};
pub use pipeline::{load_series_data, run_generate, GenerateJob, GenerateSummary, GeneratedFile};
pub use table::{Column, Row, Table};
pub use warnings::{WarningLog, WarningSink};
