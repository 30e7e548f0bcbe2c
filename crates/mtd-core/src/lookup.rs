//! Brand and category lookup tables
//!
//! Both tables map a series code to a single code value. A missing source
//! file degrades to an empty table (every series then falls back to the
//! configured default), while a present file with a malformed header is
//! a hard error.

use crate::error::Result;
use crate::parser::parse_tsv;
use crate::table::Table;
use crate::warnings::WarningSink;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Column holding the join key in every lookup source
pub const SERIES_CODE_COLUMN: &str = "series_code";
/// Soft-delete flag column of the category source
pub const DELETE_FLAG_COLUMN: &str = "delete_flag";

const DELETED: &str = "1";

/// Result of looking up a series code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome<'a> {
    Found(&'a str),
    Missing,
}

/// Series code -> code value mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTable {
    entries: HashMap<String, String>,
}

impl LookupTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, replacing any earlier value for the key.
    /// Pairs with an empty key or value are ignored.
    pub fn insert(&mut self, series_code: &str, value: &str) {
        if series_code.is_empty() || value.is_empty() {
            return;
        }
        self.entries
            .insert(series_code.to_string(), value.to_string());
    }

    /// Look up a series code
    pub fn lookup(&self, series_code: &str) -> LookupOutcome<'_> {
        match self.entries.get(series_code) {
            Some(value) => LookupOutcome::Found(value),
            None => LookupOutcome::Missing,
        }
    }

    /// Get the value for a series code, if any
    pub fn get(&self, series_code: &str) -> Option<&str> {
        self.entries.get(series_code).map(String::as_str)
    }

    /// Number of series codes in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = LookupTable::new();
        for (k, v) in iter {
            let (k, v): (String, String) = (k.into(), v.into());
            table.insert(&k, &v);
        }
        table
    }
}

/// Apply the default for a missing lookup, invoking `on_miss` exactly once
/// when the default is used.
pub fn resolve_or_default<F>(
    outcome: LookupOutcome<'_>,
    default: &str,
    on_miss: F,
) -> Result<String>
where
    F: FnOnce() -> Result<()>,
{
    match outcome {
        LookupOutcome::Found(value) => Ok(value.to_string()),
        LookupOutcome::Missing => {
            on_miss()?;
            Ok(default.to_string())
        }
    }
}

/// Describes one kind of lookup source
#[derive(Debug, Clone, Copy)]
struct LookupSource {
    /// Name used in warnings, e.g. "m_series"
    label: &'static str,
    /// Column holding the code value
    value_column: &'static str,
    /// Human-readable name of the value, e.g. "brand codes"
    value_name: &'static str,
    /// Whether `delete_flag` rows are skipped
    soft_delete: bool,
}

const BRAND_SOURCE: LookupSource = LookupSource {
    label: "m_series",
    value_column: "brand_code",
    value_name: "brand codes",
    soft_delete: false,
};

const CATEGORY_SOURCE: LookupSource = LookupSource {
    label: "m_category_series",
    value_column: "category_code",
    value_name: "category codes",
    soft_delete: true,
};

/// Load series -> brand code mappings from an `m_series` dump
pub fn load_brand_codes<P: AsRef<Path>>(
    path: P,
    warnings: &mut dyn WarningSink,
) -> Result<LookupTable> {
    load_lookup(path.as_ref(), BRAND_SOURCE, warnings)
}

/// Load series -> category code mappings from an `m_category_series` dump,
/// skipping soft-deleted rows
pub fn load_category_codes<P: AsRef<Path>>(
    path: P,
    warnings: &mut dyn WarningSink,
) -> Result<LookupTable> {
    load_lookup(path.as_ref(), CATEGORY_SOURCE, warnings)
}

/// Build a brand table from an already parsed source
pub fn brand_codes_from_table(table: &Table) -> Result<LookupTable> {
    build_lookup(table, BRAND_SOURCE)
}

/// Build a category table from an already parsed source
pub fn category_codes_from_table(table: &Table) -> Result<LookupTable> {
    build_lookup(table, CATEGORY_SOURCE)
}

fn load_lookup(
    path: &Path,
    source: LookupSource,
    warnings: &mut dyn WarningSink,
) -> Result<LookupTable> {
    if !path.exists() {
        warnings.warn(&format!(
            "{} file not found: {}. Proceeding with empty {}.",
            source.label,
            path.display(),
            source.value_name
        ))?;
        return Ok(LookupTable::new());
    }

    let table = parse_tsv(path)?;
    let lookup = build_lookup(&table, source)?;
    tracing::debug!(
        "loaded {} {} from {}",
        lookup.len(),
        source.value_name,
        path.display()
    );
    Ok(lookup)
}

fn build_lookup(table: &Table, source: LookupSource) -> Result<LookupTable> {
    let [code_idx, value_idx] = table.require_columns([SERIES_CODE_COLUMN, source.value_column])?;
    let delete_idx = if source.soft_delete {
        table.optional_column(DELETE_FLAG_COLUMN)
    } else {
        None
    };

    let mut lookup = LookupTable::new();
    for row in &table.rows {
        if row.optional_cell(delete_idx) == DELETED {
            continue;
        }
        lookup.insert(row.cell(code_idx), row.cell(value_idx));
    }

    Ok(lookup)
}
