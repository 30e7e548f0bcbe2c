//! End-to-end generation of task files from extracted dumps

use crate::config::FormatConfig;
use crate::error::{Error, Result};
use crate::extractor::{extract_series_data, ExtractContext, SeriesData};
use crate::formatter::generate_output;
use crate::lookup::{load_brand_codes, load_category_codes};
use crate::parser::parse_tsv;
use crate::warnings::WarningSink;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Input and output locations of one generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateJob {
    /// Extracted `m_series_language` dump
    pub language_file: PathBuf,
    /// Extracted `m_series_wysiwyg_language` dump
    pub html_file: PathBuf,
    /// `m_series` dump (brand codes), may be absent
    pub brand_file: PathBuf,
    /// `m_category_series` dump (category codes), may be absent
    pub category_file: PathBuf,
    /// Directory receiving one file per series; its name is the region label
    pub output_dir: PathBuf,
    /// Overrides the configured first task_detail_id
    pub start_id: Option<u64>,
}

impl GenerateJob {
    /// Region label used in warnings, taken from the output directory name
    pub fn region(&self) -> Option<String> {
        self.output_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    fn check_inputs(&self) -> Result<()> {
        require_file("Language", &self.language_file)?;
        require_file("WYSIWYG", &self.html_file)
    }
}

/// One written task file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub series_code: String,
    pub html_entries: usize,
    pub rows_emitted: usize,
    pub first_task_detail_id: u64,
}

/// Result of a generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSummary {
    pub region: Option<String>,
    pub files: Vec<GeneratedFile>,
    pub first_task_detail_id: u64,
    /// First id not used by this run
    pub next_task_detail_id: u64,
}

impl GenerateSummary {
    /// Total task detail rows across all files
    pub fn total_rows(&self) -> usize {
        self.files.iter().map(|f| f.rows_emitted).sum()
    }
}

fn require_file(kind: &'static str, path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::MissingInput {
            kind,
            path: path.to_path_buf(),
        })
    }
}

/// Load lookups and join the sources, without writing anything
pub fn load_series_data(
    job: &GenerateJob,
    config: &FormatConfig,
    warnings: &mut dyn WarningSink,
) -> Result<Vec<SeriesData>> {
    job.check_inputs()?;

    tracing::info!(
        "Reading data from: {}, {}, {}, and {}",
        job.language_file.display(),
        job.html_file.display(),
        job.brand_file.display(),
        job.category_file.display()
    );

    let brand_codes = load_brand_codes(&job.brand_file, warnings)?;
    let category_codes = load_category_codes(&job.category_file, warnings)?;
    let language = parse_tsv(&job.language_file)?;
    let html = parse_tsv(&job.html_file)?;
    let region = job.region();

    let ctx = ExtractContext {
        brand_codes: &brand_codes,
        category_codes: Some(&category_codes),
        region: region.as_deref(),
        default_brand_code: &config.default_brand_code,
        default_category_code: &config.default_category_code,
    };
    let series_list = extract_series_data(&language, &html, &ctx, warnings)?;
    tracing::info!("Found {} series", series_list.len());

    Ok(series_list)
}

/// Generate one task file per series into the job's output directory
pub fn run_generate(
    job: &GenerateJob,
    config: &FormatConfig,
    warnings: &mut dyn WarningSink,
) -> Result<GenerateSummary> {
    job.check_inputs()?;
    fs::create_dir_all(&job.output_dir)?;

    let series_list = load_series_data(job, config, warnings)?;
    // Reject every unusable code before the first file is written
    for series in &series_list {
        check_series_code(&series.series_code)?;
    }

    let first_id = job.start_id.unwrap_or(config.base_task_detail_id);
    let mut next_id = first_id;
    let mut files = Vec::with_capacity(series_list.len());

    for series in &series_list {
        let document = generate_output(series, next_id, config)?;
        let path = job.output_dir.join(config.file_name(&series.series_code));
        fs::write(&path, &document.text)?;

        tracing::info!(
            "Generated: {} (with {} HTML entries)",
            path.display(),
            series.html_list.len()
        );

        files.push(GeneratedFile {
            path,
            series_code: series.series_code.clone(),
            html_entries: series.html_list.len(),
            rows_emitted: document.rows_emitted,
            first_task_detail_id: next_id,
        });
        next_id = document.next_id;
    }

    Ok(GenerateSummary {
        region: job.region(),
        files,
        first_task_detail_id: first_id,
        next_task_detail_id: next_id,
    })
}

/// Series codes become part of a file name inside the output directory,
/// so they must not contain a path separator
fn check_series_code(code: &str) -> Result<()> {
    if code.contains(['/', '\\']) {
        return Err(Error::InvalidSeriesCode {
            code: code.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn job(dir: &Path) -> GenerateJob {
        GenerateJob {
            language_file: dir.join("lang.tsv"),
            html_file: dir.join("wysiwyg.tsv"),
            brand_file: dir.join("m_series.tsv"),
            category_file: dir.join("m_category_series.tsv"),
            output_dir: dir.join("out").join("MJPJPN"),
            start_id: Some(1000),
        }
    }

    #[test]
    fn test_region_from_output_dir() {
        let job = job(Path::new("/data"));
        assert_eq!(job.region().as_deref(), Some("MJPJPN"));
    }

    #[test]
    fn test_missing_language_file_aborts_before_output() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "wysiwyg.tsv", "series_code\thtml\n");
        let job = job(dir.path());
        let mut warnings: Vec<String> = Vec::new();

        let err = run_generate(&job, &FormatConfig::default(), &mut warnings).unwrap_err();
        assert!(matches!(err, Error::MissingInput { kind: "Language", .. }));
        assert!(!job.output_dir.exists());
    }

    #[test]
    fn test_missing_html_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lang.tsv", "series_code\tseries_name\tcatchcopy\n");
        let job = job(dir.path());
        let mut warnings: Vec<String> = Vec::new();

        let err = load_series_data(&job, &FormatConfig::default(), &mut warnings).unwrap_err();
        assert!(matches!(err, Error::MissingInput { kind: "WYSIWYG", .. }));
    }

    #[test]
    fn test_ids_advance_by_emitted_rows() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "lang.tsv",
            "series_code\tseries_name\tcatchcopy\tseries_notice_top_2\nS1\tName1\t\tN2\nS2\tName2\tCatch2\t\n",
        );
        write(dir.path(), "wysiwyg.tsv", "series_code\thtml\nS2\t<p>x</p>\n");
        write(dir.path(), "m_series.tsv", "series_code\tbrand_code\nS1\tB1\nS2\tB2\n");
        write(
            dir.path(),
            "m_category_series.tsv",
            "series_code\tcategory_code\tdelete_flag\nS1\tC1\t0\nS2\tC2\t0\n",
        );
        let job = job(dir.path());
        let mut warnings: Vec<String> = Vec::new();

        let summary = run_generate(&job, &FormatConfig::default(), &mut warnings).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(summary.files.len(), 2);
        assert_eq!(summary.files[0].rows_emitted, 2);
        assert_eq!(summary.files[1].first_task_detail_id, 1002);
        assert_eq!(summary.files[1].rows_emitted, 3);
        assert_eq!(summary.next_task_detail_id, 1005);
        assert_eq!(summary.total_rows(), 5);

        let second = fs::read_to_string(&summary.files[1].path).unwrap();
        let last = second.lines().last().unwrap();
        assert!(last.starts_with("1004\t3\tS2\t"));
        assert!(summary.files[1]
            .path
            .ends_with("out/MJPJPN/cistate-test-series-code_S2.tsv"));
    }

    #[test]
    fn test_missing_lookup_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lang.tsv", "series_code\tseries_name\tcatchcopy\nS1\tName1\t\n");
        write(dir.path(), "wysiwyg.tsv", "series_code\thtml\n");
        let job = job(dir.path());
        let mut warnings: Vec<String> = Vec::new();

        let series = load_series_data(&job, &FormatConfig::default(), &mut warnings).unwrap();

        assert_eq!(series[0].brand_code, "MSM1");
        assert_eq!(series[0].category_code, "M1803060000");
        assert_eq!(warnings.len(), 4);
        assert!(warnings[0].starts_with("m_series file not found"));
        assert!(warnings[1].starts_with("m_category_series file not found"));
        assert_eq!(warnings[2], "Brand code not found for series: S1 (Region: MJPJPN)");
        assert_eq!(warnings[3], "Category code not found for series: S1 (Region: MJPJPN)");
    }

    #[test]
    fn test_series_code_with_path_separator_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "lang.tsv",
            "series_code\tseries_name\tcatchcopy\nS1\tName1\t\n../evil\tName2\t\n",
        );
        write(dir.path(), "wysiwyg.tsv", "series_code\thtml\n");
        let job = job(dir.path());
        let mut warnings: Vec<String> = Vec::new();

        let err = run_generate(&job, &FormatConfig::default(), &mut warnings).unwrap_err();

        assert!(matches!(err, Error::InvalidSeriesCode { ref code } if code == "../evil"));
        assert_eq!(fs::read_dir(&job.output_dir).unwrap().count(), 0);
        assert!(check_series_code("a\\b").is_err());
        assert!(check_series_code("ABC-12.3").is_ok());
    }

    #[test]
    fn test_id_overflow_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lang.tsv", "series_code\tseries_name\tcatchcopy\nS1\tName1\tCatch1\n");
        write(dir.path(), "wysiwyg.tsv", "series_code\thtml\n");
        let mut job = job(dir.path());
        job.start_id = Some(u64::MAX);
        let mut warnings: Vec<String> = Vec::new();

        let err = run_generate(&job, &FormatConfig::default(), &mut warnings).unwrap_err();
        assert!(matches!(err, Error::TaskIdOverflow { rows: 2, .. }));
    }
}
