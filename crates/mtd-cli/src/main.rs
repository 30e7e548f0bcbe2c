//! MTD task file CLI
//!
//! Command-line tool for filtering series master-data dumps and generating
//! translation task TSV files.

use clap::{Parser, Subcommand};
use mtd_core::{
    extract_series, generate_output, load_series_data, run_generate, FormatConfig, GenerateJob,
    WarningLog,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mtd-cli")]
#[command(about = "Series master data to translation task TSV", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Source files shared by the commands that join series data
#[derive(clap::Args)]
struct Sources {
    /// Extracted m_series_language TSV
    #[arg(short, long)]
    language: PathBuf,

    /// Extracted m_series_wysiwyg_language TSV
    #[arg(short = 'w', long)]
    html: PathBuf,

    /// m_series TSV with brand codes (may be missing)
    #[arg(short, long)]
    brand: PathBuf,

    /// m_category_series TSV with category codes (may be missing)
    #[arg(short, long)]
    category: PathBuf,

    /// Config file (JSON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the header and whitelisted rows of a large TSV
    Extract {
        /// Input TSV (first column is series_code)
        #[arg(short, long)]
        input: PathBuf,

        /// Output TSV
        #[arg(short, long)]
        output: PathBuf,

        /// Whitelist file, one series code per line
        #[arg(short, long)]
        codes: PathBuf,
    },

    /// Generate one task file per series
    Generate {
        #[command(flatten)]
        sources: Sources,

        /// Output directory; its name is used as the region label
        #[arg(short, long, default_value = "output/mtd")]
        output_dir: PathBuf,

        /// First task_detail_id (overrides the config)
        #[arg(long)]
        start_id: Option<u64>,

        /// Write a JSON run summary to this path
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Print the joined series records as JSON
    Show {
        #[command(flatten)]
        sources: Sources,

        /// Only show this series code
        #[arg(short, long)]
        series: Option<String>,
    },

    /// Print the task file for a single series
    Preview {
        #[command(flatten)]
        sources: Sources,

        /// Series code to render
        #[arg(short, long)]
        series: String,

        /// task_detail_id of the first row (overrides the config)
        #[arg(long)]
        start_id: Option<u64>,
    },

    /// Create a config file with the default values
    InitConfig {
        /// Output path for the config file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> mtd_core::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            output,
            codes,
        } => cmd_extract(&input, &output, &codes).await,
        Commands::Generate {
            sources,
            output_dir,
            start_id,
            summary,
        } => cmd_generate(&sources, output_dir, start_id, summary.as_deref()),
        Commands::Show { sources, series } => cmd_show(&sources, series.as_deref()),
        Commands::Preview {
            sources,
            series,
            start_id,
        } => cmd_preview(&sources, &series, start_id),
        Commands::InitConfig { output } => cmd_init_config(&output),
    }
}

impl Sources {
    fn job(&self, output_dir: PathBuf, start_id: Option<u64>) -> GenerateJob {
        GenerateJob {
            language_file: self.language.clone(),
            html_file: self.html.clone(),
            brand_file: self.brand.clone(),
            category_file: self.category.clone(),
            output_dir,
            start_id,
        }
    }

    fn config(&self) -> mtd_core::Result<FormatConfig> {
        FormatConfig::load_or_default(self.config.as_ref())
    }
}

async fn cmd_extract(input: &Path, output: &Path, codes: &Path) -> mtd_core::Result<()> {
    let report = extract_series(input, output, codes).await?;

    println!(
        "Scanned {} rows against {} series codes",
        report.summary.lines_scanned, report.codes_loaded
    );
    println!("Total matches: {}", report.summary.matches);
    println!("Output written to: {}", report.output.display());

    Ok(())
}

fn cmd_generate(
    sources: &Sources,
    output_dir: PathBuf,
    start_id: Option<u64>,
    summary_path: Option<&Path>,
) -> mtd_core::Result<()> {
    let config = sources.config()?;
    let job = sources.job(output_dir, start_id);
    let mut warnings = WarningLog::new(&config.warning_log);

    let summary = run_generate(&job, &config, &mut warnings)?;

    println!(
        "Generated {} files ({} task rows) in {}",
        summary.files.len(),
        summary.total_rows(),
        job.output_dir.display()
    );
    println!(
        "task_detail_id range: {}..{}",
        summary.first_task_detail_id, summary.next_task_detail_id
    );
    if warnings.count() > 0 {
        println!(
            "{} warnings written to {}",
            warnings.count(),
            warnings.path().display()
        );
    }

    if let Some(path) = summary_path {
        fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        println!("Summary written to {}", path.display());
    }

    println!("\nDone!");
    Ok(())
}

fn cmd_show(sources: &Sources, series_code: Option<&str>) -> mtd_core::Result<()> {
    let config = sources.config()?;
    // No output directory, so warnings carry no region label
    let job = sources.job(PathBuf::new(), None);
    let mut warnings = WarningLog::new(&config.warning_log);

    let series_list = load_series_data(&job, &config, &mut warnings)?;
    let selected: Vec<_> = series_list
        .iter()
        .filter(|s| series_code.map_or(true, |code| s.series_code == code))
        .collect();

    println!("{}", serde_json::to_string_pretty(&selected)?);
    Ok(())
}

fn cmd_preview(
    sources: &Sources,
    series_code: &str,
    start_id: Option<u64>,
) -> mtd_core::Result<()> {
    let config = sources.config()?;
    let job = sources.job(PathBuf::new(), None);
    let mut warnings = WarningLog::new(&config.warning_log);

    let series_list = load_series_data(&job, &config, &mut warnings)?;
    let Some(series) = series_list.iter().find(|s| s.series_code == series_code) else {
        eprintln!("Series '{}' not found in {}", series_code, job.language_file.display());
        std::process::exit(1);
    };

    let start_id = start_id.unwrap_or(config.base_task_detail_id);
    let document = generate_output(series, start_id, &config)?;
    println!("{}", document.text);
    eprintln!("{} task rows, next task_detail_id {}", document.rows_emitted, document.next_id);

    Ok(())
}

fn cmd_init_config(output: &Path) -> mtd_core::Result<()> {
    let config = FormatConfig::default();
    config.save(output)?;

    println!("Created config file: {}", output.display());
    println!();
    println!("Edit the file to change the metadata row, then run:");
    println!(
        "  mtd-cli generate --config {} --language <tsv> --html <tsv> --brand <tsv> --category <tsv>",
        output.display()
    );

    Ok(())
}
