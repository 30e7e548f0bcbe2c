//! Streaming whitelist filter for large TSV dumps
//!
//! Copies the header line and every line whose first field is one of the
//! whitelisted series codes. Input is read line by line, so dumps larger
//! than memory can be filtered.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

/// Outcome of a filter run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSummary {
    /// Data lines read (header excluded)
    pub lines_scanned: usize,
    /// Data lines copied to the output
    pub matches: usize,
}

/// Result of [`extract_series`]
#[derive(Debug, Clone)]
pub struct ExtractReport {
    pub output: PathBuf,
    pub codes_loaded: usize,
    pub summary: FilterSummary,
}

/// Load the series-code whitelist, one code per line
pub fn load_series_codes<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::MissingInput {
            kind: "Series codes",
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let codes: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if codes.is_empty() {
        return Err(Error::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    Ok(codes)
}

/// Copy the first line and every whitelisted line from `reader` to `writer`
///
/// Lines are handled as raw bytes; only the series code is compared, so
/// invalid UTF-8 in other fields is copied through unchanged.
pub async fn filter_lines<R, W>(
    mut reader: R,
    writer: &mut W,
    codes: &[String],
) -> Result<FilterSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut summary = FilterSummary::default();
    let mut buf = Vec::new();

    if reader.read_until(b'\n', &mut buf).await? == 0 {
        writer.flush().await?;
        return Ok(summary);
    }
    write_line(writer, trim_line_end(&buf)).await?;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        summary.lines_scanned += 1;

        let line = trim_line_end(&buf);
        let series_code = first_field(line);
        // Linear scan; whitelists are at most a few thousand codes.
        if codes.iter().any(|code| code.as_bytes() == series_code) {
            write_line(writer, line).await?;
            summary.matches += 1;
            tracing::info!("Found: {}", String::from_utf8_lossy(series_code));
        }
    }

    writer.flush().await?;
    Ok(summary)
}

/// Strip the `\n` (or `\r\n`) terminator
fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn first_field(line: &[u8]) -> &[u8] {
    line.split(|&b| b == b'\t').next().unwrap_or_default()
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &[u8]) -> Result<()> {
    writer.write_all(line).await?;
    writer.write_all(b"\n").await?;
    Ok(())
}

/// Filter `input` into `output`, keeping rows whose series code is listed
/// in `codes_file`
pub async fn extract_series<P, Q, C>(input: P, output: Q, codes_file: C) -> Result<ExtractReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    C: AsRef<Path>,
{
    let codes = load_series_codes(codes_file.as_ref())?;
    tracing::info!(
        "Loading {} series codes from {}...",
        codes.len(),
        codes_file.as_ref().display()
    );

    let input = input.as_ref();
    let source = File::open(input).await.map_err(|e| Error::FileRead {
        path: input.to_path_buf(),
        source: e,
    })?;
    let mut sink = BufWriter::new(File::create(output.as_ref()).await?);

    let summary = filter_lines(BufReader::new(source), &mut sink, &codes).await?;
    tracing::info!("Total matches: {}", summary.matches);
    tracing::info!("Output written to: {}", output.as_ref().display());

    Ok(ExtractReport {
        output: output.as_ref().to_path_buf(),
        codes_loaded: codes.len(),
        summary,
    })
}
