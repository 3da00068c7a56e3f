//! Per-site loading of the cell-count and metadata tables.
//!
//! Each site directory under `<output_basedir>/<batch>/paint/` holds a
//! `cell_counts_<site>.tsv` and a gzip-compressed `metadata_<site>.tsv.gz`.
//! Loading has no recovery semantics: a missing file, a malformed row, or a
//! missing expected column aborts the whole run.

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use flate2::read::MultiGzDecoder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// One (site, quality category) cell count, as written by the upstream
/// cell-processing step. Rows are appended across sites, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCountRecord {
    pub site: String,
    #[serde(rename = "Cell_Quality")]
    pub cell_quality: String,
    pub cell_count: i64,
}

/// A metadata table projected to a fixed, ordered column set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MetadataTable {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

/// Enumerate the site subdirectories of the paint directory, sorted by name
/// for a deterministic iteration order.
pub fn discover_sites(paint_dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(paint_dir)
        .with_context(|| format!("listing site directories in {}", paint_dir.display()))?;
    let mut sites = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry in {}", paint_dir.display()))?;
        if entry.path().is_dir() {
            sites.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    sites.sort();
    Ok(sites)
}

fn cell_counts_file(paint_dir: &Path, site: &str) -> PathBuf {
    paint_dir.join(site).join(format!("cell_counts_{site}.tsv"))
}

fn metadata_file(paint_dir: &Path, site: &str) -> PathBuf {
    paint_dir.join(site).join(format!("metadata_{site}.tsv.gz"))
}

/// Load one site's cell-count table.
pub fn load_site_cell_counts(paint_dir: &Path, site: &str) -> Result<Vec<CellCountRecord>> {
    let path = cell_counts_file(paint_dir, site);
    let file =
        File::open(&path).with_context(|| format!("opening cell counts {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(BufReader::new(file));
    let mut records = Vec::new();
    for record in reader.deserialize() {
        let record: CellCountRecord =
            record.with_context(|| format!("parsing cell counts {}", path.display()))?;
        records.push(record);
    }
    Ok(records)
}

/// Load one site's metadata table, projected to `projection` in order.
/// Any projected column absent from the source table is a fatal error.
pub fn load_site_metadata(
    paint_dir: &Path,
    site: &str,
    projection: &[String],
) -> Result<MetadataTable> {
    let path = metadata_file(paint_dir, site);
    let file =
        File::open(&path).with_context(|| format!("opening metadata {}", path.display()))?;
    let gz = MultiGzDecoder::new(BufReader::new(file));
    let mut reader = ReaderBuilder::new().delimiter(b'\t').from_reader(gz);

    let headers = reader
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?
        .clone();
    let indices = projection_indices(&path, projection, &headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("parsing metadata {}", path.display()))?;
        rows.push(indices.iter().map(|&i| record[i].to_string()).collect());
    }
    Ok(MetadataTable {
        columns: projection.to_vec(),
        rows,
    })
}

/// Map each projected column to its index in the header, erroring on the
/// first column the table does not carry.
fn projection_indices(
    path: &Path,
    projection: &[String],
    headers: &csv::StringRecord,
) -> Result<Vec<usize>> {
    let mut indices = Vec::with_capacity(projection.len());
    for column in projection {
        match headers.iter().position(|h| h == column) {
            Some(i) => indices.push(i),
            None => bail!(
                "The metadata file '{}' must contain a column named '{}', but it was not found. \
                 Please check the headers in the file.",
                path.display(),
                column
            ),
        }
    }
    Ok(indices)
}
