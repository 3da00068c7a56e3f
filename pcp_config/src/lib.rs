// Warning groups (as of rust 1.55)
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_compatibility,
    rust_2021_compatibility,
    rust_2018_idioms,
    unused
)]

//!
//! Run configuration for the site-summarization tools.
//!
//! The imaging pipeline shares one YAML configuration document across its
//! steps; each step reads the sections it needs. This crate parses that
//! document into an explicit [`SummarizeConfig`] that is constructed once at
//! startup and passed by reference into each component; configuration never
//! lives in ambient globals.
//!

use anyhow::{ensure, Context, Result};
use pcp_types::columns::metadata_projection;
use pcp_types::{CategoryOrder, QualityScheme};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The `core` section: identity of the batch and the categorization scheme.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreSection {
    /// Name of the batch of plates/sites processed together.
    pub batch: String,
    /// The cell-quality categorization function the merge step ran with.
    pub categorize_cell_quality: QualityScheme,
}

/// The `process-spots` section: base names of the foci attribute columns.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessSpotsSection {
    /// Barcode column base names (prefixed per foci column naming).
    pub barcode_cols: Vec<String>,
    /// Gene column base names (prefixed per foci column naming).
    pub gene_cols: Vec<String>,
    /// Spot-score column base names (expanded to `_count`/`_mean` columns).
    pub spot_score_cols: Vec<String>,
}

/// Columns the upstream cell/foci merge wrote into the metadata tables.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataMergeColumns {
    /// Cell identity columns.
    pub cell_cols: Vec<String>,
    /// Fully-qualified cell-quality label column.
    pub cell_quality_col: String,
}

/// The `process-cells` section: where the per-site tables live and how their
/// columns are named.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessCellsSection {
    /// Base directory the cell-processing step wrote its outputs under; this
    /// step reads `<output_basedir>/<batch>/paint/<site>/` from it.
    pub output_basedir: PathBuf,
    pub metadata_merge_columns: MetadataMergeColumns,
    /// Fully-qualified foci-site column.
    pub foci_site_col: String,
}

/// The `summarize-cells` section: output locations and category display
/// order/colors.
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeCellsSection {
    pub output_resultsdir: PathBuf,
    pub output_figuresdir: PathBuf,
    /// Category labels in display order, best quality first.
    pub cell_category_order: Vec<String>,
    /// Display colors, parallel to `cell_category_order`.
    pub cell_category_colors: Vec<String>,
}

/// The parsed configuration document, restricted to the four sections this
/// step consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeConfig {
    pub core: CoreSection,
    #[serde(rename = "process-spots")]
    pub process_spots: ProcessSpotsSection,
    #[serde(rename = "process-cells")]
    pub process_cells: ProcessCellsSection,
    #[serde(rename = "summarize-cells")]
    pub summarize_cells: SummarizeCellsSection,
}

impl SummarizeConfig {
    /// Read and parse the configuration file, then validate cross-field
    /// invariants. Any failure is fatal.
    pub fn load(path: &Path) -> Result<SummarizeConfig> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: SummarizeConfig = serde_yaml::from_str(&s)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let summ = &self.summarize_cells;
        ensure!(
            !summ.cell_category_order.is_empty(),
            "cell_category_order must name at least one category"
        );
        ensure!(
            summ.cell_category_order.len() == summ.cell_category_colors.len(),
            "cell_category_colors ({} entries) must be parallel to cell_category_order ({} entries)",
            summ.cell_category_colors.len(),
            summ.cell_category_order.len(),
        );
        Ok(())
    }

    /// `<output_basedir>/<batch>/paint`, the directory holding one
    /// subdirectory per site.
    pub fn paint_dir(&self) -> PathBuf {
        self.process_cells
            .output_basedir
            .join(&self.core.batch)
            .join("paint")
    }

    /// The caller-supplied category display order.
    pub fn category_order(&self) -> CategoryOrder {
        CategoryOrder::new(self.summarize_cells.cell_category_order.clone())
    }

    /// (label, color) pairs in display order, passed through unchanged from
    /// the configuration.
    pub fn category_colors(&self) -> Vec<(String, String)> {
        self.summarize_cells
            .cell_category_order
            .iter()
            .cloned()
            .zip(self.summarize_cells.cell_category_colors.iter().cloned())
            .collect()
    }

    /// The fixed, ordered metadata projection for this configuration.
    pub fn metadata_columns(&self) -> Vec<String> {
        metadata_projection(
            &self.process_cells.metadata_merge_columns.cell_cols,
            &self.process_spots.barcode_cols,
            &self.process_spots.gene_cols,
            &self.process_spots.spot_score_cols,
            &self.process_cells.metadata_merge_columns.cell_quality_col,
            &self.process_cells.foci_site_col,
        )
    }
}
