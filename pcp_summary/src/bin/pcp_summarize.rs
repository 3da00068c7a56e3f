//! pcp_summarize
//!
//! Aggregate the per-site cell-quality tables of one batch and emit the
//! cell-count summary charts. Rendering and rasterization are external; this
//! tool produces the chart payloads (and, on request, the aggregated table).

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn, LevelFilter};
use pcp_config::SummarizeConfig;
use pcp_types::CellCategoryMap;
use pcp_summary::aggregate::AggregatedCellCounts;
use pcp_summary::load::{discover_sites, load_site_cell_counts, load_site_metadata};
use pcp_summary::rollup::{QualityRollup, WellRollup};
use pcp_summary::websummary::{
    CategoryStyle, ChartWithHelp, SiteCountsByWellChart, SiteCountsChart, TotalCountsByWellChart,
    TotalCountsChart,
};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Summarize per-site cell quality for one batch of a pooled cell painting
/// run.
#[derive(Parser, Debug)]
#[clap(name = "pcp_summarize")]
struct PcpSummarize {
    /// Path to the shared site-processing configuration YAML.
    #[clap(long)]
    config: PathBuf,

    /// Write the aggregated cell-count table under the configured results
    /// directory.
    #[clap(long)]
    write_results: bool,

    /// Write the chart payloads under the configured figures directory.
    #[clap(long)]
    write_figures: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = PcpSummarize::parse();
    let config = SummarizeConfig::load(&args.config)?;
    run(&config, args.write_results, args.write_figures)
}

fn run(config: &SummarizeConfig, write_results: bool, write_figures: bool) -> Result<()> {
    // Categories the upstream merge could have assigned, Empty included.
    let categories = CellCategoryMap::from_scheme(config.core.categorize_cell_quality);
    let order = config.category_order();
    for label in categories.labels() {
        if !order.contains(label) {
            warn!(
                "category '{label}' from the {} scheme is not in cell_category_order and will \
                 rank after every ordered category",
                config.core.categorize_cell_quality
            );
        }
    }

    let paint_dir = config.paint_dir();
    let sites = discover_sites(&paint_dir)?;
    info!("There are {} sites.", sites.len());

    let projection = config.metadata_columns();
    let mut tables = Vec::new();
    for site in &sites {
        tables.push(load_site_cell_counts(&paint_dir, site)?);
        // The metadata tables are loaded and schema-checked here, but no
        // downstream summary consumes them yet.
        let metadata = load_site_metadata(&paint_dir, site, &projection)?;
        debug!("{site}: {} metadata rows", metadata.num_rows());
    }

    let aggregated = AggregatedCellCounts::from_site_tables(tables, config.category_order())?;
    info!(
        "aggregated {} rows across {} sites in {} wells",
        aggregated.rows().len(),
        aggregated.site_order().len(),
        aggregated.well_order().len()
    );

    let by_quality = QualityRollup::new(&aggregated);
    let by_well = WellRollup::new(&aggregated);
    let styles = CategoryStyle::from_pairs(&config.category_colors());

    let charts: Vec<(&str, ChartWithHelp)> = vec![
        (
            "all_cellpainting_cellquality_across_sites",
            SiteCountsChart::new(&aggregated, &styles).into(),
        ),
        (
            "all_cellpainting_cellquality_across_sites_by_well",
            SiteCountsByWellChart::new(&aggregated, &styles).into(),
        ),
        (
            "total_cell_count",
            TotalCountsChart::new(&by_quality, &styles).into(),
        ),
        (
            "total_cell_count_by_well",
            TotalCountsByWellChart::new(&by_well, &styles).into(),
        ),
    ];

    info!(
        "There are a total of {} cells in {}",
        aggregated.grand_total(),
        config.core.batch
    );

    if write_results {
        let path = config
            .summarize_cells
            .output_resultsdir
            .join("cells")
            .join("cell_count.tsv");
        write_table(&aggregated, &path)?;
        info!("wrote {}", path.display());
    }

    if write_figures {
        let figures_dir = &config.summarize_cells.output_figuresdir;
        std::fs::create_dir_all(figures_dir)
            .with_context(|| format!("creating {}", figures_dir.display()))?;
        for (name, chart) in &charts {
            let path = figures_dir.join(format!("{name}.json"));
            let file = File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            serde_json::to_writer_pretty(file, chart)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {}", path.display());
        }
    }

    Ok(())
}

fn write_table(aggregated: &AggregatedCellCounts, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    aggregated.write_tsv(file)
}
