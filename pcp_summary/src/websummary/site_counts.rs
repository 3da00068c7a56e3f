//! Per-site stacked cell-count charts, with and without well faceting.

use crate::aggregate::AggregatedCellCounts;
use crate::websummary::{CategoryStyle, ChartWithHelp, PlotlyChart, TitleWithHelp};
use plotly::common::Marker;
use plotly::layout::{Axis, AxisType, BarMode, GridPattern, LayoutGrid};
use plotly::{Bar, Layout};

const SITE_COUNTS_TITLE: &str = "Cell Count by Site";
const SITE_COUNTS_HELP_TEXT: &str = "The plot shows the number of detected cells in each imaged \
site, stacked by cell quality category. Sites are ordered by total cell count, descending. Each \
quality category is colored according to the configured category palette.";

const SITE_COUNTS_BY_WELL_TITLE: &str = "Cell Count by Site and Well";
const SITE_COUNTS_BY_WELL_HELP_TEXT: &str = "The plot shows the number of detected cells in each \
imaged site, stacked by cell quality category, with one panel per well. Within a panel, sites \
keep the overall ordering by total cell count, descending.";

const X_LABEL: &str = "Sites";
const Y_LABEL: &str = "Cell Count";

/// One stacked series: a quality category's count per charted x position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySeries {
    pub style: CategoryStyle,
    pub counts: Vec<i64>,
}

fn category_series<'a>(
    aggregated: &AggregatedCellCounts,
    styles: &'a [CategoryStyle],
    sites: impl Iterator<Item = &'a pcp_types::SiteId> + Clone,
) -> Vec<CategorySeries> {
    let totals = aggregated.site_quality_totals();
    styles
        .iter()
        .map(|style| CategorySeries {
            style: style.clone(),
            counts: sites
                .clone()
                .map(|site| *totals.get(&(site, style.label.as_str())).unwrap_or(&0))
                .collect(),
        })
        .collect()
}

/// Cell count by Site, fill = Cell_Quality, no faceting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteCountsChart {
    /// Site-number tokens in site rank order (the x categories).
    pub sites: Vec<String>,
    /// One series per configured category, in display order.
    pub series: Vec<CategorySeries>,
}

impl SiteCountsChart {
    pub fn new(aggregated: &AggregatedCellCounts, styles: &[CategoryStyle]) -> SiteCountsChart {
        SiteCountsChart {
            sites: aggregated
                .site_order()
                .iter()
                .map(|site| site.site.clone())
                .collect(),
            series: category_series(aggregated, styles, aggregated.site_order().iter()),
        }
    }
}

impl From<SiteCountsChart> for ChartWithHelp {
    fn from(chart: SiteCountsChart) -> ChartWithHelp {
        let layout = Layout::new()
            .bar_mode(BarMode::Stack)
            .show_legend(true)
            .x_axis(Axis::new().type_(AxisType::Category).title(X_LABEL))
            .y_axis(Axis::new().title(Y_LABEL));

        let sites = chart.sites;
        let data = chart
            .series
            .into_iter()
            .map(|series| {
                Bar::new(sites.clone(), series.counts)
                    .name(series.style.label)
                    .marker(Marker::new().color(series.style.color))
            })
            .collect();

        ChartWithHelp {
            plot: PlotlyChart::with_layout_and_data(layout, data),
            help: TitleWithHelp {
                title: SITE_COUNTS_TITLE.to_string(),
                help: SITE_COUNTS_HELP_TEXT.to_string(),
            },
        }
    }
}

/// One well's panel in the faceted chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellPanel {
    pub well: String,
    pub sites: Vec<String>,
    pub series: Vec<CategorySeries>,
}

/// Cell count by Site, fill = Cell_Quality, faceted by Well on a fixed 2x2
/// grid with an independent x axis per panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteCountsByWellChart {
    pub panels: Vec<WellPanel>,
}

impl SiteCountsByWellChart {
    pub fn new(
        aggregated: &AggregatedCellCounts,
        styles: &[CategoryStyle],
    ) -> SiteCountsByWellChart {
        let panels = aggregated
            .well_order()
            .iter()
            .map(|well| {
                let well_sites: Vec<_> = aggregated
                    .site_order()
                    .iter()
                    .filter(|site| &site.well == well)
                    .collect();
                WellPanel {
                    well: well.clone(),
                    sites: well_sites.iter().map(|site| site.site.clone()).collect(),
                    series: category_series(aggregated, styles, well_sites.iter().copied()),
                }
            })
            .collect();
        SiteCountsByWellChart { panels }
    }
}

impl From<SiteCountsByWellChart> for ChartWithHelp {
    fn from(chart: SiteCountsByWellChart) -> ChartWithHelp {
        let mut layout = Layout::new()
            .bar_mode(BarMode::Stack)
            .show_legend(true)
            .grid(
                LayoutGrid::new()
                    .rows(2)
                    .columns(2)
                    .pattern(GridPattern::Independent),
            );
        for (i, panel) in chart.panels.iter().enumerate() {
            let axis = Axis::new()
                .type_(AxisType::Category)
                .title(panel.well.clone());
            layout = match i {
                0 => layout.x_axis(axis).y_axis(Axis::new().title(Y_LABEL)),
                1 => layout.x_axis2(axis),
                2 => layout.x_axis3(axis).y_axis3(Axis::new().title(Y_LABEL)),
                3 => layout.x_axis4(axis),
                _ => layout,
            };
        }

        let mut data = Vec::new();
        for (i, panel) in chart.panels.into_iter().enumerate() {
            for series in panel.series {
                let mut bar = Bar::new(panel.sites.clone(), series.counts)
                    .name(series.style.label)
                    .marker(Marker::new().color(series.style.color))
                    // One legend entry per category, not one per panel.
                    .show_legend(i == 0);
                if i > 0 {
                    bar = bar
                        .x_axis(format!("x{}", i + 1))
                        .y_axis(format!("y{}", i + 1));
                }
                data.push(bar);
            }
        }

        ChartWithHelp {
            plot: PlotlyChart::with_layout_and_data(layout, data),
            help: TitleWithHelp {
                title: SITE_COUNTS_BY_WELL_TITLE.to_string(),
                help: SITE_COUNTS_BY_WELL_HELP_TEXT.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::CellCountRecord;
    use pcp_types::CategoryOrder;
    use pretty_assertions::assert_eq;

    fn record(site: &str, quality: &str, count: i64) -> CellCountRecord {
        CellCountRecord {
            site: site.to_string(),
            cell_quality: quality.to_string(),
            cell_count: count,
        }
    }

    fn styles() -> Vec<CategoryStyle> {
        CategoryStyle::from_pairs(&[
            ("Perfect".to_string(), "#1f77b4".to_string()),
            ("Empty".to_string(), "#7f7f7f".to_string()),
        ])
    }

    fn aggregate() -> AggregatedCellCounts {
        AggregatedCellCounts::from_site_tables(
            vec![
                vec![
                    record("P1-A2-1", "Perfect", 5),
                    record("P1-A2-1", "Empty", 5),
                ],
                vec![
                    record("P1-A1-1", "Perfect", 10),
                    record("P1-A1-1", "Empty", 2),
                ],
                vec![record("P1-A1-2", "Perfect", 1)],
            ],
            CategoryOrder::new(["Perfect", "Empty"].map(String::from).to_vec()),
        )
        .unwrap()
    }

    #[test]
    fn test_site_counts_series_follow_site_rank() {
        let chart = SiteCountsChart::new(&aggregate(), &styles());
        // Site rank: P1-A1-1 (12), P1-A2-1 (10), P1-A1-2 (1).
        assert_eq!(chart.sites, ["1", "1", "2"]);
        assert_eq!(chart.series[0].style.label, "Perfect");
        assert_eq!(chart.series[0].counts, [10, 5, 1]);
        assert_eq!(chart.series[1].counts, [2, 5, 0]);
    }

    #[test]
    fn test_site_counts_payload_is_stacked_and_colored() {
        let payload: ChartWithHelp = SiteCountsChart::new(&aggregate(), &styles()).into();
        assert_eq!(payload.plot.data.len(), 2);
        assert_eq!(payload.plot.data[0]["type"], "bar");
        assert_eq!(payload.plot.data[0]["name"], "Perfect");
        assert_eq!(payload.plot.data[0]["marker"]["color"], "#1f77b4");
        assert_eq!(payload.plot.data[1]["y"][1], 5);
        assert_eq!(payload.plot.layout["barmode"], "stack");
    }

    #[test]
    fn test_by_well_panels_inherit_site_order() {
        let chart = SiteCountsByWellChart::new(&aggregate(), &styles());
        assert_eq!(chart.panels.len(), 2);
        assert_eq!(chart.panels[0].well, "A1");
        assert_eq!(chart.panels[0].sites, ["1", "2"]);
        assert_eq!(chart.panels[0].series[0].counts, [10, 1]);
        assert_eq!(chart.panels[1].well, "A2");
        assert_eq!(chart.panels[1].series[1].counts, [5]);
    }

    #[test]
    fn test_by_well_payload_uses_independent_grid() {
        let payload: ChartWithHelp = SiteCountsByWellChart::new(&aggregate(), &styles()).into();
        assert_eq!(payload.plot.layout["grid"]["rows"], 2);
        assert_eq!(payload.plot.layout["grid"]["columns"], 2);
        assert_eq!(payload.plot.layout["grid"]["pattern"], "independent");
        // Two wells x two categories = four traces; the second well's traces
        // are anchored on the second axis pair and hidden from the legend.
        assert_eq!(payload.plot.data.len(), 4);
        assert_eq!(payload.plot.data[2]["xaxis"], "x2");
        assert_eq!(payload.plot.data[2]["showlegend"], false);
        assert_eq!(payload.plot.data[0]["showlegend"], true);
    }
}
