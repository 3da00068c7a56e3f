//! Roll-up charts: total cell count per quality category, and per well
//! faceted by quality category.

use crate::rollup::{QualityRollup, WellRollup};
use crate::websummary::{CategoryStyle, ChartWithHelp, PlotlyChart, TitleWithHelp};
use plotly::common::Marker;
use plotly::layout::{Axis, AxisType, BarMode, GridPattern, LayoutGrid};
use plotly::{Bar, Layout};
use thousands::Separable;

const TOTAL_COUNTS_HELP_TEXT: &str = "The plot shows the total number of detected cells in each \
cell quality category, summed over every site in the batch. The title reports the grand total \
across all categories.";

const TOTAL_COUNTS_BY_WELL_HELP_TEXT: &str = "The plot shows the total number of detected cells \
in each well, with one panel per cell quality category. The title reports each well's total \
across all categories.";

const Y_LABEL: &str = "Cell Count";

/// Total cell count per quality category (one aggregate bar per category),
/// titled with the grand total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalCountsChart {
    /// (style, total) per category present in the roll-up, in display order.
    pub entries: Vec<(CategoryStyle, i64)>,
    pub grand_total: i64,
}

impl TotalCountsChart {
    pub fn new(rollup: &QualityRollup, styles: &[CategoryStyle]) -> TotalCountsChart {
        let entries = styles
            .iter()
            .filter_map(|style| {
                rollup
                    .total_of(&style.label)
                    .map(|total| (style.clone(), total))
            })
            .collect();
        TotalCountsChart {
            entries,
            grand_total: rollup.total(),
        }
    }

    /// Title line reporting the grand total, e.g. `1,052,273 Total Cells`.
    pub fn title(&self) -> String {
        format!("{} Total Cells", self.grand_total.separate_with_commas())
    }
}

impl From<TotalCountsChart> for ChartWithHelp {
    fn from(chart: TotalCountsChart) -> ChartWithHelp {
        let title = chart.title();
        let layout = Layout::new()
            .title(title.clone())
            .show_legend(true)
            .x_axis(Axis::new().type_(AxisType::Category).title(""))
            .y_axis(Axis::new().title(Y_LABEL));

        let data = chart
            .entries
            .into_iter()
            .map(|(style, total)| {
                Bar::new(vec![style.label.clone()], vec![total])
                    .name(style.label)
                    .marker(Marker::new().color(style.color))
            })
            .collect();

        ChartWithHelp {
            plot: PlotlyChart::with_layout_and_data(layout, data),
            help: TitleWithHelp {
                title,
                help: TOTAL_COUNTS_HELP_TEXT.to_string(),
            },
        }
    }
}

/// One quality category's panel in the by-well totals chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPanel {
    pub style: CategoryStyle,
    /// (well, total) in well order; wells with no rows for this category are
    /// absent.
    pub totals: Vec<(String, i64)>,
}

/// Total cell count by Well, faceted by quality category, titled with each
/// well's subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalCountsByWellChart {
    pub panels: Vec<CategoryPanel>,
    /// (well, total across categories) in well order, for the title text.
    pub well_totals: Vec<(String, i64)>,
}

impl TotalCountsByWellChart {
    pub fn new(rollup: &WellRollup, styles: &[CategoryStyle]) -> TotalCountsByWellChart {
        let panels = styles
            .iter()
            .filter_map(|style| {
                let totals: Vec<(String, i64)> = rollup
                    .entries()
                    .iter()
                    .filter(|(label, _, _)| label == &style.label)
                    .map(|(_, well, total)| (well.clone(), *total))
                    .collect();
                if totals.is_empty() {
                    None
                } else {
                    Some(CategoryPanel {
                        style: style.clone(),
                        totals,
                    })
                }
            })
            .collect();
        TotalCountsByWellChart {
            panels,
            well_totals: rollup.well_totals(),
        }
    }

    /// One title line per well, e.g. `523,004 A1 Total Cells`.
    pub fn title(&self) -> String {
        self.well_totals
            .iter()
            .map(|(well, total)| format!("{} {well} Total Cells", total.separate_with_commas()))
            .collect::<Vec<_>>()
            .join("<br>")
    }
}

impl From<TotalCountsByWellChart> for ChartWithHelp {
    fn from(chart: TotalCountsByWellChart) -> ChartWithHelp {
        let title = chart.title();
        let rows = chart.panels.len().div_ceil(2).max(1);
        let mut layout = Layout::new()
            .title(title.clone())
            .bar_mode(BarMode::Stack)
            .show_legend(true)
            .grid(
                LayoutGrid::new()
                    .rows(rows)
                    .columns(2)
                    .pattern(GridPattern::Independent),
            );
        for (i, panel) in chart.panels.iter().enumerate() {
            let axis = Axis::new()
                .type_(AxisType::Category)
                .title(panel.style.label.clone());
            layout = match i {
                0 => layout.x_axis(axis).y_axis(Axis::new().title(Y_LABEL)),
                1 => layout.x_axis2(axis),
                2 => layout.x_axis3(axis).y_axis3(Axis::new().title(Y_LABEL)),
                3 => layout.x_axis4(axis),
                4 => layout.x_axis5(axis),
                5 => layout.x_axis6(axis),
                _ => layout,
            };
        }

        let mut data = Vec::new();
        for (i, panel) in chart.panels.into_iter().enumerate() {
            let (wells, totals): (Vec<String>, Vec<i64>) = panel.totals.into_iter().unzip();
            let mut bar = Bar::new(wells, totals)
                .name(panel.style.label)
                .marker(Marker::new().color(panel.style.color));
            if i > 0 {
                bar = bar
                    .x_axis(format!("x{}", i + 1))
                    .y_axis(format!("y{}", i + 1));
            }
            data.push(bar);
        }

        ChartWithHelp {
            plot: PlotlyChart::with_layout_and_data(layout, data),
            help: TitleWithHelp {
                title,
                help: TOTAL_COUNTS_BY_WELL_HELP_TEXT.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregatedCellCounts;
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
            ("Great".to_string(), "#2ca02c".to_string()),
            ("Empty".to_string(), "#7f7f7f".to_string()),
        ])
    }

    fn aggregate() -> AggregatedCellCounts {
        AggregatedCellCounts::from_site_tables(
            vec![
                vec![
                    record("P1-A1-1", "Perfect", 10),
                    record("P1-A1-1", "Empty", 2),
                ],
                vec![
                    record("P1-A2-1", "Perfect", 5),
                    record("P1-A2-1", "Empty", 5),
                ],
            ],
            CategoryOrder::new(["Perfect", "Great", "Empty"].map(String::from).to_vec()),
        )
        .unwrap()
    }

    #[test]
    fn test_total_counts_title_and_entries() {
        let chart = TotalCountsChart::new(&QualityRollup::new(&aggregate()), &styles());
        assert_eq!(chart.title(), "22 Total Cells");
        // Great has no rows anywhere and is absent, not zero-filled.
        let labels: Vec<&str> = chart
            .entries
            .iter()
            .map(|(style, _)| style.label.as_str())
            .collect();
        assert_eq!(labels, ["Perfect", "Empty"]);
        assert_eq!(chart.entries[0].1, 15);
        assert_eq!(chart.entries[1].1, 7);
    }

    #[test]
    fn test_total_counts_payload() {
        let payload: ChartWithHelp =
            TotalCountsChart::new(&QualityRollup::new(&aggregate()), &styles()).into();
        assert_eq!(payload.plot.data.len(), 2);
        assert_eq!(payload.plot.data[0]["x"][0], "Perfect");
        assert_eq!(payload.plot.data[0]["y"][0], 15);
        assert_eq!(payload.plot.data[1]["marker"]["color"], "#7f7f7f");
        assert_eq!(payload.help.title, "22 Total Cells");
    }

    #[test]
    fn test_by_well_title_lists_every_well() {
        let chart = TotalCountsByWellChart::new(&WellRollup::new(&aggregate()), &styles());
        assert_eq!(chart.title(), "12 A1 Total Cells<br>10 A2 Total Cells");
    }

    #[test]
    fn test_by_well_panels_per_category() {
        let chart = TotalCountsByWellChart::new(&WellRollup::new(&aggregate()), &styles());
        assert_eq!(chart.panels.len(), 2);
        assert_eq!(chart.panels[0].style.label, "Perfect");
        assert_eq!(
            chart.panels[0].totals,
            [("A1".to_string(), 10), ("A2".to_string(), 5)]
        );
        assert_eq!(
            chart.panels[1].totals,
            [("A1".to_string(), 2), ("A2".to_string(), 5)]
        );
    }

    #[test]
    fn test_by_well_payload_axes() {
        let payload: ChartWithHelp =
            TotalCountsByWellChart::new(&WellRollup::new(&aggregate()), &styles()).into();
        assert_eq!(payload.plot.data.len(), 2);
        assert_eq!(payload.plot.data[1]["xaxis"], "x2");
        assert_eq!(payload.plot.layout["grid"]["pattern"], "independent");
    }
}
