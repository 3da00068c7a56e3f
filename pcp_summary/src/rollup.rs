//! Grouped-sum roll-up tables: total cell count per quality category, and
//! per (quality category, well). Pure derived views, recomputed each run;
//! combinations with no rows are simply absent, never zero-filled.

use crate::aggregate::AggregatedCellCounts;
use itertools::Itertools;

/// Total cell count per quality category, in category display order (labels
/// outside the display order come last, in first-appearance order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityRollup {
    entries: Vec<(String, i64)>,
}

impl QualityRollup {
    pub fn new(aggregated: &AggregatedCellCounts) -> QualityRollup {
        let order = aggregated.category_order();
        let mut entries: Vec<(String, i64)> = Vec::new();
        for row in aggregated.rows() {
            match entries.iter_mut().find(|(label, _)| *label == row.cell_quality) {
                Some((_, total)) => *total += row.cell_count,
                None => entries.push((row.cell_quality.clone(), row.cell_count)),
            }
        }
        entries.sort_by_key(|(label, _)| order.sort_key(label));
        QualityRollup { entries }
    }

    /// (label, total) in category order.
    pub fn entries(&self) -> &[(String, i64)] {
        &self.entries
    }

    pub fn total_of(&self, label: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|&(_, total)| total)
    }

    /// Sum across all categories.
    pub fn total(&self) -> i64 {
        self.entries.iter().map(|&(_, total)| total).sum()
    }
}

/// Total cell count per (quality category, well), ordered by (category
/// order, well order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellRollup {
    entries: Vec<(String, String, i64)>,
}

impl WellRollup {
    pub fn new(aggregated: &AggregatedCellCounts) -> WellRollup {
        let order = aggregated.category_order();
        let well_order = aggregated.well_order();
        let mut entries: Vec<(String, String, i64)> = Vec::new();
        for row in aggregated.rows() {
            let well = &row.site.well;
            match entries
                .iter_mut()
                .find(|(label, w, _)| label == &row.cell_quality && w == well)
            {
                Some((_, _, total)) => *total += row.cell_count,
                None => entries.push((row.cell_quality.clone(), well.clone(), row.cell_count)),
            }
        }
        entries.sort_by_key(|(label, well, _)| {
            (
                order.sort_key(label),
                well_order.iter().position(|w| w == well),
            )
        });
        WellRollup { entries }
    }

    /// (label, well, total) in (category order, well order).
    pub fn entries(&self) -> &[(String, String, i64)] {
        &self.entries
    }

    /// Total per well, in well order.
    pub fn well_totals(&self) -> Vec<(String, i64)> {
        let wells: Vec<&str> = self
            .entries
            .iter()
            .map(|(_, well, _)| well.as_str())
            .unique()
            .collect();
        let mut totals: Vec<(String, i64)> = wells
            .into_iter()
            .map(|well| (well.to_string(), 0))
            .collect();
        for (_, well, count) in &self.entries {
            if let Some((_, total)) = totals.iter_mut().find(|(w, _)| w == well) {
                *total += count;
            }
        }
        totals
    }

    /// Sum across all (category, well) pairs.
    pub fn total(&self) -> i64 {
        self.entries.iter().map(|&(_, _, total)| total).sum()
    }
}
