//! Concatenation of the per-site cell-count tables and derivation of the
//! category, site, and well orderings the charts are drawn in.

use crate::load::CellCountRecord;
use anyhow::{Context, Result};
use itertools::Itertools;
use pcp_types::{CategoryOrder, SiteId};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::io::Write;

/// One aggregated row: a per-site, per-category cell count with the
/// Plate/Well/Site fields derived from the site identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedRow {
    pub site: SiteId,
    pub cell_quality: String,
    pub cell_count: i64,
}

/// All per-site cell-count tables concatenated, with three explicit
/// orderings derived once at construction:
///
/// * categories follow the caller-supplied display order (labels absent from
///   that order sort after every ordered label),
/// * sites are ranked by total cell count descending, ties kept in first
///   appearance order,
/// * wells inherit the order of the first ranked site they appear in.
#[derive(Debug, Clone)]
pub struct AggregatedCellCounts {
    rows: Vec<AggregatedRow>,
    category_order: CategoryOrder,
    site_order: Vec<SiteId>,
    well_order: Vec<String>,
}

impl AggregatedCellCounts {
    /// Concatenate the per-site tables (order-preserving, no deduplication)
    /// and derive the orderings. A site identifier that does not split into
    /// exactly Plate-Well-Site is fatal.
    pub fn from_site_tables(
        tables: impl IntoIterator<Item = Vec<CellCountRecord>>,
        category_order: CategoryOrder,
    ) -> Result<AggregatedCellCounts> {
        let mut rows = Vec::new();
        for record in tables.into_iter().flatten() {
            let site: SiteId = record
                .site
                .parse()
                .with_context(|| format!("deriving Plate/Well/Site for '{}'", record.site))?;
            rows.push(AggregatedRow {
                site,
                cell_quality: record.cell_quality,
                cell_count: record.cell_count,
            });
        }

        // Total per site in first-appearance order, then a stable descending
        // sort, so tied sites keep their appearance order.
        let mut totals: Vec<(SiteId, i64)> = Vec::new();
        for row in &rows {
            match totals.iter_mut().find(|(site, _)| *site == row.site) {
                Some((_, total)) => *total += row.cell_count,
                None => totals.push((row.site.clone(), row.cell_count)),
            }
        }
        totals.sort_by_key(|&(_, total)| Reverse(total));
        let site_order: Vec<SiteId> = totals.into_iter().map(|(site, _)| site).collect();

        let well_order: Vec<String> = site_order
            .iter()
            .map(|site| site.well.clone())
            .unique()
            .collect();

        Ok(AggregatedCellCounts {
            rows,
            category_order,
            site_order,
            well_order,
        })
    }

    /// Rows in concatenation order.
    pub fn rows(&self) -> &[AggregatedRow] {
        &self.rows
    }

    pub fn category_order(&self) -> &CategoryOrder {
        &self.category_order
    }

    /// Sites ranked by descending total cell count.
    pub fn site_order(&self) -> &[SiteId] {
        &self.site_order
    }

    /// Wells in the order of the first ranked site they appear in.
    pub fn well_order(&self) -> &[String] {
        &self.well_order
    }

    /// Rank of a site in the site ordering.
    pub fn site_rank(&self, site: &SiteId) -> Option<usize> {
        self.site_order.iter().position(|s| s == site)
    }

    /// Sum of `cell_count` over every row.
    pub fn grand_total(&self) -> i64 {
        self.rows.iter().map(|row| row.cell_count).sum()
    }

    /// Total per (site, category label), for per-site stacked charts.
    pub fn site_quality_totals(&self) -> HashMap<(&SiteId, &str), i64> {
        let mut totals = HashMap::new();
        for row in &self.rows {
            *totals
                .entry((&row.site, row.cell_quality.as_str()))
                .or_insert(0) += row.cell_count;
        }
        totals
    }

    /// Rows sorted by (site rank, category order), the order the full table
    /// is reported in.
    pub fn sorted_rows(&self) -> Vec<&AggregatedRow> {
        self.rows
            .iter()
            .sorted_by_key(|row| {
                (
                    self.site_rank(&row.site),
                    self.category_order.sort_key(&row.cell_quality),
                )
            })
            .collect()
    }

    /// Write the aggregated table as TSV with the derived Plate/Well/Site
    /// columns appended.
    pub fn write_tsv(&self, writer: impl Write) -> Result<()> {
        #[derive(Serialize)]
        struct TsvRow<'a> {
            site: String,
            #[serde(rename = "Cell_Quality")]
            cell_quality: &'a str,
            cell_count: i64,
            #[serde(rename = "Plate")]
            plate: &'a str,
            #[serde(rename = "Well")]
            well: &'a str,
            #[serde(rename = "Site")]
            site_field: &'a str,
        }

        let mut tsv = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
        for row in &self.rows {
            tsv.serialize(TsvRow {
                site: row.site.to_string(),
                cell_quality: &row.cell_quality,
                cell_count: row.cell_count,
                plate: &row.site.plate,
                well: &row.site.well,
                site_field: &row.site.site,
            })
            .context("writing aggregated cell counts")?;
        }
        tsv.flush().context("flushing aggregated cell counts")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(site: &str, quality: &str, count: i64) -> CellCountRecord {
        CellCountRecord {
            site: site.to_string(),
            cell_quality: quality.to_string(),
            cell_count: count,
        }
    }

    fn order() -> CategoryOrder {
        CategoryOrder::new(
            ["Perfect", "Great", "Imperfect", "Bad", "Empty"]
                .map(String::from)
                .to_vec(),
        )
    }

    fn two_site_tables() -> Vec<Vec<CellCountRecord>> {
        vec![
            vec![
                record("P1-A2-1", "Perfect", 5),
                record("P1-A2-1", "Empty", 5),
            ],
            vec![
                record("P1-A1-1", "Perfect", 10),
                record("P1-A1-1", "Empty", 2),
            ],
        ]
    }

    #[test]
    fn test_site_ranked_by_descending_total() {
        // P1-A1-1 totals 12, P1-A2-1 totals 10; 12 > 10 places A1 first
        // even though A2 was appended first.
        let agg = AggregatedCellCounts::from_site_tables(two_site_tables(), order()).unwrap();
        assert_eq!(agg.grand_total(), 22);
        let ranked: Vec<String> = agg.site_order().iter().map(ToString::to_string).collect();
        assert_eq!(ranked, ["P1-A1-1", "P1-A2-1"]);
        assert_eq!(agg.well_order(), ["A1", "A2"]);
    }

    #[test]
    fn test_ties_keep_appearance_order() {
        let tables = vec![
            vec![record("P1-B1-2", "Perfect", 4)],
            vec![record("P1-B1-1", "Perfect", 9)],
            vec![record("P1-B2-1", "Perfect", 4)],
            vec![record("P1-B3-1", "Perfect", 0)],
        ];
        let agg = AggregatedCellCounts::from_site_tables(tables, order()).unwrap();
        let ranked: Vec<String> = agg.site_order().iter().map(ToString::to_string).collect();
        // 9 first, the two 4s in appearance order, the zero-count site last.
        assert_eq!(ranked, ["P1-B1-1", "P1-B1-2", "P1-B2-1", "P1-B3-1"]);
        assert_eq!(agg.well_order(), ["B1", "B2", "B3"]);
    }

    #[test]
    fn test_duplicate_site_tables_are_appended_not_merged() {
        let tables = vec![
            vec![record("P1-A1-1", "Perfect", 3)],
            vec![record("P1-A1-1", "Perfect", 4)],
        ];
        let agg = AggregatedCellCounts::from_site_tables(tables, order()).unwrap();
        assert_eq!(agg.rows().len(), 2);
        assert_eq!(agg.grand_total(), 7);
        assert_eq!(agg.site_order().len(), 1);
    }

    #[test]
    fn test_malformed_site_identifier_is_fatal() {
        let tables = vec![vec![record("P1-A1", "Perfect", 3)]];
        let err = AggregatedCellCounts::from_site_tables(tables, order()).unwrap_err();
        assert!(err.to_string().contains("P1-A1"), "unexpected error: {err:#}");
    }

    #[test]
    fn test_sorted_rows_follow_category_order() {
        let tables = vec![vec![
            record("P1-A1-1", "Empty", 1),
            record("P1-A1-1", "Perfect", 1),
            record("P1-A1-1", "Bad", 1),
        ]];
        let agg = AggregatedCellCounts::from_site_tables(tables, order()).unwrap();
        let qualities: Vec<&str> = agg
            .sorted_rows()
            .iter()
            .map(|row| row.cell_quality.as_str())
            .collect();
        assert_eq!(qualities, ["Perfect", "Bad", "Empty"]);
    }

    #[test]
    fn test_unknown_category_sorts_after_ordered_ones() {
        let tables = vec![vec![
            record("P1-A1-1", "Uncategorized", 1),
            record("P1-A1-1", "Empty", 1),
            record("P1-A1-1", "Perfect", 1),
        ]];
        let agg = AggregatedCellCounts::from_site_tables(tables, order()).unwrap();
        let qualities: Vec<&str> = agg
            .sorted_rows()
            .iter()
            .map(|row| row.cell_quality.as_str())
            .collect();
        assert_eq!(qualities, ["Perfect", "Empty", "Uncategorized"]);
    }

    #[test]
    fn test_write_tsv_round_trips_site_fields() {
        let agg = AggregatedCellCounts::from_site_tables(two_site_tables(), order()).unwrap();
        let mut buf = Vec::new();
        agg.write_tsv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "site\tCell_Quality\tcell_count\tPlate\tWell\tSite"
        );
        assert_eq!(lines.next().unwrap(), "P1-A2-1\tPerfect\t5\tP1\tA2\t1");
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_empty_input_yields_empty_aggregate() {
        let agg = AggregatedCellCounts::from_site_tables(Vec::new(), order()).unwrap();
        assert!(agg.rows().is_empty());
        assert!(agg.site_order().is_empty());
        assert!(agg.well_order().is_empty());
        assert_eq!(agg.grand_total(), 0);
    }
}
