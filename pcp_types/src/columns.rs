//! Metadata column naming.
//!
//! The per-cell metadata tables carry foci attributes under a fixed
//! `Metadata_Foci_` prefix, with `_count`/`_mean` suffixes for the spot-score
//! aggregates. Names are derived here as pure functions and validated against
//! the actual table header at load time, never assumed.

/// Prefix applied to every foci-derived metadata column.
pub const FOCI_PREFIX: &str = "Metadata_Foci_";

/// The cell classification column present in every metadata table.
pub const CELL_CLASS_COL: &str = "Cell_Class";

/// `base` -> `Metadata_Foci_<base>`
pub fn foci_column(base: &str) -> String {
    format!("{FOCI_PREFIX}{base}")
}

/// `base` -> `Metadata_Foci_<base>_count`
pub fn spot_count_column(base: &str) -> String {
    format!("{FOCI_PREFIX}{base}_count")
}

/// `base` -> `Metadata_Foci_<base>_mean`
pub fn spot_mean_column(base: &str) -> String {
    format!("{FOCI_PREFIX}{base}_mean")
}

/// The fixed, ordered metadata projection: cell class, cell identity columns,
/// barcode columns, gene columns, spot-score count then mean columns, the
/// cell-quality label column, and the foci-site column.
pub fn metadata_projection(
    cell_cols: &[String],
    barcode_cols: &[String],
    gene_cols: &[String],
    spot_score_cols: &[String],
    cell_quality_col: &str,
    foci_site_col: &str,
) -> Vec<String> {
    let mut columns = vec![CELL_CLASS_COL.to_string()];
    columns.extend(cell_cols.iter().cloned());
    columns.extend(barcode_cols.iter().map(|c| foci_column(c)));
    columns.extend(gene_cols.iter().map(|c| foci_column(c)));
    columns.extend(spot_score_cols.iter().map(|c| spot_count_column(c)));
    columns.extend(spot_score_cols.iter().map(|c| spot_mean_column(c)));
    columns.push(cell_quality_col.to_string());
    columns.push(foci_site_col.to_string());
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_name_derivation() {
        assert_eq!(foci_column("Barcode_MatchedTo_Barcode"), "Metadata_Foci_Barcode_MatchedTo_Barcode");
        assert_eq!(spot_count_column("mean_lstsq"), "Metadata_Foci_mean_lstsq_count");
        assert_eq!(spot_mean_column("mean_lstsq"), "Metadata_Foci_mean_lstsq_mean");
    }

    #[test]
    fn test_projection_order() {
        let cols = metadata_projection(
            &["Metadata_Cells_ObjectNumber".to_string()],
            &["Barcode_MatchedTo_Barcode".to_string()],
            &["Barcode_MatchedTo_GeneCode".to_string()],
            &["mean_lstsq".to_string()],
            "Metadata_Foci_Cell_Quality",
            "Metadata_Foci_site",
        );
        assert_eq!(
            cols,
            [
                "Cell_Class",
                "Metadata_Cells_ObjectNumber",
                "Metadata_Foci_Barcode_MatchedTo_Barcode",
                "Metadata_Foci_Barcode_MatchedTo_GeneCode",
                "Metadata_Foci_mean_lstsq_count",
                "Metadata_Foci_mean_lstsq_mean",
                "Metadata_Foci_Cell_Quality",
                "Metadata_Foci_site",
            ]
        );
    }
}
