//! Cell-quality categories and their orderings.
//!
//! A [`QualityScheme`] names the categorization function the upstream
//! spot/cell merge ran with; it defines an ordered set of category labels
//! with contiguous numeric ids starting at 1. The synthetic `Empty` category
//! (sites or cells with no assignable class) is always appended one past the
//! last defined id.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Label of the synthetic category for unassigned cells/sites.
pub const EMPTY_CATEGORY: &str = "Empty";

/// The cell-quality categorization function used upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QualityScheme {
    Simple,
    SimplePlus,
}

impl QualityScheme {
    /// Category labels in quality order, best first, excluding `Empty`.
    fn category_labels(self) -> &'static [&'static str] {
        match self {
            QualityScheme::Simple => &["Perfect", "Great", "Imperfect", "Bad"],
            QualityScheme::SimplePlus => {
                &["Perfect", "Great", "Imperfect-High", "Imperfect-Low", "Bad"]
            }
        }
    }
}

/// Ordered mapping of numeric category id to category label.
///
/// Ids are contiguous starting at 1; the `Empty` id is always exactly one
/// past the last defined category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCategoryMap {
    labels: Vec<String>,
}

impl CellCategoryMap {
    /// Build the category map for `scheme`, with `Empty` appended.
    pub fn from_scheme(scheme: QualityScheme) -> Self {
        let labels = scheme
            .category_labels()
            .iter()
            .map(ToString::to_string)
            .chain([EMPTY_CATEGORY.to_string()])
            .collect();
        CellCategoryMap { labels }
    }

    /// Number of categories, `Empty` included.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The id of the synthetic `Empty` category.
    pub fn empty_id(&self) -> u8 {
        self.labels.len() as u8
    }

    /// Label for a 1-based category id.
    pub fn label_of(&self, id: u8) -> Option<&str> {
        if id == 0 {
            return None;
        }
        self.labels.get(id as usize - 1).map(String::as_str)
    }

    /// 1-based id for a category label.
    pub fn id_of(&self, label: &str) -> Option<u8> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| i as u8 + 1)
    }

    /// Labels in id order (1..).
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

/// An explicit display/sort order over category labels.
///
/// This replaces runtime categorical tagging with a plain sort key: a label's
/// key is its position in the supplied order, and labels absent from the
/// order sort after every ordered label (they are "missing" categories, kept
/// in the data but never ranked above a known one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOrder {
    order: Vec<String>,
}

impl CategoryOrder {
    pub fn new(order: Vec<String>) -> Self {
        CategoryOrder { order }
    }

    /// Sort key for `label`: its position in the order, or one past the end
    /// for labels not present in the order.
    pub fn sort_key(&self, label: &str) -> usize {
        self.order
            .iter()
            .position(|l| l == label)
            .unwrap_or(self.order.len())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.order.iter().any(|l| l == label)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Labels in display order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Sort `labels` by this order, unknown labels last, ties by first
    /// appearance (stable).
    pub fn sorted<'a>(&self, labels: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        labels
            .into_iter()
            .sorted_by_key(|label| self.sort_key(label))
            .collect()
    }
}
