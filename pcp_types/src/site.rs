//! Site identifiers of the form `Plate-Well-Site`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Error produced when a site identifier does not have the expected shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SiteIdError {
    /// The identifier did not split into exactly three `-`-delimited fields.
    #[error(
        "invalid site identifier '{0}': expected exactly 3 '-'-delimited fields (Plate-Well-Site)"
    )]
    FieldCount(String),
    /// One of the three fields was empty.
    #[error("invalid site identifier '{0}': empty Plate, Well, or Site field")]
    EmptyField(String),
}

/// One imaged field, identified by plate, well, and site number.
///
/// The wire form is the hyphen-delimited string used by the upstream imaging
/// pipeline, e.g. `CP151A1-A1-9`. Parsing enforces the exactly-3-field shape;
/// anything else is a data-quality error with no recovery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SiteId {
    pub plate: String,
    pub well: String,
    pub site: String,
}

impl SiteId {
    pub fn new(plate: impl ToString, well: impl ToString, site: impl ToString) -> Self {
        SiteId {
            plate: plate.to_string(),
            well: well.to_string(),
            site: site.to_string(),
        }
    }
}

impl FromStr for SiteId {
    type Err = SiteIdError;

    fn from_str(s: &str) -> Result<SiteId, SiteIdError> {
        let fields: Vec<&str> = s.split('-').collect();
        let [plate, well, site] = &fields[..] else {
            return Err(SiteIdError::FieldCount(s.to_string()));
        };
        if plate.is_empty() || well.is_empty() || site.is_empty() {
            return Err(SiteIdError::EmptyField(s.to_string()));
        }
        Ok(SiteId::new(plate, well, site))
    }
}

impl Display for SiteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.plate, self.well, self.site)
    }
}

impl TryFrom<String> for SiteId {
    type Error = SiteIdError;

    fn try_from(s: String) -> Result<SiteId, SiteIdError> {
        s.parse()
    }
}

impl From<SiteId> for String {
    fn from(id: SiteId) -> String {
        id.to_string()
    }
}
