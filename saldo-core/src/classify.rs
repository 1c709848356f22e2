//! Category-type classification for savings-domain transactions.

use serde::{Deserialize, Serialize};

use crate::model::CategoryKind;

/// Recognized category-type tags. Each kind carries a canonical label plus
/// aliases, so localized exports (e.g. Italian sheet tags) classify without
/// a rewrite pass over the data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeLabels {
    /// Tags that mean "money set aside and usable"
    pub savings: Vec<String>,
    /// Tags that mean "money earmarked/reserved"
    pub allocation: Vec<String>,
}

impl Default for TypeLabels {
    fn default() -> Self {
        Self {
            savings: vec!["Savings".to_string(), "Risparmio".to_string()],
            allocation: vec!["Allocation".to_string(), "Accantonamento".to_string()],
        }
    }
}

impl TypeLabels {
    /// Classify a raw category-type tag.
    ///
    /// Pure function of the tag and this table: exact match on the trimmed
    /// tag, no hidden state. Unrecognized tags map to `Other` without error;
    /// an `Other` outflow still counts as spending in the global metrics.
    pub fn classify(&self, tag: &str) -> CategoryKind {
        let tag = tag.trim();
        if self.savings.iter().any(|label| label == tag) {
            CategoryKind::Savings
        } else if self.allocation.iter().any(|label| label == tag) {
            CategoryKind::Allocation
        } else {
            CategoryKind::Other
        }
    }
}
