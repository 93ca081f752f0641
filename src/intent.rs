//! Intent classification over a closed category set
//!
//! The classifier is a generative model, so its output is untrusted text:
//! labels are normalized (trim + lowercase) and anything outside the known
//! set maps to [`Intent::Other`] rather than being passed through raw.

use serde::{Deserialize, Serialize};

/// Closed intent label used to route document retrieval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Financial assistance programs, vouchers, payouts
    FinancialAid,
    /// Healthcare services, dementia care, teleconsultation
    Healthcare,
    /// Food banks, budget meals, grocery assistance
    FoodSecurity,
    /// Anything else; retrieval yields no context
    #[default]
    Other,
}

impl Intent {
    /// Canonical label string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FinancialAid => "financial_aid",
            Self::Healthcare => "healthcare",
            Self::FoodSecurity => "food_security",
            Self::Other => "other",
        }
    }

    /// Parse a classifier label, normalizing whitespace and case
    ///
    /// Unrecognized labels (including misspellings) become `Other`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "financial_aid" => Self::FinancialAid,
            "healthcare" => Self::Healthcare,
            "food_security" => Self::FoodSecurity,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
