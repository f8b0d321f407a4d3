//! Pipeline policy configuration.
//!
//! Two row-handling policies coexist in the upstream feeds and are kept as
//! distinct named values rather than merged. Defaults match the feeds they
//! came from: the PO-tracker feed filters unbilled noise rows before
//! grouping, the annual budget sheet keeps every row and trusts its
//! explicit total rows.

use serde::Deserialize;

use crate::error::ParseError;

/// Row admission applied before tracker grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowFilter {
    /// Drop rows with no PO, or with zero payable and zero billable.
    BilledWithPo,
    /// Admit every mapped row.
    KeepAll,
}

/// Source of truth for campaign-level budget figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalsPolicy {
    /// An explicit "Total" sentinel row overwrites the running aggregate.
    TotalRowWins,
    /// Total rows are ignored; campaign figures stay the running sum.
    SumChannels,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TrackerPolicy {
    #[serde(default = "default_row_filter")]
    pub row_filter: RowFilter,
}

impl Default for TrackerPolicy {
    fn default() -> Self {
        Self {
            row_filter: RowFilter::BilledWithPo,
        }
    }
}

fn default_row_filter() -> RowFilter {
    RowFilter::BilledWithPo
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BudgetPolicy {
    #[serde(default = "default_totals")]
    pub totals: TotalsPolicy,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            totals: TotalsPolicy::TotalRowWins,
        }
    }
}

fn default_totals() -> TotalsPolicy {
    TotalsPolicy::TotalRowWins
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub tracker: TrackerPolicy,
    #[serde(default)]
    pub budget: BudgetPolicy,
}

impl PipelineConfig {
    pub fn from_toml(text: &str) -> Result<Self, ParseError> {
        toml::from_str(text).map_err(|e| ParseError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_source_pipelines() {
        let config = PipelineConfig::default();
        assert_eq!(config.tracker.row_filter, RowFilter::BilledWithPo);
        assert_eq!(config.budget.totals, TotalsPolicy::TotalRowWins);
    }

    #[test]
    fn from_toml_overrides() {
        let config = PipelineConfig::from_toml(
            r#"
[tracker]
row_filter = "keep_all"

[budget]
totals = "sum_channels"
"#,
        )
        .unwrap();
        assert_eq!(config.tracker.row_filter, RowFilter::KeepAll);
        assert_eq!(config.budget.totals, TotalsPolicy::SumChannels);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = PipelineConfig::from_toml("").unwrap();
        assert_eq!(config.tracker.row_filter, RowFilter::BilledWithPo);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = PipelineConfig::from_toml("[tracker]\nrow_filter = \"everything\"").unwrap_err();
        assert!(matches!(err, ParseError::Config(_)));
    }
}
