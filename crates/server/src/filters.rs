//! Custom Askama template filters.

use std::fmt::Display;

use bakeledger_core::report::LABEL_WIDTH;

/// Left-aligns a label in the printed cost breakdown column.
///
/// Labels longer than the column are kept whole.
///
/// Usage in templates: `{{ cost.label|label_column }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn label_column(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("{:<width$}", value.to_string(), width = LABEL_WIDTH))
}
