// Column header labels for label-mapped (gviz) payloads

use std::collections::BTreeMap;

use aidir_engine::Field;

/// Maps sheet column labels to record fields.
///
/// Starts from each field's default label; settings can override individual
/// fields when the sheet's headers differ. Labels compare exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLabels {
    overrides: BTreeMap<Field, String>,
}

impl ColumnLabels {
    pub fn from_overrides(overrides: BTreeMap<Field, String>) -> Self {
        Self { overrides }
    }

    pub fn with_override(mut self, field: Field, label: impl Into<String>) -> Self {
        self.overrides.insert(field, label.into());
        self
    }

    /// The label expected for `field`.
    pub fn label(&self, field: Field) -> &str {
        self.overrides
            .get(&field)
            .map(String::as_str)
            .unwrap_or_else(|| field.label())
    }

    /// The field a column label maps to, if any. When two fields share a
    /// label the earlier column position wins.
    pub fn field_for(&self, label: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|&f| self.label(f) == label)
    }
}
