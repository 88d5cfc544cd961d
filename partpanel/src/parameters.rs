//! Parameter collection
//!
//! Parameters are ordered by template name, then id, and truncated to the
//! configured limit after ordering.

use crate::config::ParameterLimit;
use crate::fallback::{first_non_empty, non_empty};
use crate::model::{ParameterRow, PartId};
use crate::payload::ParameterDescriptor;
use crate::store::{self, PartStore};

/// Explicit name, then the template's name, then `Parameter {id}`.
pub fn resolve_name(row: &ParameterRow) -> String {
    first_non_empty([
        row.parameter.name.as_deref(),
        row.template.as_ref().map(|t| t.name.as_str()),
    ])
    .map(str::to_string)
    .unwrap_or_else(|| format!("Parameter {}", row.parameter.id))
}

/// Explicit units, then the template's default units.
pub fn resolve_units(row: &ParameterRow) -> Option<String> {
    first_non_empty([
        row.parameter.units.as_deref(),
        row.template.as_ref().and_then(|t| non_empty(t.units.as_deref())),
    ])
    .map(str::to_string)
}

impl From<&ParameterRow> for ParameterDescriptor {
    fn from(row: &ParameterRow) -> Self {
        Self {
            id: row.parameter.id,
            name: resolve_name(row),
            value: row.parameter.value.clone(),
            units: resolve_units(row),
        }
    }
}

pub struct ParameterCollector<'a> {
    store: &'a dyn PartStore,
}

impl<'a> ParameterCollector<'a> {
    pub fn new(store: &'a dyn PartStore) -> Self {
        Self { store }
    }

    /// Ordered, bounded parameters of `part`. A store failure yields an empty list.
    pub fn collect(&self, part: PartId, limit: ParameterLimit) -> Vec<ParameterDescriptor> {
        match self.try_collect(part, limit) {
            Ok(parameters) => parameters,
            Err(e) => {
                tracing::warn!("Failed to load parameters for part {}: {}", part, e);
                Vec::new()
            }
        }
    }

    pub fn try_collect(
        &self,
        part: PartId,
        limit: ParameterLimit,
    ) -> store::Result<Vec<ParameterDescriptor>> {
        let mut rows = self.store.parameters(part)?;
        rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        limit.apply(&mut rows);

        Ok(rows.iter().map(ParameterDescriptor::from).collect())
    }
}
