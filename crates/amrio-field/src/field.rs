//! A timestep's named field arrays.

use amrio_core::Named;
use amrio_geometry::{BlockShape, GuardPlan};
use indexmap::IndexMap;
use ndarray::Array4;
use tracing::debug;

use crate::array::FieldArray;
use crate::error::FieldError;
use crate::guard::apply_guard_plan;

/// Field name → array for one timestep, in decoded order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldData {
    fields: IndexMap<String, FieldArray>,
}

impl FieldData {
    /// No fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt decoded arrays, padding interior-shaped ones.
    ///
    /// Fails on the first array that does not fit `blocks` blocks of `shape`.
    pub fn from_payloads<I>(payloads: I, shape: &BlockShape, blocks: usize) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = (String, Array4<f64>)>,
    {
        let mut fields = IndexMap::new();
        for (name, array) in payloads {
            let field = FieldArray::from_payload(&name, array, shape, blocks)?;
            fields.insert(name, field);
        }
        Ok(Self { fields })
    }

    /// Add or replace a field, returning the old array.
    pub fn insert(&mut self, name: impl Into<String>, field: FieldArray) -> Option<FieldArray> {
        self.fields.insert(name.into(), field)
    }

    /// The array named `name`.
    pub fn get(&self, name: &str) -> Option<&FieldArray> {
        self.fields.get(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `(name, array)` pairs in decoded order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldArray)> + '_ {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    /// Apply `plan` to every field.
    pub fn fill_guards(&mut self, plan: &GuardPlan) -> Result<(), FieldError> {
        for field in self.fields.values_mut() {
            apply_guard_plan(field, plan)?;
        }
        debug!(
            fields = self.fields.len(),
            stencils = plan.len(),
            "filled guard cells"
        );
        Ok(())
    }
}

impl Named for FieldData {
    type Item = FieldArray;

    fn lookup(&self, name: &str) -> Option<&FieldArray> {
        self.fields.get(name)
    }

    fn names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.fields.keys().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> BlockShape {
        BlockShape::new(1, [4, 1, 1], 1).unwrap()
    }

    #[test]
    fn payloads_keep_decoded_order() {
        let data = FieldData::from_payloads(
            vec![
                ("pres".to_string(), Array4::zeros((2, 1, 1, 4))),
                ("dens".to_string(), Array4::zeros((2, 1, 1, 6))),
            ],
            &shape(),
            2,
        )
        .unwrap();
        assert_eq!(data.names().collect::<Vec<_>>(), vec!["pres", "dens"]);
        assert!(data.contains_name("dens"));
        assert_eq!(data.get("pres").map(|f| f.dim()), Some([2, 1, 1, 6]));
    }

    #[test]
    fn first_bad_payload_fails() {
        let err = FieldData::from_payloads(
            vec![("dens".to_string(), Array4::zeros((2, 1, 1, 5)))],
            &shape(),
            2,
        )
        .unwrap_err();
        assert!(matches!(err, FieldError::ShapeMismatch { .. }));
    }
}
