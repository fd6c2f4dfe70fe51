//! Applying a geometry's guard plan to a field array.

use amrio_geometry::GuardPlan;

use crate::array::FieldArray;
use crate::error::FieldError;

/// Fill every guard cell the plan covers.
///
/// All stencil values are computed from interior cells before any guard is
/// written; interior cells are never written. Applying the same plan again
/// therefore reproduces the same guard values, and block order does not
/// matter.
pub fn apply_guard_plan(field: &mut FieldArray, plan: &GuardPlan) -> Result<(), FieldError> {
    let expected = plan.padded_shape();
    let found = field.dim();
    if expected != found {
        return Err(FieldError::PlanMismatch { expected, found });
    }
    let values: Vec<f64> = {
        let data = field.padded();
        plan.stencils()
            .iter()
            .map(|stencil| {
                let sum: f64 = stencil.sources.iter().map(|src| data[*src]).sum();
                sum / stencil.sources.len() as f64
            })
            .collect()
    };
    let mut data = field.padded_mut();
    for (stencil, value) in plan.stencils().iter().zip(values) {
        data[stencil.dest] = value;
    }
    Ok(())
}
