//! Neighbor-resolution configuration.

use crate::error::GeometryError;

/// Parameters for [`GeometryData::new`](crate::GeometryData::new).
#[derive(Clone, Debug, PartialEq)]
pub struct ResolveConfig {
    /// Relative epsilon for face contact, as a fraction of the searching
    /// block's extent on each axis. Default: 1e-6.
    pub tolerance: f64,
}

impl ResolveConfig {
    /// Default face tolerance.
    pub const DEFAULT_TOLERANCE: f64 = 1e-6;

    /// Check the tolerance is finite and in `(0, 0.5)`.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let t = self.tolerance;
        if !t.is_finite() || t <= 0.0 || t >= 0.5 {
            return Err(GeometryError::InvalidTolerance { value: t });
        }
        Ok(())
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(ResolveConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_tolerance() {
        for t in [0.0, -1e-3, 0.5, f64::NAN, f64::INFINITY] {
            let cfg = ResolveConfig { tolerance: t };
            match cfg.validate() {
                Err(GeometryError::InvalidTolerance { .. }) => {}
                other => panic!("expected InvalidTolerance for {t}, got {other:?}"),
            }
        }
    }
}
