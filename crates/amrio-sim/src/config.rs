//! Simulation configuration and validation.
//!
//! [`SimulationConfig`] is the input to every [`SimulationData`](crate::SimulationData)
//! constructor. [`validate()`](SimulationConfig::validate) runs before the
//! first timestep is assembled.

use std::error::Error;
use std::fmt;

use amrio_core::OnDuplicate;
use amrio_geometry::ResolveConfig;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimulationConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// face_tolerance is NaN, infinite, not positive, or at least 0.5.
    InvalidFaceTolerance {
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFaceTolerance { value } => {
                write!(f, "face_tolerance must be finite and in (0, 0.5), got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

// ── SimulationConfig ───────────────────────────────────────────────

/// How decoded snapshots are merged into a [`SimulationData`](crate::SimulationData).
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Relative epsilon used to extrude a block face during neighbor
    /// search. Default: 1e-6.
    pub face_tolerance: f64,
    /// Fill guard cells of every field when a timestep is merged.
    /// Default: true.
    pub fill_guards: bool,
    /// Duplicate-time policy for the sequence constructors.
    /// Default: [`OnDuplicate::Reject`].
    pub on_duplicate: OnDuplicate,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            face_tolerance: ResolveConfig::DEFAULT_TOLERANCE,
            fill_guards: true,
            on_duplicate: OnDuplicate::Reject,
        }
    }
}

impl SimulationConfig {
    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolve_config()
            .validate()
            .map_err(|_| ConfigError::InvalidFaceTolerance {
                value: self.face_tolerance,
            })
    }

    /// The geometry-level slice of this configuration.
    pub fn resolve_config(&self) -> ResolveConfig {
        ResolveConfig {
            tolerance: self.face_tolerance,
        }
    }
}
