//! Error types for body construction.

use core::fmt;

/// Errors raised when validating a body configuration.
///
/// Runtime numerical degeneracy (near-zero volume, near-singular springs)
/// is never reported through this type: the simulation self-corrects
/// silently so a frame step can never fail mid-flight.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyError {
    /// Radius must be positive and finite.
    InvalidRadius,
    /// Subdivision level would overflow the 16-bit vertex indices.
    SubdivisionTooDeep { level: u32, max: u32 },
    /// Spring constant must be non-negative and finite.
    InvalidSpringConstant,
    /// Damping must lie in [0, 1).
    InvalidDamping,
    /// Max stretch factor must be greater than 1.
    InvalidStretchFactor,
    /// Pressure gain must be non-negative and finite.
    InvalidPressureGain,
    /// Target volume must be positive and finite.
    InvalidTargetVolume,
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyError::InvalidRadius => write!(f, "radius must be positive and finite"),
            BodyError::SubdivisionTooDeep { level, max } => {
                write!(f, "subdivision level {} exceeds maximum {}", level, max)
            }
            BodyError::InvalidSpringConstant => {
                write!(f, "spring constant must be non-negative and finite")
            }
            BodyError::InvalidDamping => write!(f, "damping must be in [0, 1)"),
            BodyError::InvalidStretchFactor => {
                write!(f, "max stretch factor must be greater than 1")
            }
            BodyError::InvalidPressureGain => {
                write!(f, "pressure gain must be non-negative and finite")
            }
            BodyError::InvalidTargetVolume => {
                write!(f, "target volume must be positive and finite")
            }
        }
    }
}
