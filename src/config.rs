//! Configuration for a soft body.

use crate::error::BodyError;
use crate::float::Float;
use crate::mesh::MAX_SUBDIVISION;
use crate::vec::Vec3;

/// All externally settable constants of the simulation.
///
/// Defaults reproduce the original balloon tuning at radius 10 and are
/// expressed per fixed frame step (accelerations are in units of distance
/// per frame squared; there is no separate `dt`).
///
/// # Builder Pattern
/// ```
/// use squish::config::BodyConfig;
///
/// let config: BodyConfig<f32> = BodyConfig::new()
///     .with_radius(10.0)
///     .with_subdivision(4)
///     .with_spring_constant(0.05)
///     .with_pressure_gain(10_000.0);
/// ```
pub struct BodyConfig<F: Float> {
    /// Spring constant for the mesh edge springs. Higher is stiffer.
    /// Default: 0.05.
    pub spring_constant: F,
    /// Gravity acceleration vector applied while airborne.
    /// Default: (0, -0.03, 0).
    pub gravity: Vec3<F>,
    /// Base damping rate for vertex motion; boosted fourfold while the
    /// body is badly under-inflated. Default: 0.005.
    pub damping: F,
    /// Gain converting the pressure differential into acceleration along
    /// vertex normals. Think of it as the gas temperature. Default: 10000.
    pub pressure_gain: F,
    /// Equilibrium volume the pressure term drives toward. `None` uses the
    /// volume computed from the freshly built mesh. Default: `None`.
    pub target_volume: Option<F>,
    /// Stretch limit for edges as a multiple of rest length. Default: 3.
    pub max_stretch: F,
    /// Sphere subdivision level; vertex count grows as `4^(level+1) + 2`.
    /// Default: 4.
    pub subdivision: u32,
    /// Radius of the undeformed sphere. Default: 10.
    pub radius: F,
    /// Per-axis acceleration clamp guarding against numerical blow-up.
    /// Default: 10.
    pub max_acceleration: F,
    /// Fraction of target volume below which the pressure term stops
    /// growing (the volume floor of the 1/V term). Default: 0.6.
    pub pressure_floor_fraction: F,
    /// Fraction of target volume below which the mesh is considered
    /// collapsed and resets to its original shape. Default: 0.012.
    pub collapse_fraction: F,
}

impl<F: Float> BodyConfig<F> {
    /// Create a config with default values.
    pub fn new() -> Self {
        BodyConfig {
            spring_constant: F::from_f32(0.05),
            gravity: Vec3::new(F::zero(), F::from_f32(-0.03), F::zero()),
            damping: F::from_f32(0.005),
            pressure_gain: F::from_f32(10_000.0),
            target_volume: None,
            max_stretch: F::from_f32(3.0),
            subdivision: 4,
            radius: F::from_f32(10.0),
            max_acceleration: F::from_f32(10.0),
            pressure_floor_fraction: F::from_f32(0.6),
            collapse_fraction: F::from_f32(0.012),
        }
    }

    /// Set the spring constant.
    pub fn with_spring_constant(mut self, k: F) -> Self {
        self.spring_constant = k;
        self
    }

    /// Set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec3<F>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the base damping rate.
    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    /// Set the pressure gain.
    pub fn with_pressure_gain(mut self, gain: F) -> Self {
        self.pressure_gain = gain;
        self
    }

    /// Set an explicit equilibrium volume.
    pub fn with_target_volume(mut self, volume: F) -> Self {
        self.target_volume = Some(volume);
        self
    }

    /// Set the edge stretch limit.
    pub fn with_max_stretch(mut self, factor: F) -> Self {
        self.max_stretch = factor;
        self
    }

    /// Set the sphere subdivision level.
    pub fn with_subdivision(mut self, level: u32) -> Self {
        self.subdivision = level;
        self
    }

    /// Set the sphere radius.
    pub fn with_radius(mut self, radius: F) -> Self {
        self.radius = radius;
        self
    }

    /// Set the per-axis acceleration clamp.
    pub fn with_max_acceleration(mut self, limit: F) -> Self {
        self.max_acceleration = limit;
        self
    }

    /// Check every constant, returning the first violation.
    pub fn validate(&self) -> Result<(), BodyError> {
        if !(self.radius > F::zero()) || !self.radius.is_finite() {
            return Err(BodyError::InvalidRadius);
        }
        if self.subdivision > MAX_SUBDIVISION {
            return Err(BodyError::SubdivisionTooDeep {
                level: self.subdivision,
                max: MAX_SUBDIVISION,
            });
        }
        if self.spring_constant < F::zero() || !self.spring_constant.is_finite() {
            return Err(BodyError::InvalidSpringConstant);
        }
        if self.damping < F::zero() || !(self.damping < F::one()) {
            return Err(BodyError::InvalidDamping);
        }
        if !(self.max_stretch > F::one()) {
            return Err(BodyError::InvalidStretchFactor);
        }
        if self.pressure_gain < F::zero() || !self.pressure_gain.is_finite() {
            return Err(BodyError::InvalidPressureGain);
        }
        if let Some(v) = self.target_volume {
            if !(v > F::zero()) || !v.is_finite() {
                return Err(BodyError::InvalidTargetVolume);
            }
        }
        Ok(())
    }
}

impl<F: Float> Default for BodyConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(BodyConfig::<f32>::new().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_constants() {
        assert_eq!(
            BodyConfig::<f32>::new().with_radius(0.0).validate(),
            Err(BodyError::InvalidRadius)
        );
        assert_eq!(
            BodyConfig::<f32>::new().with_subdivision(7).validate(),
            Err(BodyError::SubdivisionTooDeep { level: 7, max: 6 })
        );
        assert_eq!(
            BodyConfig::<f32>::new().with_max_stretch(1.0).validate(),
            Err(BodyError::InvalidStretchFactor)
        );
        assert_eq!(
            BodyConfig::<f32>::new().with_damping(1.0).validate(),
            Err(BodyError::InvalidDamping)
        );
    }
}
