//! 3D vectors, bounding boxes, and the ray tests used by collision handling.

use crate::float::Float;
use core::ops::{Add, Sub, Neg};

/// 3D vector used for positions, accelerations, and normals.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3<F: Float> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Vec3<F> {
    /// Create a new 3D vector.
    pub fn new(x: F, y: F, z: F) -> Self { Vec3 { x, y, z } }

    /// Zero vector.
    pub fn zero() -> Self {
        Vec3 { x: F::zero(), y: F::zero(), z: F::zero() }
    }

    /// Dot product.
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross(self, other: Self) -> Self {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Squared length (avoids sqrt).
    pub fn length_sq(self) -> F {
        self.dot(self)
    }

    /// Length (magnitude).
    pub fn length(self) -> F {
        self.length_sq().sqrt()
    }

    /// Scale all components by a scalar.
    pub fn scale(self, s: F) -> Self {
        Vec3 { x: self.x * s, y: self.y * s, z: self.z * s }
    }

    /// Normalize to unit length. Returns the zero vector if length is near zero.
    pub fn normalize(self) -> Self {
        let len_sq = self.length_sq();
        if len_sq.is_near_zero(F::from_f32(1e-10)) {
            Self::zero()
        } else {
            self.scale(F::one() / len_sq.sqrt())
        }
    }

    /// Distance between two points.
    pub fn distance(self, other: Self) -> F {
        (self - other).length()
    }

    /// Squared distance between two points.
    pub fn distance_sq(self, other: Self) -> F {
        (self - other).length_sq()
    }

    /// Componentwise minimum.
    pub fn min(self, other: Self) -> Self {
        Vec3 {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            z: self.z.min(other.z),
        }
    }

    /// Componentwise maximum.
    pub fn max(self, other: Self) -> Self {
        Vec3 {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
            z: self.z.max(other.z),
        }
    }

    /// Clamp each axis component to [-limit, limit].
    ///
    /// Used to keep near-singular spring or pressure terms from injecting
    /// unbounded accelerations into the integrator. Non-finite components
    /// (from a misbehaving obstacle or a degenerate division) also collapse
    /// to the limit.
    pub fn clamp_axes(self, limit: F) -> Self {
        let clip = |v: F| {
            if !v.is_finite() {
                limit
            } else {
                v.clamp(-limit, limit)
            }
        };
        Vec3 { x: clip(self.x), y: clip(self.y), z: clip(self.z) }
    }

    /// Rescale the vector so its magnitude lies within [min, max].
    ///
    /// A near-zero vector is returned unchanged since it has no direction
    /// to rescale along.
    pub fn clip_magnitude(self, min: F, max: F) -> Self {
        let mag_sq = self.length_sq();
        if mag_sq.is_near_zero(F::from_f32(1e-12)) {
            self
        } else if mag_sq < min * min {
            self.scale(min / mag_sq.sqrt())
        } else if mag_sq > max * max {
            self.scale(max / mag_sq.sqrt())
        } else {
            self
        }
    }
}

impl<F: Float> Add for Vec3<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Vec3 { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl<F: Float> Sub for Vec3<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Vec3 { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl<F: Float> Neg for Vec3<F> {
    type Output = Self;
    fn neg(self) -> Self {
        Vec3 { x: -self.x, y: -self.y, z: -self.z }
    }
}

// --------------------------------------------------------------------------
// Aabb<F> — axis-aligned bounding box
// --------------------------------------------------------------------------

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb<F: Float> {
    pub min: Vec3<F>,
    pub max: Vec3<F>,
}

impl<F: Float> Aabb<F> {
    /// Box from explicit corners.
    pub fn new(min: Vec3<F>, max: Vec3<F>) -> Self {
        Aabb { min, max }
    }

    /// Box centered at `center` extending `half_extents` along each axis.
    pub fn centered(center: Vec3<F>, half_extents: Vec3<F>) -> Self {
        Aabb { min: center - half_extents, max: center + half_extents }
    }

    /// Smallest box containing every point. `points` must be non-empty.
    pub fn from_points(points: &[Vec3<F>]) -> Self {
        debug_assert!(!points.is_empty());
        let mut min = points[0];
        let mut max = points[0];
        for &p in &points[1..] {
            min = min.min(p);
            max = max.max(p);
        }
        Aabb { min, max }
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Vec3<F>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x
            && p.y >= self.min.y && p.y <= self.max.y
            && p.z >= self.min.z && p.z <= self.max.z
    }

    /// Whether two boxes overlap.
    pub fn intersects(&self, other: &Aabb<F>) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
            && self.min.y <= other.max.y && self.max.y >= other.min.y
            && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Entry time of the ray `origin + t * dir` into the box, by the slab
    /// method. Returns `None` when the ray misses or points away. A ray
    /// starting inside reports `t = 0`.
    pub fn ray_entry(&self, origin: Vec3<F>, dir: Vec3<F>) -> Option<F> {
        let eps = F::from_f32(1e-12);
        let mut t_min = F::zero();
        let mut t_max = None::<F>;

        let axes = [
            (origin.x, dir.x, self.min.x, self.max.x),
            (origin.y, dir.y, self.min.y, self.max.y),
            (origin.z, dir.z, self.min.z, self.max.z),
        ];
        for (o, d, lo, hi) in axes {
            if d.abs() < eps {
                // Parallel to the slab: must already be inside it.
                if o < lo || o > hi {
                    return None;
                }
            } else {
                let inv = F::one() / d;
                let mut t0 = (lo - o) * inv;
                let mut t1 = (hi - o) * inv;
                if t0 > t1 {
                    core::mem::swap(&mut t0, &mut t1);
                }
                t_min = t_min.max(t0);
                t_max = Some(match t_max {
                    Some(t) => t.min(t1),
                    None => t1,
                });
            }
        }

        match t_max {
            Some(t_max) if t_min <= t_max => Some(t_min),
            // Degenerate ray (all axes parallel) starting inside the box.
            None => Some(F::zero()),
            _ => None,
        }
    }
}

/// Entry time of the ray `origin + t * dir` into a sphere.
///
/// Returns `None` on a miss; a ray starting inside the sphere reports
/// `t = 0`, matching the convention obstacle sweeps rely on for
/// tunneling correction.
pub fn ray_sphere_entry<F: Float>(
    origin: Vec3<F>,
    dir: Vec3<F>,
    center: Vec3<F>,
    radius: F,
) -> Option<F> {
    let to_center = center - origin;
    let dist_sq = to_center.length_sq();
    let r_sq = radius * radius;
    if dist_sq <= r_sq {
        return Some(F::zero());
    }

    let a = dir.length_sq();
    if a.is_near_zero(F::from_f32(1e-12)) {
        return None;
    }
    let proj = to_center.dot(dir);
    if proj < F::zero() {
        return None;
    }
    let disc = proj * proj - a * (dist_sq - r_sq);
    if disc < F::zero() {
        return None;
    }
    Some((proj - disc.sqrt()) / a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_follows_right_hand_rule() {
        let i = Vec3::new(1.0f32, 0.0, 0.0);
        let j = Vec3::new(0.0f32, 1.0, 0.0);
        let k = i.cross(j);
        assert!((k.z - 1.0).abs() < 1e-6);
        assert!(k.x.abs() < 1e-6 && k.y.abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_vector() {
        let v = Vec3::<f32>::zero();
        assert_eq!(v.normalize(), Vec3::zero());
    }

    #[test]
    fn clamp_axes_limits_each_component() {
        let v = Vec3::new(100.0f32, -3.0, f32::NAN);
        let c = v.clamp_axes(10.0);
        assert_eq!(c.x, 10.0);
        assert_eq!(c.y, -3.0);
        assert_eq!(c.z, 10.0);
    }

    #[test]
    fn clip_magnitude_bounds_length() {
        let short = Vec3::new(0.1f32, 0.0, 0.0).clip_magnitude(2.0, 5.0);
        assert!((short.length() - 2.0).abs() < 1e-5);
        let long = Vec3::new(100.0f32, 0.0, 0.0).clip_magnitude(2.0, 5.0);
        assert!((long.length() - 5.0).abs() < 1e-4);
        let mid = Vec3::new(3.0f32, 0.0, 0.0).clip_magnitude(2.0, 5.0);
        assert_eq!(mid.x, 3.0);
    }

    #[test]
    fn ray_enters_box_from_outside() {
        let b = Aabb::new(Vec3::new(-1.0f32, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let t = b.ray_entry(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(t, Some(2.0));
        let miss = b.ray_entry(Vec3::new(-3.0, 5.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(miss, None);
    }

    #[test]
    fn ray_inside_box_reports_zero() {
        let b = Aabb::new(Vec3::new(-1.0f32, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let t = b.ray_entry(Vec3::zero(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(t, Some(0.0));
    }

    #[test]
    fn ray_sphere_entry_times() {
        let c = Vec3::new(0.0f32, 0.0, 0.0);
        let hit = ray_sphere_entry(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), c, 1.0);
        assert!((hit.unwrap() - 2.0).abs() < 1e-5);
        let inside = ray_sphere_entry(Vec3::new(0.5, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), c, 1.0);
        assert_eq!(inside, Some(0.0));
        let away = ray_sphere_entry(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), c, 1.0);
        assert_eq!(away, None);
    }
}
