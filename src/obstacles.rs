//! Provided obstacle implementations: ground plane, sphere, and box.
//!
//! Each one demonstrates a different resolution strategy behind the same
//! [`Obstacle`] contract; the core never looks inside them.

use crate::collision::{BodyContact, Obstacle};
use crate::float::Float;
use crate::vec::{ray_sphere_entry, Aabb, Vec3};

// --------------------------------------------------------------------------
// HalfSpace — infinite ground plane
// --------------------------------------------------------------------------

/// An infinite horizontal half-space: everything below `height` is solid.
///
/// Resolution is a plain clamp of the vertical coordinate.
pub struct HalfSpace<F: Float> {
    height: F,
}

impl<F: Float> HalfSpace<F> {
    pub fn new(height: F) -> Self {
        HalfSpace { height }
    }

    pub fn height(&self) -> F {
        self.height
    }
}

impl<F: Float> Obstacle<F> for HalfSpace<F> {
    fn position(&self) -> Vec3<F> {
        Vec3::new(F::zero(), self.height, F::zero())
    }

    fn test_collisions(&mut self, contact: &mut BodyContact<'_, F>) -> bool {
        let mut touched = false;
        for p in contact.positions.iter_mut() {
            if p.y < self.height {
                p.y = self.height;
                touched = true;
            }
        }
        touched
    }

    fn is_terrain(&self) -> bool {
        true
    }
}

// --------------------------------------------------------------------------
// Orb — spherical obstacle, grabbable
// --------------------------------------------------------------------------

/// A spherical obstacle the body can rest on, grab, and pick up spin from.
///
/// Resolution runs three stages per vertex: a ray test against the
/// trajectory from the previous position catches tunneling through the
/// sphere in one frame; vertices hugging the surface acquire a tangential
/// spin displacement; vertices inside (or nearly inside) are pushed out to
/// the surface and their previous position is rewritten so the push does
/// not read back as velocity.
pub struct Orb<F: Float> {
    position: Vec3<F>,
    radius: F,
    /// Surface displacement per frame applied to hugging vertices.
    pub spin_rate: F,
    /// Axis the surface spin winds around.
    pub spin_axis: Vec3<F>,
}

impl<F: Float> Orb<F> {
    pub fn new(position: Vec3<F>, radius: F) -> Self {
        Orb {
            position,
            radius,
            spin_rate: F::from_f32(0.04),
            spin_axis: Vec3::new(F::zero(), F::zero(), -F::one()),
        }
    }

    pub fn radius(&self) -> F {
        self.radius
    }

    /// Move the orb. Orbs resolve against vertex trajectories, not their
    /// own, so no previous position is kept.
    pub fn advance_to(&mut self, position: Vec3<F>) {
        self.position = position;
    }
}

impl<F: Float> Obstacle<F> for Orb<F> {
    fn position(&self) -> Vec3<F> {
        self.position
    }

    fn radius_sq(&self) -> F {
        self.radius * self.radius
    }

    fn test_collisions(&mut self, contact: &mut BodyContact<'_, F>) -> bool {
        let mut touched = false;
        let push_off = contact.push_off;
        let radius_sq = self.radius * self.radius;
        let hug_radius_sq = (self.radius + F::one()) * (self.radius + F::one());
        let push_radius = if push_off { self.radius + F::one() } else { self.radius };

        for i in 0..contact.positions.len() {
            // Tunneling: if the frame's trajectory pierced the sphere, pull
            // the vertex back to the entry point.
            let p = contact.positions[i];
            let prev = contact.previous_positions[i];
            if !push_off {
                if let Some(t) = ray_sphere_entry(prev, p - prev, self.position, self.radius) {
                    if t <= F::one() {
                        contact.positions[i] = prev + (p - prev).scale(t);
                    }
                }
            }

            // Spin: vertices hugging the surface ride it.
            let mut offset = contact.positions[i] - self.position;
            let mut dist_sq = offset.length_sq();
            if !push_off && dist_sq < hug_radius_sq {
                contact.positions[i] =
                    contact.positions[i] + offset.cross(self.spin_axis).scale(self.spin_rate);
                offset = contact.positions[i] - self.position;
                dist_sq = offset.length_sq();
            }

            // Push-out: anything meaningfully inside moves to the surface.
            if dist_sq < radius_sq * F::from_f32(1.1) {
                if !push_off {
                    let dist = dist_sq.sqrt();
                    let corrected =
                        contact.positions[i] + offset.scale((push_radius - dist) / dist);
                    contact.positions[i] = corrected;
                    contact.previous_positions[i] = corrected;
                }
                if contact.grip {
                    contact.frozen[i] = true;
                }
                touched = true;
            }
        }
        touched
    }
}

// --------------------------------------------------------------------------
// Block — axis-aligned box
// --------------------------------------------------------------------------

/// An axis-aligned box obstacle, optimized for boxes translating along an
/// axis.
///
/// Two cases per vertex: if the box has moved on top of the vertex's
/// previous position, the collision must be with the box's leading face;
/// otherwise the vertex trajectory is rayed against the box and resolved
/// out of whichever face it entered, with a standoff so corners cannot
/// pull vertices through.
pub struct Block<F: Float> {
    position: Vec3<F>,
    previous_position: Vec3<F>,
    half_extents: Vec3<F>,
    standoff: F,
}

impl<F: Float> Block<F> {
    pub fn new(position: Vec3<F>, half_extents: Vec3<F>) -> Self {
        Block {
            position,
            previous_position: position,
            half_extents,
            standoff: F::one(),
        }
    }

    pub fn half_extents(&self) -> Vec3<F> {
        self.half_extents
    }

    /// Move the block, keeping its previous position for swept tests.
    pub fn advance_to(&mut self, position: Vec3<F>) {
        self.previous_position = self.position;
        self.position = position;
    }

    fn bounds(&self) -> Aabb<F> {
        Aabb::centered(self.position, self.half_extents)
    }

    /// The vertex was overrun by the moving box: place it just outside the
    /// leading face along the axis of motion, on the body's side. A static
    /// box (no motion axis) falls back to the least-penetration face.
    fn collide_with_leading_face(
        &self,
        mut point: Vec3<F>,
        velocity: Vec3<F>,
        bounds: &Aabb<F>,
        body_centroid: Vec3<F>,
    ) -> Vec3<F> {
        if velocity.x != F::zero() {
            point.x = if body_centroid.x >= self.previous_position.x {
                bounds.max.x + self.standoff
            } else {
                bounds.min.x - self.standoff
            };
        } else if velocity.y != F::zero() {
            point.y = if body_centroid.y >= self.previous_position.y {
                bounds.max.y + self.standoff
            } else {
                bounds.min.y - self.standoff
            };
        } else if velocity.z != F::zero() {
            point.z = if body_centroid.z >= self.previous_position.z {
                bounds.max.z + self.standoff
            } else {
                bounds.min.z - self.standoff
            };
        } else {
            point = self.eject_least_penetration(point, bounds);
        }
        point
    }

    /// The vertex entered through a face this frame: snap it back outside
    /// that face.
    fn collide_with_intersected_face(
        &self,
        mut point: Vec3<F>,
        intersection: Vec3<F>,
        bounds: &Aabb<F>,
    ) -> Vec3<F> {
        let close = |a: F, b: F| (a - b).abs() < F::from_f32(1e-4);
        if close(intersection.x, bounds.min.x) {
            point.x = bounds.min.x - self.standoff;
        } else if close(intersection.x, bounds.max.x) {
            point.x = bounds.max.x + self.standoff;
        } else if close(intersection.y, bounds.min.y) {
            point.y = bounds.min.y - self.standoff;
        } else if close(intersection.y, bounds.max.y) {
            point.y = bounds.max.y + self.standoff;
        } else if close(intersection.z, bounds.min.z) {
            point.z = bounds.min.z - self.standoff;
        } else if close(intersection.z, bounds.max.z) {
            point.z = bounds.max.z + self.standoff;
        } else {
            debug_assert!(false, "collision location does not lie on the box");
        }
        point
    }

    /// Push a contained point out through its nearest face.
    fn eject_least_penetration(&self, mut point: Vec3<F>, bounds: &Aabb<F>) -> Vec3<F> {
        let depths = [
            (point.x - bounds.min.x, 0, false),
            (bounds.max.x - point.x, 0, true),
            (point.y - bounds.min.y, 1, false),
            (bounds.max.y - point.y, 1, true),
            (point.z - bounds.min.z, 2, false),
            (bounds.max.z - point.z, 2, true),
        ];
        let mut best = depths[0];
        for d in &depths[1..] {
            if d.0 < best.0 {
                best = *d;
            }
        }
        let (_, axis, positive) = best;
        match (axis, positive) {
            (0, false) => point.x = bounds.min.x - self.standoff,
            (0, true) => point.x = bounds.max.x + self.standoff,
            (1, false) => point.y = bounds.min.y - self.standoff,
            (1, true) => point.y = bounds.max.y + self.standoff,
            (2, false) => point.z = bounds.min.z - self.standoff,
            _ => point.z = bounds.max.z + self.standoff,
        }
        point
    }
}

impl<F: Float> Obstacle<F> for Block<F> {
    fn position(&self) -> Vec3<F> {
        self.position
    }

    fn test_collisions(&mut self, contact: &mut BodyContact<'_, F>) -> bool {
        let mut touched = false;
        let velocity = self.position - self.previous_position;
        let bounds = self.bounds();

        for i in 0..contact.positions.len() {
            let p = contact.positions[i];
            let initial = contact.previous_positions[i];

            if bounds.contains(initial) {
                contact.positions[i] =
                    self.collide_with_leading_face(p, velocity, &bounds, contact.centroid);
                touched = true;
            } else if let Some(t) = bounds.ray_entry(initial, p - initial) {
                if t <= F::one() {
                    let intersection = initial + (p - initial).scale(t);
                    contact.positions[i] =
                        self.collide_with_intersected_face(p, intersection, &bounds);
                    touched = true;
                }
            }
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn contact_over<'a>(
        positions: &'a mut Vec<Vec3<f32>>,
        previous: &'a mut Vec<Vec3<f32>>,
        frozen: &'a mut Vec<bool>,
    ) -> BodyContact<'a, f32> {
        BodyContact {
            positions,
            previous_positions: previous,
            frozen,
            centroid: Vec3::new(0.0, 50.0, 0.0),
            grip: false,
            push_off: false,
        }
    }

    #[test]
    fn half_space_clamps_below_ground() {
        let mut positions = vec![Vec3::new(0.0, -2.0, 0.0), Vec3::new(1.0, 5.0, 0.0)];
        let mut previous = positions.clone();
        let mut frozen = vec![false; 2];
        let mut ground = HalfSpace::new(0.0);
        let touched = ground.test_collisions(&mut contact_over(
            &mut positions,
            &mut previous,
            &mut frozen,
        ));
        assert!(touched);
        assert_eq!(positions[0].y, 0.0);
        assert_eq!(positions[1].y, 5.0);
    }

    #[test]
    fn half_space_untouched_when_clear() {
        let mut positions = vec![Vec3::new(0.0f32, 3.0, 0.0)];
        let mut previous = positions.clone();
        let mut frozen = vec![false];
        let mut ground = HalfSpace::new(0.0);
        assert!(!ground.test_collisions(&mut contact_over(
            &mut positions,
            &mut previous,
            &mut frozen
        )));
    }

    #[test]
    fn orb_pushes_vertex_to_surface() {
        let mut orb = Orb::new(Vec3::new(0.0f32, 0.0, 0.0), 6.0);
        orb.spin_rate = 0.0;
        let mut positions = vec![Vec3::new(3.0, 0.0, 0.0)];
        let mut previous = vec![Vec3::new(3.0, 0.0, 0.0)];
        let mut frozen = vec![false];
        let touched = orb.test_collisions(&mut contact_over(
            &mut positions,
            &mut previous,
            &mut frozen,
        ));
        assert!(touched);
        assert!((positions[0].length() - 6.0).abs() < 1e-3);
        // Push-out rewrites prev so the correction carries no velocity.
        assert_eq!(positions[0], previous[0]);
    }

    #[test]
    fn orb_catches_tunneling_vertex() {
        let mut orb = Orb::new(Vec3::new(0.0f32, 0.0, 0.0), 2.0);
        orb.spin_rate = 0.0;
        // One-frame hop straight through the sphere.
        let mut positions = vec![Vec3::new(10.0, 0.0, 0.0)];
        let mut previous = vec![Vec3::new(-10.0, 0.0, 0.0)];
        let mut frozen = vec![false];
        let touched = orb.test_collisions(&mut contact_over(
            &mut positions,
            &mut previous,
            &mut frozen,
        ));
        assert!(touched);
        assert!(
            positions[0].x <= -1.9,
            "vertex should stop at the near surface, got {:?}",
            positions[0]
        );
    }

    #[test]
    fn orb_spin_carries_hugging_vertex_tangentially() {
        let mut orb = Orb::new(Vec3::new(0.0f32, 0.0, 0.0), 6.0);
        // Hugging the surface: outside the radius but inside radius + 1.
        let mut positions = vec![Vec3::new(6.5, 0.0, 0.0)];
        let mut previous = positions.clone();
        let mut frozen = vec![false];
        orb.test_collisions(&mut contact_over(
            &mut positions,
            &mut previous,
            &mut frozen,
        ));
        // offset x (0, 0, -1) points along +y at the default spin rate.
        assert!((positions[0].y - 6.5 * 0.04).abs() < 1e-4);
        assert_eq!(positions[0].x, 6.5);
    }

    #[test]
    fn orb_push_off_leaves_positions_alone() {
        let mut orb = Orb::new(Vec3::new(0.0f32, 0.0, 0.0), 6.0);
        let inside = Vec3::new(3.0, 0.0, 0.0);
        let mut positions = vec![inside];
        let mut previous = vec![inside];
        let mut frozen = vec![false];
        let mut contact = contact_over(&mut positions, &mut previous, &mut frozen);
        contact.push_off = true;
        let touched = orb.test_collisions(&mut contact);
        // Still reported as touching, but no correction applied.
        assert!(touched);
        assert_eq!(positions[0], inside);
    }

    #[test]
    fn orb_grip_freezes_touching_vertices() {
        let mut orb = Orb::new(Vec3::new(0.0f32, 0.0, 0.0), 6.0);
        orb.spin_rate = 0.0;
        let mut positions = vec![Vec3::new(5.0, 0.0, 0.0), Vec3::new(30.0, 0.0, 0.0)];
        let mut previous = positions.clone();
        let mut frozen = vec![false; 2];
        let mut contact = contact_over(&mut positions, &mut previous, &mut frozen);
        contact.grip = true;
        orb.test_collisions(&mut contact);
        assert!(frozen[0]);
        assert!(!frozen[1]);
    }

    #[test]
    fn block_resolves_entering_vertex_out_of_entry_face() {
        let mut block = Block::new(Vec3::new(0.0f32, 0.0, 0.0), Vec3::new(5.0, 5.0, 5.0));
        // Vertex flying in through the +x face.
        let mut positions = vec![Vec3::new(2.0, 0.0, 0.0)];
        let mut previous = vec![Vec3::new(8.0, 0.0, 0.0)];
        let mut frozen = vec![false];
        let touched = block.test_collisions(&mut contact_over(
            &mut positions,
            &mut previous,
            &mut frozen,
        ));
        assert!(touched);
        assert!((positions[0].x - 6.0).abs() < 1e-4, "pushed to +x standoff plane");
    }

    #[test]
    fn moving_block_carries_overrun_vertex_on_leading_face() {
        let mut block = Block::new(Vec3::new(0.0f32, 0.0, 0.0), Vec3::new(5.0, 5.0, 5.0));
        block.advance_to(Vec3::new(0.0, 4.0, 0.0));
        // Previous vertex position is now inside the box after its move up;
        // the body centroid sits above, so the vertex rides the top face.
        let mut positions = vec![Vec3::new(0.0, 8.0, 0.0)];
        let mut previous = vec![Vec3::new(0.0, 8.0, 0.0)];
        let mut frozen = vec![false];
        let touched = block.test_collisions(&mut contact_over(
            &mut positions,
            &mut previous,
            &mut frozen,
        ));
        assert!(touched);
        assert!((positions[0].y - 10.0).abs() < 1e-4, "expected top-face standoff plane");
    }

    #[test]
    fn static_block_ejects_contained_vertex_through_nearest_face() {
        // A box that has never moved has no leading face; a vertex whose
        // previous position is already inside leaves through the face it
        // penetrates least.
        let mut block = Block::new(Vec3::new(0.0f32, 0.0, 0.0), Vec3::new(5.0, 5.0, 5.0));
        let mut positions = vec![Vec3::new(4.0, 0.0, 0.0)];
        let mut previous = vec![Vec3::new(4.0, 0.0, 0.0)];
        let mut frozen = vec![false];
        let touched = block.test_collisions(&mut contact_over(
            &mut positions,
            &mut previous,
            &mut frozen,
        ));
        assert!(touched);
        assert!(
            (positions[0].x - 6.0).abs() < 1e-4,
            "nearest face is +x, expected its standoff plane, got {:?}",
            positions[0]
        );
        assert_eq!(positions[0].y, 0.0);
        assert_eq!(positions[0].z, 0.0);
    }

    #[test]
    fn block_misses_distant_vertex() {
        let mut block = Block::new(Vec3::new(0.0f32, 0.0, 0.0), Vec3::new(5.0, 5.0, 5.0));
        let mut positions = vec![Vec3::new(20.0, 20.0, 20.0)];
        let mut previous = vec![Vec3::new(21.0, 20.0, 20.0)];
        let mut frozen = vec![false];
        assert!(!block.test_collisions(&mut contact_over(
            &mut positions,
            &mut previous,
            &mut frozen
        )));
    }
}
