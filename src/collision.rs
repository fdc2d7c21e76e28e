//! The obstacle contract and the per-frame collision sweep.

use crate::float::Float;
use crate::vec::{Aabb, Vec3};
use alloc::boxed::Box;
use alloc::vec::Vec;

/// The body state an obstacle may inspect and correct during a sweep.
///
/// Obstacles move offending entries of `positions` (and, when needed for
/// tunneling fixes, `previous_positions`) in place. `frozen` lets a gripped
/// surface lock vertices for the frame. The flags carry the grab context
/// the resolution strategies key off.
pub struct BodyContact<'a, F: Float> {
    pub positions: &'a mut [Vec3<F>],
    pub previous_positions: &'a mut [Vec3<F>],
    pub frozen: &'a mut [bool],
    /// Centroid of the body, for strategies that need its side of an
    /// obstacle rather than per-vertex positions.
    pub centroid: Vec3<F>,
    /// The body is actively gripping surfaces it touches.
    pub grip: bool,
    /// The body is grabbing a different obstacle and should be allowed to
    /// push off this one instead of sticking to it.
    pub push_off: bool,
}

/// Anything the body can collide with.
///
/// The core prescribes only this contract: report whether any vertex is
/// touching, correcting offending positions in place however the obstacle's
/// geometry demands. Qualitatively different resolution strategies (leading
/// faces, tunneling rays, half-space clamps) all live behind this trait.
pub trait Obstacle<F: Float> {
    /// Reference position of the obstacle; the resolver uses its height to
    /// pick the body's footing.
    fn position(&self) -> Vec3<F>;

    /// Test every vertex against this obstacle, correcting positions in
    /// place. Returns whether any vertex is touching.
    fn test_collisions(&mut self, contact: &mut BodyContact<'_, F>) -> bool;

    /// Squared radius of the grabbable surface, if the obstacle has one.
    /// Used to scale the grab bias near the surface.
    fn radius_sq(&self) -> F {
        F::zero()
    }

    /// Whether this obstacle is terrain (an unbounded support like a
    /// ground plane) rather than a discrete object.
    fn is_terrain(&self) -> bool {
        false
    }
}

/// Outcome of one collision sweep.
pub struct SweepOutcome {
    /// Whether any obstacle reported contact this frame.
    pub touching_any: bool,
    /// Index of the lowest touched obstacle, the body's footing under
    /// gravity, if anything is touched.
    pub footing: Option<usize>,
}

/// Tracks the touched-obstacle set across frames so enter/leave transitions
/// fire exactly once.
///
/// The two index lists are swapped and reused every frame rather than
/// reallocated.
pub struct ContactTracker {
    touching_now: Vec<usize>,
    touched_previously: Vec<usize>,
}

impl ContactTracker {
    pub fn new() -> Self {
        ContactTracker {
            touching_now: Vec::new(),
            touched_previously: Vec::new(),
        }
    }

    /// Run every obstacle's collision test and diff the touched set against
    /// last frame's, reporting each transition through `events`.
    ///
    /// Broad-phase culling is deliberately absent: this is a linear sweep,
    /// and a spatial index belongs to an external collaborator presorting
    /// `obstacles`.
    pub fn sweep<F: Float>(
        &mut self,
        obstacles: &mut [Box<dyn Obstacle<F>>],
        contact: &mut BodyContact<'_, F>,
        grabbing: bool,
        grab_target: Option<usize>,
        mut events: impl FnMut(usize, bool),
    ) -> SweepOutcome {
        core::mem::swap(&mut self.touching_now, &mut self.touched_previously);
        self.touching_now.clear();

        let mut touching_any = false;
        for (index, obstacle) in obstacles.iter_mut().enumerate() {
            contact.push_off = grabbing && grab_target != Some(index);
            let touched = obstacle.test_collisions(contact);
            if touched {
                touching_any = true;
                self.touching_now.push(index);
                if !self.touched_previously.contains(&index) {
                    events(index, true);
                }
            }
        }

        for &old in &self.touched_previously {
            if !self.touching_now.contains(&old) {
                events(old, false);
            }
        }

        // Footing: the lowest obstacle currently touched, since that is
        // what the body rests on under gravity.
        let mut footing = None;
        let mut height = None;
        for &index in &self.touching_now {
            let y = obstacles[index].position().y;
            if height.map_or(true, |h| y < h) {
                height = Some(y);
                footing = Some(index);
            }
        }

        SweepOutcome { touching_any, footing }
    }

    /// Obstacle indices touched in the most recent sweep.
    pub fn touching(&self) -> &[usize] {
        &self.touching_now
    }
}

impl Default for ContactTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Recompute the body's axis-aligned bounding box from its vertices.
pub fn body_bounds<F: Float>(positions: &[Vec3<F>]) -> Aabb<F> {
    Aabb::from_points(positions)
}
