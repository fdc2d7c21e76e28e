//! Grab targeting: BFS distance field, grab bias, unwinding, and crawling.

use crate::float::Float;
use crate::topology::Topology;
use crate::vec::Vec3;
use alloc::vec;
use alloc::vec::Vec;

/// Distance value meaning "not yet visited". The anchor itself is marked 1,
/// so real distances are hop count plus one.
pub const UNVISITED: u16 = 0;

/// Grabbing is suppressed below this fraction of target volume; pulling on
/// an under-inflated mesh folds it inside out.
pub(crate) const GRAB_VOLUME_FRACTION: f32 = 0.97;
/// Farthest a grab can reach.
const GRAB_REACH: f32 = 100.0;
/// Grab pull strength outside / inside the target's surface radius.
const GRAB_GAIN_FAR: f32 = 5.0;
const GRAB_GAIN_NEAR: f32 = 3.0;
/// Magnitude window the per-vertex pull displacement is clipped into.
const GRAB_CLIP_MIN: f32 = 2.0;
const GRAB_CLIP_MAX: f32 = 5.0;
/// Vertices farther than this many hops from the grab point get unwound.
const UNWIND_MIN_HOPS: u16 = 10;
const UNWIND_GAIN: f32 = 1.0;
const UNWIND_FORCE_LIMIT: f32 = 0.5;
/// Crawling starts when the target is farther than this.
const CRAWL_MIN_DISTANCE: f32 = 20.0;
const CRAWL_GAIN: f32 = 0.01;

/// Per-vertex BFS hop distance from an anchor vertex, over the symmetric
/// edge graph.
///
/// Both the distance array and the FIFO are preallocated to the vertex
/// count and never resized: BFS visits each vertex at most once, so a
/// single left-to-right pass with advancing read/write cursors suffices.
pub struct DistanceField {
    distances: Vec<u16>,
    queue: Vec<u16>,
}

impl DistanceField {
    pub fn new(vertex_count: usize) -> Self {
        DistanceField {
            distances: vec![UNVISITED; vertex_count],
            queue: vec![0; vertex_count],
        }
    }

    /// Recompute all distances from `anchor`. Vertices unreachable from the
    /// anchor (impossible in a closed mesh, but tolerated) keep
    /// [`UNVISITED`].
    pub fn compute<F: Float>(&mut self, topology: &Topology<F>, anchor: u16) {
        debug_assert_eq!(self.distances.len(), topology.vertex_count());

        for d in self.distances.iter_mut() {
            *d = UNVISITED;
        }

        let mut write = 0;
        let mut read = 0;
        self.queue[write] = anchor;
        write += 1;
        self.distances[anchor as usize] = 1;

        while read < write {
            let v = self.queue[read];
            read += 1;
            let d = self.distances[v as usize] + 1;
            for e in topology.neighbors(v) {
                if self.distances[e.vertex as usize] == UNVISITED {
                    self.distances[e.vertex as usize] = d;
                    self.queue[write] = e.vertex;
                    write += 1;
                }
            }
        }
    }

    /// Distance of vertex `v` from the anchor (1 = the anchor itself).
    pub fn distance(&self, v: u16) -> u16 {
        self.distances[v as usize]
    }

    /// The whole distance array.
    pub fn distances(&self) -> &[u16] {
        &self.distances
    }
}

/// The vertex nearest to `target`, by linear scan.
pub fn nearest_vertex<F: Float>(positions: &[Vec3<F>], target: Vec3<F>) -> (u16, F) {
    debug_assert!(!positions.is_empty());
    let mut nearest = 0u16;
    let mut best = positions[0].distance_sq(target);
    for (i, p) in positions.iter().enumerate().skip(1) {
        let d = p.distance_sq(target);
        if d < best {
            best = d;
            nearest = i as u16;
        }
    }
    (nearest, best)
}

/// Pull vertices near the grab target toward it.
///
/// Only vertices within a reach window around the nearest vertex's distance
/// participate; each gets an acceleration toward the target whose
/// displacement is magnitude-clipped, stronger while the whole body is
/// still outside the target's surface. Returns the nearest vertex, which
/// becomes the distance-field anchor.
pub fn apply_grab_bias<F: Float>(
    accelerations: &mut [Vec3<F>],
    positions: &[Vec3<F>],
    target: Vec3<F>,
    target_radius_sq: F,
    on_terrain: bool,
) -> u16 {
    let (nearest, nearest_dist_sq) = nearest_vertex(positions, target);
    let reach_sq = F::from_f32(GRAB_REACH * GRAB_REACH);

    let mut grab_dist_sq = nearest_dist_sq * F::from_f32(1.3);
    if grab_dist_sq < reach_sq || on_terrain {
        grab_dist_sq = grab_dist_sq.min(reach_sq);
        let gain = if nearest_dist_sq > target_radius_sq {
            F::from_f32(GRAB_GAIN_FAR)
        } else {
            F::from_f32(GRAB_GAIN_NEAR)
        };
        for i in 0..positions.len() {
            if positions[i].distance_sq(target) < grab_dist_sq {
                let pull = (target - positions[i])
                    .clip_magnitude(F::from_f32(GRAB_CLIP_MIN), F::from_f32(GRAB_CLIP_MAX));
                accelerations[i] = accelerations[i] + pull.scale(gain);
            }
        }
    }
    nearest
}

/// Unwind a mesh wrapped around its footing while reaching for a target.
///
/// Vertices many hops away from the grab point are steered toward the mean
/// position of their neighbors one hop closer, overriding their
/// accumulated acceleration, capped in magnitude. This peels the far side
/// of the mesh back around the obstacle instead of stretching it.
pub fn apply_unwind<F: Float>(
    accelerations: &mut [Vec3<F>],
    positions: &[Vec3<F>],
    topology: &Topology<F>,
    field: &DistanceField,
) {
    let limit = F::from_f32(UNWIND_FORCE_LIMIT);
    let limit_sq = limit * limit;
    for i in 0..positions.len() {
        let d = field.distance(i as u16);
        if d <= UNWIND_MIN_HOPS {
            continue;
        }
        let target_distance = d - 1;
        let mut sum = Vec3::zero();
        let mut count = 0;
        for e in topology.neighbors(i as u16) {
            if field.distance(e.vertex) == target_distance {
                sum = sum + positions[e.vertex as usize];
                count += 1;
            }
        }
        if count > 0 {
            let mean = sum.scale(F::one() / F::from_f32(count as f32));
            let mut force = (mean - positions[i]).scale(F::from_f32(UNWIND_GAIN));
            let strength = force.length_sq();
            if strength > limit_sq {
                force = force.scale(limit / strength.sqrt());
            }
            accelerations[i] = force;
        }
    }
}

/// Creep along the terrain toward a distant target.
///
/// While resting on terrain with a target out of grabbing range, vertices
/// above the surface get a small acceleration toward the target and
/// surface-level vertices are parked, so the body rolls rather than slides.
pub fn apply_crawl<F: Float>(
    accelerations: &mut [Vec3<F>],
    positions: &[Vec3<F>],
    centroid: Vec3<F>,
    target: Vec3<F>,
    terrain_height: F,
) {
    let to_target = target - centroid;
    let dist = to_target.length();
    if dist <= F::from_f32(CRAWL_MIN_DISTANCE) {
        return;
    }
    let creep = to_target.scale(F::from_f32(CRAWL_GAIN) / dist);
    for i in 0..positions.len() {
        if positions[i].y > terrain_height {
            accelerations[i] = accelerations[i] + creep;
        } else {
            accelerations[i] = Vec3::zero();
        }
    }
}
