//! Verlet position integration and the hard edge-length constraint pass.

use crate::float::Float;
use crate::topology::Topology;
use crate::vec::Vec3;

/// Advance all vertex positions one fixed frame step.
///
/// The update is `new = (2 - d) * cur - (1 - d) * prev + a_clamped`, where
/// `d` is the effective damping for this frame and each acceleration axis
/// is clamped to `accel_limit`. Frozen vertices keep their position but
/// still refresh their previous-position bookkeeping, so unfreezing later
/// does not manufacture a velocity jump.
///
/// Returns the new centroid (mean of all vertex positions).
pub fn integrate<F: Float>(
    positions: &mut [Vec3<F>],
    previous_positions: &mut [Vec3<F>],
    accelerations: &[Vec3<F>],
    frozen: &[bool],
    damping: F,
    accel_limit: F,
) -> Vec3<F> {
    debug_assert_eq!(positions.len(), previous_positions.len());
    debug_assert_eq!(positions.len(), accelerations.len());
    debug_assert_eq!(positions.len(), frozen.len());

    let k1 = F::two() - damping;
    let k2 = F::one() - damping;
    let mut sum = Vec3::zero();

    for i in 0..positions.len() {
        let current = positions[i];
        if !frozen[i] {
            positions[i] = current.scale(k1) - previous_positions[i].scale(k2)
                + accelerations[i].clamp_axes(accel_limit);
        }
        previous_positions[i] = current;
        sum = sum + positions[i];
    }

    sum.scale(F::one() / F::from_f32(positions.len() as f32))
}

/// How many constraint iterations the current compression ratio warrants.
///
/// Correcting one edge can re-violate a neighbor, so a badly compressed
/// mesh gets more passes; a relaxed one gets a single pass.
pub fn iterations_for_compression<F: Float>(compression: F) -> usize {
    if compression > F::from_f32(1.1) {
        4
    } else if compression > F::from_f32(1.05) {
        2
    } else {
        1
    }
}

/// Forcibly shorten edges stretched beyond `rest_length * max_stretch`.
///
/// This is a hard correction distinct from the spring forces: both
/// endpoints (when unfrozen) move symmetrically toward each other by an
/// amount that scales continuously with the violation,
/// `delta * (maxLenSq / (lenSq + maxLenSq) - 1/2)`, rather than snapping to
/// the limit, which would oscillate.
pub fn constrain_edge_lengths<F: Float>(
    positions: &mut [Vec3<F>],
    frozen: &[bool],
    topology: &Topology<F>,
    max_stretch: F,
    iterations: usize,
) {
    for _ in 0..iterations {
        for v in 0..positions.len() {
            if frozen[v] {
                continue;
            }
            for e in topology.edges(v as u16) {
                let v2 = e.vertex as usize;
                if frozen[v2] {
                    continue;
                }
                let delta = positions[v] - positions[v2];
                let max_length = e.rest_length * max_stretch;
                let max_length_sq = max_length * max_length;
                let real_length_sq = delta.length_sq();
                if real_length_sq > max_length_sq {
                    let correction = delta
                        .scale(max_length_sq / (real_length_sq + max_length_sq) - F::half());
                    positions[v] = positions[v] + correction;
                    positions[v2] = positions[v2] - correction;
                }
            }
        }
    }
}
