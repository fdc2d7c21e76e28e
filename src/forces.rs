//! Per-vertex force accumulation: gravity, pressure, and edge springs.
//!
//! All vertices are treated as unit mass, so forces and accelerations are
//! interchangeable and the acceleration array is rebuilt from scratch every
//! frame.

use crate::float::Float;
use crate::topology::Topology;
use crate::vec::Vec3;

/// Overwrite the acceleration array with gravity plus the pressure term.
///
/// `pressure_scale` is the precomputed
/// `gain * (1/max(volume, floor) - 1/target_volume)`; positive when the
/// body is under-inflated, pushing vertices outward along their normals.
/// Callers zero `gravity` while any contact is active so the body does not
/// drip off its support.
pub fn apply_ambient<F: Float>(
    accelerations: &mut [Vec3<F>],
    normals: &[Vec3<F>],
    gravity: Vec3<F>,
    pressure_scale: F,
) {
    debug_assert_eq!(accelerations.len(), normals.len());
    for (a, n) in accelerations.iter_mut().zip(normals.iter()) {
        *a = gravity + n.scale(pressure_scale);
    }
}

/// Add Hooke's-law spring forces along every unique edge.
///
/// Each edge appears once in the asymmetric view, so the equal-and-opposite
/// contributions are applied exactly once per edge: added to the owning
/// vertex, subtracted from the other endpoint.
pub fn apply_springs<F: Float>(
    accelerations: &mut [Vec3<F>],
    positions: &[Vec3<F>],
    topology: &Topology<F>,
    spring_constant: F,
) {
    for v in 0..positions.len() {
        for e in topology.edges(v as u16) {
            let v2 = e.vertex as usize;
            let offset = positions[v] - positions[v2];
            let length = offset.length();
            // Coincident endpoints cannot occur in a well-formed mesh; the
            // stretch constraint and pressure keep vertices apart.
            debug_assert!(
                !length.is_near_zero(F::from_f32(1e-12)),
                "degenerate spring {} -> {}",
                v,
                v2
            );
            let acceleration = offset.scale((e.rest_length - length) * spring_constant / length);
            accelerations[v] = accelerations[v] + acceleration;
            accelerations[v2] = accelerations[v2] - acceleration;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshBuilder;
    use alloc::vec;

    #[test]
    fn ambient_overwrites_previous_accelerations() {
        let stale = Vec3::new(9.0f32, 9.0, 9.0);
        let mut accel = vec![stale; 4];
        let normals = vec![Vec3::new(1.0, 0.0, 0.0); 4];
        let g = Vec3::new(0.0, -0.03, 0.0);
        apply_ambient(&mut accel, &normals, g, 2.0);
        for a in &accel {
            assert_eq!(*a, Vec3::new(2.0, -0.03, 0.0));
        }
    }

    #[test]
    fn undeformed_springs_exert_no_force() {
        let (positions, topo) = MeshBuilder::<f32>::build(5.0, 2);
        let mut accel = vec![Vec3::zero(); positions.len()];
        apply_springs(&mut accel, &positions, &topo, 0.05);
        for (i, a) in accel.iter().enumerate() {
            assert!(a.length() < 1e-4, "vertex {} accel {:?}", i, a);
        }
    }

    #[test]
    fn stretched_spring_pulls_endpoints_together() {
        let (mut positions, topo) = MeshBuilder::<f32>::build(5.0, 1);
        // Displace vertex 0 radially outward to stretch all its edges.
        let dir = positions[0].normalize();
        positions[0] = positions[0] + dir.scale(2.0);
        let mut accel = vec![Vec3::zero(); positions.len()];
        apply_springs(&mut accel, &positions, &topo, 0.05);
        assert!(
            accel[0].dot(dir) < 0.0,
            "net spring force should pull the displaced vertex back"
        );
    }

    #[test]
    fn spring_forces_sum_to_zero() {
        let (mut positions, topo) = MeshBuilder::<f32>::build(5.0, 2);
        positions[3] = positions[3].scale(1.4);
        positions[17] = positions[17].scale(0.7);
        let mut accel = vec![Vec3::zero(); positions.len()];
        apply_springs(&mut accel, &positions, &topo, 0.05);
        let total = accel.iter().fold(Vec3::zero(), |s, a| s + *a);
        assert!(total.length() < 1e-4, "internal forces must cancel: {:?}", total);
    }
}
