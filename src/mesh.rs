//! Sphere mesh construction by recursive octahedron subdivision.

use crate::float::Float;
use crate::topology::{Edge, Topology};
use crate::vec::Vec3;
use alloc::vec::Vec;
use hashbrown::HashMap;

/// Deepest supported subdivision. Level 6 yields 16386 vertices; one more
/// level would overflow the `u16` vertex indices.
pub const MAX_SUBDIVISION: u32 = 6;

/// Builds a closed triangulated sphere with deduplicated vertices and a
/// spring for every unique edge.
///
/// Construction starts from the six unit-axis vertices of an octahedron and
/// recursively subdivides each of the eight faces `level` times. Midpoint
/// vertices are memoized by their unordered source-index pair so shared
/// edges produce exactly one vertex. Every vertex is pushed out to the
/// target radius, so the result approximates a sphere increasingly well
/// with depth.
///
/// The builder is scaffolding: it is consumed by [`MeshBuilder::build`],
/// which discards the midpoint table and freezes the tables into a
/// [`Topology`].
pub struct MeshBuilder<F: Float> {
    radius: F,
    vertices: Vec<Vec3<F>>,
    triangles: Vec<[u16; 3]>,
    adjacent_triangles: Vec<Vec<u16>>,
    edges: Vec<Vec<Edge<F>>>,
    symmetric_edges: Vec<Vec<Edge<F>>>,
    midpoints: HashMap<(u16, u16), u16>,
}

impl<F: Float> MeshBuilder<F> {
    /// Build a sphere of the given radius and subdivision level.
    ///
    /// Returns the vertex positions (centered on the origin) and the frozen
    /// topology tables. Deterministic for fixed inputs.
    ///
    /// # Panics
    /// Debug-asserts that `level <= MAX_SUBDIVISION`; configuration
    /// validation rejects deeper levels before this is reached.
    pub fn build(radius: F, level: u32) -> (Vec<Vec3<F>>, Topology<F>) {
        debug_assert!(level <= MAX_SUBDIVISION, "subdivision level {} too deep", level);

        let mut builder = MeshBuilder {
            radius,
            vertices: Vec::new(),
            triangles: Vec::new(),
            adjacent_triangles: Vec::new(),
            edges: Vec::new(),
            symmetric_edges: Vec::new(),
            midpoints: HashMap::new(),
        };

        let xp = builder.allocate_vertex(F::one(), F::zero(), F::zero());
        let xm = builder.allocate_vertex(-F::one(), F::zero(), F::zero());
        let yp = builder.allocate_vertex(F::zero(), F::one(), F::zero());
        let ym = builder.allocate_vertex(F::zero(), -F::one(), F::zero());
        let zp = builder.allocate_vertex(F::zero(), F::zero(), F::one());
        let zm = builder.allocate_vertex(F::zero(), F::zero(), -F::one());

        // The eight faces of the octahedron, wound so area vectors point
        // outward and the signed volume comes out positive.
        builder.triangulate(level, xp, zp, yp);
        builder.triangulate(level, yp, zp, xm);
        builder.triangulate(level, xm, zp, ym);
        builder.triangulate(level, ym, zp, xp);
        builder.triangulate(level, xp, yp, zm);
        builder.triangulate(level, yp, xm, zm);
        builder.triangulate(level, xm, ym, zm);
        builder.triangulate(level, ym, xp, zm);

        log::debug!(
            "built sphere mesh: level {}, {} vertices, {} triangles",
            level,
            builder.vertices.len(),
            builder.triangles.len()
        );

        // The midpoint memo is construction scaffolding; drop it along with
        // the builder and freeze the tables.
        let MeshBuilder {
            vertices,
            triangles,
            adjacent_triangles,
            edges,
            symmetric_edges,
            ..
        } = builder;
        (
            vertices,
            Topology::new(triangles, adjacent_triangles, edges, symmetric_edges),
        )
    }

    /// Recursively subdivide the face (p1, p2, p3). At the leaves, emit the
    /// triangle and one spring per unique edge; otherwise split through the
    /// three (memoized) midpoints into four sub-faces.
    fn triangulate(&mut self, level: u32, p1: u16, p2: u16, p3: u16) {
        if level == 0 {
            self.add_edge_spring(p1, p2);
            self.add_edge_spring(p2, p3);
            self.add_edge_spring(p3, p1);
            self.add_triangle(p1, p2, p3);
        } else {
            let m12 = self.midpoint_vertex(p1, p2);
            let m23 = self.midpoint_vertex(p2, p3);
            let m31 = self.midpoint_vertex(p3, p1);

            self.triangulate(level - 1, p1, m12, m31);
            self.triangulate(level - 1, m12, p2, m23);
            self.triangulate(level - 1, m31, m23, p3);
            self.triangulate(level - 1, m12, m23, m31);
        }
    }

    /// Append a vertex, normalized out to the sphere radius, and grow the
    /// parallel adjacency tables. No duplicate check happens here: dedup is
    /// done by index pair in `midpoint_vertex`, never by comparing
    /// coordinates subject to round-off.
    fn allocate_normalized(&mut self, v: Vec3<F>) -> u16 {
        let index = self.vertices.len() as u16;
        self.vertices.push(v.normalize().scale(self.radius));
        self.adjacent_triangles.push(Vec::new());
        self.edges.push(Vec::new());
        self.symmetric_edges.push(Vec::new());
        index
    }

    fn allocate_vertex(&mut self, x: F, y: F, z: F) -> u16 {
        self.allocate_normalized(Vec3::new(x, y, z))
    }

    /// Vertex index for the midpoint of `v1` and `v2`, allocating it the
    /// first time the unordered pair is seen.
    fn midpoint_vertex(&mut self, v1: u16, v2: u16) -> u16 {
        let key = if v1 < v2 { (v1, v2) } else { (v2, v1) };
        if let Some(&index) = self.midpoints.get(&key) {
            return index;
        }
        let mid = (self.vertices[v1 as usize] + self.vertices[v2 as usize]).scale(F::half());
        let index = self.allocate_normalized(mid);
        self.midpoints.insert(key, index);
        index
    }

    fn add_triangle(&mut self, v1: u16, v2: u16, v3: u16) {
        let t = self.triangles.len() as u16;
        self.triangles.push([v1, v2, v3]);
        self.adjacent_triangles[v1 as usize].push(t);
        self.adjacent_triangles[v2 as usize].push(t);
        self.adjacent_triangles[v3 as usize].push(t);
    }

    /// Record the spring for edge (v1, v2), once per unique edge: the
    /// asymmetric view stores it under the lower-indexed endpoint, the
    /// symmetric view under both. Interior edges are emitted by both leaf
    /// triangles sharing them, so the second emission is dropped here.
    fn add_edge_spring(&mut self, v1: u16, v2: u16) {
        let (lo, hi) = if v1 < v2 { (v1, v2) } else { (v2, v1) };
        if self.edges[lo as usize].iter().any(|e| e.vertex == hi) {
            return;
        }
        let rest_length = self.vertices[lo as usize].distance(self.vertices[hi as usize]);
        self.edges[lo as usize].push(Edge { vertex: hi, rest_length });
        self.symmetric_edges[lo as usize].push(Edge { vertex: hi, rest_length });
        self.symmetric_edges[hi as usize].push(Edge { vertex: lo, rest_length });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octahedron_base_counts() {
        let (vertices, topo) = MeshBuilder::<f32>::build(1.0, 0);
        assert_eq!(vertices.len(), 6);
        assert_eq!(topo.triangle_count(), 8);
        assert_eq!(topo.edge_count(), 12);
    }

    #[test]
    fn subdivision_counts_match_closed_sphere() {
        // For a closed triangulated sphere: F = 8 * 4^L, V = 4^(L+1) + 2,
        // E = 3V - 6.
        for level in 0..4u32 {
            let (vertices, topo) = MeshBuilder::<f32>::build(5.0, level);
            let f = 8 * 4usize.pow(level);
            let v = 4usize.pow(level + 1) + 2;
            assert_eq!(topo.triangle_count(), f, "level {}", level);
            assert_eq!(vertices.len(), v, "level {}", level);
            assert_eq!(topo.edge_count(), 3 * v - 6, "level {}", level);
        }
    }

    #[test]
    fn all_vertices_on_sphere() {
        let radius = 7.5f32;
        let (vertices, _) = MeshBuilder::build(radius, 3);
        for (i, v) in vertices.iter().enumerate() {
            assert!(
                (v.length() - radius).abs() < 1e-3,
                "vertex {} at radius {}",
                i,
                v.length()
            );
        }
    }

    #[test]
    fn rest_lengths_match_positions() {
        let (vertices, topo) = MeshBuilder::<f32>::build(3.0, 2);
        for v in 0..topo.vertex_count() as u16 {
            for e in topo.edges(v) {
                let d = vertices[v as usize].distance(vertices[e.vertex as usize]);
                assert!((d - e.rest_length).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn deterministic_construction() {
        let (a, _) = MeshBuilder::<f32>::build(4.0, 3);
        let (b, _) = MeshBuilder::<f32>::build(4.0, 3);
        assert_eq!(a, b);
    }
}
