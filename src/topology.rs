//! Fixed mesh topology tables: triangles, adjacency, and the two edge views.

use crate::float::Float;
use alloc::vec::Vec;

/// A spring edge, stored on one endpoint and naming the other.
///
/// The rest length is the undeformed distance between the endpoints,
/// fixed when the mesh is built.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge<F: Float> {
    /// The vertex this edge joins to.
    pub vertex: u16,
    /// Undeformed length of the edge.
    pub rest_length: F,
}

/// The connectivity of a built mesh. Read-only after construction.
///
/// Edges are held in two views: an asymmetric one where each edge appears
/// exactly once, owned by its lower-indexed endpoint (used for spring
/// forces and the stretch constraint so no edge is processed twice), and a
/// symmetric one where each edge is reachable from both endpoints (used
/// for breadth-first traversal).
pub struct Topology<F: Float> {
    triangles: Vec<[u16; 3]>,
    adjacent_triangles: Vec<Vec<u16>>,
    edges: Vec<Vec<Edge<F>>>,
    symmetric_edges: Vec<Vec<Edge<F>>>,
}

impl<F: Float> Topology<F> {
    pub(crate) fn new(
        triangles: Vec<[u16; 3]>,
        adjacent_triangles: Vec<Vec<u16>>,
        edges: Vec<Vec<Edge<F>>>,
        symmetric_edges: Vec<Vec<Edge<F>>>,
    ) -> Self {
        let topology = Topology { triangles, adjacent_triangles, edges, symmetric_edges };
        topology.debug_validate();
        topology
    }

    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of unique edges in the mesh.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(|list| list.len()).sum()
    }

    /// All triangles as vertex index triples.
    pub fn triangles(&self) -> &[[u16; 3]] {
        &self.triangles
    }

    /// Indices of the triangles touching vertex `v`.
    pub fn adjacent_triangles(&self, v: u16) -> &[u16] {
        &self.adjacent_triangles[v as usize]
    }

    /// Edges owned by vertex `v` (asymmetric view: `v` is always the
    /// lower-indexed endpoint).
    pub fn edges(&self, v: u16) -> &[Edge<F>] {
        &self.edges[v as usize]
    }

    /// All neighbors of vertex `v` (symmetric view).
    pub fn neighbors(&self, v: u16) -> &[Edge<F>] {
        &self.symmetric_edges[v as usize]
    }

    /// Consistency checks between the tables. Inconsistency here is a
    /// mesh-construction bug, not a runtime condition, so this fails fast
    /// in debug builds and compiles out in release.
    fn debug_validate(&self) {
        debug_assert_eq!(self.adjacent_triangles.len(), self.edges.len());
        debug_assert_eq!(self.symmetric_edges.len(), self.edges.len());
        debug_assert_eq!(
            self.symmetric_edges.iter().map(|l| l.len()).sum::<usize>(),
            2 * self.edge_count(),
            "symmetric view must hold every edge twice"
        );
        #[cfg(debug_assertions)]
        for (v, list) in self.edges.iter().enumerate() {
            for e in list {
                debug_assert!(
                    (e.vertex as usize) > v,
                    "asymmetric edge {} -> {} not owned by its lower endpoint",
                    v,
                    e.vertex
                );
                debug_assert!((e.vertex as usize) < self.edges.len());
            }
        }
    }
}
