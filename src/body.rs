//! The soft body: a closed elastic mesh behaving like a gas-filled balloon.

use crate::collision::{body_bounds, BodyContact, ContactTracker, Obstacle};
use crate::config::BodyConfig;
use crate::error::BodyError;
use crate::float::Float;
use crate::forces;
use crate::grab::{self, DistanceField, GRAB_VOLUME_FRACTION};
use crate::integrator;
use crate::mesh::MeshBuilder;
use crate::observer::StepObserver;
use crate::topology::Topology;
use crate::vec::{Aabb, Vec3};
use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

/// Damping multiplier applied while the body is badly under-inflated, to
/// bleed energy out of a mesh folding on itself.
const LOW_VOLUME_DAMPING_BOOST: f32 = 4.0;
/// Under-inflation threshold (fraction of target volume) that triggers the
/// damping boost.
const LOW_VOLUME_FRACTION: f32 = 0.9;

/// External commands read at the start of each tick.
#[derive(Clone, Debug)]
pub struct Controls<F: Float> {
    /// The grab button is held; grabbing engages only while the body is
    /// touching something and near its equilibrium volume.
    pub grab_held: bool,
    /// Grip touched surfaces by freezing contacting vertices.
    pub grip_surface: bool,
    /// Index (into the obstacle slice passed to `step`) of the obstacle
    /// the body is reaching for.
    pub grab_target: Option<usize>,
    /// Teleport the body back to its undeformed shape at this position.
    pub reset_to: Option<Vec3<F>>,
}

impl<F: Float> Default for Controls<F> {
    fn default() -> Self {
        Controls {
            grab_held: false,
            grip_surface: false,
            grab_target: None,
            reset_to: None,
        }
    }
}

/// A pressure-based soft body over a closed sphere mesh.
///
/// State lives in parallel arrays indexed by vertex id; the mesh topology
/// is fixed at construction and never mutated. One [`step`](Self::step)
/// call advances a single fixed frame: forces, grab steering, integration,
/// the stretch constraint, collision resolution, then normals and volume
/// for the next frame.
pub struct SoftBody<F: Float> {
    config: BodyConfig<F>,
    topology: Topology<F>,

    positions: Vec<Vec3<F>>,
    previous_positions: Vec<Vec3<F>>,
    /// Construction-time vertex offsets from the centroid, for shape resets.
    original_offsets: Vec<Vec3<F>>,
    accelerations: Vec<Vec3<F>>,
    frozen: Vec<bool>,
    vertex_normals: Vec<Vec3<F>>,
    triangle_normals: Vec<Vec3<F>>,

    distance_field: DistanceField,
    tracker: ContactTracker,

    volume: F,
    target_volume: F,
    compression: F,
    centroid: Vec3<F>,
    previous_centroid: Vec3<F>,
    bounds: Aabb<F>,
    touching: bool,
    grabbing: bool,
    footing: Option<usize>,
}

impl<F: Float> SoftBody<F> {
    /// Build a body from the configuration, centered at `center`.
    pub fn new(config: BodyConfig<F>, center: Vec3<F>) -> Result<Self, BodyError> {
        config.validate()?;

        let (offsets, topology) = MeshBuilder::build(config.radius, config.subdivision);
        let vertex_count = offsets.len();

        let positions: Vec<Vec3<F>> = offsets.iter().map(|&o| o + center).collect();
        let mut body = SoftBody {
            positions: positions.clone(),
            previous_positions: positions,
            original_offsets: offsets,
            accelerations: vec![Vec3::zero(); vertex_count],
            frozen: vec![false; vertex_count],
            vertex_normals: vec![Vec3::zero(); vertex_count],
            triangle_normals: vec![Vec3::zero(); topology.triangle_count()],
            distance_field: DistanceField::new(vertex_count),
            tracker: ContactTracker::new(),
            volume: F::zero(),
            target_volume: F::zero(),
            compression: F::one(),
            centroid: center,
            previous_centroid: center,
            bounds: Aabb::new(center, center),
            touching: false,
            grabbing: false,
            footing: None,
            topology,
            config,
        };

        body.update_normals_and_volume();
        body.target_volume = match body.config.target_volume {
            Some(v) => v,
            None => body.volume,
        };
        body.bounds = body_bounds(&body.positions);
        log::debug!(
            "soft body ready: {} vertices, {} edges, volume {:?}",
            body.topology.vertex_count(),
            body.topology.edge_count(),
            body.volume
        );
        Ok(body)
    }

    /// Advance one fixed frame step.
    ///
    /// `obstacles` is the full obstacle set for this frame; indices into it
    /// identify the grab target, the footing, and the contact transitions
    /// reported to `observer`.
    pub fn step<O: StepObserver>(
        &mut self,
        obstacles: &mut [Box<dyn Obstacle<F>>],
        controls: &Controls<F>,
        observer: &mut O,
    ) {
        if let Some(position) = controls.reset_to {
            self.reset_position(position);
        }

        let grab_requested = controls.grab_held && self.touching;

        if !controls.grip_surface {
            for f in self.frozen.iter_mut() {
                *f = false;
            }
        }

        // Pressure from last frame's volume, with the floor keeping the
        // 1/V term bounded and the collapse guard resetting a mesh that
        // has folded past saving.
        self.compression = self.target_volume / self.volume.max(F::from_f32(1e-6));
        let mut pressure_scale = F::zero();
        if self.volume < self.config.collapse_fraction * self.target_volume {
            self.reset_mesh();
            observer.on_mesh_reset();
            log::warn!(
                "volume {:?} collapsed below floor; mesh reset at centroid",
                self.volume
            );
        } else {
            let floored = self
                .volume
                .max(self.config.pressure_floor_fraction * self.target_volume);
            pressure_scale = self.config.pressure_gain
                * (F::one() / floored - F::one() / self.target_volume);
        }

        // While resting on something, gravity is off so the body does not
        // drip over the edges of its support.
        let gravity = if self.touching {
            Vec3::zero()
        } else {
            self.config.gravity
        };
        forces::apply_ambient(&mut self.accelerations, &self.vertex_normals, gravity, pressure_scale);
        forces::apply_springs(
            &mut self.accelerations,
            &self.positions,
            &self.topology,
            self.config.spring_constant,
        );

        self.steer_toward_target(obstacles, controls, grab_requested);

        let damping = if self.volume < F::from_f32(LOW_VOLUME_FRACTION) * self.target_volume {
            self.config.damping * F::from_f32(LOW_VOLUME_DAMPING_BOOST)
        } else {
            self.config.damping
        };
        self.previous_centroid = self.centroid;
        self.centroid = integrator::integrate(
            &mut self.positions,
            &mut self.previous_positions,
            &self.accelerations,
            &self.frozen,
            damping,
            self.config.max_acceleration,
        );

        integrator::constrain_edge_lengths(
            &mut self.positions,
            &self.frozen,
            &self.topology,
            self.config.max_stretch,
            integrator::iterations_for_compression(self.compression),
        );

        self.bounds = body_bounds(&self.positions);
        let mut contact = BodyContact {
            positions: &mut self.positions,
            previous_positions: &mut self.previous_positions,
            frozen: &mut self.frozen,
            centroid: self.centroid,
            grip: controls.grip_surface,
            push_off: false,
        };
        let outcome = self.tracker.sweep(
            obstacles,
            &mut contact,
            self.grabbing,
            controls.grab_target,
            |index, began| {
                if began {
                    observer.on_contact_begin(index);
                } else {
                    observer.on_contact_end(index);
                }
            },
        );
        self.touching = outcome.touching_any;

        if outcome.footing != self.footing {
            if let Some(old) = self.footing {
                observer.on_dismount(old);
            }
            if let Some(new) = outcome.footing {
                observer.on_mount(new);
            }
            self.footing = outcome.footing;
        }

        self.update_normals_and_volume();
        observer.on_step_complete();
    }

    /// Grab bias, unwinding, and terrain crawling, all driven by the grab
    /// target and the distance field.
    fn steer_toward_target(
        &mut self,
        obstacles: &[Box<dyn Obstacle<F>>],
        controls: &Controls<F>,
        grab_requested: bool,
    ) {
        self.grabbing = false;
        let target_index = match controls.grab_target {
            Some(i) if i < obstacles.len() => i,
            _ => return,
        };
        let target_position = obstacles[target_index].position();

        // The footing index was recorded against last frame's obstacle
        // slice; the caller may pass a different one now, so a stale
        // out-of-range index is dropped rather than chased.
        let footing = self.footing.filter(|&f| f < obstacles.len());
        let on_terrain = footing.map_or(false, |f| obstacles[f].is_terrain());

        // Grabbing while under-inflated folds the mesh inside out, so the
        // pull only engages near equilibrium volume.
        if grab_requested
            && self.volume > F::from_f32(GRAB_VOLUME_FRACTION) * self.target_volume
        {
            self.grabbing = true;
            let anchor = grab::apply_grab_bias(
                &mut self.accelerations,
                &self.positions,
                target_position,
                obstacles[target_index].radius_sq(),
                on_terrain,
            );
            self.distance_field.compute(&self.topology, anchor);

            // Wrapped around a discrete footing that is not the target:
            // peel the far side loose.
            if let Some(footing) = footing {
                if footing != target_index && !obstacles[footing].is_terrain() {
                    grab::apply_unwind(
                        &mut self.accelerations,
                        &self.positions,
                        &self.topology,
                        &self.distance_field,
                    );
                }
            }
        }

        if on_terrain {
            let terrain_height = footing.map_or(F::zero(), |f| obstacles[f].position().y);
            grab::apply_crawl(
                &mut self.accelerations,
                &self.positions,
                self.centroid,
                target_position,
                terrain_height,
            );
        }
    }

    /// Restore every vertex to its construction-time offset translated by
    /// the current centroid.
    fn reset_mesh(&mut self) {
        for i in 0..self.positions.len() {
            let p = self.original_offsets[i] + self.centroid;
            self.positions[i] = p;
            self.previous_positions[i] = p;
        }
    }

    /// Teleport the body to `position` in its undeformed shape, at rest.
    pub fn reset_position(&mut self, position: Vec3<F>) {
        self.centroid = position;
        self.previous_centroid = position;
        self.reset_mesh();
        self.update_normals_and_volume();
    }

    /// Recompute triangle normals, vertex normals, and the enclosed volume.
    ///
    /// The volume is the divergence-theorem sum of `area_vector.x * x` over
    /// triangles, with pre-halved area vectors throughout, so it equals the
    /// true signed volume of the consistently wound mesh.
    fn update_normals_and_volume(&mut self) {
        let mut volume = F::zero();
        for (t, tri) in self.topology.triangles().iter().enumerate() {
            let a = self.positions[tri[0] as usize];
            let b = self.positions[tri[1] as usize];
            let c = self.positions[tri[2] as usize];
            let area_vector = (a - c).cross(a - b).scale(F::half());
            volume = volume + area_vector.x * a.x;
            self.triangle_normals[t] = area_vector.normalize();
        }
        self.volume = volume;

        for v in 0..self.vertex_normals.len() {
            let mut n = Vec3::zero();
            for &t in self.topology.adjacent_triangles(v as u16) {
                n = n + self.triangle_normals[t as usize];
            }
            let len_sq = n.length_sq();
            if len_sq > F::from_f32(1e-4) {
                n = n.scale(F::one() / len_sq.sqrt());
            }
            self.vertex_normals[v] = n;
        }
    }

    // ---- read-only surface for rendering and inspection ----

    /// Current vertex positions.
    pub fn positions(&self) -> &[Vec3<F>] {
        &self.positions
    }

    /// Vertex positions from the previous frame.
    pub fn previous_positions(&self) -> &[Vec3<F>] {
        &self.previous_positions
    }

    /// Approximate per-vertex surface normals.
    pub fn normals(&self) -> &[Vec3<F>] {
        &self.vertex_normals
    }

    /// Triangle index triples; fixed after construction.
    pub fn triangles(&self) -> &[[u16; 3]] {
        self.topology.triangles()
    }

    /// The mesh connectivity tables.
    pub fn topology(&self) -> &Topology<F> {
        &self.topology
    }

    /// Enclosed volume as of the end of the last step.
    pub fn volume(&self) -> F {
        self.volume
    }

    /// The equilibrium volume the pressure term drives toward.
    pub fn target_volume(&self) -> F {
        self.target_volume
    }

    /// Replace the equilibrium volume.
    pub fn set_target_volume(&mut self, volume: F) {
        self.target_volume = volume;
    }

    /// Nudge the equilibrium volume, clamped below by `floor`. This is the
    /// inflate/deflate control.
    pub fn adjust_target_volume(&mut self, delta: F, floor: F) {
        self.target_volume = (self.target_volume + delta).max(floor);
    }

    /// Target volume over current volume; above 1 means under-inflated.
    pub fn compression(&self) -> F {
        self.compression
    }

    /// Mean of all vertex positions.
    pub fn centroid(&self) -> Vec3<F> {
        self.centroid
    }

    /// Centroid from the previous frame.
    pub fn previous_centroid(&self) -> Vec3<F> {
        self.previous_centroid
    }

    /// Bounding box as of the last collision sweep.
    pub fn bounds(&self) -> Aabb<F> {
        self.bounds
    }

    /// Whether any obstacle was touched last frame.
    pub fn touching(&self) -> bool {
        self.touching
    }

    /// Whether the body was actively reaching for its target last frame.
    pub fn grabbing(&self) -> bool {
        self.grabbing
    }

    /// Index of the obstacle the body rests on, if any.
    pub fn footing(&self) -> Option<usize> {
        self.footing
    }

    /// Per-vertex frozen flags.
    pub fn frozen(&self) -> &[bool] {
        &self.frozen
    }

    /// Freeze or unfreeze a vertex. Frozen vertices are excluded from
    /// integration and constraint solving until released.
    pub fn set_frozen(&mut self, vertex: u16, frozen: bool) {
        self.frozen[vertex as usize] = frozen;
    }

    /// Hop distances from the last grab anchor.
    pub fn distance_field(&self) -> &DistanceField {
        &self.distance_field
    }

    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
