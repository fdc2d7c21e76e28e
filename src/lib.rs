//! Pressure-based 3D soft bodies for games.
//!
//! `squish` simulates a gas-filled balloon: a closed sphere mesh whose
//! vertices are driven by gravity, internal pressure, and edge springs,
//! integrated with position-based Verlet dynamics and kept sane by a hard
//! stretch constraint. The body collides with pluggable obstacles, can grip
//! surfaces, and can reach for and grab obstacles, unwinding itself off
//! whatever it is wrapped around.
//!
//! # Features
//!
//! - **Sphere mesh builder**: Octahedron subdivision with shared-vertex
//!   topology tables
//! - **Pressure dynamics**: Volume-coupled inflation toward a target volume
//! - **Verlet integration**: Implicit velocity, per-frame damping,
//!   iterative max-stretch constraint
//! - **Obstacle trait**: Half-spaces, orbs, and blocks included; bring your
//!   own geometry
//! - **Grab steering**: BFS distance field, target bias, unwind, and crawl
//! - **Observable**: Contact and mount transitions via the `StepObserver`
//!   trait
//! - **`no_std` compatible**: Works in embedded and WASM environments
//!
//! # Quick start
//!
//! ```
//! use squish::{BodyConfig, Controls, HalfSpace, NoOpStepObserver, Obstacle, SoftBody, Vec3};
//!
//! let config = BodyConfig::<f32>::new().with_subdivision(2);
//! let mut body = SoftBody::new(config, Vec3::new(0.0, 15.0, 0.0)).unwrap();
//! let mut obstacles: Vec<Box<dyn Obstacle<f32>>> = vec![Box::new(HalfSpace::new(0.0))];
//! let controls = Controls::default();
//! for _ in 0..10 {
//!     body.step(&mut obstacles, &controls, &mut NoOpStepObserver);
//! }
//! assert!(body.volume() > 0.0);
//! ```

#![no_std]

extern crate alloc;

pub mod body;
pub mod collision;
pub mod config;
pub mod error;
pub mod float;
pub mod forces;
pub mod grab;
pub mod integrator;
pub mod mesh;
pub mod observer;
pub mod obstacles;
pub mod topology;
pub mod vec;

// Re-export primary API
pub use body::{Controls, SoftBody};
pub use collision::{BodyContact, ContactTracker, Obstacle, SweepOutcome};
pub use config::BodyConfig;
pub use error::BodyError;
pub use float::Float;
pub use grab::DistanceField;
pub use mesh::{MeshBuilder, MAX_SUBDIVISION};
pub use observer::{NoOpStepObserver, StepObserver};
pub use obstacles::{Block, HalfSpace, Orb};
pub use topology::{Edge, Topology};
pub use vec::{Aabb, Vec3};
