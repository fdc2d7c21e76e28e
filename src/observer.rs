//! Step observer trait for monitoring simulation transitions.

/// Trait for observing per-frame state transitions of a soft body.
///
/// Contact and footing changes are reported here exactly once per
/// transition, replacing hidden per-obstacle event fields with an explicit
/// listener handed to [`SoftBody::step`](crate::body::SoftBody::step).
/// Degeneracy recovery (the emergency mesh reset) is also surfaced so an
/// observability layer can instrument it. All methods default to no-ops.
pub trait StepObserver {
    /// The body started touching the obstacle at `obstacle` (its index in
    /// the slice passed to `step`).
    fn on_contact_begin(&mut self, _obstacle: usize) {}

    /// The body stopped touching the obstacle.
    fn on_contact_end(&mut self, _obstacle: usize) {}

    /// The obstacle became the body's footing (the lowest touched
    /// obstacle, i.e. what it rests on).
    fn on_mount(&mut self, _obstacle: usize) {}

    /// The obstacle stopped being the body's footing.
    fn on_dismount(&mut self, _obstacle: usize) {}

    /// The mesh collapsed below the volume floor and was reset to its
    /// original shape at the current centroid.
    fn on_mesh_reset(&mut self) {}

    /// A frame step fully completed.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer for callers that don't need transition reporting.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
