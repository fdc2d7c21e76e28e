use squish::{
    BodyConfig, Controls, HalfSpace, Obstacle, SoftBody, StepObserver, Vec3,
};

#[derive(Default)]
struct Recorder {
    begins: Vec<usize>,
    ends: Vec<usize>,
    mounts: Vec<usize>,
    dismounts: Vec<usize>,
}

impl StepObserver for Recorder {
    fn on_contact_begin(&mut self, obstacle: usize) {
        self.begins.push(obstacle);
    }
    fn on_contact_end(&mut self, obstacle: usize) {
        self.ends.push(obstacle);
    }
    fn on_mount(&mut self, obstacle: usize) {
        self.mounts.push(obstacle);
    }
    fn on_dismount(&mut self, obstacle: usize) {
        self.dismounts.push(obstacle);
    }
}

#[test]
fn contact_transitions_stay_balanced() {
    let config = BodyConfig::<f32>::new().with_subdivision(2);
    let mut body = SoftBody::new(config, Vec3::new(0.0, 12.0, 0.0)).unwrap();
    let mut obstacles: Vec<Box<dyn Obstacle<f32>>> = vec![Box::new(HalfSpace::new(0.0))];
    let controls = Controls::default();
    let mut recorder = Recorder::default();

    for _ in 0..200 {
        body.step(&mut obstacles, &controls, &mut recorder);
    }

    // A bouncing body may make and break contact repeatedly, but every
    // transition pairs up and all of them name the one obstacle.
    assert!(!recorder.begins.is_empty(), "the drop must land at least once");
    assert!(recorder.begins.iter().all(|&o| o == 0));
    assert!(recorder.ends.iter().all(|&o| o == 0));
    assert!(recorder.mounts.iter().all(|&o| o == 0));
    let open_contacts = if body.touching() { 1 } else { 0 };
    assert_eq!(recorder.begins.len(), recorder.ends.len() + open_contacts);
    let open_mounts = if body.footing().is_some() { 1 } else { 0 };
    assert_eq!(recorder.mounts.len(), recorder.dismounts.len() + open_mounts);

    // Teleport far above the ground; the next sweep closes everything.
    let reset = Controls {
        reset_to: Some(Vec3::new(0.0, 500.0, 0.0)),
        ..Controls::default()
    };
    body.step(&mut obstacles, &reset, &mut recorder);

    assert!(!body.touching());
    assert_eq!(body.footing(), None);
    assert_eq!(recorder.begins.len(), recorder.ends.len());
    assert_eq!(recorder.mounts.len(), recorder.dismounts.len());
}

/// Obstacle stub that reports contact unconditionally from a fixed height.
struct AlwaysTouching {
    height: f32,
}

impl Obstacle<f32> for AlwaysTouching {
    fn position(&self) -> Vec3<f32> {
        Vec3::new(0.0, self.height, 0.0)
    }
    fn test_collisions(&mut self, _contact: &mut squish::BodyContact<'_, f32>) -> bool {
        true
    }
}

#[test]
fn footing_is_the_lowest_touched_obstacle() {
    let mut tracker = squish::ContactTracker::new();
    let mut obstacles: Vec<Box<dyn Obstacle<f32>>> = vec![
        Box::new(AlwaysTouching { height: 8.0 }),
        Box::new(AlwaysTouching { height: -2.0 }),
        Box::new(AlwaysTouching { height: 3.0 }),
    ];
    let mut positions = vec![Vec3::<f32>::zero()];
    let mut previous = vec![Vec3::<f32>::zero()];
    let mut frozen = vec![false];
    let mut contact = squish::BodyContact {
        positions: &mut positions,
        previous_positions: &mut previous,
        frozen: &mut frozen,
        centroid: Vec3::zero(),
        grip: false,
        push_off: false,
    };

    let mut began = Vec::new();
    let outcome = tracker.sweep(&mut obstacles, &mut contact, false, None, |i, b| {
        if b {
            began.push(i);
        }
    });

    assert!(outcome.touching_any);
    assert_eq!(outcome.footing, Some(1), "lowest obstacle wins the footing");
    assert_eq!(began, vec![0, 1, 2], "all three contacts opened this sweep");
}
