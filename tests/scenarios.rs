//! End-to-end scenarios exercising [`World`] through its public API only,
//! matching the concrete, numerically-checkable cases used to validate the
//! engine as a whole rather than any one module in isolation.

use approx::assert_relative_eq;

use impulse2d::{
    CcdMode, Circle, ColliderBuilder, InteractionGroups, Joint, Point, Polygon, RevoluteJointBuilder,
    RigidBodyBuilder, Segment, Settings, Shape, Vector, World,
};

fn box_vertices(half_width: f32, half_height: f32) -> Vec<Point> {
    let (hw, hh) = (half_width as impulse2d::Real, half_height as impulse2d::Real);
    vec![
        Point::new(-hw, -hh),
        Point::new(hw, -hh),
        Point::new(hw, hh),
        Point::new(-hw, hh),
    ]
}

#[test]
fn free_falling_disk_matches_closed_form_after_one_second() {
    let mut world = World::new(Vector::new(0.0, -10.0));
    let body = world.add_body(RigidBodyBuilder::dynamic().translation(Vector::new(0.0, 10.0)).build());
    world
        .add_fixture(body, ColliderBuilder::new(Shape::Circle(Circle::new(0.5).unwrap())).build().unwrap())
        .unwrap();

    world.step_n(1.0 / 60.0, 60).unwrap();

    let body = world.get_body(body).unwrap();
    assert_relative_eq!(body.position.translation.vector.y, 5.0, epsilon = 0.05);
    assert_relative_eq!(body.linvel.y, -10.0, epsilon = 0.1);
}

#[test]
fn elastic_head_on_collision_reverses_velocities() {
    let mut world = World::new(Vector::zeros());

    let left = world.add_body(RigidBodyBuilder::dynamic().translation(Vector::new(-3.0, 0.0)).linvel(Vector::new(5.0, 0.0)).build());
    world
        .add_fixture(
            left,
            ColliderBuilder::new(Shape::Circle(Circle::new(1.0).unwrap())).restitution(1.0).build().unwrap(),
        )
        .unwrap();

    let right = world.add_body(RigidBodyBuilder::dynamic().translation(Vector::new(3.0, 0.0)).linvel(Vector::new(-5.0, 0.0)).build());
    world
        .add_fixture(
            right,
            ColliderBuilder::new(Shape::Circle(Circle::new(1.0).unwrap())).restitution(1.0).build().unwrap(),
        )
        .unwrap();

    // give the bodies mass: attach_fixture computed mass from density already,
    // so nothing else to do here.
    world.step_n(1.0 / 60.0, 120).unwrap();

    let left_vel = world.get_body(left).unwrap().linvel.x;
    let right_vel = world.get_body(right).unwrap().linvel.x;
    assert_relative_eq!(left_vel, -5.0, epsilon = 0.05);
    assert_relative_eq!(right_vel, 5.0, epsilon = 0.05);
}

#[test]
fn stable_stack_of_boxes_settles_without_drift() {
    let mut world = World::new(Vector::new(0.0, -10.0));

    let floor = world.add_body(RigidBodyBuilder::fixed().translation(Vector::new(0.0, -0.5)).build());
    world
        .add_fixture(
            floor,
            ColliderBuilder::new(Shape::Polygon(Polygon::new(box_vertices(50.0, 0.5)).unwrap()))
                .friction(0.5)
                .build()
                .unwrap(),
        )
        .unwrap();

    let mut boxes = Vec::new();
    for i in 0..10 {
        let y = 0.5 + i as f32 + 0.5;
        let body = world.add_body(RigidBodyBuilder::dynamic().translation(Vector::new(0.0, y)).build());
        world
            .add_fixture(
                body,
                ColliderBuilder::new(Shape::Polygon(Polygon::new(box_vertices(0.5, 0.5)).unwrap()))
                    .friction(0.5)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        boxes.push(body);
    }

    world.step_n(1.0 / 60.0, 120).unwrap();

    for &body in &boxes {
        let b = world.get_body(body).unwrap();
        assert!(b.position.translation.vector.x.abs() < 0.1, "x drift = {}", b.position.translation.vector.x);
        assert!(b.angvel.abs() < 0.2, "angvel = {}", b.angvel);
    }
}

#[test]
fn pendulum_released_from_horizontal_conserves_energy_within_tolerance() {
    let mut world = World::new(Vector::new(0.0, -10.0));

    let anchor = world.add_body(RigidBodyBuilder::fixed().build());
    let bob = world.add_body(
        RigidBodyBuilder::dynamic()
            .translation(Vector::new(2.0, 0.0))
            .build(),
    );
    world
        .add_fixture(bob, ColliderBuilder::new(Shape::Circle(Circle::new(0.2).unwrap())).build().unwrap())
        .unwrap();

    let joint = RevoluteJointBuilder::new().local_anchor2(Point::new(-2.0, 0.0)).build();
    world.add_joint(Joint::Revolute(joint), anchor, bob).unwrap();

    let mass = world.get_body(bob).unwrap().mass();
    let initial_height = world.get_body(bob).unwrap().position.translation.vector.y;
    let initial_energy = mass * 10.0 * initial_height;

    world.step_n(1.0 / 60.0, 120).unwrap();

    let body = world.get_body(bob).unwrap();
    let height = body.position.translation.vector.y;
    let speed_sq = body.linvel.norm_squared();
    let energy = mass * 10.0 * height + 0.5 * mass * speed_sq;

    let drift = ((energy - initial_energy) / initial_energy).abs();
    assert!(drift < 0.05, "energy drifted by {drift}");

    let radius = (body.position.translation.vector - Vector::new(0.0, 0.0)).norm();
    assert_relative_eq!(radius, 2.0, epsilon = 0.05);
}

#[test]
fn fast_bullet_does_not_tunnel_through_thin_wall() {
    let mut settings = Settings::default();
    settings.continuous_detection_mode = CcdMode::BulletsOnly;
    let mut world = World::with_settings(Vector::zeros(), settings).unwrap();

    let wall = world.add_body(RigidBodyBuilder::fixed().build());
    world
        .add_fixture(wall, ColliderBuilder::new(Shape::Segment(Segment::new(Point::new(0.0, -5.0), Point::new(0.0, 5.0)).unwrap())).build().unwrap())
        .unwrap();

    let bullet = world.add_body(
        RigidBodyBuilder::dynamic()
            .translation(Vector::new(-10.0, 0.0))
            .linvel(Vector::new(200.0, 0.0))
            .bullet(true)
            .build(),
    );
    world
        .add_fixture(bullet, ColliderBuilder::new(Shape::Circle(Circle::new(0.05).unwrap())).restitution(0.5).build().unwrap())
        .unwrap();

    world.step_n(1.0 / 60.0, 3).unwrap();

    let body = world.get_body(bullet).unwrap();
    assert!(body.position.translation.vector.x < 0.5, "bullet tunneled through the wall: x={}", body.position.translation.vector.x);
}

#[test]
fn resting_disk_goes_to_sleep_and_wakes_on_force() {
    let mut world = World::new(Vector::new(0.0, -10.0));

    let floor = world.add_body(RigidBodyBuilder::fixed().translation(Vector::new(0.0, -50.0)).build());
    world
        .add_fixture(floor, ColliderBuilder::new(Shape::Circle(Circle::new(50.0).unwrap())).build().unwrap())
        .unwrap();

    let ball = world.add_body(RigidBodyBuilder::dynamic().translation(Vector::new(0.0, 0.5)).build());
    world
        .add_fixture(ball, ColliderBuilder::new(Shape::Circle(Circle::new(0.5).unwrap())).build().unwrap())
        .unwrap();

    world.step_n(1.0 / 60.0, 180).unwrap();

    let settled = world.get_body(ball).unwrap();
    assert!(!settled.awake, "ball should be asleep after resting for over a second");
    assert_eq!(settled.linvel, Vector::zeros());
    assert_eq!(settled.angvel, 0.0);

    world.apply_force(ball, Vector::new(0.0, 100.0)).unwrap();
    let woken = world.get_body(ball).unwrap();
    assert!(woken.awake, "applying a force must wake a sleeping body");

    let _ = InteractionGroups::all();
}
