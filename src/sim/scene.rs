//! Scene construction
//!
//! Materializes a [`SceneLayout`] as rigid bodies: platform, landing ledge,
//! dominoes, ball, and a hinged beam with a cup at each end.

use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;

use super::world::{Fixture, PhysicsWorld};
use crate::consts::*;
use crate::error::Result;
use crate::scenario::SceneLayout;

/// Handles to the bodies the tracker cares about
#[derive(Debug, Clone)]
pub struct SceneBodies {
    /// All dominoes, in increasing x
    pub dominoes: Vec<RigidBodyHandle>,
    pub first_domino: RigidBodyHandle,
    pub last_domino: RigidBodyHandle,
    pub ball: RigidBodyHandle,
    pub beam: RigidBodyHandle,
    pub platform: RigidBodyHandle,
    pub ledge: RigidBodyHandle,
    pub fulcrum: RigidBodyHandle,
}

/// Build the full scene into `world`
///
/// Fails before touching the world if the layout is invalid.
pub fn build_scene(world: &mut PhysicsWorld, layout: &SceneLayout) -> Result<SceneBodies> {
    layout.validate()?;

    let platform = world.add_static(
        Vec2::from(PLATFORM_CENTER),
        &[Fixture::centered_box(
            Vec2::from(PLATFORM_HALF_EXTENTS),
            1.0,
            DOMINO_FRICTION,
        )],
    );
    let ledge = world.add_static(
        Vec2::from(layout.ledge_position()),
        &[Fixture::centered_box(
            Vec2::from(LEDGE_HALF_EXTENTS),
            1.0,
            DOMINO_FRICTION,
        )],
    );

    let dominoes = spawn_dominoes(world, layout);
    let ball = spawn_ball(world, layout);
    let (beam, fulcrum) = spawn_beam(world, layout);

    // validate() guarantees at least one domino
    let first_domino = dominoes[0];
    let last_domino = dominoes[dominoes.len() - 1];

    log::info!(
        "Scene built: {} dominoes ({}x{}), ball at x={}, beam at x={}",
        dominoes.len(),
        layout.domino_width,
        layout.domino_height,
        layout.ball_x,
        layout.beam_position().0
    );

    Ok(SceneBodies {
        dominoes,
        first_domino,
        last_domino,
        ball,
        beam,
        platform,
        ledge,
        fulcrum,
    })
}

/// One dynamic box per domino position; the leftmost starts tilted
pub fn spawn_dominoes(world: &mut PhysicsWorld, layout: &SceneLayout) -> Vec<RigidBodyHandle> {
    let half = Vec2::new(layout.domino_width / 2.0, layout.domino_height / 2.0);
    let y = layout.domino_y();
    layout
        .domino_xs
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            world.add_dynamic(
                Vec2::new(x, y),
                layout.domino_angle(i),
                &[Fixture::centered_box(half, DOMINO_DENSITY, DOMINO_FRICTION)],
            )
        })
        .collect()
}

fn spawn_ball(world: &mut PhysicsWorld, layout: &SceneLayout) -> RigidBodyHandle {
    world.add_dynamic(
        Vec2::new(layout.ball_x, layout.ball_y()),
        0.0,
        &[Fixture::Circle {
            radius: BALL_RADIUS,
            density: BALL_DENSITY,
            friction: BALL_FRICTION,
        }],
    )
}

/// Beam plank plus four cup walls, hinged to a static fulcrum at its centre
fn spawn_beam(world: &mut PhysicsWorld, layout: &SceneLayout) -> (RigidBodyHandle, RigidBodyHandle) {
    let position = Vec2::from(layout.beam_position());

    let mut fixtures = vec![Fixture::centered_box(
        Vec2::new(BEAM_LENGTH / 2.0, BEAM_THICKNESS / 2.0),
        BEAM_DENSITY,
        BEAM_FRICTION,
    )];
    fixtures.extend(cup_walls().into_iter().map(|offset| Fixture::Box {
        half_extents: Vec2::new(WALL_THICKNESS / 2.0, CUP_HEIGHT / 2.0),
        offset,
        density: BEAM_DENSITY,
        friction: BEAM_FRICTION,
    }));

    let beam = world.add_dynamic(position, 0.0, &fixtures);
    let fulcrum = world.add_static(position, &[]);
    world.add_hinge(beam, fulcrum, [-BEAM_ANGLE_LIMIT, BEAM_ANGLE_LIMIT]);
    (beam, fulcrum)
}

/// Wall centres in beam space: outer and inner wall of the left cup, then
/// of the right cup. Each wall's faces sit at `cup_width/2 ∓ wall_thickness/2`
/// from its cup centre.
pub fn cup_walls() -> [Vec2; 4] {
    let left_cup = -BEAM_LENGTH / 2.0 + CUP_WIDTH / 2.0;
    let right_cup = BEAM_LENGTH / 2.0 - CUP_WIDTH / 2.0;
    [
        Vec2::new(left_cup - CUP_WIDTH / 2.0, 0.0),
        Vec2::new(left_cup + CUP_WIDTH / 2.0, 0.0),
        Vec2::new(right_cup - CUP_WIDTH / 2.0, 0.0),
        Vec2::new(right_cup + CUP_WIDTH / 2.0, 0.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::scenario::ScenarioConfig;
    use crate::settings::RunSettings;
    use crate::sim::engine::Engine;

    fn build(params: &[f32]) -> (PhysicsWorld, SceneBodies, SceneLayout) {
        let layout = ScenarioConfig::from_params(params).unwrap().layout().unwrap();
        let mut world = PhysicsWorld::new(&RunSettings::default());
        let bodies = build_scene(&mut world, &layout).unwrap();
        (world, bodies, layout)
    }

    #[test]
    fn test_body_topology() {
        let (world, bodies, _) = build(&[0.5, 0.2, 1.0, 5.0, 0.1, 0.0]);
        assert_eq!(bodies.dominoes.len(), 5);
        // platform, ledge, 5 dominoes, ball, beam, fulcrum
        assert_eq!(world.body_count(), 10);
        assert_eq!(world.joint_count(), 1);
        assert_eq!(world.fixture_count(bodies.beam), 5);
        assert_eq!(world.fixture_count(bodies.fulcrum), 0);
        assert_eq!(world.is_static(bodies.platform), Some(true));
        assert_eq!(world.is_static(bodies.ledge), Some(true));
        assert_eq!(world.is_static(bodies.fulcrum), Some(true));
        assert_eq!(world.is_static(bodies.beam), Some(false));
        assert_eq!(world.is_static(bodies.ball), Some(false));
        assert_eq!(bodies.first_domino, bodies.dominoes[0]);
        assert_eq!(bodies.last_domino, bodies.dominoes[4]);
    }

    #[test]
    fn test_initial_poses() {
        let (world, bodies, layout) = build(&[0.5, 0.2, 1.0, 5.0, 0.1, 0.0]);
        let first = world.body_state(bodies.first_domino).unwrap();
        assert!((first.angle - PUSH_ANGLE).abs() < 1e-6);
        for &domino in &bodies.dominoes[1..] {
            assert_eq!(world.body_state(domino).unwrap().angle, 0.0);
        }

        let ball = world.body_state(bodies.ball).unwrap();
        assert!((ball.position.x - layout.ball_x).abs() < 1e-5);
        assert!((ball.position.y - 6.5).abs() < 1e-5);

        let beam = world.body_state(bodies.beam).unwrap();
        assert_eq!(beam.position, Vec2::new(32.0, 2.0));
        assert_eq!(beam.angle, 0.0);
        let fulcrum = world.body_state(bodies.fulcrum).unwrap();
        assert_eq!(fulcrum.position, beam.position);
    }

    #[test]
    fn test_dominoes_increase_uniformly() {
        let (world, bodies, _) = build(&[0.4, 0.3, 1.5, 8.0, 0.1, 0.0]);
        let xs: Vec<f32> = bodies
            .dominoes
            .iter()
            .map(|&d| world.body_state(d).unwrap().position.x)
            .collect();
        for pair in xs.windows(2) {
            assert!(pair[1] > pair[0]);
            assert!((pair[1] - pair[0] - 0.7).abs() < 1e-4);
        }
    }

    #[test]
    fn test_identical_layouts_build_identical_poses() {
        let (world_a, bodies_a, _) = build(&[0.5, 0.2, 1.0, 6.0, 0.6, 0.0]);
        let (world_b, bodies_b, _) = build(&[0.5, 0.2, 1.0, 6.0, 0.6, 0.0]);
        for (&a, &b) in bodies_a.dominoes.iter().zip(&bodies_b.dominoes) {
            assert_eq!(world_a.body_state(a), world_b.body_state(b));
        }
        assert_eq!(
            world_a.body_state(bodies_a.ball),
            world_b.body_state(bodies_b.ball)
        );
    }

    #[test]
    fn test_invalid_layout_leaves_world_empty() {
        let layout = SceneLayout {
            domino_width: 0.2,
            domino_height: 1.0,
            domino_xs: Vec::new(),
            ball_x: 6.0,
            hole_size: 0.0,
        };
        let mut world = PhysicsWorld::new(&RunSettings::default());
        let err = build_scene(&mut world, &layout).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_cup_walls_hold_the_ball() {
        let walls = cup_walls();
        // Inner gap of each cup must fit the ball
        let left_gap = (walls[1].x - walls[0].x) - WALL_THICKNESS;
        let right_gap = (walls[3].x - walls[2].x) - WALL_THICKNESS;
        assert!(left_gap > 2.0 * BALL_RADIUS);
        assert!((left_gap - right_gap).abs() < 1e-6);
        // Outer walls sit on the beam ends
        assert!((walls[0].x + BEAM_LENGTH / 2.0).abs() < 1e-6);
        assert!((walls[3].x - BEAM_LENGTH / 2.0).abs() < 1e-6);
    }
}
