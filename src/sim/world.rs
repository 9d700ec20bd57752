//! Rapier-backed physics world
//!
//! Owns every rapier set for one run. Collision events are collected on a
//! channel during `step` and drained into [`ContactEvent`]s right after, so
//! nothing observes them while the pipeline is running.

use crossbeam::channel::{Receiver, unbounded};
use glam::Vec2;
use rapier2d::pipeline::QueryPipeline;
use rapier2d::prelude::*;

use super::engine::{BodyState, ContactEvent, Engine};
use crate::settings::RunSettings;

/// Shape attached to a body
#[derive(Debug, Clone, Copy)]
pub enum Fixture {
    /// Axis-aligned box in body space (half extents, centre offset)
    Box {
        half_extents: Vec2,
        offset: Vec2,
        density: f32,
        friction: f32,
    },
    Circle {
        radius: f32,
        density: f32,
        friction: f32,
    },
}

impl Fixture {
    pub fn centered_box(half_extents: Vec2, density: f32, friction: f32) -> Self {
        Fixture::Box {
            half_extents,
            offset: Vec2::ZERO,
            density,
            friction,
        }
    }

    fn to_collider(self) -> Collider {
        let builder = match self {
            Fixture::Box {
                half_extents,
                offset,
                density,
                friction,
            } => ColliderBuilder::cuboid(half_extents.x, half_extents.y)
                .translation(vector![offset.x, offset.y])
                .density(density)
                .friction(friction),
            Fixture::Circle {
                radius,
                density,
                friction,
            } => ColliderBuilder::ball(radius)
                .density(density)
                .friction(friction),
        };
        builder.active_events(ActiveEvents::COLLISION_EVENTS).build()
    }
}

/// Factor from a desired hinge angle to the value rapier 0.17 is given
const REVOLUTE_LIMIT_SCALE: f32 = 2.0;

pub struct PhysicsWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    collector: ChannelEventCollector,
    collision_recv: Receiver<CollisionEvent>,
    contact_force_recv: Receiver<ContactForceEvent>,
    steps: u32,
}

impl PhysicsWorld {
    /// Empty world using the settings' timestep, gravity and solver iterations
    pub fn new(settings: &RunSettings) -> Self {
        let mut params = IntegrationParameters::default();
        params.dt = settings.time_step();
        params.max_velocity_iterations = settings.velocity_iterations;
        params.max_stabilization_iterations = settings.position_iterations;

        let (collision_send, collision_recv) = unbounded();
        let (contact_force_send, contact_force_recv) = unbounded();

        Self {
            gravity: vector![0.0, settings.gravity],
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            collector: ChannelEventCollector::new(collision_send, contact_force_send),
            collision_recv,
            contact_force_recv,
            steps: 0,
        }
    }

    /// Insert an immovable body
    pub fn add_static(&mut self, position: Vec2, fixtures: &[Fixture]) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![position.x, position.y])
            .build();
        self.insert(body, fixtures)
    }

    /// Insert a body subject to gravity and contacts
    pub fn add_dynamic(
        &mut self,
        position: Vec2,
        angle: f32,
        fixtures: &[Fixture],
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y])
            .rotation(angle)
            .build();
        self.insert(body, fixtures)
    }

    /// Hinge `body1` to `body2` at both bodies' origins, limited to `limits` (radians)
    ///
    /// rapier 0.17 enforces revolute limits at half the configured angle, so
    /// the limits are doubled before they reach the joint.
    pub fn add_hinge(
        &mut self,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        limits: [f32; 2],
    ) -> ImpulseJointHandle {
        let joint = RevoluteJointBuilder::new()
            .local_anchor1(point![0.0, 0.0])
            .local_anchor2(point![0.0, 0.0])
            .limits(limits.map(|angle| angle * REVOLUTE_LIMIT_SCALE));
        self.impulse_joints.insert(body1, body2, joint, true)
    }

    fn insert(&mut self, body: RigidBody, fixtures: &[Fixture]) -> RigidBodyHandle {
        let handle = self.bodies.insert(body);
        for fixture in fixtures {
            self.colliders
                .insert_with_parent(fixture.to_collider(), handle, &mut self.bodies);
        }
        handle
    }

    /// True for bodies that never move
    pub fn is_static(&self, body: RigidBodyHandle) -> Option<bool> {
        self.bodies.get(body).map(|b| b.is_fixed())
    }

    /// Number of shapes attached to a body
    pub fn fixture_count(&self, body: RigidBodyHandle) -> usize {
        self.bodies.get(body).map_or(0, |b| b.colliders().len())
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    /// Steps taken so far
    pub fn steps(&self) -> u32 {
        self.steps
    }

    fn parent(&self, collider: ColliderHandle) -> Option<RigidBodyHandle> {
        self.colliders.get(collider).and_then(|c| c.parent())
    }
}

impl Engine for PhysicsWorld {
    fn step(&mut self, events: &mut Vec<ContactEvent>) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.collector,
        );
        self.steps += 1;

        while let Ok(event) = self.collision_recv.try_recv() {
            let (Some(body1), Some(body2)) =
                (self.parent(event.collider1()), self.parent(event.collider2()))
            else {
                continue;
            };
            if body1 == body2 {
                continue;
            }
            events.push(if event.started() {
                ContactEvent::begin(body1, body2)
            } else {
                ContactEvent::end(body1, body2)
            });
        }
        // Force events are not used; keep the channel empty
        while self.contact_force_recv.try_recv().is_ok() {}
    }

    fn body_state(&self, body: RigidBodyHandle) -> Option<BodyState> {
        let b = self.bodies.get(body)?;
        let t = b.translation();
        let v = b.linvel();
        Some(BodyState {
            position: Vec2::new(t.x, t.y),
            angle: b.rotation().angle(),
            linvel: Vec2::new(v.x, v.y),
            angvel: b.angvel(),
        })
    }
}
