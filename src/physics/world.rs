//! Physics world wrapper.
//!
//! Owns every rapier2d set needed to simulate rigid bodies and exposes the
//! small factory surface entities need: create a body from a [`BodyDef`],
//! attach fixtures from a [`FixtureDef`], destroy bodies, and step time.
//! Positions are exchanged as raylib `Vector2` in world units (meters, y up).
//!
//! `step(dt)` splits `dt` into equal sub-steps no longer than `max_substep`
//! so a one-second step integrates like sixty frames.

use std::fmt;

use bevy_ecs::prelude::Resource;
use log::{debug, warn};
use raylib::prelude::Vector2;
use rapier2d::prelude::{
    CCDSolver, ColliderBuilder, ColliderHandle, ColliderSet, DefaultBroadPhase, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline,
    QueryPipeline, Real, RigidBodyBuilder, RigidBodyHandle, RigidBodySet, RigidBodyType,
    SharedShape, Vector, vector,
};
use rustc_hash::FxHashMap;
use thiserror::Error;

pub const DEFAULT_GRAVITY: Vector2 = Vector2 { x: 0.0, y: -9.8 };
pub const DEFAULT_MAX_SUBSTEP: f32 = 1.0 / 60.0;
/// Upper bound on sub-steps per `step` call; time beyond it is dropped.
pub const MAX_SUBSTEPS: u32 = 240;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("invalid body definition: {0}")]
    InvalidBody(String),
    #[error("invalid fixture definition: {0}")]
    InvalidFixture(String),
    #[error("body does not exist in this world")]
    UnknownBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Static,
    Kinematic,
    Dynamic,
}

impl From<BodyType> for RigidBodyType {
    fn from(body_type: BodyType) -> Self {
        match body_type {
            BodyType::Static => RigidBodyType::Fixed,
            BodyType::Kinematic => RigidBodyType::KinematicPositionBased,
            BodyType::Dynamic => RigidBodyType::Dynamic,
        }
    }
}

impl From<RigidBodyType> for BodyType {
    fn from(body_type: RigidBodyType) -> Self {
        match body_type {
            RigidBodyType::Fixed => BodyType::Static,
            RigidBodyType::Dynamic => BodyType::Dynamic,
            RigidBodyType::KinematicPositionBased | RigidBodyType::KinematicVelocityBased => {
                BodyType::Kinematic
            }
        }
    }
}

/// Handle to a body owned by a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// Handle to a fixture (collider) attached to a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixtureHandle(ColliderHandle);

/// Collision shape. Cheap to clone; the geometry is shared.
#[derive(Clone)]
pub struct Shape(SharedShape);

impl Shape {
    /// Axis-aligned box from half extents.
    pub fn cuboid(half_width: f32, half_height: f32) -> Self {
        Self(SharedShape::cuboid(half_width, half_height))
    }

    pub fn ball(radius: f32) -> Self {
        Self(SharedShape::ball(radius))
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({:?})", self.0.shape_type())
    }
}

/// Parameters for [`PhysicsWorld::create_body`].
#[derive(Debug, Clone, Copy)]
pub struct BodyDef {
    pub body_type: BodyType,
    pub position: Vector2,
    /// Radians.
    pub angle: f32,
    pub allow_sleep: bool,
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            body_type: BodyType::Static,
            position: Vector2 { x: 0.0, y: 0.0 },
            angle: 0.0,
            allow_sleep: true,
        }
    }
}

/// Parameters for [`PhysicsWorld::create_fixture`].
#[derive(Debug, Clone)]
pub struct FixtureDef {
    pub shape: Shape,
    pub density: f32,
    pub friction: f32,
}

impl FixtureDef {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            density: 0.0,
            friction: 0.2,
        }
    }
}

fn to_rapier(v: Vector2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn from_rapier(v: &Vector<Real>) -> Vector2 {
    Vector2 { x: v.x, y: v.y }
}

#[derive(Resource)]
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    max_substep: f32,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    sleep_allowed: FxHashMap<RigidBodyHandle, bool>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY, DEFAULT_MAX_SUBSTEP)
    }
}

impl PhysicsWorld {
    /// `max_substep` is clamped to a small positive value.
    pub fn new(gravity: Vector2, max_substep: f32) -> Self {
        let max_substep = if max_substep.is_finite() && max_substep > 0.0 {
            max_substep
        } else {
            DEFAULT_MAX_SUBSTEP
        };
        Self {
            gravity: to_rapier(gravity),
            max_substep,
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            sleep_allowed: FxHashMap::default(),
        }
    }

    pub fn gravity(&self) -> Vector2 {
        from_rapier(&self.gravity)
    }

    pub fn set_gravity(&mut self, gravity: Vector2) {
        self.gravity = to_rapier(gravity);
    }

    pub fn max_substep(&self) -> f32 {
        self.max_substep
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn contains(&self, body: BodyHandle) -> bool {
        self.bodies.contains(body.0)
    }

    pub fn create_body(&mut self, def: &BodyDef) -> Result<BodyHandle, PhysicsError> {
        if !def.position.x.is_finite() || !def.position.y.is_finite() {
            return Err(PhysicsError::InvalidBody(format!(
                "position ({}, {}) is not finite",
                def.position.x, def.position.y
            )));
        }
        if !def.angle.is_finite() {
            return Err(PhysicsError::InvalidBody(format!(
                "angle {} is not finite",
                def.angle
            )));
        }

        let body = RigidBodyBuilder::new(def.body_type.into())
            .translation(to_rapier(def.position))
            .rotation(def.angle)
            .can_sleep(def.allow_sleep)
            .build();
        let handle = self.bodies.insert(body);
        self.sleep_allowed.insert(handle, def.allow_sleep);
        debug!(
            "Created {:?} body at ({}, {})",
            def.body_type, def.position.x, def.position.y
        );
        Ok(BodyHandle(handle))
    }

    pub fn create_fixture(
        &mut self,
        body: BodyHandle,
        def: &FixtureDef,
    ) -> Result<FixtureHandle, PhysicsError> {
        if !self.bodies.contains(body.0) {
            return Err(PhysicsError::UnknownBody);
        }
        if !def.density.is_finite() || def.density < 0.0 {
            return Err(PhysicsError::InvalidFixture(format!(
                "density {} must be finite and non-negative",
                def.density
            )));
        }
        if !def.friction.is_finite() || def.friction < 0.0 {
            return Err(PhysicsError::InvalidFixture(format!(
                "friction {} must be finite and non-negative",
                def.friction
            )));
        }

        let collider = ColliderBuilder::new(def.shape.0.clone())
            .density(def.density)
            .friction(def.friction)
            .build();
        let handle = self
            .colliders
            .insert_with_parent(collider, body.0, &mut self.bodies);
        Ok(FixtureHandle(handle))
    }

    /// Remove a body together with its fixtures.
    pub fn destroy_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
        self.sleep_allowed.remove(&body.0);
        self.bodies
            .remove(
                body.0,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .map(|_| ())
            .ok_or(PhysicsError::UnknownBody)
    }

    /// Advance the simulation by `dt` seconds. Non-positive `dt` does nothing.
    /// At most [`MAX_SUBSTEPS`] sub-steps run, so a long stall only advances
    /// `MAX_SUBSTEPS * max_substep` seconds.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let budget = self.max_substep * MAX_SUBSTEPS as f32;
        let dt = if dt > budget {
            warn!("Physics step of {:.3}s clamped to {:.3}s", dt, budget);
            budget
        } else {
            dt
        };
        let substeps = ((dt / self.max_substep).ceil() as u32).clamp(1, MAX_SUBSTEPS);
        self.integration_parameters.dt = dt / substeps as f32;

        for _ in 0..substeps {
            self.pipeline.step(
                &self.gravity,
                &self.integration_parameters,
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
                &(),
            );
        }
    }

    pub fn position(&self, body: BodyHandle) -> Option<Vector2> {
        self.bodies.get(body.0).map(|b| from_rapier(b.translation()))
    }

    /// Radians, counter-clockwise.
    pub fn angle(&self, body: BodyHandle) -> Option<f32> {
        self.bodies.get(body.0).map(|b| b.rotation().angle())
    }

    pub fn linear_velocity(&self, body: BodyHandle) -> Option<Vector2> {
        self.bodies.get(body.0).map(|b| from_rapier(b.linvel()))
    }

    pub fn set_linear_velocity(
        &mut self,
        body: BodyHandle,
        velocity: Vector2,
    ) -> Result<(), PhysicsError> {
        let b = self.bodies.get_mut(body.0).ok_or(PhysicsError::UnknownBody)?;
        b.set_linvel(to_rapier(velocity), true);
        Ok(())
    }

    pub fn body_type(&self, body: BodyHandle) -> Option<BodyType> {
        self.bodies.get(body.0).map(|b| b.body_type().into())
    }

    pub fn fixture_count(&self, body: BodyHandle) -> Option<usize> {
        self.bodies.get(body.0).map(|b| b.colliders().len())
    }

    pub fn is_sleep_allowed(&self, body: BodyHandle) -> Option<bool> {
        self.sleep_allowed.get(&body.0).copied()
    }
}
