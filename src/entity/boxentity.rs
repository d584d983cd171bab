//! Dynamic rigid body rendered with a graphic.
//!
//! The body is created as {dynamic, sleep allowed} with a single fixture of
//! density 1.0 and friction 0.1. Rendering translates to the body position,
//! rotates by the body angle (converted to degrees) about +Z, then hands over
//! to the graphic.

use std::f32::consts::PI;

use log::warn;
use raylib::prelude::Vector2;

use crate::entity::{Entity, EntityError};
use crate::graphics::Graphic;
use crate::physics::world::{
    BodyDef, BodyHandle, BodyType, FixtureDef, PhysicsError, PhysicsWorld, Shape,
};
use crate::render::Renderer;

pub const BOX_DENSITY: f32 = 1.0;
pub const BOX_FRICTION: f32 = 0.1;

pub struct BoxEntity {
    body: BodyHandle,
    graphic: Box<dyn Graphic>,
}

impl BoxEntity {
    pub fn new(
        world: &mut PhysicsWorld,
        position: Vector2,
        shape: Shape,
        graphic: Box<dyn Graphic>,
    ) -> Result<Self, PhysicsError> {
        let body = world.create_body(&BodyDef {
            body_type: BodyType::Dynamic,
            position,
            allow_sleep: true,
            ..BodyDef::default()
        })?;

        let fixture = FixtureDef {
            density: BOX_DENSITY,
            friction: BOX_FRICTION,
            ..FixtureDef::new(shape)
        };
        if let Err(e) = world.create_fixture(body, &fixture) {
            // don't leave a bare body behind
            let _ = world.destroy_body(body);
            return Err(e);
        }

        Ok(Self { body, graphic })
    }

    /// Body angle in radians.
    pub fn angle(&self, world: &PhysicsWorld) -> Option<f32> {
        world.angle(self.body)
    }
}

impl Entity for BoxEntity {
    fn position(&self, world: &PhysicsWorld) -> Option<Vector2> {
        world.position(self.body)
    }

    fn body(&self) -> BodyHandle {
        self.body
    }

    fn graphic(&self) -> &dyn Graphic {
        self.graphic.as_ref()
    }

    fn graphic_mut(&mut self) -> &mut dyn Graphic {
        self.graphic.as_mut()
    }

    fn tick(&mut self, delta: u32) {
        self.graphic.tick(delta);
    }

    fn render(&self, world: &PhysicsWorld, gl: &mut dyn Renderer) {
        let (Some(pos), Some(angle)) = (world.position(self.body), world.angle(self.body)) else {
            warn!("BoxEntity body {:?} missing from world; skipping render", self.body);
            return;
        };

        gl.push_matrix();
        gl.translate(pos.x, pos.y, 0.0);
        gl.rotate(angle * (360.0 / (2.0 * PI)), 0.0, 0.0, 1.0);
        self.graphic.render(gl);
        gl.pop_matrix();
    }

    fn destroy(
        &mut self,
        world: &mut PhysicsWorld,
        gl: &mut dyn Renderer,
    ) -> Result<(), EntityError> {
        // both halves run even if one fails; the body error wins
        let body = world.destroy_body(self.body);
        let graphic = if self.graphic.disposable() {
            self.graphic.destroy(gl)
        } else {
            Ok(())
        };
        body?;
        graphic?;
        Ok(())
    }
}
