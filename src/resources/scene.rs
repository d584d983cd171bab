//! Scene: the ordered set of live entities.
//!
//! Iteration order is draw order. Despawning runs the entity's destruction
//! cascade (body removal, graphic destroy) before dropping it.

use log::{debug, warn};

use crate::entity::{Entity, EntityError};
use crate::physics::world::PhysicsWorld;
use crate::render::Renderer;

/// Stable id of an entity within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

/// Non-Send resource: entities own graphics holding `Rc` textures.
#[derive(Default)]
pub struct Scene {
    entities: Vec<(EntityId, Box<dyn Entity>)>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, entity: Box<dyn Entity>) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push((id, entity));
        debug!("Spawned entity {:?}", id);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&dyn Entity> {
        self.entities
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(_, e)| e.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut (dyn Entity + 'static)> {
        self.entities
            .iter_mut()
            .find(|(eid, _)| *eid == id)
            .map(|(_, e)| e.as_mut())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().map(|(id, _)| *id)
    }

    /// Tick every entity, `delta` in milliseconds.
    pub fn tick(&mut self, delta: u32) {
        for (_, entity) in self.entities.iter_mut() {
            entity.tick(delta);
        }
    }

    pub fn render(&self, world: &PhysicsWorld, gl: &mut dyn Renderer) {
        for (_, entity) in self.entities.iter() {
            entity.render(world, gl);
        }
    }

    /// Remove an entity and run its destruction cascade. Returns `Ok(false)`
    /// if the id is unknown. The entity leaves the scene even when the cascade
    /// reports an error.
    pub fn despawn(
        &mut self,
        id: EntityId,
        world: &mut PhysicsWorld,
        gl: &mut dyn Renderer,
    ) -> Result<bool, EntityError> {
        let Some(index) = self.entities.iter().position(|(eid, _)| *eid == id) else {
            return Ok(false);
        };
        let (_, mut entity) = self.entities.remove(index);
        entity.destroy(world, gl)?;
        debug!("Despawned entity {:?}", id);
        Ok(true)
    }

    /// Despawn everything, logging (not stopping on) individual failures.
    pub fn clear(&mut self, world: &mut PhysicsWorld, gl: &mut dyn Renderer) {
        for (id, mut entity) in self.entities.drain(..) {
            if let Err(e) = entity.destroy(world, gl) {
                warn!("Failed to destroy entity {:?}: {}", id, e);
            }
        }
    }
}
