//! Bounded recycling container for pooled world entities.
//!
//! Slots are constructed lazily up to `max_size` and never destroyed. When
//! every slot is live, the slot activated longest ago is recycled: order is
//! activation order, not last use.

use bevy::math::{Vec2, Vec3};
use log::debug;

use crate::error::PoolError;

/// Lifecycle shared by everything an [`EntityPool`] can hold.
///
/// `Context` is whatever the entity needs to join or leave the live world,
/// typically the physics world plus the wave field.
pub trait Poolable {
    type Context;

    fn is_active(&self) -> bool;

    /// Join the live world. No-op when already active.
    fn activate(&mut self, ctx: &mut Self::Context);

    /// Leave the live world. No-op when already inactive.
    fn deactivate(&mut self, ctx: &mut Self::Context);

    /// Rerandomize per-use state and clear transient state. Slot identity is kept.
    fn reset(&mut self, ctx: &mut Self::Context);

    fn update(&mut self, ctx: &mut Self::Context, dt: f32);

    fn position(&self) -> Vec3;

    /// Move to `position`, discarding any motion.
    fn place(&mut self, ctx: &mut Self::Context, position: Vec3);
}

/// Builds the entity for a new slot index.
pub type PoolFactory<T> =
    Box<dyn FnMut(usize, &mut <T as Poolable>::Context) -> T + Send + Sync>;

pub struct EntityPool<T: Poolable> {
    items: Vec<T>,
    max_size: usize,
    factory: PoolFactory<T>,
}

impl<T: Poolable> EntityPool<T> {
    /// Build the pool with `initial_size` inactive entities.
    pub fn new(
        ctx: &mut T::Context,
        initial_size: usize,
        max_size: usize,
        mut factory: PoolFactory<T>,
    ) -> Result<Self, PoolError> {
        if max_size == 0 {
            return Err(PoolError::ZeroCapacity);
        }
        if initial_size > max_size {
            return Err(PoolError::InitialExceedsMax {
                initial: initial_size,
                max: max_size,
            });
        }

        let items = (0..initial_size).map(|slot| factory(slot, ctx)).collect();
        Ok(Self {
            items,
            max_size,
            factory,
        })
    }

    /// An active entity, ready to be placed.
    ///
    /// Prefers the first inactive slot, then grows the pool, and finally
    /// recycles the oldest slot. Whichever slot is handed out moves to the
    /// back, so the front is always the oldest activation.
    pub fn get(&mut self, ctx: &mut T::Context) -> &mut T {
        let index = if let Some(index) = self.items.iter().position(|item| !item.is_active()) {
            let mut item = self.items.remove(index);
            item.reset(ctx);
            item.activate(ctx);
            self.items.push(item);
            self.items.len() - 1
        } else if self.items.len() < self.max_size {
            let slot = self.items.len();
            let mut item = (self.factory)(slot, ctx);
            item.reset(ctx);
            item.activate(ctx);
            self.items.push(item);
            debug!("Pool grew to {}/{} entities", self.items.len(), self.max_size);
            slot
        } else {
            let mut item = self.items.remove(0);
            item.deactivate(ctx);
            item.reset(ctx);
            item.activate(ctx);
            self.items.push(item);
            debug!("Pool full ({}), recycled oldest entity", self.max_size);
            self.items.len() - 1
        };

        &mut self.items[index]
    }

    pub fn update(&mut self, ctx: &mut T::Context, dt: f32) {
        for item in self.items.iter_mut().filter(|item| item.is_active()) {
            item.update(ctx, dt);
        }
    }

    /// Recycle every active entity farther than `active_radius` from
    /// `center` on the XZ plane, respawning each at `spawn_at(ctx)`.
    ///
    /// Returns the number of entities recycled.
    pub fn stream_around(
        &mut self,
        ctx: &mut T::Context,
        center: Vec3,
        active_radius: f32,
        mut spawn_at: impl FnMut(&mut T::Context) -> Vec3,
    ) -> usize {
        let center = Vec2::new(center.x, center.z);
        let mut recycled = 0;

        // Deactivate first: `get` reorders the slots
        for item in self.items.iter_mut().filter(|item| item.is_active()) {
            let p = item.position();
            if Vec2::new(p.x, p.z).distance(center) > active_radius {
                item.deactivate(ctx);
                recycled += 1;
            }
        }

        for _ in 0..recycled {
            let position = spawn_at(ctx);
            self.get(ctx).place(ctx, position);
        }

        if recycled > 0 {
            debug!("Recycled {recycled} entities out of range");
        }
        recycled
    }

    pub fn for_each_active(&self, mut f: impl FnMut(&T)) {
        self.iter_active().for_each(|item| f(item));
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|item| item.is_active())
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut().filter(|item| item.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

/// Uniform point in the ring between `min_radius` and `max_radius` around
/// `center`, at the height of `center`.
pub fn random_ring_position(
    rng: &mut impl rand::Rng,
    center: Vec3,
    min_radius: f32,
    max_radius: f32,
) -> Vec3 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let (low, high) = (min_radius.min(max_radius), min_radius.max(max_radius));
    let radius = if high > low {
        rng.gen_range(low..high)
    } else {
        low
    };
    let offset = Vec2::from_angle(angle) * radius;
    center + Vec3::new(offset.x, 0.0, offset.y)
}
