//! Typed per-owner extra-data slots, §3/Design Notes: each subsystem is
//! handed an opaque token at startup and stores its own struct under it,
//! avoiding a monolithic god object and back-references from core entities
//! into modules. A plain `TypeId`-keyed map, stable-Rust safe, with no
//! reliance on nightly `Unsize` coercion or raw-pointer tricks.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;

/// An allocation token for a slot of type `T`. Subsystems obtain one via
/// `ExtraData::allocate` at registration time and use it to read/write
/// their own slot on every `Player`/`Arena` without knowing about any
/// other subsystem's data.
pub struct ExtraDataKey<T> {
    type_id: TypeId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ExtraDataKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for ExtraDataKey<T> {}

impl<T: 'static> ExtraDataKey<T> {
    fn new() -> Self {
        ExtraDataKey { type_id: TypeId::of::<T>(), _marker: PhantomData }
    }
}

/// A heterogeneous slot map. One lives on every `Player` and every `Arena`.
#[derive(Default)]
pub struct ExtraData {
    slots: HashMap<TypeId, Box<dyn Any + Send>>,
}

impl ExtraData {
    pub fn new() -> Self {
        ExtraData { slots: HashMap::new() }
    }

    /// Mint a fresh key for `T`. Each subsystem calls this once at startup
    /// and keeps the returned key for the lifetime of the process.
    pub fn allocate<T: 'static>() -> ExtraDataKey<T> {
        ExtraDataKey::new()
    }

    pub fn insert<T: 'static + Send>(&mut self, key: ExtraDataKey<T>, value: T) {
        self.slots.insert(key.type_id, Box::new(value));
    }

    pub fn get<T: 'static>(&self, key: ExtraDataKey<T>) -> Option<&T> {
        self.slots.get(&key.type_id).and_then(|b| b.downcast_ref::<T>())
    }

    pub fn get_mut<T: 'static>(&mut self, key: ExtraDataKey<T>) -> Option<&mut T> {
        self.slots.get_mut(&key.type_id).and_then(|b| b.downcast_mut::<T>())
    }

    pub fn remove<T: 'static>(&mut self, key: ExtraDataKey<T>) -> Option<T> {
        self.slots.remove(&key.type_id).and_then(|b| b.downcast::<T>().ok()).map(|b| *b)
    }

    pub fn get_or_insert_with<T: 'static + Send>(&mut self, key: ExtraDataKey<T>, default: impl FnOnce() -> T) -> &mut T {
        self.slots
            .entry(key.type_id)
            .or_insert_with(|| Box::new(default()))
            .downcast_mut::<T>()
            .expect("extra-data slot type mismatch: two subsystems collided on a key")
    }
}
