//! Capability registry: a typed registry keyed by capability type, with
//! iteration order equal to registration order. Each capability is
//! registered as an `Arc<dyn Trait>` and stored as `Any` keyed by the
//! concrete `Arc<dyn Trait>` type, so downcasting never needs unsafe code
//! or nightly-only `Unsize` coercion.

use indexmap::IndexMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

#[derive(Default)]
pub struct CapabilityRegistry {
    data: IndexMap<TypeId, Vec<Box<dyn Any + Send + Sync>>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        CapabilityRegistry { data: IndexMap::new() }
    }

    /// Registers an implementation of capability `Cap`. Multiple
    /// implementations of the same capability may be registered; they are
    /// iterated later in the order they were registered here.
    pub fn register<Cap: ?Sized + Send + Sync + 'static>(&mut self, capability: Arc<Cap>) {
        let key = TypeId::of::<Arc<Cap>>();
        self.data.entry(key).or_insert_with(Vec::new).push(Box::new(capability));
    }

    /// Iterates every registered implementation of `Cap` in registration
    /// order.
    pub fn iter<Cap: ?Sized + Send + Sync + 'static>(&self) -> impl Iterator<Item = &Arc<Cap>> {
        let key = TypeId::of::<Arc<Cap>>();
        self.data
            .get(&key)
            .into_iter()
            .flat_map(|bundle| bundle.iter().filter_map(|b| b.downcast_ref::<Arc<Cap>>()))
    }

    pub fn count<Cap: ?Sized + Send + Sync + 'static>(&self) -> usize {
        self.iter::<Cap>().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;
    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    struct French;
    impl Greeter for French {
        fn greet(&self) -> String {
            "bonjour".to_string()
        }
    }

    trait Farewell: Send + Sync {
        fn bye(&self) -> String;
    }
    struct EnglishBye;
    impl Farewell for EnglishBye {
        fn bye(&self) -> String {
            "bye".to_string()
        }
    }

    #[test]
    fn iterates_in_registration_order() {
        let mut registry = CapabilityRegistry::new();
        registry.register::<dyn Greeter>(Arc::new(English));
        registry.register::<dyn Greeter>(Arc::new(French));

        let greetings: Vec<String> = registry.iter::<dyn Greeter>().map(|g| g.greet()).collect();
        assert_eq!(greetings, vec!["hello".to_string(), "bonjour".to_string()]);
    }

    #[test]
    fn different_capabilities_do_not_collide() {
        let mut registry = CapabilityRegistry::new();
        registry.register::<dyn Greeter>(Arc::new(English));
        registry.register::<dyn Farewell>(Arc::new(EnglishBye));

        assert_eq!(registry.count::<dyn Greeter>(), 1);
        assert_eq!(registry.count::<dyn Farewell>(), 1);
    }

    #[test]
    fn missing_capability_iterates_empty() {
        let registry = CapabilityRegistry::new();
        assert_eq!(registry.count::<dyn Greeter>(), 0);
    }
}
