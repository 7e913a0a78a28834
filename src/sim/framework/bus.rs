use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Mailbox shared by the modules of a propagation run.
///
/// Holds at most one value per concrete type: a propagator posts a
/// collision batch, the reverberation module drains it and later leaves its
/// result behind for the caller.
#[derive(Default)]
pub struct Bus {
    values: HashMap<TypeId, Box<dyn Any>>,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts `value`, replacing any unread value of the same type.
    pub fn put<T: 'static>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut::<T>())
    }

    /// Consumes the posted value of type `T`.
    pub fn take<T: 'static>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast::<T>().ok())
            .map(|b| *b)
    }

    /// Whether a value of type `T` is waiting.
    pub fn contains<T: 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    #[test]
    fn test_put_get_take() {
        let mut bus = Bus::new();
        bus.put(vec![1.0_f64, 2.0]);
        bus.put(Marker);
        assert!(bus.contains::<Marker>());
        bus.get_mut::<Vec<f64>>().unwrap().push(3.0);
        assert_eq!(bus.get::<Vec<f64>>().map(Vec::len), Some(3));
        assert!(bus.take::<Marker>().is_some());
        assert!(!bus.contains::<Marker>());
        assert!(bus.take::<Marker>().is_none());
    }
}
