use crate::error::FieldError;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Per-component state keyed by component id. Element structs are rebuilt
/// every frame, so anything that must survive between frames lives here.
pub struct StateStore<T> {
    name: &'static str,
    slots: Mutex<BTreeMap<String, T>>,
}

impl<T> StateStore<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            slots: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, T>> {
        match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("{}; recovering", FieldError::StatePoisoned(self.name));
                poisoned.into_inner()
            }
        }
    }

    pub fn with<R>(&self, id: &str, init: impl FnOnce() -> T, f: impl FnOnce(&mut T) -> R) -> R {
        let mut slots = self.lock();
        let slot = slots.entry(id.to_string()).or_insert_with(init);
        f(slot)
    }

    pub fn with_existing<R>(&self, id: &str, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.lock().get_mut(id).map(f)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    pub fn set(&self, id: &str, value: T) {
        self.lock().insert(id.to_string(), value);
    }

    pub fn remove(&self, id: &str) -> Option<T> {
        self.lock().remove(id)
    }

    /// Removes `id` and every slot namespaced under it (`id::...`).
    pub fn remove_tree(&self, id: &str) {
        let prefix = format!("{id}::");
        self.lock()
            .retain(|key, _| key != id && !key.starts_with(&prefix));
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> StateStore<T> {
    pub fn get(&self, id: &str) -> Option<T> {
        self.lock().get(id).cloned()
    }

    pub fn get_or(&self, id: &str, default: T) -> T {
        self.with(id, || default, |slot| slot.clone())
    }
}

/// Drops every stored component state. Used by tests and by hosts that
/// rebuild their whole window.
pub fn clear_all() {
    super::affix::clear_state();
    super::label::clear_state();
    super::text_entry::clear_state();
    super::text_field::clear_state();
}

/// Drops every stored slot belonging to the component `id` and its parts.
pub fn release_tree(id: &str) {
    super::affix::release_tree(id);
    super::label::release_tree(id);
    super::text_entry::release_tree(id);
    super::text_field::release_tree(id);
}
