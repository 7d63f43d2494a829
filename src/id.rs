use std::fmt::{Display, Formatter};
use std::ops::Deref;

use gpui::{ElementId, SharedString};

#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ComponentId(SharedString);

impl ComponentId {
    pub fn new(value: impl Into<SharedString>) -> Self {
        Self(value.into())
    }

    #[track_caller]
    pub fn auto(prefix: &str) -> Self {
        Self(stable_auto_id(prefix).into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }

    /// Id of a named part of this component, e.g. `field::label`.
    pub fn slot(&self, slot: &str) -> SharedString {
        format!("{}::{slot}", self.0).into()
    }

    pub fn slot_index(&self, slot: &str, index: impl Display) -> SharedString {
        format!("{}::{slot}::{index}", self.0).into()
    }

    pub fn child(&self, slot: &str) -> ComponentId {
        Self(self.slot(slot))
    }
}

impl Deref for ComponentId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl Display for ComponentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&'static str> for ComponentId {
    fn from(value: &'static str) -> Self {
        Self(value.into())
    }
}

impl From<String> for ComponentId {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<SharedString> for ComponentId {
    fn from(value: SharedString) -> Self {
        Self(value)
    }
}

impl From<ComponentId> for ElementId {
    fn from(value: ComponentId) -> Self {
        ElementId::Name(value.0)
    }
}

#[track_caller]
pub fn stable_auto_id(prefix: &str) -> String {
    let location = std::panic::Location::caller();
    let seed = format!(
        "{prefix}:{}:{}:{}",
        location.file(),
        location.line(),
        location.column()
    );
    format!("{prefix}-{:016x}", fnv1a64(seed.as_bytes()))
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x00000100000001b3;

    let mut hash = OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn call_once() -> String {
        stable_auto_id("field")
    }

    #[test]
    fn id_is_stable_for_same_callsite() {
        let ids = (0..3).map(|_| call_once()).collect::<Vec<_>>();
        assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn id_differs_for_different_callsites() {
        let first = call_once();
        let second = stable_auto_id("field");
        assert_ne!(first, second);
    }

    #[test]
    fn slots_are_namespaced_under_the_component() {
        let id = ComponentId::new("email");
        assert_eq!(id.slot("label").as_ref(), "email::label");
        assert_eq!(id.slot_index("dot", 3).as_ref(), "email::dot::3");
        assert_eq!(id.child("prefix").as_str(), "email::prefix");
    }
}
