use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, OnceLock};

use rust_embed::RustEmbed;

pub const DEFAULT_PACK: &str = "material";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconName {
    value: String,
}

impl IconName {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl From<&str> for IconName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Debug, Default)]
struct PackIndex {
    names: BTreeMap<String, PathBuf>,
}

impl PackIndex {
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        self.names.get(name).cloned()
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

/// Named SVG icons, resolved to files on disk so gpui `svg()` can load them.
/// Names may be namespaced as `pack:name`; bare names use the default pack.
#[derive(Clone, Debug)]
pub struct IconRegistry {
    packs: Arc<BTreeMap<String, PackIndex>>,
}

impl Default for IconRegistry {
    fn default() -> Self {
        static DEFAULT_REGISTRY: OnceLock<IconRegistry> = OnceLock::new();
        DEFAULT_REGISTRY.get_or_init(Self::build_default).clone()
    }
}

impl IconRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn build_default() -> Self {
        let mut packs = BTreeMap::new();
        match extract_embedded_pack::<EmbeddedMaterial>(DEFAULT_PACK).map(|root| load_pack(&root))
        {
            Some(Ok(pack)) => {
                packs.insert(DEFAULT_PACK.to_string(), pack);
            }
            Some(Err(err)) => log::warn!("failed to index embedded icons: {err}"),
            None => log::warn!("failed to extract embedded icons"),
        }
        Self {
            packs: Arc::new(packs),
        }
    }

    pub fn register_embedded_pack<T: RustEmbed>(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let Some(root) = extract_embedded_pack::<T>(&format!("custom-{name}")) else {
            log::warn!("failed to extract icon pack {name}");
            return self;
        };
        match load_pack(&root) {
            Ok(pack) => {
                let mut packs = (*self.packs).clone();
                packs.insert(name, pack);
                self.packs = Arc::new(packs);
            }
            Err(err) => log::warn!("failed to index icon pack {name}: {err}"),
        }
        self
    }

    pub fn resolve(&self, name: &IconName) -> Option<PathBuf> {
        let (pack, icon) = split_namespace(name.as_str());
        self.packs.get(pack)?.resolve(icon)
    }

    pub fn count(&self, pack: &str) -> usize {
        self.packs.get(pack).map(PackIndex::len).unwrap_or_default()
    }
}

fn split_namespace(value: &str) -> (&str, &str) {
    match value.split_once(':') {
        Some((pack, icon)) if !pack.is_empty() && !icon.is_empty() => (pack, icon),
        _ => (DEFAULT_PACK, value),
    }
}

fn load_pack(root: &Path) -> Result<PackIndex, std::io::Error> {
    let mut pack = PackIndex::default();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        let is_svg = path
            .extension()
            .and_then(|value| value.to_str())
            .is_some_and(|value| value.eq_ignore_ascii_case("svg"));
        if !path.is_file() || !is_svg {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|value| value.to_str()) {
            pack.names.insert(stem.to_string(), path.clone());
        }
    }
    Ok(pack)
}

fn extract_embedded_pack<T: RustEmbed>(folder_name: &str) -> Option<PathBuf> {
    let root = std::env::temp_dir()
        .join("calmfield-icons")
        .join(env!("CARGO_PKG_VERSION"))
        .join(folder_name);
    let marker = root.join(".extract-ready");

    if marker.exists() && embedded_pack_is_complete::<T>(&root) {
        return Some(root);
    }

    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(&root).ok()?;

    for relative in T::iter() {
        let relative = relative.as_ref();
        let Some(safe_relative) = sanitize_relative_path(relative) else {
            continue;
        };
        let Some(content) = T::get(relative) else {
            continue;
        };
        let destination = root.join(safe_relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        fs::write(destination, content.data.as_ref()).ok()?;
    }

    fs::write(marker, b"ok").ok()?;
    Some(root)
}

fn embedded_pack_is_complete<T: RustEmbed>(root: &Path) -> bool {
    T::iter().all(|relative| {
        sanitize_relative_path(relative.as_ref())
            .is_some_and(|safe_relative| root.join(safe_relative).is_file())
    })
}

fn sanitize_relative_path(input: &str) -> Option<PathBuf> {
    let mut output = PathBuf::new();
    for component in Path::new(input).components() {
        match component {
            Component::Normal(value) => output.push(value),
            _ => return None,
        }
    }
    Some(output)
}

#[derive(RustEmbed)]
#[folder = "assets/icons/material"]
struct EmbeddedMaterial;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_contains_visibility_icons() {
        let registry = IconRegistry::new();
        assert!(registry.count(DEFAULT_PACK) >= 2);
        let eye = registry
            .resolve(&IconName::new("eye"))
            .expect("eye should be resolvable");
        assert!(eye.to_string_lossy().ends_with("eye.svg"));
        assert!(registry.resolve(&IconName::new("eye-off")).is_some());
    }

    #[test]
    fn namespaced_names_pick_the_pack() {
        let registry = IconRegistry::new();
        assert!(registry.resolve(&IconName::new("material:check")).is_some());
        assert!(registry.resolve(&IconName::new("unknown:check")).is_none());
        assert!(registry.resolve(&IconName::new("no-such-icon")).is_none());
    }

    #[test]
    fn unsafe_paths_are_rejected() {
        assert!(sanitize_relative_path("../escape.svg").is_none());
        assert_eq!(
            sanitize_relative_path("eye.svg"),
            Some(PathBuf::from("eye.svg"))
        );
        assert_eq!(split_namespace(":eye"), (DEFAULT_PACK, ":eye"));
    }
}
