use std::any::Any;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::component::{Block, Energy, Fluid, Item};
use crate::error::{RegistryError, Result};

/// Type name of the built-in block registry.
pub const BLOCK: &str = "block";

/// Type name of the built-in item registry.
pub const ITEM: &str = "item";

/// Type name of the built-in energy registry.
pub const ENERGY: &str = "energy";

/// Type name of the built-in fluid registry.
pub const FLUID: &str = "fluid";

/// Anything that can be stored in a [`Registry`].
pub trait RegistryObject {
    /// The unique name this object is registered and saved under.
    fn name(&self) -> &str;
}

/// Name-keyed table of registered objects of one type.
///
/// Objects that are not registered cannot be restored from saved data, since
/// loading resolves stored names through the registry.
pub struct Registry<T> {
    kind: String,
    objects: HashMap<String, T>,
}

impl<T: RegistryObject> Registry<T> {
    /// Create an empty registry. `kind` must be unique per data type.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            objects: HashMap::new(),
        }
    }

    /// The registry type name.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Register an object under its name.
    ///
    /// If the name is taken the existing object stays registered and is
    /// returned, so the caller can decide whether to remove it and retry or to
    /// integrate with it.
    pub fn register(&mut self, object: T) -> std::result::Result<(), &T> {
        let name = object.name().to_string();
        if self.objects.contains_key(&name) {
            warn!(kind = %self.kind, %name, "object already registered");
            return Err(&self.objects[&name]);
        }
        debug!(kind = %self.kind, %name, "registered object");
        self.objects.insert(name, object);
        Ok(())
    }

    /// Remove an object. Returns true if it was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        self.objects.remove(name).is_some()
    }

    /// Look up an object by name.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.objects.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.objects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

trait AnyRegistry {
    fn kind(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: RegistryObject + 'static> AnyRegistry for Registry<T> {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Owns every registry, keyed by registry type name.
pub struct RegistryManager {
    registries: Vec<Box<dyn AnyRegistry>>,
}

impl RegistryManager {
    /// Create a manager with no registries.
    pub fn new() -> Self {
        Self {
            registries: Vec::new(),
        }
    }

    /// Create a manager holding the built-in `block`, `item`, `energy` and
    /// `fluid` registries.
    pub fn with_defaults() -> Self {
        let mut manager = Self::new();
        manager.registries.push(Box::new(Registry::<Block>::new(BLOCK)));
        manager.registries.push(Box::new(Registry::<Item>::new(ITEM)));
        manager.registries.push(Box::new(Registry::<Energy>::new(ENERGY)));
        manager.registries.push(Box::new(Registry::<Fluid>::new(FLUID)));
        manager
    }

    /// Add a registry. Registries should be added before any objects are registered.
    pub fn add_registry<T: RegistryObject + 'static>(&mut self, registry: Registry<T>) -> Result<()> {
        if self.kinds().contains(&registry.kind()) {
            return Err(RegistryError::DuplicateRegistry(registry.kind().to_string()));
        }
        debug!(kind = %registry.kind(), "added registry");
        self.registries.push(Box::new(registry));
        Ok(())
    }

    /// Get the registry with this type name, if it holds objects of type `T`.
    pub fn registry<T: RegistryObject + 'static>(&self, kind: &str) -> Option<&Registry<T>> {
        self.registries
            .iter()
            .find(|r| r.kind() == kind)
            .and_then(|r| r.as_any().downcast_ref::<Registry<T>>())
    }

    /// Mutable form of [`RegistryManager::registry`].
    pub fn registry_mut<T: RegistryObject + 'static>(
        &mut self,
        kind: &str,
    ) -> Option<&mut Registry<T>> {
        self.registries
            .iter_mut()
            .find(|r| r.kind() == kind)
            .and_then(|r| r.as_any_mut().downcast_mut::<Registry<T>>())
    }

    /// Like [`RegistryManager::registry`] but reports a missing registry as an error.
    pub fn require<T: RegistryObject + 'static>(&self, kind: &str) -> Result<&Registry<T>> {
        self.registry(kind)
            .ok_or_else(|| RegistryError::UnknownRegistry(kind.to_string()))
    }

    /// Resolve a saved name through the registry `kind`.
    pub fn resolve<T: RegistryObject + 'static>(&self, kind: &str, name: &str) -> Result<&T> {
        self.require::<T>(kind)?
            .get(name)
            .ok_or_else(|| RegistryError::UnknownObject {
                kind: kind.to_string(),
                name: name.to_string(),
            })
    }

    /// Type names of every registry, in insertion order.
    pub fn kinds(&self) -> Vec<&str> {
        self.registries.iter().map(|r| r.kind()).collect()
    }

    pub fn block(&self) -> Option<&Registry<Block>> {
        self.registry(BLOCK)
    }

    pub fn block_mut(&mut self) -> Option<&mut Registry<Block>> {
        self.registry_mut(BLOCK)
    }

    pub fn item(&self) -> Option<&Registry<Item>> {
        self.registry(ITEM)
    }

    pub fn item_mut(&mut self) -> Option<&mut Registry<Item>> {
        self.registry_mut(ITEM)
    }

    pub fn energy(&self) -> Option<&Registry<Energy>> {
        self.registry(ENERGY)
    }

    pub fn energy_mut(&mut self) -> Option<&mut Registry<Energy>> {
        self.registry_mut(ENERGY)
    }

    pub fn fluid(&self) -> Option<&Registry<Fluid>> {
        self.registry(FLUID)
    }

    pub fn fluid_mut(&mut self) -> Option<&mut Registry<Fluid>> {
        self.registry_mut(FLUID)
    }
}

impl Default for RegistryManager {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Ore {
        name: String,
        hardness: i32,
    }

    impl RegistryObject for Ore {
        fn name(&self) -> &str {
            &self.name
        }
    }

    fn ore(name: &str, hardness: i32) -> Ore {
        Ore {
            name: name.to_string(),
            hardness,
        }
    }

    #[test]
    fn register_and_get() {
        let mut registry = Registry::new("ore");
        registry.register(ore("stone", 3)).unwrap();
        registry.register(ore("dirt", 1)).unwrap();

        assert_eq!(registry.kind(), "ore");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("stone").map(|b| b.hardness), Some(3));
        assert!(registry.get("glass").is_none());
        assert_eq!(registry.names(), vec!["dirt", "stone"]);
    }

    #[test]
    fn duplicate_name_keeps_existing_object() {
        let mut registry = Registry::new("ore");
        registry.register(ore("stone", 3)).unwrap();

        let existing = registry.register(ore("stone", 99)).unwrap_err();
        assert_eq!(existing.hardness, 3);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_then_reregister() {
        let mut registry = Registry::new("ore");
        registry.register(ore("stone", 3)).unwrap();

        assert!(registry.remove("stone"));
        assert!(!registry.remove("stone"));
        assert!(registry.is_empty());

        registry.register(ore("stone", 5)).unwrap();
        assert_eq!(registry.get("stone").map(|b| b.hardness), Some(5));
    }

    #[test]
    fn manager_defaults_and_lookup_by_kind() {
        let mut manager = RegistryManager::with_defaults();
        assert_eq!(manager.kinds(), vec![BLOCK, ITEM, ENERGY, FLUID]);

        manager
            .energy_mut()
            .unwrap()
            .register(Energy::new("redstone", 32, 1))
            .unwrap();

        let energy = manager.resolve::<Energy>(ENERGY, "redstone").unwrap();
        assert_eq!(energy.default_max_rate, 32);
        assert!(manager.fluid().unwrap().is_empty());
    }

    #[test]
    fn manager_block_and_item_registries() {
        let mut manager = RegistryManager::with_defaults();
        manager
            .block_mut()
            .unwrap()
            .register(Block::new("stone", "textures/stone.png").with_hardness(3))
            .unwrap();
        manager
            .item_mut()
            .unwrap()
            .register(Item::new("pickaxe", "textures/pickaxe.png").with_health(250.0))
            .unwrap();

        let stone = manager.resolve::<Block>(BLOCK, "stone").unwrap();
        assert_eq!(stone.default_hardness, 3);
        assert!(manager.item().unwrap().get("pickaxe").unwrap().has_health());
        assert!(manager.resolve::<Item>(ITEM, "stone").is_err());
        assert!(manager.registry::<Item>(BLOCK).is_none());

        let duplicate = Block::new("stone", "textures/other.png");
        let existing = manager.block_mut().unwrap().register(duplicate).unwrap_err();
        assert_eq!(existing.texture_location, "textures/stone.png");
    }

    #[test]
    fn manager_rejects_duplicate_kind() {
        let mut manager = RegistryManager::with_defaults();
        let err = manager
            .add_registry(Registry::<Ore>::new(ENERGY))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateRegistry(kind) if kind == ENERGY));
    }

    #[test]
    fn manager_custom_registry() {
        let mut manager = RegistryManager::new();
        manager.add_registry(Registry::<Ore>::new("ore")).unwrap();
        manager
            .registry_mut::<Ore>("ore")
            .unwrap()
            .register(ore("sand", 1))
            .unwrap();

        assert!(manager.registry::<Ore>("ore").unwrap().contains("sand"));
        assert!(manager.energy().is_none());
    }

    #[test]
    fn lookup_with_wrong_type_finds_nothing() {
        let manager = RegistryManager::with_defaults();
        assert!(manager.registry::<Ore>(ENERGY).is_none());
        assert!(matches!(
            manager.require::<Ore>(ENERGY),
            Err(RegistryError::UnknownRegistry(_))
        ));
    }

    #[test]
    fn resolve_unknown_name() {
        let manager = RegistryManager::with_defaults();
        let err = manager.resolve::<Fluid>(FLUID, "mercury").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UnknownObject { ref kind, ref name } if kind == FLUID && name == "mercury"
        ));
    }
}
