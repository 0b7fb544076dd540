//! Registry: name-based lookup of [`BiomeDef`]s and [`RegionDef`]s.

use hashbrown::HashMap;

use crate::biome::{BiomeDef, BiomeId};
use crate::error::RegistryError;
use crate::region::RegionDef;

/// Index of a region inside a [`Registry`] (and the tree compiled from it).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u32);

impl RegionId {
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stores all registered biome and region definitions with O(1) lookup by name.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    biomes: Vec<BiomeDef>,
    biome_names: HashMap<String, usize>,
    biome_ids: HashMap<BiomeId, usize>,
    regions: Vec<RegionDef>,
    region_names: HashMap<String, RegionId>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a biome definition, returning its id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateBiomeName`] or [`RegistryError::DuplicateBiomeId`]
    /// if the name or id is already taken.
    pub fn register_biome(&mut self, def: BiomeDef) -> Result<BiomeId, RegistryError> {
        if self.biome_names.contains_key(&def.name) {
            return Err(RegistryError::DuplicateBiomeName(def.name));
        }
        if self.biome_ids.contains_key(&def.id) {
            return Err(RegistryError::DuplicateBiomeId {
                id: def.id.0,
                name: def.name,
            });
        }
        let id = def.id;
        let slot = self.biomes.len();
        self.biome_names.insert(def.name.clone(), slot);
        self.biome_ids.insert(id, slot);
        self.biomes.push(def);
        Ok(id)
    }

    /// Registers a region definition, returning its assigned [`RegionId`].
    ///
    /// Layer names are not resolved here; that happens when the tree is built,
    /// so regions may reference each other in any registration order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateRegionName`] if a region with the same name exists.
    pub fn register_region(&mut self, def: RegionDef) -> Result<RegionId, RegistryError> {
        if self.region_names.contains_key(&def.name) {
            return Err(RegistryError::DuplicateRegionName(def.name));
        }
        let id = RegionId(self.regions.len() as u32);
        self.region_names.insert(def.name.clone(), id);
        self.regions.push(def);
        Ok(id)
    }

    /// Looks up a biome id by name.
    pub fn resolve_biome(&self, name: &str) -> Option<BiomeId> {
        self.biome_names.get(name).map(|&slot| self.biomes[slot].id)
    }

    /// Looks up a region id by name.
    pub fn resolve_region(&self, name: &str) -> Option<RegionId> {
        self.region_names.get(name).copied()
    }

    /// Returns the definition for the given biome id, if registered.
    pub fn biome(&self, id: BiomeId) -> Option<&BiomeDef> {
        self.biome_ids.get(&id).map(|&slot| &self.biomes[slot])
    }

    /// Returns the definition for the given region id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this registry.
    pub fn region(&self, id: RegionId) -> &RegionDef {
        &self.regions[id.index()]
    }

    /// All biomes in registration order.
    pub fn biomes(&self) -> &[BiomeDef] {
        &self.biomes
    }

    /// All regions in registration order; position `i` has `RegionId(i)`.
    pub fn regions(&self) -> &[RegionDef] {
        &self.regions
    }

    /// Number of registered biomes.
    pub fn biome_count(&self) -> usize {
        self.biomes.len()
    }

    /// Number of registered regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve_biome() {
        let mut reg = Registry::new();
        let plains = reg
            .register_biome(BiomeDef::new(8, "plains", [0, 255, 0]))
            .unwrap();
        assert_eq!(plains, BiomeId(8));
        assert_eq!(reg.resolve_biome("plains"), Some(BiomeId(8)));
        assert_eq!(reg.biome(plains).unwrap().name, "plains");
        assert!(reg.resolve_biome("desert").is_none());
        assert!(reg.biome(BiomeId(9)).is_none());
    }

    #[test]
    fn test_duplicate_biome_name_rejected() {
        let mut reg = Registry::new();
        reg.register_biome(BiomeDef::new(1, "desert", [255, 255, 0]))
            .unwrap();
        let result = reg.register_biome(BiomeDef::new(2, "desert", [0, 0, 0]));
        assert!(matches!(result, Err(RegistryError::DuplicateBiomeName(name)) if name == "desert"));
        assert_eq!(reg.biome_count(), 1);
    }

    #[test]
    fn test_duplicate_biome_id_rejected() {
        let mut reg = Registry::new();
        reg.register_biome(BiomeDef::new(1, "desert", [255, 255, 0]))
            .unwrap();
        let result = reg.register_biome(BiomeDef::new(1, "tundra", [0, 0, 0]));
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateBiomeId { id: 1, .. })
        ));
    }

    #[test]
    fn test_regions_indexed_in_registration_order() {
        let mut reg = Registry::new();
        let a = reg.register_region(RegionDef::new("a", 1, 100.0)).unwrap();
        let b = reg.register_region(RegionDef::new("b", 2, 100.0)).unwrap();
        assert_eq!(a, RegionId(0));
        assert_eq!(b, RegionId(1));
        assert_eq!(reg.resolve_region("b"), Some(b));
        assert_eq!(reg.region(a).seed, 1);
        assert_eq!(reg.region_count(), 2);
    }

    #[test]
    fn test_duplicate_region_rejected() {
        let mut reg = Registry::new();
        reg.register_region(RegionDef::new("hot", 1, 100.0)).unwrap();
        let result = reg.register_region(RegionDef::new("hot", 2, 50.0));
        assert!(matches!(result, Err(RegistryError::DuplicateRegionName(_))));
    }
}
