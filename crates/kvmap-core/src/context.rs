use crate::{
    config::MappingConfiguration,
    error::MappingError,
    keyspace::{ConfiguredKeySpaceResolver, KeySpaceResolver},
    model::{
        entity::{EntityDescriptor, EntityType},
        property::PersistentProperty,
    },
    traits::Mapped,
    ttl::{ConfiguredTimeToLiveAccessor, TimeToLiveAccessor},
};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::{debug, warn};

///
/// MappingContext
///
/// Keyed cache of entity descriptors, one per type path, built on first
/// request and kept for the lifetime of the context.
///

pub struct MappingContext {
    keyspace_resolver: Arc<dyn KeySpaceResolver>,
    time_to_live_accessor: Arc<dyn TimeToLiveAccessor>,
    entities: RwLock<HashMap<&'static str, Arc<EntityDescriptor>>>,
}

impl MappingContext {
    /// Build a context whose resolver and accessor read `config`.
    pub fn new(config: &MappingConfiguration) -> Result<Self, MappingError> {
        config.validate()?;

        Ok(Self::with_collaborators(
            Arc::new(ConfiguredKeySpaceResolver::new(config)),
            Arc::new(ConfiguredTimeToLiveAccessor::new(config)),
        ))
    }

    #[must_use]
    pub fn with_collaborators(
        keyspace_resolver: Arc<dyn KeySpaceResolver>,
        time_to_live_accessor: Arc<dyn TimeToLiveAccessor>,
    ) -> Self {
        Self {
            keyspace_resolver,
            time_to_live_accessor,
            entities: RwLock::new(HashMap::new()),
        }
    }

    /// Descriptor for a mapped type, building it on first request.
    pub fn persistent_entity<T: Mapped>(&self) -> Result<Arc<EntityDescriptor>, MappingError> {
        self.register_entity(T::ENTITY, T::PROPERTIES.iter().copied())
    }

    /// Return the cached descriptor for `entity`, or build and publish one.
    ///
    /// Building happens outside the lock. If another caller published the
    /// same type first, its descriptor is returned and this one is dropped.
    /// A failed build caches nothing. A cached descriptor is only returned
    /// when `entity` and `properties` match what it was built from.
    pub fn register_entity(
        &self,
        entity: EntityType,
        properties: impl IntoIterator<Item = PersistentProperty>,
    ) -> Result<Arc<EntityDescriptor>, MappingError> {
        let properties: Vec<_> = properties.into_iter().collect();

        if let Some(cached) = self.get(entity.path) {
            return Self::ensure_same_mapping(cached, &entity, &properties);
        }

        let descriptor = EntityDescriptor::build(
            entity,
            properties.iter().copied(),
            Arc::clone(&self.keyspace_resolver),
            Arc::clone(&self.time_to_live_accessor),
        )?;

        let mut entities = self
            .entities
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let published = entities.entry(entity.path).or_insert_with(|| {
            debug!(
                entity = %entity,
                properties = descriptor.len(),
                "entity descriptor published"
            );
            Arc::new(descriptor)
        });

        Self::ensure_same_mapping(Arc::clone(published), &entity, &properties)
    }

    // cached descriptors are only shared with callers describing the same mapping
    fn ensure_same_mapping(
        cached: Arc<EntityDescriptor>,
        entity: &EntityType,
        properties: &[PersistentProperty],
    ) -> Result<Arc<EntityDescriptor>, MappingError> {
        if cached.entity() == entity && cached.properties() == properties {
            Ok(cached)
        } else {
            warn!(entity = %entity, "entity registered again with different mapping metadata");

            Err(MappingError::entity_mismatch(entity.path))
        }
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<Arc<EntityDescriptor>> {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Paths of all cached entities, sorted.
    #[must_use]
    pub fn entity_paths(&self) -> Vec<&'static str> {
        let mut paths: Vec<_> = self
            .entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        paths.sort_unstable();

        paths
    }
}

impl Default for MappingContext {
    fn default() -> Self {
        let config = MappingConfiguration::default();

        Self::with_collaborators(
            Arc::new(ConfiguredKeySpaceResolver::new(&config)),
            Arc::new(ConfiguredTimeToLiveAccessor::new(&config)),
        )
    }
}

impl fmt::Debug for MappingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingContext")
            .field("entities", &self.entity_paths())
            .finish_non_exhaustive()
    }
}
