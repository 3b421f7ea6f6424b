
use crate::{
    error::{IdPropertyConflict, MappingError},
    keyspace::KeySpaceResolver,
    model::{id::IdSlot, property::PersistentProperty},
    ttl::{Expiring, TimeToLiveAccessor},
};
use derive_more::Display;
use std::{
    fmt,
    sync::{Arc, OnceLock},
    time::Duration,
};
use tracing::{debug, trace, warn};

///
/// EntityType
///
/// Identity of one mapped type as supplied by the type metadata provider.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("{path}")]
pub struct EntityType {
    /// Fully-qualified type path (for diagnostics and keyspace fallback).
    pub path: &'static str,

    /// Keyspace declared on the type itself.
    pub keyspace: Option<&'static str>,

    /// Time-to-live declared on the type itself, in seconds.
    pub time_to_live_secs: Option<u64>,
}

impl EntityType {
    #[must_use]
    pub const fn new(path: &'static str) -> Self {
        Self {
            path,
            keyspace: None,
            time_to_live_secs: None,
        }
    }

    #[must_use]
    pub const fn with_keyspace(mut self, keyspace: &'static str) -> Self {
        self.keyspace = Some(keyspace);
        self
    }

    #[must_use]
    pub const fn with_time_to_live(mut self, secs: u64) -> Self {
        self.time_to_live_secs = Some(secs);
        self
    }

    #[must_use]
    pub const fn time_to_live(&self) -> Option<Duration> {
        match self.time_to_live_secs {
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        }
    }
}

///
/// EntityDescriptor
///
/// Mapping metadata for one type: its registered properties, the single id
/// property, and the keyspace and time-to-live collaborators.
///
/// Registration happens once, from one thread, before the descriptor is
/// shared. Afterwards it is only read.
///

pub struct EntityDescriptor {
    entity: EntityType,
    properties: Vec<PersistentProperty>,
    id: IdSlot,
    time_to_live_property: Option<usize>,
    keyspace: OnceLock<String>,
    keyspace_resolver: Arc<dyn KeySpaceResolver>,
    time_to_live_accessor: Arc<dyn TimeToLiveAccessor>,
}

impl EntityDescriptor {
    #[must_use]
    pub fn new(
        entity: EntityType,
        keyspace_resolver: Arc<dyn KeySpaceResolver>,
        time_to_live_accessor: Arc<dyn TimeToLiveAccessor>,
    ) -> Self {
        Self {
            entity,
            properties: Vec::new(),
            id: IdSlot::Empty,
            time_to_live_property: None,
            keyspace: OnceLock::new(),
            keyspace_resolver,
            time_to_live_accessor,
        }
    }

    /// Build a descriptor and register `properties` in order, stopping at the
    /// first conflict.
    pub fn build(
        entity: EntityType,
        properties: impl IntoIterator<Item = PersistentProperty>,
        keyspace_resolver: Arc<dyn KeySpaceResolver>,
        time_to_live_accessor: Arc<dyn TimeToLiveAccessor>,
    ) -> Result<Self, MappingError> {
        let mut descriptor = Self::new(entity, keyspace_resolver, time_to_live_accessor);
        for property in properties {
            descriptor.register(property)?;
        }

        Ok(descriptor)
    }

    /// Register one discovered property.
    ///
    /// The property is always appended. Id candidates are then offered to the
    /// id slot; a conflict leaves the current id in place and the descriptor
    /// should be abandoned by the caller.
    pub fn register(&mut self, property: PersistentProperty) -> Result<(), MappingError> {
        let index = self.properties.len();
        self.properties.push(property);
        trace!(entity = %self.entity, property = property.name, "property registered");

        if property.is_time_to_live() {
            self.register_time_to_live(index);
        }

        if !property.is_id_candidate() {
            return Ok(());
        }

        match self.id.offer(index, property.has_explicit_id_marker()) {
            Ok(next) => {
                if let Some(previous) = self.id.index() {
                    debug!(
                        entity = %self.entity,
                        previous = self.properties[previous].name,
                        property = property.name,
                        "explicit id property replaces implicit id"
                    );
                } else {
                    debug!(
                        entity = %self.entity,
                        property = property.name,
                        explicit = next.is_explicit(),
                        "id property selected"
                    );
                }
                self.id = next;

                Ok(())
            }
            Err(rejection) => {
                let conflict = IdPropertyConflict {
                    entity: self.entity.path.to_string(),
                    incoming: property.name.to_string(),
                    current: self.properties[rejection.current].name.to_string(),
                    kind: rejection.kind,
                };
                warn!(entity = %self.entity, kind = ?conflict.kind, "{conflict}");

                Err(conflict.into())
            }
        }
    }

    // first marked property wins
    fn register_time_to_live(&mut self, index: usize) {
        match self.time_to_live_property {
            None => self.time_to_live_property = Some(index),
            Some(current) => warn!(
                entity = %self.entity,
                current = self.properties[current].name,
                ignored = self.properties[index].name,
                "entity already has a time-to-live property"
            ),
        }
    }

    //
    // id
    //

    #[must_use]
    pub fn id_property(&self) -> Option<&PersistentProperty> {
        self.id.index().map(|index| &self.properties[index])
    }

    pub fn required_id_property(&self) -> Result<&PersistentProperty, MappingError> {
        self.id_property()
            .ok_or_else(|| MappingError::missing_id_property(self.entity.path))
    }

    #[must_use]
    pub const fn has_id_property(&self) -> bool {
        !self.id.is_empty()
    }

    #[must_use]
    pub const fn is_id_explicit(&self) -> bool {
        self.id.is_explicit()
    }

    //
    // properties
    //

    #[must_use]
    pub const fn entity(&self) -> &EntityType {
        &self.entity
    }

    /// Registered properties in registration order.
    #[must_use]
    pub fn properties(&self) -> &[PersistentProperty] {
        &self.properties
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PersistentProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    //
    // keyspace / time-to-live
    //

    /// Keyspace for this type, resolved on first use and cached.
    #[must_use]
    pub fn keyspace(&self) -> &str {
        self.keyspace
            .get_or_init(|| self.keyspace_resolver.resolve_key_space(&self.entity))
    }

    #[must_use]
    pub const fn time_to_live_accessor(&self) -> &Arc<dyn TimeToLiveAccessor> {
        &self.time_to_live_accessor
    }

    #[must_use]
    pub fn time_to_live_property(&self) -> Option<&PersistentProperty> {
        self.time_to_live_property
            .map(|index| &self.properties[index])
    }

    #[must_use]
    pub const fn has_time_to_live_property(&self) -> bool {
        self.time_to_live_property.is_some()
    }

    /// Expiry for one instance of this type, as computed by the accessor.
    #[must_use]
    pub fn time_to_live_of(&self, instance: &dyn Expiring) -> Option<Duration> {
        self.time_to_live_accessor
            .time_to_live(&self.entity, instance)
    }
}

impl fmt::Debug for EntityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("entity", &self.entity)
            .field("properties", &self.properties)
            .field("id", &self.id)
            .field("time_to_live_property", &self.time_to_live_property)
            .field("keyspace", &self.keyspace.get())
            .finish_non_exhaustive()
    }
}
