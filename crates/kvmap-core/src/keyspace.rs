//! Keyspace resolution.
//!
//! A keyspace is the key prefix that groups the records of one mapped type.

use crate::{config::MappingConfiguration, model::entity::EntityType};
use std::collections::BTreeMap;

///
/// KeySpaceResolver
///
/// Maps an entity type to its keyspace. Called at most once per descriptor.
///

pub trait KeySpaceResolver: Send + Sync {
    fn resolve_key_space(&self, entity: &EntityType) -> String;
}

///
/// TypeNameKeySpaceResolver
///
/// Uses the keyspace declared on the type, else the full type path.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct TypeNameKeySpaceResolver;

impl KeySpaceResolver for TypeNameKeySpaceResolver {
    fn resolve_key_space(&self, entity: &EntityType) -> String {
        entity.keyspace.unwrap_or(entity.path).to_string()
    }
}

///
/// ConfiguredKeySpaceResolver
///
/// Configured keyspaces take precedence over anything declared on the type.
///

#[derive(Clone, Debug, Default)]
pub struct ConfiguredKeySpaceResolver {
    keyspaces: BTreeMap<String, String>,
    fallback: TypeNameKeySpaceResolver,
}

impl ConfiguredKeySpaceResolver {
    #[must_use]
    pub fn new(config: &MappingConfiguration) -> Self {
        let keyspaces = config
            .keyspaces
            .iter()
            .map(|settings| (settings.entity.clone(), settings.keyspace.clone()))
            .collect();

        Self {
            keyspaces,
            fallback: TypeNameKeySpaceResolver,
        }
    }
}

impl KeySpaceResolver for ConfiguredKeySpaceResolver {
    fn resolve_key_space(&self, entity: &EntityType) -> String {
        match self.keyspaces.get(entity.path) {
            Some(keyspace) => keyspace.clone(),
            None => self.fallback.resolve_key_space(entity),
        }
    }
}
