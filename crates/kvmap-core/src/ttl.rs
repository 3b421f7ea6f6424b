//! Time-to-live lookup.

use crate::{config::MappingConfiguration, model::entity::EntityType};
use std::{collections::BTreeMap, time::Duration};

///
/// Expiring
///
/// Instance-level expiry, read from the instance's time-to-live property.
/// Types without one keep the default.
///

pub trait Expiring {
    fn time_to_live(&self) -> Option<Duration> {
        None
    }
}

///
/// TimeToLiveAccessor
///

pub trait TimeToLiveAccessor: Send + Sync {
    fn time_to_live(&self, entity: &EntityType, instance: &dyn Expiring) -> Option<Duration>;
}

///
/// NoTimeToLive
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoTimeToLive;

impl TimeToLiveAccessor for NoTimeToLive {
    fn time_to_live(&self, _: &EntityType, _: &dyn Expiring) -> Option<Duration> {
        None
    }
}

///
/// ConfiguredTimeToLiveAccessor
///
/// Lookup order: instance, per-entity configuration, type declaration,
/// configured default. Configuration beats the type declaration, as it does
/// for keyspaces.
///

#[derive(Clone, Debug, Default)]
pub struct ConfiguredTimeToLiveAccessor {
    per_entity: BTreeMap<String, Duration>,
    default: Option<Duration>,
}

impl ConfiguredTimeToLiveAccessor {
    #[must_use]
    pub fn new(config: &MappingConfiguration) -> Self {
        let per_entity = config
            .keyspaces
            .iter()
            .filter_map(|settings| {
                settings
                    .time_to_live()
                    .map(|ttl| (settings.entity.clone(), ttl))
            })
            .collect();

        Self {
            per_entity,
            default: config.default_time_to_live(),
        }
    }
}

impl TimeToLiveAccessor for ConfiguredTimeToLiveAccessor {
    fn time_to_live(&self, entity: &EntityType, instance: &dyn Expiring) -> Option<Duration> {
        instance
            .time_to_live()
            .or_else(|| self.per_entity.get(entity.path).copied())
            .or_else(|| entity.time_to_live())
            .or(self.default)
    }
}
