//! Mapping configuration.
//!
//! Per-entity keyspace and time-to-live settings, loadable from JSON.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, time::Duration};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ConfigError {
    #[error("keyspace settings for entity '{0}' declared more than once")]
    DuplicateEntity(String),

    #[error("keyspace settings entry has an empty entity path")]
    EmptyEntity,

    #[error("keyspace for entity '{0}' is empty")]
    EmptyKeyspace(String),

    #[error("invalid mapping configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

///
/// MappingConfiguration
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MappingConfiguration {
    /// Expiry applied to every entity without a more specific one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_time_to_live_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyspaces: Vec<KeyspaceSettings>,
}

impl MappingConfiguration {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();

        for settings in &self.keyspaces {
            if settings.entity.is_empty() {
                return Err(ConfigError::EmptyEntity);
            }
            if settings.keyspace.is_empty() {
                return Err(ConfigError::EmptyKeyspace(settings.entity.clone()));
            }
            if !seen.insert(settings.entity.as_str()) {
                return Err(ConfigError::DuplicateEntity(settings.entity.clone()));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn settings_for(&self, entity: &str) -> Option<&KeyspaceSettings> {
        self.keyspaces.iter().find(|s| s.entity == entity)
    }

    #[must_use]
    pub const fn default_time_to_live(&self) -> Option<Duration> {
        match self.default_time_to_live_secs {
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        }
    }

    //
    // builders
    //

    /// Set the keyspace for `entity`, keeping any time-to-live already set.
    #[must_use]
    pub fn with_keyspace(mut self, entity: impl Into<String>, keyspace: impl Into<String>) -> Self {
        let keyspace = keyspace.into();
        let settings = self.settings_mut(entity.into(), &keyspace);
        settings.keyspace = keyspace;
        self
    }

    /// Set the time-to-live for `entity`. Without an explicit keyspace the
    /// entity path is used.
    #[must_use]
    pub fn with_time_to_live(mut self, entity: impl Into<String>, secs: u64) -> Self {
        let entity = entity.into();
        let fallback = entity.clone();
        self.settings_mut(entity, &fallback).time_to_live_secs = Some(secs);
        self
    }

    #[must_use]
    pub const fn with_default_time_to_live(mut self, secs: u64) -> Self {
        self.default_time_to_live_secs = Some(secs);
        self
    }

    fn settings_mut(&mut self, entity: String, keyspace: &str) -> &mut KeyspaceSettings {
        match self.keyspaces.iter().position(|s| s.entity == entity) {
            Some(pos) => &mut self.keyspaces[pos],
            None => {
                self.keyspaces.push(KeyspaceSettings {
                    entity,
                    keyspace: keyspace.to_string(),
                    time_to_live_secs: None,
                });
                let last = self.keyspaces.len() - 1;
                &mut self.keyspaces[last]
            }
        }
    }
}

///
/// KeyspaceSettings
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeyspaceSettings {
    /// Fully-qualified type path the settings apply to.
    pub entity: String,
    pub keyspace: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_live_secs: Option<u64>,
}

impl KeyspaceSettings {
    #[must_use]
    pub const fn time_to_live(&self) -> Option<Duration> {
        match self.time_to_live_secs {
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keyspaces_and_default_ttl() {
        let config = MappingConfiguration::from_json(
            r#"{
                "default_time_to_live_secs": 600,
                "keyspaces": [
                    { "entity": "app::Person", "keyspace": "persons" },
                    { "entity": "app::Session", "keyspace": "sessions", "time_to_live_secs": 30 }
                ]
            }"#,
        )
        .expect("valid configuration should parse");

        assert_eq!(config.default_time_to_live(), Some(Duration::from_secs(600)));
        assert_eq!(
            config
                .settings_for("app::Session")
                .and_then(KeyspaceSettings::time_to_live),
            Some(Duration::from_secs(30))
        );
        assert_eq!(
            config.settings_for("app::Person").map(|s| s.keyspace.as_str()),
            Some("persons")
        );
    }

    #[test]
    fn empty_document_is_default() {
        let config = MappingConfiguration::from_json("{}").expect("empty object should parse");

        assert_eq!(config, MappingConfiguration::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = MappingConfiguration::from_json(r#"{ "keyspace": [] }"#)
            .expect_err("unknown top-level field should fail");

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn duplicate_entity_is_rejected() {
        let err = MappingConfiguration::from_json(
            r#"{ "keyspaces": [
                { "entity": "app::Person", "keyspace": "a" },
                { "entity": "app::Person", "keyspace": "b" }
            ] }"#,
        )
        .expect_err("duplicate entity settings should fail");

        assert!(
            err.to_string()
                .contains("entity 'app::Person' declared more than once"),
            "duplicate error should name the entity: {err}"
        );
    }

    #[test]
    fn empty_names_are_rejected() {
        let config = MappingConfiguration::default().with_keyspace("app::Person", "");
        assert!(matches!(config.validate(), Err(ConfigError::EmptyKeyspace(_))));

        let config = MappingConfiguration::default().with_keyspace("", "persons");
        assert!(matches!(config.validate(), Err(ConfigError::EmptyEntity)));
    }

    #[test]
    fn keyspace_builder_adds_and_overwrites_settings() {
        let config = MappingConfiguration::default()
            .with_keyspace("app::Person", "persons")
            .with_keyspace("app::City", "cities")
            .with_keyspace("app::Person", "people");

        assert_eq!(config.keyspaces.len(), 2);
        assert_eq!(
            config.settings_for("app::Person").map(|s| s.keyspace.as_str()),
            Some("people")
        );
        assert_eq!(
            config.settings_for("app::City").map(|s| s.keyspace.as_str()),
            Some("cities")
        );
    }

    #[test]
    fn builders_merge_settings_for_one_entity() {
        let config = MappingConfiguration::default()
            .with_time_to_live("app::Session", 30)
            .with_keyspace("app::Session", "sessions");

        assert_eq!(config.keyspaces.len(), 1);
        assert_eq!(
            config.settings_for("app::Session"),
            Some(&KeyspaceSettings {
                entity: "app::Session".to_string(),
                keyspace: "sessions".to_string(),
                time_to_live_secs: Some(30),
            })
        );
        assert!(config.validate().is_ok());
    }
}
