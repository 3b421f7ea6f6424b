use crate::config::ConfigError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// MappingError
///
/// Structured mapping error with a stable classification.
/// Every mapping error is raised while metadata is being assembled, so none
/// of them are retryable.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct MappingError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    pub detail: Option<ErrorDetail>,
}

impl MappingError {
    /// Construct a MappingError without a detail payload.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct the error raised when an entity has no id property but one
    /// was required.
    pub fn missing_id_property(entity: &str) -> Self {
        Self::new(
            ErrorClass::NotFound,
            ErrorOrigin::Entity,
            format!("no id property found for entity '{entity}'"),
        )
    }

    /// Construct the error raised when a type is registered again with
    /// metadata that differs from its cached descriptor.
    pub fn entity_mismatch(entity: &str) -> Self {
        Self::new(
            ErrorClass::Conflict,
            ErrorOrigin::Context,
            format!(
                "entity '{entity}' is already registered with different mapping metadata; check your mapping configuration"
            ),
        )
    }

    /// Return the id conflict detail, if this error carries one.
    #[must_use]
    pub const fn id_conflict(&self) -> Option<&IdPropertyConflict> {
        match &self.detail {
            Some(ErrorDetail::IdConflict(conflict)) => Some(conflict),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_id_conflict(&self) -> bool {
        self.id_conflict().is_some()
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<IdPropertyConflict> for MappingError {
    fn from(conflict: IdPropertyConflict) -> Self {
        Self {
            class: ErrorClass::Conflict,
            origin: ErrorOrigin::Entity,
            message: conflict.to_string(),
            detail: Some(ErrorDetail::IdConflict(conflict)),
        }
    }
}

impl From<ConfigError> for MappingError {
    fn from(err: ConfigError) -> Self {
        Self {
            class: ErrorClass::InvalidConfig,
            origin: ErrorOrigin::Config,
            message: err.to_string(),
            detail: Some(ErrorDetail::Config(err)),
        }
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`MappingError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    IdConflict(IdPropertyConflict),

    #[error("{0}")]
    Config(ConfigError),
}

///
/// IdPropertyConflict
///
/// Raised when registering a property leaves the entity without a single
/// unambiguous id property. The message wording is relied upon by callers
/// that match on it.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error(
    "Attempt to add {} property {incoming} but already have an property {current} registered as id; check your mapping configuration",
    .kind.id_label()
)]
pub struct IdPropertyConflict {
    pub entity: String,
    pub incoming: String,
    pub current: String,
    pub kind: ConflictKind,
}

///
/// ConflictKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum ConflictKind {
    /// Both the registered id and the incoming property carry an explicit marker.
    ExplicitCollision,

    /// An unmarked candidate arrived after an explicit id was accepted.
    ImplicitAfterExplicit,

    /// Neither property carries an explicit marker.
    ImplicitCollision,
}

impl ConflictKind {
    /// True when the incoming property was explicitly marked as the id.
    #[must_use]
    pub const fn is_explicit(self) -> bool {
        matches!(self, Self::ExplicitCollision)
    }

    /// Property label used in the conflict message.
    #[must_use]
    pub const fn id_label(self) -> &'static str {
        if self.is_explicit() {
            "explicit id"
        } else {
            "id"
        }
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Conflict,
    NotFound,
    InvalidConfig,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::InvalidConfig => "invalid_config",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Entity,
    Context,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Entity => "entity",
            Self::Context => "context",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}
