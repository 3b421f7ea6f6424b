///
/// IdRole
///
/// How a property relates to the record identifier. An explicit marker
/// always implies id candidacy.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum IdRole {
    #[default]
    None,

    /// Structurally eligible to be the id (named or typed as one).
    Candidate,

    /// Declared as the id by the user.
    Explicit,
}

///
/// PersistentProperty
///
/// Immutable property handle produced by upstream classification.
/// The descriptor only reads it.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PersistentProperty {
    pub name: &'static str,
    pub id: IdRole,

    /// Property holds the per-instance time-to-live.
    pub time_to_live: bool,
}

impl PersistentProperty {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            id: IdRole::None,
            time_to_live: false,
        }
    }

    #[must_use]
    pub const fn id_candidate(mut self) -> Self {
        self.id = IdRole::Candidate;
        self
    }

    #[must_use]
    pub const fn explicit_id(mut self) -> Self {
        self.id = IdRole::Explicit;
        self
    }

    #[must_use]
    pub const fn time_to_live(mut self) -> Self {
        self.time_to_live = true;
        self
    }

    #[must_use]
    pub const fn is_id_candidate(&self) -> bool {
        matches!(self.id, IdRole::Candidate | IdRole::Explicit)
    }

    #[must_use]
    pub const fn has_explicit_id_marker(&self) -> bool {
        matches!(self.id, IdRole::Explicit)
    }

    #[must_use]
    pub const fn is_time_to_live(&self) -> bool {
        self.time_to_live
    }
}
