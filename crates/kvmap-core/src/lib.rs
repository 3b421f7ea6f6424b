//! Core mapping metadata for kvmap: entity descriptors, id-property
//! resolution, keyspace and time-to-live collaborators, and the mapping
//! context that caches one descriptor per mapped type.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod context;
pub mod error;
pub mod keyspace;
pub mod model;
pub mod traits;
pub mod ttl;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, caches, or resolver implementations are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{
            entity::{EntityDescriptor, EntityType},
            property::{IdRole, PersistentProperty},
        },
        traits::Mapped,
        ttl::Expiring,
    };
}
