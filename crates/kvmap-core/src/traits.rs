use crate::model::{entity::EntityType, property::PersistentProperty};

///
/// Mapped
///
/// Implemented for every type the mapping layer stores, normally by derive
/// code that has already classified each property.
///

pub trait Mapped {
    const ENTITY: EntityType;

    /// Properties in discovery order.
    const PROPERTIES: &'static [PersistentProperty];
}
