//! Mapping metadata model.
//!
//! - `property` holds the already-classified property handles handed over by
//!   upstream introspection
//! - `id` holds the id-property selection state machine
//! - `entity` holds the per-type descriptor that ties them together
pub mod entity;
pub mod id;
pub mod property;
