//! Canonical data shapes for the Hearth property catalog.
//!
//! Every storage backend produces and accepts exactly these types; nothing in
//! here knows which store is active. Keeping the shapes in their own crate
//! means the query layer, the backends, and any transport built on top agree
//! on one record layout instead of assembling ad hoc blobs per store.

pub mod page;
pub mod preferences;
pub mod property;

pub use page::PagedResult;
pub use preferences::PreferenceProfile;
pub use property::{
    AgentStats, Features, Location, NewProperty, PropertyPatch, PropertyRecord,
    PropertyStatus, PropertyType,
};
