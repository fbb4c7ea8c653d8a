//! Repository ports (interfaces) for the catalog.
//!
//! Each port is implemented by every storage adapter; the facade depends on
//! the port alone and receives a concrete adapter at construction time.

pub mod preferences;
pub mod properties;

pub use preferences::PreferenceRepository;
pub use properties::PropertyRepository;
