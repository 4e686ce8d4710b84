//! Tagged key/value save data for sandbox game mods.
//!
//! tagrecord persists game-object state as flat records of named, typed
//! values, and provides the registries that turn saved names back into live
//! objects on load.
//!
//! # Crate Structure
//!
//! - [`codec`] — Record type and the tagged binary encoding
//! - [`registry`] — Object registries and persistable capabilities (behind `registry` feature)

/// Re-export codec types.
pub mod codec {
    pub use tagrecord_codec::*;
}

/// Re-export registry types (requires `registry` feature).
#[cfg(feature = "registry")]
pub mod registry {
    pub use tagrecord_registry::*;
}
