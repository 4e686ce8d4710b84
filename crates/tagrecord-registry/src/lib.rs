//! Name-keyed object registries and the capabilities that persist through them.
//!
//! Registries map unique names to live game objects. Capabilities save their
//! state into a [`tagrecord_codec::Record`] by name and, when loading, use a
//! [`RegistryManager`] to turn stored names back into registered objects.
//! The codec itself never consults a registry.

pub mod capability;
pub mod component;
pub mod direction;
pub mod error;
pub mod registry;
pub mod side;

pub use capability::{EnergyContainer, FluidContainer, Persist};
pub use component::{Block, Energy, Fluid, Item};
pub use direction::Direction;
pub use error::{RegistryError, Result};
pub use registry::{
    Registry, RegistryManager, RegistryObject, BLOCK, ENERGY, FLUID, ITEM,
};
pub use side::Side;
