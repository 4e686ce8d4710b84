//! Registrable game components.
//!
//! Each component is a plain description of one kind of thing: its defaults
//! are copied into game state when an instance is created, and its name is
//! what gets saved.

use crate::registry::RegistryObject;

/// A placeable block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub name: String,
    pub texture_location: String,
    /// Non-zero when the block fills its whole cell, for face culling.
    pub default_full_block: i32,
    pub default_hardness: i32,
    pub default_opacity: f32,
    /// Non-zero when breaking the block requires a tool.
    pub default_need_tool: f32,
}

impl Block {
    pub fn new(name: impl Into<String>, texture_location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture_location: texture_location.into(),
            default_full_block: 1,
            default_hardness: 0,
            default_opacity: 1.0,
            default_need_tool: 0.0,
        }
    }

    pub fn with_hardness(mut self, default_hardness: i32) -> Self {
        self.default_hardness = default_hardness;
        self
    }

    pub fn with_opacity(mut self, default_opacity: f32) -> Self {
        self.default_opacity = default_opacity;
        self
    }

    pub fn partial(mut self) -> Self {
        self.default_full_block = 0;
        self
    }

    pub fn needs_tool(mut self) -> Self {
        self.default_need_tool = 1.0;
        self
    }

    pub fn is_full_block(&self) -> bool {
        self.default_full_block != 0
    }
}

impl RegistryObject for Block {
    fn name(&self) -> &str {
        &self.name
    }
}

/// An item that can be held and used.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    pub texture_location: String,
    pub default_use_action: i32,
    pub default_has_health: i32,
    pub default_extra_prop: f32,
    pub default_health: f32,
}

impl Item {
    pub fn new(name: impl Into<String>, texture_location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture_location: texture_location.into(),
            default_use_action: 0,
            default_has_health: 0,
            default_extra_prop: 0.0,
            default_health: 0.0,
        }
    }

    pub fn with_use_action(mut self, default_use_action: i32) -> Self {
        self.default_use_action = default_use_action;
        self
    }

    /// Give the item a durability, in uses.
    pub fn with_health(mut self, default_health: f32) -> Self {
        self.default_has_health = 1;
        self.default_health = default_health;
        self
    }

    pub fn has_health(&self) -> bool {
        self.default_has_health != 0
    }
}

impl RegistryObject for Item {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A kind of energy that can be stored and moved between containers.
#[derive(Debug, Clone, PartialEq)]
pub struct Energy {
    pub name: String,
    pub default_max_rate: i32,
    pub default_potency: i32,
}

impl Energy {
    pub fn new(name: impl Into<String>, default_max_rate: i32, default_potency: i32) -> Self {
        Self {
            name: name.into(),
            default_max_rate,
            default_potency,
        }
    }
}

impl RegistryObject for Energy {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A fluid that can fill a container.
#[derive(Debug, Clone, PartialEq)]
pub struct Fluid {
    pub name: String,
    pub texture_location: String,
    pub default_temp: i32,
    pub default_evaporation_rate: i32,
    pub default_viscosity: f32,
    pub default_buoyancy: f32,
}

impl Fluid {
    pub fn new(name: impl Into<String>, texture_location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture_location: texture_location.into(),
            default_temp: 0,
            default_evaporation_rate: 0,
            default_viscosity: 1.0,
            default_buoyancy: 1.0,
        }
    }

    pub fn with_temp(mut self, default_temp: i32) -> Self {
        self.default_temp = default_temp;
        self
    }
}

impl RegistryObject for Fluid {
    fn name(&self) -> &str {
        &self.name
    }
}
