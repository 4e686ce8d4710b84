//! Capabilities: state attached to blocks and items that survives save/load.

use tagrecord_codec::{Record, Tag};

use crate::component::{Energy, Fluid};
use crate::error::{RegistryError, Result};
use crate::registry::{RegistryManager, ENERGY, FLUID};
use crate::side::Side;

/// State that is written to and restored from a [`Record`].
///
/// `save_data` copies values into the record right before it is written.
/// `load_data` copies them back out right after a read; the record is reused
/// for the next pass, so nothing may keep borrowing from it.
pub trait Persist {
    /// Unique capability name.
    fn name(&self) -> &str;

    fn save_data(&self, record: &mut Record);

    fn load_data(&mut self, record: &Record, registries: &RegistryManager) -> Result<()>;
}

fn required_int(record: &Record, field: &'static str) -> Result<i32> {
    record.get_int(field).ok_or(RegistryError::MissingField {
        field,
        tag: Tag::Integer,
    })
}

fn required_string<'a>(record: &'a Record, field: &'static str) -> Result<&'a str> {
    record.get_string(field).ok_or(RegistryError::MissingField {
        field,
        tag: Tag::String,
    })
}

/// Stores a single kind of energy up to a fixed capacity.
#[derive(Debug, Clone)]
pub struct EnergyContainer {
    energy: Energy,
    energy_level: i32,
    max_energy_level: i32,
    input_rate: i32,
    output_rate: i32,
}

impl EnergyContainer {
    pub const NAME: &'static str = "ENERGY_CONTAINER";
    const ENERGY_FIELD: &'static str = "energy";
    const LEVEL_FIELD: &'static str = "energyLevel";

    pub fn new(max_energy_level: i32, input_rate: i32, output_rate: i32, energy: Energy) -> Self {
        Self {
            energy,
            energy_level: 0,
            max_energy_level,
            input_rate,
            output_rate,
        }
    }

    pub fn energy(&self) -> &Energy {
        &self.energy
    }

    pub fn current_energy_level(&self) -> i32 {
        self.energy_level
    }

    pub fn max_energy_level(&self) -> i32 {
        self.max_energy_level
    }

    pub fn energy_input_rate(&self, _side: Side) -> i32 {
        self.input_rate
    }

    pub fn energy_output_rate(&self, _side: Side) -> i32 {
        self.output_rate
    }

    /// Add up to `amount` of `energy`, returning how much was accepted.
    ///
    /// Only the container's own energy kind is accepted; the rest is capped by
    /// the remaining capacity.
    pub fn fill(&mut self, energy: &Energy, amount: i32) -> i32 {
        if *energy != self.energy {
            return 0;
        }
        let accepted = amount.clamp(0, (self.max_energy_level - self.energy_level).max(0));
        self.energy_level += accepted;
        accepted
    }

    /// Remove up to `amount` of `energy`, returning how much was removed.
    pub fn drain(&mut self, energy: &Energy, amount: i32) -> i32 {
        if *energy != self.energy {
            return 0;
        }
        let removed = amount.clamp(0, self.energy_level.max(0));
        self.energy_level -= removed;
        removed
    }
}

impl Persist for EnergyContainer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn save_data(&self, record: &mut Record) {
        record.insert(Self::ENERGY_FIELD, self.energy.name.as_str());
        record.insert(Self::LEVEL_FIELD, self.energy_level);
    }

    fn load_data(&mut self, record: &Record, registries: &RegistryManager) -> Result<()> {
        let name = required_string(record, Self::ENERGY_FIELD)?;
        let energy = registries.resolve::<Energy>(ENERGY, name)?.clone();
        let level = required_int(record, Self::LEVEL_FIELD)?;

        self.energy = energy;
        self.energy_level = level;
        Ok(())
    }
}

/// Holds one fluid at a time, optionally restricted to a whitelist.
#[derive(Debug, Clone)]
pub struct FluidContainer {
    fluid: Option<Fluid>,
    fluid_level: i32,
    max_fluid_level: i32,
    input_rate: i32,
    output_rate: i32,
    valid_fluids: Option<Vec<String>>,
}

impl FluidContainer {
    pub const NAME: &'static str = "FLUID_CONTAINER";
    const FLUID_FIELD: &'static str = "fluid";
    const LEVEL_FIELD: &'static str = "fluidLevel";

    /// `valid_fluids` lists accepted fluid names; `None` accepts any fluid.
    pub fn new(
        max_fluid_level: i32,
        input_rate: i32,
        output_rate: i32,
        valid_fluids: Option<Vec<String>>,
    ) -> Self {
        Self {
            fluid: None,
            fluid_level: 0,
            max_fluid_level,
            input_rate,
            output_rate,
            valid_fluids,
        }
    }

    pub fn fluid(&self) -> Option<&Fluid> {
        self.fluid.as_ref()
    }

    /// Temperature of the stored fluid, if any.
    pub fn fluid_temp(&self) -> Option<i32> {
        self.fluid.as_ref().map(|f| f.default_temp)
    }

    pub fn current_fluid_level(&self) -> i32 {
        self.fluid_level
    }

    pub fn max_fluid_level(&self) -> i32 {
        self.max_fluid_level
    }

    pub fn fluid_input_rate(&self, _side: Side) -> i32 {
        self.input_rate
    }

    pub fn fluid_output_rate(&self, _side: Side) -> i32 {
        self.output_rate
    }

    fn accepts(&self, fluid: &Fluid) -> bool {
        match &self.valid_fluids {
            Some(valid) => valid.iter().any(|name| *name == fluid.name),
            None => true,
        }
    }

    /// Set the stored fluid.
    ///
    /// `None` always clears it. A new fluid is only taken when the container
    /// is empty (or has no fluid) and the fluid passes the whitelist.
    pub fn set_fluid(&mut self, fluid: Option<Fluid>) {
        match fluid {
            None => self.fluid = None,
            Some(fluid) => {
                if (self.fluid_level == 0 || self.fluid.is_none()) && self.accepts(&fluid) {
                    self.fluid = Some(fluid);
                }
            }
        }
    }

    /// Add up to `amount` of `fluid`, returning how much was accepted.
    pub fn fill(&mut self, fluid: &Fluid, amount: i32) -> i32 {
        if self.fluid.is_none() {
            self.set_fluid(Some(fluid.clone()));
        }
        match &self.fluid {
            Some(stored) if stored == fluid => {
                let accepted = amount.clamp(0, (self.max_fluid_level - self.fluid_level).max(0));
                self.fluid_level += accepted;
                accepted
            }
            _ => 0,
        }
    }

    /// Remove up to `amount` of `fluid`, returning how much was removed.
    /// Draining to zero empties the container of its fluid.
    pub fn drain(&mut self, fluid: &Fluid, amount: i32) -> i32 {
        match &self.fluid {
            Some(stored) if stored == fluid => {
                let removed = amount.clamp(0, self.fluid_level.max(0));
                self.fluid_level -= removed;
                if self.fluid_level == 0 {
                    self.set_fluid(None);
                }
                removed
            }
            _ => 0,
        }
    }
}

impl Persist for FluidContainer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn save_data(&self, record: &mut Record) {
        if let Some(fluid) = &self.fluid {
            record.insert(Self::FLUID_FIELD, fluid.name.as_str());
        }
        record.insert(Self::LEVEL_FIELD, self.fluid_level);
    }

    fn load_data(&mut self, record: &Record, registries: &RegistryManager) -> Result<()> {
        let fluid = match record.get_string(Self::FLUID_FIELD) {
            Some(name) => Some(registries.resolve::<Fluid>(FLUID, name)?.clone()),
            None => None,
        };
        let level = required_int(record, Self::LEVEL_FIELD)?;

        self.fluid = fluid;
        self.fluid_level = level;
        Ok(())
    }
}
