//! Selection of the thermodynamics variant.

use super::buoy::Buoy;
use super::buoy_slope::BuoySlope;
use super::disabled::Disabled;
use super::traits::Thermo;
use crate::config::{ConfigError, Input};
use crate::fields::{Field3d, Fields};
use crate::grid::Grid;

/// Thermodynamics variant chosen by `[thermo] swthermo`.
#[derive(Clone, Debug)]
pub enum ThermoKind {
    /// `swthermo = 0`
    Disabled(Disabled),
    /// `swthermo = buoy`
    Buoy(Buoy),
    /// `swthermo = slope` or `buoy_slope`
    BuoySlope(BuoySlope),
}

impl ThermoKind {
    /// Unconfigured variant for a switch value.
    pub fn from_switch(swthermo: &str) -> Result<Self, ConfigError> {
        match swthermo {
            "0" => Ok(ThermoKind::Disabled(Disabled)),
            "buoy" => Ok(ThermoKind::Buoy(Buoy::new())),
            "slope" | "buoy_slope" => Ok(ThermoKind::BuoySlope(BuoySlope::new())),
            other => Err(ConfigError::InvalidValue {
                block: "thermo".to_string(),
                item: "swthermo".to_string(),
                value: other.to_string(),
                expected: "thermodynamics switch (\"0\", \"buoy\" or \"slope\")",
            }),
        }
    }

    /// Select and configure the variant named in the input.
    /// A missing `swthermo` disables thermodynamics.
    pub fn from_input(input: &Input, grid: &Grid, fields: &mut Fields) -> Result<Self, ConfigError> {
        let swthermo: String = input.get_item_or("thermo", "swthermo", None, "0".to_string())?;
        let mut thermo = Self::from_switch(&swthermo)?;
        thermo.configure_from_input(input, grid, fields)?;
        Ok(thermo)
    }

    fn inner(&self) -> &dyn Thermo {
        match self {
            ThermoKind::Disabled(t) => t,
            ThermoKind::Buoy(t) => t,
            ThermoKind::BuoySlope(t) => t,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Thermo {
        match self {
            ThermoKind::Disabled(t) => t,
            ThermoKind::Buoy(t) => t,
            ThermoKind::BuoySlope(t) => t,
        }
    }
}

impl Default for ThermoKind {
    fn default() -> Self {
        ThermoKind::Disabled(Disabled)
    }
}

impl Thermo for ThermoKind {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn is_configured(&self) -> bool {
        self.inner().is_configured()
    }

    fn configure_from_input(
        &mut self,
        input: &Input,
        grid: &Grid,
        fields: &mut Fields,
    ) -> Result<(), ConfigError> {
        self.inner_mut().configure_from_input(input, grid, fields)
    }

    fn exec(&self, grid: &Grid, fields: &mut Fields) -> crate::Result<()> {
        self.inner().exec(grid, fields)
    }

    fn check_field_exists(&self, name: &str) -> bool {
        self.inner().check_field_exists(name)
    }

    fn get_thermo_field(
        &self,
        name: &str,
        grid: &Grid,
        fields: &Fields,
        out: &mut Field3d,
    ) -> crate::Result<()> {
        self.inner().get_thermo_field(name, grid, fields, out)
    }

    fn get_buoyancy_surf(
        &self,
        grid: &Grid,
        fields: &Fields,
        out: &mut Field3d,
    ) -> crate::Result<()> {
        self.inner().get_buoyancy_surf(grid, fields, out)
    }

    fn get_buoyancy_fluxbot(
        &self,
        grid: &Grid,
        fields: &Fields,
        out: &mut Field3d,
    ) -> crate::Result<()> {
        self.inner().get_buoyancy_fluxbot(grid, fields, out)
    }

    fn get_prog_vars(&self, list: &mut Vec<String>) {
        self.inner().get_prog_vars(list)
    }
}
