//! No thermodynamics (`swthermo = 0`).

use super::traits::Thermo;
use crate::config::{ConfigError, Input};
use crate::error::PreconditionError;
use crate::fields::{Field3d, Fields};
use crate::grid::Grid;

/// Thermodynamics switched off: no prognostic variables, no tendencies.
#[derive(Clone, Copy, Debug, Default)]
pub struct Disabled;

impl Thermo for Disabled {
    fn name(&self) -> &'static str {
        "0"
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn configure_from_input(
        &mut self,
        _input: &Input,
        _grid: &Grid,
        _fields: &mut Fields,
    ) -> Result<(), ConfigError> {
        Ok(())
    }

    fn exec(&self, _grid: &Grid, _fields: &mut Fields) -> crate::Result<()> {
        Ok(())
    }

    fn check_field_exists(&self, _name: &str) -> bool {
        false
    }

    fn get_thermo_field(
        &self,
        name: &str,
        _grid: &Grid,
        _fields: &Fields,
        _out: &mut Field3d,
    ) -> crate::Result<()> {
        Err(PreconditionError::MissingField(name.to_string()).into())
    }

    fn get_buoyancy_surf(
        &self,
        _grid: &Grid,
        _fields: &Fields,
        _out: &mut Field3d,
    ) -> crate::Result<()> {
        Err(PreconditionError::MissingField("b".to_string()).into())
    }

    fn get_buoyancy_fluxbot(
        &self,
        _grid: &Grid,
        _fields: &Fields,
        _out: &mut Field3d,
    ) -> crate::Result<()> {
        Err(PreconditionError::MissingField("b".to_string()).into())
    }

    fn get_prog_vars(&self, _list: &mut Vec<String>) {}
}
