//! Thermodynamics trait.

use crate::config::{ConfigError, Input};
use crate::fields::{Field3d, Fields};
use crate::grid::Grid;

// =============================================================================
// Thermo Trait
// =============================================================================

/// Buoyancy forcing of the momentum and scalar equations.
///
/// A thermodynamics module is selected once from configuration, registers
/// its prognostic scalars in [`Fields`] during configuration, and adds its
/// tendencies on every call to [`Thermo::exec`]. It performs no
/// communication: halos of the fields it reads must be current.
///
/// Lifecycle:
///
/// ```text
/// Unconfigured --configure--> Configured --exec--> Configured
/// ```
///
/// `exec` on an unconfigured module fails without touching any tendency.
pub trait Thermo: Send {
    /// Value of `swthermo` selecting this module.
    fn name(&self) -> &'static str;

    /// Whether configuration has completed.
    fn is_configured(&self) -> bool;

    /// Read parameters and register prognostic fields.
    fn configure_from_input(
        &mut self,
        input: &Input,
        grid: &Grid,
        fields: &mut Fields,
    ) -> Result<(), ConfigError>;

    /// Add the buoyancy tendencies to `fields`.
    fn exec(&self, grid: &Grid, fields: &mut Fields) -> crate::Result<()>;

    /// Whether this module can produce the diagnostic field `name`.
    fn check_field_exists(&self, name: &str) -> bool;

    /// Compute diagnostic field `name` into `out`.
    fn get_thermo_field(
        &self,
        name: &str,
        grid: &Grid,
        fields: &Fields,
        out: &mut Field3d,
    ) -> crate::Result<()>;

    /// Surface buoyancy: bottom values, the first interior level, and the
    /// bottom flux.
    fn get_buoyancy_surf(&self, grid: &Grid, fields: &Fields, out: &mut Field3d)
        -> crate::Result<()>;

    /// Surface buoyancy flux.
    fn get_buoyancy_fluxbot(
        &self,
        grid: &Grid,
        fields: &Fields,
        out: &mut Field3d,
    ) -> crate::Result<()>;

    /// Append the names of the prognostic variables this module owns.
    fn get_prog_vars(&self, list: &mut Vec<String>);
}
