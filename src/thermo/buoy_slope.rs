//! Buoyancy in a coordinate frame tilted by a slope angle.
//!
//! With the x-axis along a slope of angle `alpha` and a background
//! stratification `N²`, buoyancy `b` projects onto both the along-slope
//! and the slope-normal momentum equations, and advection of the
//! background gradient by the flow feeds back on `b`:
//!
//! ```text
//! du/dt += sin(alpha) b
//! dw/dt += cos(alpha) b
//! db/dt -= N² (sin(alpha) (u + utrans) + cos(alpha) w)
//! ```
//!
//! All terms use 4th-order interpolation between the staggered u, w and
//! cell-centre b locations. 2nd-order grids are rejected.

use super::buoyancy::{self, BUOYANCY};
use super::traits::Thermo;
use crate::config::{ConfigError, Input};
use crate::error::PreconditionError;
use crate::fd::o4::interp4;
use crate::fields::{Field3d, Fields};
use crate::grid::{Grid, SpatialOrder};
use crate::stencil::for_each_level;

/// Ghost cells the slope kernels reach in each direction.
const REACH: usize = 2;

/// Parameters of slope-flow buoyancy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlopeParams {
    /// Slope angle (radians)
    pub alpha: f64,
    /// Brunt-Väisälä frequency squared (s-2)
    pub n2: f64,
    /// Diffusivity of b (m2 s-1)
    pub diffusivity: f64,
}

impl SlopeParams {
    /// Read `[thermo] alpha, n2` and `[fields] svisc[b]`.
    pub fn from_input(input: &Input) -> Result<Self, ConfigError> {
        Ok(Self {
            alpha: input.get_item("thermo", "alpha", None)?,
            n2: input.get_item("thermo", "n2", None)?,
            diffusivity: input.get_item("fields", "svisc", Some(BUOYANCY))?,
        })
    }
}

/// Slope-flow thermodynamics (`swthermo = slope`).
#[derive(Clone, Debug, Default)]
pub struct BuoySlope {
    params: Option<SlopeParams>,
}

impl BuoySlope {
    /// Unconfigured module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters, once configured.
    pub fn params(&self) -> Option<&SlopeParams> {
        self.params.as_ref()
    }

    /// Validate the grid, register `b` and store the parameters.
    pub fn configure(
        &mut self,
        params: SlopeParams,
        grid: &Grid,
        fields: &mut Fields,
    ) -> Result<(), ConfigError> {
        check_order(grid)?;
        buoyancy::init_buoyancy(grid, fields, params.diffusivity);
        self.params = Some(params);

        tracing::debug!(
            alpha = params.alpha,
            n2 = params.n2,
            "slope thermodynamics configured"
        );
        Ok(())
    }
}

fn check_order(grid: &Grid) -> Result<(), ConfigError> {
    match grid.order {
        SpatialOrder::Fourth => Ok(()),
        SpatialOrder::Second => Err(ConfigError::incompatible(
            "swthermo = slope is incompatible with swspatialorder = 2",
        )),
    }
}

impl Thermo for BuoySlope {
    fn name(&self) -> &'static str {
        "slope"
    }

    fn is_configured(&self) -> bool {
        self.params.is_some()
    }

    fn configure_from_input(
        &mut self,
        input: &Input,
        grid: &Grid,
        fields: &mut Fields,
    ) -> Result<(), ConfigError> {
        let params = SlopeParams::from_input(input)?;
        self.configure(params, grid, fields)
    }

    fn exec(&self, grid: &Grid, fields: &mut Fields) -> crate::Result<()> {
        let params = self
            .params
            .ok_or(PreconditionError::NotConfigured { module: "slope" })?;
        check_order(grid)?;
        grid.check_halo(REACH, REACH, REACH, "slope buoyancy")?;

        let b = fields
            .sp
            .get(BUOYANCY)
            .ok_or_else(|| PreconditionError::MissingField(BUOYANCY.to_string()))?;
        let bt = fields
            .st
            .get_mut(BUOYANCY)
            .ok_or_else(|| PreconditionError::MissingField(format!("{}t", BUOYANCY)))?;
        for field in [&fields.u, &fields.w, &fields.ut, &fields.wt, b, &*bt] {
            grid.check_len(&field.name, &field.data)?;
        }

        let (sinalpha, cosalpha) = params.alpha.sin_cos();
        buoyancy_tend_u_4th(&mut fields.ut.data, &b.data, grid, sinalpha);
        buoyancy_tend_w_4th(&mut fields.wt.data, &b.data, grid, cosalpha);
        buoyancy_tend_b_4th(
            &mut bt.data,
            &fields.u.data,
            &fields.w.data,
            grid,
            params.n2,
            sinalpha,
            cosalpha,
        );
        Ok(())
    }

    fn check_field_exists(&self, name: &str) -> bool {
        name == BUOYANCY
    }

    fn get_thermo_field(
        &self,
        name: &str,
        grid: &Grid,
        fields: &Fields,
        out: &mut Field3d,
    ) -> crate::Result<()> {
        if !self.check_field_exists(name) {
            return Err(PreconditionError::MissingField(name.to_string()).into());
        }
        buoyancy::calc_buoyancy(grid, fields, out)
    }

    fn get_buoyancy_surf(
        &self,
        grid: &Grid,
        fields: &Fields,
        out: &mut Field3d,
    ) -> crate::Result<()> {
        buoyancy::calc_buoyancy_bot(grid, fields, out)?;
        buoyancy::calc_buoyancy_fluxbot(grid, fields, out)
    }

    fn get_buoyancy_fluxbot(
        &self,
        grid: &Grid,
        fields: &Fields,
        out: &mut Field3d,
    ) -> crate::Result<()> {
        buoyancy::calc_buoyancy_fluxbot(grid, fields, out)
    }

    fn get_prog_vars(&self, list: &mut Vec<String>) {
        list.push(BUOYANCY.to_string());
    }
}

// =============================================================================
// Kernels
// =============================================================================

/// `ut += sin(alpha) * b` interpolated to u-points.
pub fn buoyancy_tend_u_4th(ut: &mut [f64], b: &[f64], grid: &Grid, sinalpha: f64) {
    let (jj, kk) = (grid.jj(), grid.kk());
    for_each_level(ut, kk, grid.kstart..grid.kend, |k, ut| {
        for j in grid.jstart..grid.jend {
            for i in grid.istart..grid.iend {
                let ij = i + j * jj;
                let ijk = ij + k * kk;
                ut[ij] += sinalpha * interp4(b[ijk - 2], b[ijk - 1], b[ijk], b[ijk + 1]);
            }
        }
    });
}

/// `wt += cos(alpha) * b` interpolated to w-points, above the bottom face.
pub fn buoyancy_tend_w_4th(wt: &mut [f64], b: &[f64], grid: &Grid, cosalpha: f64) {
    let (jj, kk) = (grid.jj(), grid.kk());
    for_each_level(wt, kk, grid.kstart + 1..grid.kend, |k, wt| {
        for j in grid.jstart..grid.jend {
            for i in grid.istart..grid.iend {
                let ij = i + j * jj;
                let ijk = ij + k * kk;
                wt[ij] += cosalpha
                    * interp4(b[ijk - 2 * kk], b[ijk - kk], b[ijk], b[ijk + kk]);
            }
        }
    });
}

/// `bt -= n2 * (sin(alpha) * (u + utrans) + cos(alpha) * w)`, with u and w
/// interpolated to cell centres.
pub fn buoyancy_tend_b_4th(
    bt: &mut [f64],
    u: &[f64],
    w: &[f64],
    grid: &Grid,
    n2: f64,
    sinalpha: f64,
    cosalpha: f64,
) {
    let (jj, kk) = (grid.jj(), grid.kk());
    let utrans = grid.utrans;
    for_each_level(bt, kk, grid.kstart..grid.kend, |k, bt| {
        for j in grid.jstart..grid.jend {
            for i in grid.istart..grid.iend {
                let ij = i + j * jj;
                let ijk = ij + k * kk;
                bt[ij] -= n2
                    * (sinalpha * (interp4(u[ijk - 1], u[ijk], u[ijk + 1], u[ijk + 2]) + utrans)
                        + cosalpha
                            * interp4(w[ijk - kk], w[ijk], w[ijk + kk], w[ijk + 2 * kk]));
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;
    use crate::parallel::Topology;

    fn grid(order: SpatialOrder) -> Grid {
        let config = GridConfig::new((4, 4, 4), (4.0, 4.0, 4.0), order);
        Grid::new(&config, &Topology::single()).unwrap()
    }

    fn params() -> SlopeParams {
        SlopeParams {
            alpha: 0.3,
            n2: 1e-4,
            diffusivity: 1e-5,
        }
    }

    #[test]
    fn test_configure_registers_buoyancy() {
        let grid = grid(SpatialOrder::Fourth);
        let mut fields = Fields::new(&grid);
        let mut thermo = BuoySlope::new();
        assert!(!thermo.is_configured());

        thermo.configure(params(), &grid, &mut fields).unwrap();
        assert!(thermo.is_configured());
        assert_eq!(fields.sp[BUOYANCY].long_name, "Buoyancy");
        assert_eq!(fields.sp[BUOYANCY].unit, "m s-2");
        assert_eq!(fields.sp[BUOYANCY].visc, 1e-5);

        let mut vars = Vec::new();
        thermo.get_prog_vars(&mut vars);
        assert_eq!(vars, vec!["b".to_string()]);
        assert!(thermo.check_field_exists("b"));
        assert!(!thermo.check_field_exists("T"));
    }

    #[test]
    fn test_second_order_rejected() {
        let grid = grid(SpatialOrder::Second);
        let mut fields = Fields::new(&grid);
        let mut thermo = BuoySlope::new();
        let err = thermo.configure(params(), &grid, &mut fields).unwrap_err();
        assert!(matches!(err, ConfigError::Incompatible(_)));
        assert!(!thermo.is_configured());
    }

    #[test]
    fn test_from_input_requires_svisc() {
        let input: Input = "[thermo]\nalpha = 0.1\nn2 = 1e-4\n".parse().unwrap();
        assert!(matches!(
            SlopeParams::from_input(&input),
            Err(ConfigError::Missing { .. })
        ));

        let input: Input = "[thermo]\nalpha = 0.1\nn2 = 1e-4\n[fields]\nsvisc[b] = 2e-5\n"
            .parse()
            .unwrap();
        let params = SlopeParams::from_input(&input).unwrap();
        assert_eq!(params.diffusivity, 2e-5);
    }

    #[test]
    fn test_uniform_buoyancy_gives_projected_tendencies() {
        let grid = grid(SpatialOrder::Fourth);
        let mut fields = Fields::new(&grid);
        let mut thermo = BuoySlope::new();
        thermo.configure(params(), &grid, &mut fields).unwrap();
        fields.scalar_mut(BUOYANCY).unwrap().fill(2.0);

        thermo.exec(&grid, &mut fields).unwrap();

        let (s, c) = 0.3f64.sin_cos();
        let bottom = grid.index(grid.istart, grid.jstart, grid.kstart);
        let above = grid.index(grid.istart, grid.jstart, grid.kstart + 1);
        assert!((fields.ut.data[bottom] - 2.0 * s).abs() < 1e-14);
        assert_eq!(fields.wt.data[bottom], 0.0);
        assert!((fields.wt.data[above] - 2.0 * c).abs() < 1e-14);
        assert_eq!(fields.st[BUOYANCY].data[bottom], 0.0);
    }
}
