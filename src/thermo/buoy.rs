//! Plain buoyancy (`swthermo = buoy`): `b` acts on the vertical velocity.

use super::buoyancy::{self, BUOYANCY};
use super::traits::Thermo;
use crate::config::{ConfigError, Input};
use crate::error::PreconditionError;
use crate::fd::o2::interp2;
use crate::fd::o4::interp4;
use crate::fields::{Field3d, Fields};
use crate::grid::{Grid, SpatialOrder};
use crate::stencil::for_each_level;

/// Upright-frame buoyancy.
#[derive(Clone, Debug, Default)]
pub struct Buoy {
    diffusivity: Option<f64>,
}

impl Buoy {
    /// Unconfigured module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `b` with the given diffusivity.
    pub fn configure(&mut self, diffusivity: f64, grid: &Grid, fields: &mut Fields) {
        buoyancy::init_buoyancy(grid, fields, diffusivity);
        self.diffusivity = Some(diffusivity);
    }
}

impl Thermo for Buoy {
    fn name(&self) -> &'static str {
        "buoy"
    }

    fn is_configured(&self) -> bool {
        self.diffusivity.is_some()
    }

    fn configure_from_input(
        &mut self,
        input: &Input,
        grid: &Grid,
        fields: &mut Fields,
    ) -> Result<(), ConfigError> {
        let diffusivity = input.get_item("fields", "svisc", Some(BUOYANCY))?;
        self.configure(diffusivity, grid, fields);
        Ok(())
    }

    fn exec(&self, grid: &Grid, fields: &mut Fields) -> crate::Result<()> {
        if !self.is_configured() {
            return Err(PreconditionError::NotConfigured { module: "buoy" }.into());
        }
        grid.check_halo(0, 0, 1, "buoyancy")?;

        let b = fields
            .sp
            .get(BUOYANCY)
            .ok_or_else(|| PreconditionError::MissingField(BUOYANCY.to_string()))?;
        grid.check_len(&b.name, &b.data)?;
        grid.check_len(&fields.wt.name, &fields.wt.data)?;

        match grid.order {
            SpatialOrder::Second => buoyancy_tend_w_2nd(&mut fields.wt.data, &b.data, grid),
            SpatialOrder::Fourth => buoyancy_tend_w_4th(&mut fields.wt.data, &b.data, grid),
        }
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

fn buoyancy_tend_w_2nd(wt: &mut [f64], b: &[f64], grid: &Grid) {
    let (jj, kk) = (grid.jj(), grid.kk());
    for_each_level(wt, kk, grid.kstart + 1..grid.kend, |k, wt| {
        for j in grid.jstart..grid.jend {
            for i in grid.istart..grid.iend {
                let ij = i + j * jj;
                let ijk = ij + k * kk;
                wt[ij] += interp2(b[ijk - kk], b[ijk]);
            }
        }
    });
}

fn buoyancy_tend_w_4th(wt: &mut [f64], b: &[f64], grid: &Grid) {
    let (jj, kk) = (grid.jj(), grid.kk());
    for_each_level(wt, kk, grid.kstart + 1..grid.kend, |k, wt| {
        for j in grid.jstart..grid.jend {
            for i in grid.istart..grid.iend {
                let ij = i + j * jj;
                let ijk = ij + k * kk;
                wt[ij] += interp4(b[ijk - 2 * kk], b[ijk - kk], b[ijk], b[ijk + kk]);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;
    use crate::parallel::Topology;

    #[test]
    fn test_linear_profile_interpolates_to_faces() {
        for order in [SpatialOrder::Second, SpatialOrder::Fourth] {
            let config = GridConfig::new((4, 4, 6), (4.0, 4.0, 6.0), order);
            let grid = Grid::new(&config, &Topology::single()).unwrap();
            let mut fields = Fields::new(&grid);
            let mut thermo = Buoy::new();
            thermo.configure(0.0, &grid, &mut fields);

            let b = fields.scalar_mut(BUOYANCY).unwrap();
            for k in 0..grid.kcells {
                for j in 0..grid.jcells {
                    for i in 0..grid.icells {
                        b.data[grid.index(i, j, k)] = 3.0 * grid.z(k);
                    }
                }
            }
            thermo.exec(&grid, &mut fields).unwrap();

            let i = grid.istart + 1;
            let j = grid.jend - 1;
            for k in grid.kstart + 1..grid.kend {
                let expected = 3.0 * grid.zh(k);
                assert!((fields.wt.data[grid.index(i, j, k)] - expected).abs() < 1e-12);
            }
            assert_eq!(fields.wt.data[grid.index(i, j, grid.kstart)], 0.0);
        }
    }

    #[test]
    fn test_exec_before_configure() {
        let config = GridConfig::new((4, 4, 4), (1.0, 1.0, 1.0), SpatialOrder::Fourth);
        let grid = Grid::new(&config, &Topology::single()).unwrap();
        let mut fields = Fields::new(&grid);
        assert!(matches!(
            Buoy::new().exec(&grid, &mut fields),
            Err(crate::Error::StencilPrecondition(PreconditionError::NotConfigured { .. }))
        ));
    }
}
