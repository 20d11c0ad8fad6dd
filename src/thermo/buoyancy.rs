//! Buoyancy diagnostics shared by the modules that carry `b` as a
//! prognostic scalar.

use crate::error::PreconditionError;
use crate::fields::{Field3d, Fields};
use crate::grid::Grid;

/// Name of the prognostic buoyancy scalar.
pub const BUOYANCY: &str = "b";

/// Register `b` with diffusivity `visc`.
pub(crate) fn init_buoyancy(grid: &Grid, fields: &mut Fields, visc: f64) {
    fields
        .init_prognostic_field(grid, BUOYANCY, "Buoyancy", "m s-2")
        .visc = visc;
}

/// Buoyancy equals the prognostic scalar: copy all levels of the interior
/// columns.
pub(crate) fn calc_buoyancy(grid: &Grid, fields: &Fields, out: &mut Field3d) -> crate::Result<()> {
    let b = fields.scalar(BUOYANCY)?;
    check_pair(grid, b, out)?;

    for k in 0..grid.kcells {
        for j in grid.jstart..grid.jend {
            let row = grid.index(0, j, k);
            out.data[row + grid.istart..row + grid.iend]
                .copy_from_slice(&b.data[row + grid.istart..row + grid.iend]);
        }
    }
    Ok(())
}

/// Bottom values and the first interior level over the padded plane.
pub(crate) fn calc_buoyancy_bot(
    grid: &Grid,
    fields: &Fields,
    out: &mut Field3d,
) -> crate::Result<()> {
    let b = fields.scalar(BUOYANCY)?;
    check_pair(grid, b, out)?;

    out.databot.copy_from_slice(&b.databot);
    let level = grid.kstart * grid.ijcells..(grid.kstart + 1) * grid.ijcells;
    out.data[level.clone()].copy_from_slice(&b.data[level]);
    Ok(())
}

/// Bottom flux over the padded plane.
pub(crate) fn calc_buoyancy_fluxbot(
    grid: &Grid,
    fields: &Fields,
    out: &mut Field3d,
) -> crate::Result<()> {
    let b = fields.scalar(BUOYANCY)?;
    check_pair(grid, b, out)?;

    out.datafluxbot.copy_from_slice(&b.datafluxbot);
    Ok(())
}

fn check_pair(grid: &Grid, b: &Field3d, out: &Field3d) -> Result<(), PreconditionError> {
    b.check_size(grid)?;
    out.check_size(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridConfig, SpatialOrder};
    use crate::parallel::Topology;

    fn setup() -> (Grid, Fields) {
        let config = GridConfig::new((4, 4, 4), (1.0, 1.0, 1.0), SpatialOrder::Fourth);
        let grid = Grid::new(&config, &Topology::single()).unwrap();
        let mut fields = Fields::new(&grid);
        init_buoyancy(&grid, &mut fields, 1e-5);
        let b = fields.scalar_mut(BUOYANCY).unwrap();
        for (n, value) in b.data.iter_mut().enumerate() {
            *value = n as f64;
        }
        for (n, value) in b.databot.iter_mut().enumerate() {
            *value = -(n as f64);
        }
        b.datafluxbot.fill(0.25);
        (grid, fields)
    }

    #[test]
    fn test_calc_buoyancy_copies_interior_columns_only() {
        let (grid, fields) = setup();
        let mut out = Field3d::new(&grid, "tmp", "tmp", "-");
        calc_buoyancy(&grid, &fields, &mut out).unwrap();

        let inside = grid.index(grid.istart, grid.jstart, 0);
        let ghost = grid.index(0, grid.jstart, grid.kstart);
        assert_eq!(out.data[inside], inside as f64);
        assert_eq!(out.data[ghost], 0.0);
    }

    #[test]
    fn test_surface_copies() {
        let (grid, fields) = setup();
        let mut out = Field3d::new(&grid, "bsurf", "bsurf", "m s-2");
        calc_buoyancy_bot(&grid, &fields, &mut out).unwrap();
        calc_buoyancy_fluxbot(&grid, &fields, &mut out).unwrap();

        let corner = grid.index(0, 0, grid.kstart);
        assert_eq!(out.data[corner], corner as f64);
        assert_eq!(out.data[grid.index(0, 0, grid.kstart + 1)], 0.0);
        assert_eq!(out.databot[3], -3.0);
        assert!(out.datafluxbot.iter().all(|&v| v == 0.25));
    }

    #[test]
    fn test_visc_is_set() {
        let (_, fields) = setup();
        assert_eq!(fields.sp[BUOYANCY].visc, 1e-5);
    }
}
