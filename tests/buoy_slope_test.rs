//! Slope-flow buoyancy tendencies.

use std::f64::consts::PI;

use approx::assert_relative_eq;
use les_rs::config::ConfigError;
use les_rs::fd::o4::interp4;
use les_rs::grid::{Grid, GridConfig, SpatialOrder};
use les_rs::parallel::{Decomposition, LocalWorld, Periodicity, ProcessGroup, Topology};
use les_rs::thermo::{BuoySlope, SlopeParams, Thermo, BUOYANCY};
use les_rs::{Error, Fields, PreconditionError};

fn single_grid(config: GridConfig) -> Grid {
    Grid::new(&config, &Topology::single()).unwrap()
}

fn configured(grid: &Grid, params: SlopeParams) -> (BuoySlope, Fields) {
    let mut fields = Fields::new(grid);
    let mut thermo = BuoySlope::new();
    thermo.configure(params, grid, &mut fields).unwrap();
    (thermo, fields)
}

/// Set `data` to `f(x, y, z)` on every cell of the padded grid, using cell
/// centres for scalars.
fn fill_all(grid: &Grid, data: &mut [f64], f: impl Fn(f64, f64, f64) -> f64) {
    for k in 0..grid.kcells {
        for j in 0..grid.jcells {
            for i in 0..grid.icells {
                data[grid.index(i, j, k)] = f(grid.x(i), grid.y(j), grid.z(k));
            }
        }
    }
}

#[test]
fn test_interp4_fourth_order_convergence() {
    let f = |x: f64| (2.0 * PI * x).sin() + 0.3 * (6.0 * PI * x).cos();
    let x0 = 0.37;
    let error = |h: f64| {
        (interp4(f(x0 - 1.5 * h), f(x0 - 0.5 * h), f(x0 + 0.5 * h), f(x0 + 1.5 * h)) - f(x0)).abs()
    };

    let hs = [0.02, 0.01, 0.005];
    let errors: Vec<f64> = hs.iter().map(|&h| error(h)).collect();
    for pair in errors.windows(2) {
        let order = (pair[0] / pair[1]).log2();
        assert!(order > 3.8 && order < 4.2, "observed order {}", order);
    }
}

#[test]
fn test_w_tendency_converges_at_fourth_order() {
    let alpha = 0.4f64;
    let error = |ktot: usize| {
        let grid = single_grid(GridConfig::new((4, 4, ktot), (1.0, 1.0, 1.0), SpatialOrder::Fourth));
        let (thermo, mut fields) = configured(
            &grid,
            SlopeParams {
                alpha,
                n2: 0.0,
                diffusivity: 0.0,
            },
        );
        fill_all(&grid, &mut fields.sp.get_mut(BUOYANCY).unwrap().data, |_, _, z| {
            (2.0 * PI * z).sin()
        });
        thermo.exec(&grid, &mut fields).unwrap();

        let (i, j) = (grid.istart, grid.jstart);
        (grid.kstart + 1..grid.kend)
            .map(|k| {
                let exact = alpha.cos() * (2.0 * PI * grid.zh(k)).sin();
                (fields.wt.data[grid.index(i, j, k)] - exact).abs()
            })
            .fold(0.0, f64::max)
    };

    let order = (error(16) / error(32)).log2();
    assert!(order > 3.7, "observed order {}", order);
}

#[test]
fn test_zero_angle() {
    let grid = single_grid(GridConfig::new((4, 4, 4), (4.0, 4.0, 4.0), SpatialOrder::Fourth));
    let (thermo, mut fields) = configured(
        &grid,
        SlopeParams {
            alpha: 0.0,
            n2: 1e-2,
            diffusivity: 0.0,
        },
    );
    fill_all(&grid, &mut fields.sp.get_mut(BUOYANCY).unwrap().data, |x, y, z| {
        (x * 0.7).sin() + y * y * 0.01 + z.cos()
    });
    thermo.exec(&grid, &mut fields).unwrap();

    let b = &fields.sp[BUOYANCY].data;
    let kk = grid.ijcells;
    for k in grid.kstart..grid.kend {
        for j in grid.jstart..grid.jend {
            for i in grid.istart..grid.iend {
                let ijk = grid.index(i, j, k);
                assert_eq!(fields.ut.data[ijk], 0.0);
                let expected = if k == grid.kstart {
                    0.0
                } else {
                    interp4(b[ijk - 2 * kk], b[ijk - kk], b[ijk], b[ijk + kk])
                };
                assert_eq!(fields.wt.data[ijk], expected);
            }
        }
    }
}

#[test]
fn test_closed_form_4x4x4() {
    let (alpha, n2, u0, w0, utrans) = (0.25f64, 3e-3, 1.5, -0.2, 0.5);
    let gradient = 0.8;

    let config = GridConfig::new((4, 4, 4), (4.0, 4.0, 4.0), SpatialOrder::Fourth)
        .with_utrans(utrans);
    let grid = single_grid(config);
    let (thermo, mut fields) = configured(
        &grid,
        SlopeParams {
            alpha,
            n2,
            diffusivity: 0.0,
        },
    );
    fill_all(&grid, &mut fields.sp.get_mut(BUOYANCY).unwrap().data, |_, _, z| {
        gradient * z
    });
    fields.u.fill(u0);
    fields.w.fill(w0);

    thermo.exec(&grid, &mut fields).unwrap();

    let (s, c) = alpha.sin_cos();
    let expected_bt = -n2 * (s * (u0 + utrans) + c * w0);
    for k in grid.kstart..grid.kend {
        for j in grid.jstart..grid.jend {
            for i in grid.istart..grid.iend {
                let ijk = grid.index(i, j, k);
                assert_relative_eq!(fields.ut.data[ijk], s * gradient * grid.z(k), max_relative = 1e-12);
                if k == grid.kstart {
                    assert_eq!(fields.wt.data[ijk], 0.0);
                } else {
                    assert_relative_eq!(
                        fields.wt.data[ijk],
                        c * gradient * grid.zh(k),
                        max_relative = 1e-12
                    );
                }
                assert_relative_eq!(fields.st[BUOYANCY].data[ijk], expected_bt, max_relative = 1e-12);
            }
        }
    }

    // ghost cells never receive tendencies
    let ghost = grid.index(0, grid.jstart, grid.kstart);
    assert_eq!(fields.ut.data[ghost], 0.0);
    assert_eq!(fields.st[BUOYANCY].data[grid.index(grid.istart, grid.jstart, grid.kend)], 0.0);
}

#[test]
fn test_tendencies_accumulate() {
    let grid = single_grid(GridConfig::new((4, 4, 4), (4.0, 4.0, 4.0), SpatialOrder::Fourth));
    let (thermo, mut fields) = configured(
        &grid,
        SlopeParams {
            alpha: 0.5,
            n2: 1.0,
            diffusivity: 0.0,
        },
    );
    fields.sp.get_mut(BUOYANCY).unwrap().fill(1.0);
    fields.ut.fill(10.0);

    thermo.exec(&grid, &mut fields).unwrap();
    let ijk = grid.index(grid.istart, grid.jstart, grid.kstart);
    assert_relative_eq!(fields.ut.data[ijk], 10.0 + 0.5f64.sin(), max_relative = 1e-14);
}

#[test]
fn test_exec_before_configure_leaves_tendencies_untouched() {
    let grid = single_grid(GridConfig::new((4, 4, 4), (4.0, 4.0, 4.0), SpatialOrder::Fourth));
    let mut fields = Fields::new(&grid);
    fields.ut.fill(1.0);
    fields.wt.fill(2.0);

    let thermo = BuoySlope::new();
    let err = thermo.exec(&grid, &mut fields).unwrap_err();
    assert!(matches!(
        err,
        Error::StencilPrecondition(PreconditionError::NotConfigured { .. })
    ));
    assert!(fields.ut.data.iter().all(|&v| v == 1.0));
    assert!(fields.wt.data.iter().all(|&v| v == 2.0));
}

#[test]
fn test_second_order_grid_rejected() {
    let params = SlopeParams {
        alpha: 0.1,
        n2: 1.0,
        diffusivity: 0.0,
    };
    let second = single_grid(
        GridConfig::new((4, 4, 4), (4.0, 4.0, 4.0), SpatialOrder::Second).with_ghost_cells(2, 2, 2),
    );

    let mut fields = Fields::new(&second);
    let mut thermo = BuoySlope::new();
    assert!(matches!(
        thermo.configure(params, &second, &mut fields),
        Err(ConfigError::Incompatible(_))
    ));
    assert!(fields.sp.is_empty());

    // configured on a 4th-order grid, evaluated on a 2nd-order one
    let fourth = single_grid(GridConfig::new((4, 4, 4), (4.0, 4.0, 4.0), SpatialOrder::Fourth));
    let (thermo, mut fields) = configured(&fourth, params);
    assert!(matches!(
        thermo.exec(&second, &mut fields),
        Err(Error::Configuration(ConfigError::Incompatible(_)))
    ));
}

#[test]
fn test_insufficient_halo() {
    let grid = single_grid(
        GridConfig::new((4, 4, 4), (4.0, 4.0, 4.0), SpatialOrder::Fourth).with_ghost_cells(2, 2, 1),
    );
    let (thermo, mut fields) = configured(
        &grid,
        SlopeParams {
            alpha: 0.1,
            n2: 1.0,
            diffusivity: 0.0,
        },
    );
    fields.sp.get_mut(BUOYANCY).unwrap().fill(1.0);

    assert!(matches!(
        thermo.exec(&grid, &mut fields),
        Err(Error::StencilPrecondition(PreconditionError::InsufficientHalo { kgc: 1, .. }))
    ));
    assert!(fields.ut.data.iter().all(|&v| v == 0.0));
}

#[test]
fn test_field_size_mismatch() {
    let grid = single_grid(GridConfig::new((4, 4, 4), (4.0, 4.0, 4.0), SpatialOrder::Fourth));
    let (thermo, mut fields) = configured(
        &grid,
        SlopeParams {
            alpha: 0.1,
            n2: 1.0,
            diffusivity: 0.0,
        },
    );
    fields.w.data.pop();
    assert!(matches!(
        thermo.exec(&grid, &mut fields),
        Err(Error::StencilPrecondition(PreconditionError::FieldSize { .. }))
    ));
}

/// Interior tendencies `(gi, gj, k, ut, wt, bt)` after halo exchange and one
/// evaluation on an `npx × npy` decomposition.
fn decomposed_tendencies(npx: usize, npy: usize) -> Vec<(usize, usize, usize, u64, u64, u64)> {
    let config = GridConfig::new((8, 8, 6), (8.0, 8.0, 6.0), SpatialOrder::Fourth)
        .with_utrans(0.3);
    let params = SlopeParams {
        alpha: 0.2,
        n2: 4e-4,
        diffusivity: 0.0,
    };

    let per_rank = LocalWorld::run(npx * npy, |comm| {
        let group = ProcessGroup::new(
            comm,
            Decomposition::from_npx_npy(npx, npy),
            Periodicity::periodic(),
        )
        .unwrap();
        let grid = Grid::new(&config, group.topology()).unwrap();
        let (thermo, mut fields) = configured(&grid, params);

        let f = |x: f64, y: f64, z: f64| (0.25 * PI * x).sin() * (0.25 * PI * y).cos() + 0.1 * z;
        for k in 0..grid.kcells {
            for j in grid.jstart..grid.jend {
                for i in grid.istart..grid.iend {
                    let ijk = grid.index(i, j, k);
                    let (x, y, z) = (grid.x(i), grid.y(j), grid.z(k));
                    fields.u.data[ijk] = f(y, x, z);
                    fields.w.data[ijk] = 0.5 * f(x, y, -z);
                    fields.sp.get_mut(BUOYANCY).unwrap().data[ijk] = f(x, y, z);
                }
            }
        }
        let width = 2;
        group.halo_exchange(&mut fields.u.data, &grid, width).unwrap();
        group.halo_exchange(&mut fields.w.data, &grid, width).unwrap();
        let b = fields.sp.get_mut(BUOYANCY).unwrap();
        group.halo_exchange(&mut b.data, &grid, width).unwrap();

        thermo.exec(&grid, &mut fields).unwrap();

        let mut out = Vec::new();
        for k in grid.kstart..grid.kend {
            for j in grid.jstart..grid.jend {
                for i in grid.istart..grid.iend {
                    let ijk = grid.index(i, j, k);
                    out.push((
                        grid.ioffset + i - grid.istart,
                        grid.joffset + j - grid.jstart,
                        k,
                        fields.ut.data[ijk].to_bits(),
                        fields.wt.data[ijk].to_bits(),
                        fields.st[BUOYANCY].data[ijk].to_bits(),
                    ));
                }
            }
        }
        out
    });

    let mut all: Vec<_> = per_rank.into_iter().flatten().collect();
    all.sort();
    all
}

#[test]
fn test_results_independent_of_decomposition() {
    let reference = decomposed_tendencies(1, 1);
    assert_eq!(reference.len(), 8 * 8 * 6);
    assert_eq!(decomposed_tendencies(2, 2), reference);
    assert_eq!(decomposed_tendencies(2, 1), reference);
}
