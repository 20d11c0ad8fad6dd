//! Halo-padded local grid of one rank.

use super::SpatialOrder;
use crate::config::{ConfigError, Input};
use crate::error::PreconditionError;
use crate::parallel::Topology;

/// Global grid parameters as read from input.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Global number of cells in x
    pub itot: usize,
    /// Global number of cells in y
    pub jtot: usize,
    /// Number of cells in z
    pub ktot: usize,
    /// Domain length in x (m)
    pub xsize: f64,
    /// Domain length in y (m)
    pub ysize: f64,
    /// Domain height (m)
    pub zsize: f64,
    /// Stencil order
    pub order: SpatialOrder,
    /// Translation velocity of the frame in x (m/s)
    pub utrans: f64,
    /// Ghost widths; `None` uses the stencil reach of `order`
    pub igc: Option<usize>,
    pub jgc: Option<usize>,
    pub kgc: Option<usize>,
}

impl GridConfig {
    /// Uniform grid of `itot × jtot × ktot` cells over the given extents.
    pub fn new(
        cells: (usize, usize, usize),
        size: (f64, f64, f64),
        order: SpatialOrder,
    ) -> Self {
        Self {
            itot: cells.0,
            jtot: cells.1,
            ktot: cells.2,
            xsize: size.0,
            ysize: size.1,
            zsize: size.2,
            order,
            utrans: 0.0,
            igc: None,
            jgc: None,
            kgc: None,
        }
    }

    /// Set the translation velocity.
    pub fn with_utrans(mut self, utrans: f64) -> Self {
        self.utrans = utrans;
        self
    }

    /// Override the ghost widths.
    pub fn with_ghost_cells(mut self, igc: usize, jgc: usize, kgc: usize) -> Self {
        self.igc = Some(igc);
        self.jgc = Some(jgc);
        self.kgc = Some(kgc);
        self
    }

    /// Read the `[grid]` block.
    pub fn from_input(input: &Input) -> Result<Self, ConfigError> {
        let optional = |item: &str| -> Result<Option<usize>, ConfigError> {
            if input.has_item("grid", item, None) {
                input.get_item("grid", item, None).map(Some)
            } else {
                Ok(None)
            }
        };

        Ok(Self {
            itot: input.get_item("grid", "itot", None)?,
            jtot: input.get_item("grid", "jtot", None)?,
            ktot: input.get_item("grid", "ktot", None)?,
            xsize: input.get_item("grid", "xsize", None)?,
            ysize: input.get_item("grid", "ysize", None)?,
            zsize: input.get_item("grid", "zsize", None)?,
            order: input.get_item("grid", "swspatialorder", None)?,
            utrans: input.get_item_or("grid", "utrans", None, 0.0)?,
            igc: optional("igc")?,
            jgc: optional("jgc")?,
            kgc: optional("kgc")?,
        })
    }
}

/// Local index space and geometry of one rank.
///
/// Cells are stored x-fastest on the padded grid:
///
/// ```text
/// ijk = i + j * icells + k * ijcells
/// ```
///
/// with the interior at `istart..iend`, `jstart..jend`, `kstart..kend`
/// and `igc`, `jgc`, `kgc` ghost cells on each side.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    pub itot: usize,
    pub jtot: usize,
    pub ktot: usize,

    /// Interior cells of this rank
    pub imax: usize,
    pub jmax: usize,
    pub kmax: usize,

    /// Ghost widths
    pub igc: usize,
    pub jgc: usize,
    pub kgc: usize,

    /// Padded extents
    pub icells: usize,
    pub jcells: usize,
    pub kcells: usize,
    pub ijcells: usize,
    pub ncells: usize,

    pub istart: usize,
    pub iend: usize,
    pub jstart: usize,
    pub jend: usize,
    pub kstart: usize,
    pub kend: usize,

    pub xsize: f64,
    pub ysize: f64,
    pub zsize: f64,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,

    pub order: SpatialOrder,
    pub utrans: f64,

    /// Global index of this rank's first interior cell
    pub ioffset: usize,
    pub joffset: usize,
}

impl Grid {
    /// Lay out the local grid of the rank described by `topology`.
    pub fn new(config: &GridConfig, topology: &Topology) -> Result<Self, ConfigError> {
        let (npx, npy) = (topology.npx(), topology.npy());

        if config.itot == 0 || config.jtot == 0 || config.ktot == 0 {
            return Err(ConfigError::incompatible(format!(
                "grid needs at least one cell in each direction, got {}x{}x{}",
                config.itot, config.jtot, config.ktot
            )));
        }
        for (name, size) in [("xsize", config.xsize), ("ysize", config.ysize), ("zsize", config.zsize)] {
            if !(size.is_finite() && size > 0.0) {
                return Err(ConfigError::incompatible(format!(
                    "{} must be positive, got {}",
                    name, size
                )));
            }
        }
        if config.itot % npx != 0 {
            return Err(ConfigError::incompatible(format!(
                "itot = {} is not a multiple of npx = {}",
                config.itot, npx
            )));
        }
        if config.jtot % npy != 0 {
            return Err(ConfigError::incompatible(format!(
                "jtot = {} is not a multiple of npy = {}",
                config.jtot, npy
            )));
        }

        let reach = config.order.stencil_reach();
        let igc = config.igc.unwrap_or(reach);
        let jgc = config.jgc.unwrap_or(reach);
        let kgc = config.kgc.unwrap_or(reach);
        if igc == 0 || jgc == 0 || kgc == 0 {
            return Err(ConfigError::incompatible(format!(
                "ghost widths must be at least 1, got ({}, {}, {})",
                igc, jgc, kgc
            )));
        }

        let imax = config.itot / npx;
        let jmax = config.jtot / npy;
        let kmax = config.ktot;
        if imax < igc || jmax < jgc {
            return Err(ConfigError::incompatible(format!(
                "local interior {}x{} is narrower than the ghost widths ({}, {})",
                imax, jmax, igc, jgc
            )));
        }

        let icells = imax + 2 * igc;
        let jcells = jmax + 2 * jgc;
        let kcells = kmax + 2 * kgc;
        let ijcells = icells * jcells;

        Ok(Self {
            itot: config.itot,
            jtot: config.jtot,
            ktot: config.ktot,
            imax,
            jmax,
            kmax,
            igc,
            jgc,
            kgc,
            icells,
            jcells,
            kcells,
            ijcells,
            ncells: ijcells * kcells,
            istart: igc,
            iend: igc + imax,
            jstart: jgc,
            jend: jgc + jmax,
            kstart: kgc,
            kend: kgc + kmax,
            xsize: config.xsize,
            ysize: config.ysize,
            zsize: config.zsize,
            dx: config.xsize / config.itot as f64,
            dy: config.ysize / config.jtot as f64,
            dz: config.zsize / config.ktot as f64,
            order: config.order,
            utrans: config.utrans,
            ioffset: topology.coord_x() * imax,
            joffset: topology.coord_y() * jmax,
        })
    }

    /// Linear index of `(i, j, k)` on the padded grid.
    #[inline(always)]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        i + j * self.icells + k * self.ijcells
    }

    /// Stride between neighboring cells in y.
    #[inline(always)]
    pub fn jj(&self) -> usize {
        self.icells
    }

    /// Stride between neighboring cells in z.
    #[inline(always)]
    pub fn kk(&self) -> usize {
        self.ijcells
    }

    /// Global x of cell centre `i` (ghost indices extrapolate).
    pub fn x(&self, i: usize) -> f64 {
        (self.global_i(i) + 0.5) * self.dx
    }

    /// Global x of the west face of cell `i`.
    pub fn xh(&self, i: usize) -> f64 {
        self.global_i(i) * self.dx
    }

    /// Global y of cell centre `j`.
    pub fn y(&self, j: usize) -> f64 {
        (self.global_j(j) + 0.5) * self.dy
    }

    /// Height of cell centre `k`.
    pub fn z(&self, k: usize) -> f64 {
        (k as f64 - self.kstart as f64 + 0.5) * self.dz
    }

    /// Height of the bottom face of cell `k`.
    pub fn zh(&self, k: usize) -> f64 {
        (k as f64 - self.kstart as f64) * self.dz
    }

    fn global_i(&self, i: usize) -> f64 {
        self.ioffset as f64 + i as f64 - self.istart as f64
    }

    fn global_j(&self, j: usize) -> f64 {
        self.joffset as f64 + j as f64 - self.jstart as f64
    }

    /// Fail unless the ghost widths cover a stencil reaching
    /// `(need_i, need_j, need_k)` cells beyond the interior.
    pub fn check_halo(
        &self,
        need_i: usize,
        need_j: usize,
        need_k: usize,
        operation: &'static str,
    ) -> Result<(), PreconditionError> {
        if self.igc < need_i || self.jgc < need_j || self.kgc < need_k {
            return Err(PreconditionError::InsufficientHalo {
                operation,
                need_i,
                need_j,
                need_k,
                igc: self.igc,
                jgc: self.jgc,
                kgc: self.kgc,
            });
        }
        Ok(())
    }

    /// Fail unless `data` covers the padded grid.
    pub fn check_len(&self, name: &str, data: &[f64]) -> Result<(), PreconditionError> {
        if data.len() != self.ncells {
            return Err(PreconditionError::FieldSize {
                name: name.to_string(),
                expected: self.ncells,
                actual: data.len(),
            });
        }
        Ok(())
    }
}
