//! Per-rank model: process group, grid, fields and thermodynamics.
//!
//! # Example
//!
//! ```
//! use les_rs::config::Input;
//! use les_rs::model::Model;
//! use les_rs::parallel::LocalWorld;
//!
//! let text = "\
//! [master]
//! npx = 2
//! [grid]
//! itot = 8
//! jtot = 4
//! ktot = 4
//! xsize = 8
//! ysize = 4
//! zsize = 4
//! swspatialorder = 4
//! [thermo]
//! swthermo = slope
//! alpha = 0.2
//! n2 = 1e-4
//! [fields]
//! svisc = 1e-5
//! ";
//!
//! let ok = LocalWorld::run(2, |comm| {
//!     let input: Input = text.parse().unwrap();
//!     let mut model = Model::from_input(&input, comm).unwrap();
//!     model.exec_thermo().is_ok()
//! });
//! assert_eq!(ok, vec![true, true]);
//! ```

use crate::config::Input;
use crate::fields::Fields;
use crate::grid::{Grid, GridConfig};
use crate::parallel::{Communicator, LocalComm, ProcessGroup};
use crate::thermo::{Thermo, ThermoKind};

/// Global extrema of the momentum and scalar tendencies.
#[derive(Clone, Debug, PartialEq)]
pub struct TendencyStats {
    /// Name of the tendency field
    pub name: String,
    /// Largest absolute value over all ranks' interiors
    pub max_abs: f64,
}

/// Everything one rank owns.
#[derive(Debug)]
pub struct Model<C: Communicator = LocalComm> {
    pub group: ProcessGroup<C>,
    pub grid: Grid,
    pub fields: Fields,
    pub thermo: ThermoKind,
}

impl<C: Communicator> Model<C> {
    /// Build the process group, grid, fields and thermodynamics from input.
    pub fn from_input(input: &Input, comm: C) -> crate::Result<Self> {
        let group = ProcessGroup::from_input(comm, input)?;
        let grid = Grid::new(&GridConfig::from_input(input)?, group.topology())?;
        let mut fields = Fields::new(&grid);
        let thermo = ThermoKind::from_input(input, &grid, &mut fields)?;

        group.reporter().message(&format!(
            "grid {}x{}x{} on {} ranks, thermo = {}",
            grid.itot,
            grid.jtot,
            grid.ktot,
            group.nprocs(),
            thermo.name()
        ));

        Ok(Self {
            group,
            grid,
            fields,
            thermo,
        })
    }

    /// Refresh the halos the thermodynamics reads, then add its tendencies.
    pub fn exec_thermo(&mut self) -> crate::Result<()> {
        let width = self.grid.igc.min(self.grid.jgc);
        self.group
            .halo_exchange(&mut self.fields.u.data, &self.grid, width)?;
        self.group
            .halo_exchange(&mut self.fields.w.data, &self.grid, width)?;
        for field in self.fields.sp.values_mut() {
            self.group.halo_exchange(&mut field.data, &self.grid, width)?;
        }
        self.thermo.exec(&self.grid, &mut self.fields)
    }

    /// Names of all prognostic scalars owned by the thermodynamics.
    pub fn prognostic_variables(&self) -> Vec<String> {
        let mut list = Vec::new();
        self.thermo.get_prog_vars(&mut list);
        list
    }

    /// Global maximum absolute interior tendency of `ut`, `wt` and every
    /// scalar tendency. Collective.
    pub fn tendency_stats(&self) -> crate::Result<Vec<TendencyStats>> {
        let tendencies = [&self.fields.ut, &self.fields.vt, &self.fields.wt]
            .into_iter()
            .chain(self.fields.st.values());

        let (names, mut maxima): (Vec<String>, Vec<f64>) = tendencies
            .map(|field| (field.name.clone(), self.interior_max_abs(&field.data)))
            .unzip();
        self.group.max(&mut maxima)?;

        Ok(names
            .into_iter()
            .zip(maxima)
            .map(|(name, max_abs)| TendencyStats { name, max_abs })
            .collect())
    }

    fn interior_max_abs(&self, data: &[f64]) -> f64 {
        let grid = &self.grid;
        let mut max_abs = 0.0f64;
        for k in grid.kstart..grid.kend {
            for j in grid.jstart..grid.jend {
                let row = grid.index(0, j, k);
                for &value in &data[row + grid.istart..row + grid.iend] {
                    max_abs = max_abs.max(value.abs());
                }
            }
        }
        max_abs
    }
}
