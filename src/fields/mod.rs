//! Field registry: prognostic variables and their tendencies.
//!
//! All arrays cover the padded grid (`grid.ncells` values). Bottom
//! boundary values and fluxes hold one value per padded column
//! (`grid.ijcells`).

use std::collections::BTreeMap;

use crate::error::PreconditionError;
use crate::grid::Grid;

/// One 3-D field with its bottom boundary arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct Field3d {
    pub name: String,
    pub long_name: String,
    pub unit: String,
    /// Cell values over the padded grid
    pub data: Vec<f64>,
    /// Surface value per padded column
    pub databot: Vec<f64>,
    /// Surface flux per padded column
    pub datafluxbot: Vec<f64>,
    /// Diffusivity (m2 s-1)
    pub visc: f64,
}

impl Field3d {
    /// Zero-initialised field on `grid`.
    pub fn new(grid: &Grid, name: &str, long_name: &str, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            long_name: long_name.to_string(),
            unit: unit.to_string(),
            data: vec![0.0; grid.ncells],
            databot: vec![0.0; grid.ijcells],
            datafluxbot: vec![0.0; grid.ijcells],
            visc: 0.0,
        }
    }

    /// Set every value, including ghost cells.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Fail unless the arrays match `grid`.
    pub fn check_size(&self, grid: &Grid) -> Result<(), PreconditionError> {
        grid.check_len(&self.name, &self.data)?;
        for plane in [&self.databot, &self.datafluxbot] {
            if plane.len() != grid.ijcells {
                return Err(PreconditionError::FieldSize {
                    name: format!("{} (bottom)", self.name),
                    expected: grid.ijcells,
                    actual: plane.len(),
                });
            }
        }
        Ok(())
    }
}

/// Velocities, prognostic scalars and their tendencies on one rank.
#[derive(Clone, Debug)]
pub struct Fields {
    pub u: Field3d,
    pub v: Field3d,
    pub w: Field3d,
    pub ut: Field3d,
    pub vt: Field3d,
    pub wt: Field3d,
    /// Prognostic scalars by name
    pub sp: BTreeMap<String, Field3d>,
    /// Scalar tendencies, same keys as `sp`
    pub st: BTreeMap<String, Field3d>,
}

impl Fields {
    /// Allocate the velocity fields for `grid`.
    pub fn new(grid: &Grid) -> Self {
        Self {
            u: Field3d::new(grid, "u", "U velocity", "m s-1"),
            v: Field3d::new(grid, "v", "V velocity", "m s-1"),
            w: Field3d::new(grid, "w", "Vertical velocity", "m s-1"),
            ut: Field3d::new(grid, "ut", "U velocity tendency", "m s-2"),
            vt: Field3d::new(grid, "vt", "V velocity tendency", "m s-2"),
            wt: Field3d::new(grid, "wt", "Vertical velocity tendency", "m s-2"),
            sp: BTreeMap::new(),
            st: BTreeMap::new(),
        }
    }

    /// Register a prognostic scalar and its tendency.
    ///
    /// Registering an existing name keeps its data and returns it.
    pub fn init_prognostic_field(
        &mut self,
        grid: &Grid,
        name: &str,
        long_name: &str,
        unit: &str,
    ) -> &mut Field3d {
        let tendency_name = format!("{}t", name);
        self.st.entry(name.to_string()).or_insert_with(|| {
            Field3d::new(grid, &tendency_name, &format!("{} tendency", long_name), unit)
        });
        self.sp
            .entry(name.to_string())
            .or_insert_with(|| Field3d::new(grid, name, long_name, unit))
    }

    /// Prognostic scalar `name`.
    pub fn scalar(&self, name: &str) -> Result<&Field3d, PreconditionError> {
        self.sp
            .get(name)
            .ok_or_else(|| PreconditionError::MissingField(name.to_string()))
    }

    /// Mutable prognostic scalar `name`.
    pub fn scalar_mut(&mut self, name: &str) -> Result<&mut Field3d, PreconditionError> {
        self.sp
            .get_mut(name)
            .ok_or_else(|| PreconditionError::MissingField(name.to_string()))
    }

    /// Tendency of scalar `name`.
    pub fn tendency(&self, name: &str) -> Result<&Field3d, PreconditionError> {
        self.st
            .get(name)
            .ok_or_else(|| PreconditionError::MissingField(format!("{}t", name)))
    }

    /// Mutable tendency of scalar `name`.
    pub fn tendency_mut(&mut self, name: &str) -> Result<&mut Field3d, PreconditionError> {
        self.st
            .get_mut(name)
            .ok_or_else(|| PreconditionError::MissingField(format!("{}t", name)))
    }

    /// Zero every tendency.
    pub fn reset_tendencies(&mut self) {
        for field in [&mut self.ut, &mut self.vt, &mut self.wt] {
            field.data.fill(0.0);
        }
        for field in self.st.values_mut() {
            field.data.fill(0.0);
        }
    }
}
