mod error;
mod write;
pub use error::*;
pub use write::*;

use std::f64::consts::PI;
use crate::simulate::SweepData;

/// The flat measurement table: one named f64 column per saved device
/// parameter plus whatever gets derived afterwards. Column-major, all
/// columns share the same length.
#[derive(Debug, Clone)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl Dataset {
    pub fn new(names: Vec<String>) -> Self {
        let columns = names.iter().map(|_| Vec::new()).collect();
        Self { names, columns }
    }

    /// Concatenate per-point measurement batches, in order, into one
    /// table. All batches must share the schema of the first.
    pub fn from_batches(batches: &[SweepData]) -> Result<Self, DatasetError> {
        let first = batches.first().ok_or(DatasetError::NoBatches)?;
        let mut dataset = Self::new(first.columns().to_vec());

        for batch in batches {
            if batch.columns().len() != dataset.names.len() {
                return Err(DatasetError::SchemaMismatch(
                    batch.columns().len(),
                    dataset.names.len(),
                ));
            }
            for row in batch.rows() {
                for (column, value) in dataset.columns.iter_mut().zip(row) {
                    column.push(*value);
                }
            }
        }

        Ok(dataset)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn index(&self, name: &str) -> Result<usize, DatasetError> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| DatasetError::ColumnNotFound(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<&[f64], DatasetError> {
        Ok(&self.columns[self.index(name)?])
    }

    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<(), DatasetError> {
        let name = name.into();
        if self.names.iter().any(|n| *n == name) {
            return Err(DatasetError::ColumnExists(name));
        }
        if values.len() != self.len() && !self.names.is_empty() {
            return Err(DatasetError::ColumnLenMismatch(name, values.len(), self.len()));
        }
        self.names.push(name);
        self.columns.push(values);
        Ok(())
    }

    pub fn replace_column(&mut self, name: &str, values: Vec<f64>) -> Result<(), DatasetError> {
        if values.len() != self.len() {
            return Err(DatasetError::ColumnLenMismatch(name.to_string(), values.len(), self.len()));
        }
        let index = self.index(name)?;
        self.columns[index] = values;
        Ok(())
    }

    /// Round a column in place, for filtering on swept voltages.
    pub fn round_column(&mut self, name: &str, digits: u32) -> Result<(), DatasetError> {
        let factor = 10f64.powi(digits as i32);
        let index = self.index(name)?;
        for value in self.columns[index].iter_mut() {
            *value = (*value * factor).round() / factor;
        }
        Ok(())
    }

    /// Row subset where `pred` holds over the given columns.
    pub fn filter(&self, names: &[&str], pred: impl Fn(&[f64]) -> bool) -> Result<Self, DatasetError> {
        let indices = names
            .iter()
            .map(|n| self.index(n))
            .collect::<Result<Vec<_>, _>>()?;

        let mut probe = vec![0.0; indices.len()];
        let mut kept = Self::new(self.names.clone());
        for row in 0..self.len() {
            for (slot, &col) in probe.iter_mut().zip(&indices) {
                *slot = self.columns[col][row];
            }
            if pred(&probe) {
                for (column, source) in kept.columns.iter_mut().zip(&self.columns) {
                    column.push(source[row]);
                }
            }
        }

        Ok(kept)
    }

    /// Sorted distinct values of a column. Meant for columns that were
    /// rounded first, so exact comparison is fine.
    pub fn unique_values(&self, name: &str) -> Result<Vec<f64>, DatasetError> {
        let mut values = self.column(name)?.to_vec();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup();
        Ok(values)
    }
}

impl Dataset {
    /// Unity-gain frequency, appended as `fug`: gm / (2π·cgg).
    pub fn derive_unity_gain_frequency(&mut self) -> Result<(), DatasetError> {
        let gm = self.column("gm")?;
        let cgg = self.column("cgg")?;
        let fug = gm
            .iter()
            .zip(cgg)
            .map(|(gm, cgg)| gm / (2.0 * PI * cgg))
            .collect();
        self.push_column("fug", fug)
    }

    /// Replace the off-diagonal capacitance columns with their
    /// symmetrized combinations, all computed from the raw values
    /// captured by the simulator.
    pub fn symmetrize_capacitances(&mut self) -> Result<(), DatasetError> {
        let cgg = self.column("cgg")?.to_vec();
        let cdg = self.column("cdg")?.to_vec();
        let cgd = self.column("cgd")?.to_vec();
        let csg = self.column("csg")?.to_vec();
        let cgs = self.column("cgs")?.to_vec();
        let cds = self.column("cds")?.to_vec();
        let csd = self.column("csd")?.to_vec();
        let css = self.column("css")?.to_vec();
        let cdd = self.column("cdd")?.to_vec();

        let rows = self.len();
        let mut new_cgd = Vec::with_capacity(rows);
        let mut new_cgb = Vec::with_capacity(rows);
        let mut new_cgs = Vec::with_capacity(rows);
        let mut new_cds = Vec::with_capacity(rows);
        let mut new_csb = Vec::with_capacity(rows);
        let mut new_cdb = Vec::with_capacity(rows);

        for i in 0..rows {
            new_cgd.push(-0.5 * (cdg[i] + cgd[i]));
            new_cgb.push(cgg[i] + 0.5 * (cdg[i] + cgd[i] + csg[i] + cgs[i]));
            new_cgs.push(-0.5 * (cgs[i] + csg[i]));
            new_cds.push(-0.5 * (cds[i] + csd[i]));
            new_csb.push(css[i] + 0.5 * (cds[i] + cgs[i] + csd[i] + cgs[i]));
            new_cdb.push(cdd[i] + 0.5 * (cdg[i] + cds[i] + cgd[i] + csd[i]));
        }

        self.replace_column("cgd", new_cgd)?;
        self.replace_column("cgb", new_cgb)?;
        self.replace_column("cgs", new_cgs)?;
        self.replace_column("cds", new_cds)?;
        self.replace_column("csb", new_csb)?;
        self.replace_column("cdb", new_cdb)?;
        Ok(())
    }
}
