use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use serde::{Deserialize, Serialize};
use super::{Dataset, DatasetError};
use crate::MoscharResult;

/// Columns kept by the compact flat-array export. The CSV export
/// always carries every column.
pub const EXPORT_COLUMNS: [&str; 20] = [
    "W", "L", "Vds", "Vgs", "Vbs", "vth", "vdsat", "id", "fug", "gbs", "gbd", "gds", "gm", "gmbs",
    "cgd", "cgb", "cgs", "cds", "csb", "cdb",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
    #[serde(other)]
    Unsupported,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Csv
    }
}

impl Dataset {
    /// Plain CSV, header row then one line per measurement.
    pub fn write_csv(&self, path: &Path) -> MoscharResult<()> {
        let mut file = BufWriter::new(File::create(path)?);

        let columns = self
            .names()
            .iter()
            .map(|name| self.column(name))
            .collect::<Result<Vec<_>, DatasetError>>()?;

        writeln!(file, "{}", self.names().join(","))?;
        for row in 0..self.len() {
            for (index, column) in columns.iter().enumerate() {
                if index > 0 {
                    write!(file, ",")?;
                }
                write!(file, "{:e}", column[row])?;
            }
            writeln!(file)?;
        }

        file.flush()?;
        Ok(())
    }

    /// Flat numeric array plus a parallel column-name array, holding
    /// only the [`EXPORT_COLUMNS`] subset.
    pub fn write_json(&self, path: &Path) -> MoscharResult<()> {
        let columns = EXPORT_COLUMNS
            .iter()
            .map(|name| self.column(name))
            .collect::<Result<Vec<_>, DatasetError>>()?;

        let values: Vec<Vec<f64>> = (0..self.len())
            .map(|row| columns.iter().map(|column| column[row]).collect())
            .collect();

        let document = serde_json::json!({
            "columns": EXPORT_COLUMNS,
            "values": values,
        });

        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer(file, &document)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate::SweepData;
    use tempfile::TempDir;

    fn small_dataset() -> Dataset {
        let names: Vec<String> = ["a", "b"].iter().map(|n| n.to_string()).collect();
        let batch = SweepData::new(names, vec![vec![1.0, 2.5e-6], vec![3.0, 4.0]]);
        Dataset::from_batches(&[batch]).unwrap()
    }

    #[test]
    fn test_write_csv() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");
        small_dataset().write_csv(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "a,b");
        assert_eq!(lines[1], "1e0,2.5e-6");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_json_subset() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");

        let names: Vec<String> = crate::simulate::COLUMN_NAMES
            .iter()
            .map(|n| n.to_string())
            .collect();
        let width = names.len();
        let batch = SweepData::new(names, vec![(0..width).map(|i| i as f64).collect()]);
        let mut dataset = Dataset::from_batches(&[batch]).unwrap();
        dataset.push_column("fug", vec![42.0]).unwrap();
        dataset.write_json(&path).unwrap();

        let document: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let columns = document["columns"].as_array().unwrap();
        assert_eq!(columns.len(), 20);
        assert_eq!(columns[8], "fug");

        let values = document["values"].as_array().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].as_array().unwrap().len(), 20);
        assert_eq!(values[0][8], 42.0);
        // W is column 0 in both schemas
        assert_eq!(values[0][0], 0.0);
    }

    #[test]
    fn test_write_json_missing_column() {
        let tmp = TempDir::new().unwrap();
        assert!(small_dataset().write_json(&tmp.path().join("out.json")).is_err());
    }

    #[test]
    fn test_output_format_from_config() {
        assert_eq!(
            serde_json::from_str::<OutputFormat>("\"csv\"").unwrap(),
            OutputFormat::Csv
        );
        assert_eq!(
            serde_json::from_str::<OutputFormat>("\"hdf5\"").unwrap(),
            OutputFormat::Unsupported
        );
    }
}
