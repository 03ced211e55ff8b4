use super::error::SimulateError;

/// One sweep point's worth of measurements: a row per DC step, a
/// column per saved device parameter.
#[derive(Debug, Clone)]
pub struct SweepData {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl SweepData {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        Self { columns, rows }
    }

    /// Parse a `wrdata` dump. Without `wr_singlescale` ngspice writes
    /// a (scale, value) pair per requested vector, wrapping long
    /// records over several lines, so the file is read as one flat
    /// float stream and chunked by record width.
    pub fn from_wrdata(content: &str, columns: &[String]) -> Result<Self, SimulateError> {
        let width = columns.len() * 2;

        let mut values = Vec::new();
        for token in content.split_whitespace() {
            let value = token
                .parse::<f64>()
                .map_err(|e| SimulateError::ParseValue(token.to_string(), e))?;
            values.push(value);
        }

        if width == 0 || values.len() % width != 0 {
            return Err(SimulateError::RaggedSweepData(width, values.len()));
        }

        let rows = values
            .chunks(width)
            .map(|record| record.iter().skip(1).step_by(2).copied().collect())
            .collect();

        Ok(Self {
            columns: columns.to_vec(),
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
