/// Internal device parameters captured at every DC sweep step.
///
/// The order is the record layout of the dataset: sweep coordinates
/// first, then threshold/saturation voltages, currents and
/// transconductances, then the 16 raw capacitance entries.
pub const COLUMN_NAMES: [&str; 29] = [
    "W", "L",
    "Vds", "Vgs", "Vbs", "vth", "vdsat",
    "id", "gbs", "gbd", "gds", "gm", "gmbs",
    "cbb", "csb", "cdb", "cgb",
    "css", "csd", "csg", "cds",
    "cdd", "cdg", "cbs", "cbd",
    "cbg", "cgd", "cgs", "cgg",
];

/// The list of internal device vectors to `save` and `wrdata` for one
/// device instance.
#[derive(Debug, Clone)]
pub struct SaveList {
    device: String,
    columns: Vec<String>,
}

impl SaveList {
    /// All characterization parameters of the device named `device`
    /// (e.g. `m0`).
    pub fn device_params(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            columns: COLUMN_NAMES.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// ngspice vector names, one per column: `@m0[vth]`, `@m0[id]`, ...
    /// Column names are lowercased, the way the simulator exposes them.
    pub fn vectors(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| format!("@{}[{}]", self.device, c.to_lowercase()))
            .collect()
    }
}
