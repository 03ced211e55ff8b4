mod write;
mod execute;
mod parse;
mod save;
mod error;
pub use write::*;
pub use execute::*;
pub use parse::*;
pub use save::*;
pub use error::*;

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::{library::ModelCard, MoscharResult};

/// Electrical environment of a characterization run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Environment {
    pub temperature: f64,
    pub vss: f64,
    pub vdd: f64,
    pub step_dc: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            temperature: 27.0,
            vss: 0.0,
            vdd: 1.2,
            step_dc: 0.01,
        }
    }
}

/// The fixed two-terminal-sweep test circuit around one device under
/// test: drain, gate and bulk voltage sources against ground, source
/// tied to ground, and a nested drain/gate DC sweep.
///
/// `create` writes the full netlist including the batch control
/// block; `simulate` runs it and parses the measurement table back.
pub struct DeviceTestbench {
    writer: SpiceWriter,
}

impl DeviceTestbench {
    pub const DRAIN_NET: &'static str = "d";
    pub const GATE_NET: &'static str = "g";
    pub const BULK_NET: &'static str = "b";
    pub const GND_NET: &'static str = "0";
    pub const DUT_NAME: &'static str = "m0";

    pub fn create<P1, P2>(
        model: &ModelCard,
        env: &Environment,
        width: f64,
        length: f64,
        vbs: f64,
        netlist_path: P1,
        data_path: P2,
    ) -> MoscharResult<Self>
    where
        P1: AsRef<Path>,
        P2: AsRef<Path>,
    {
        let writer = SpiceWriter::open(netlist_path.as_ref(), data_path.as_ref())?;
        let mut testbench = Self { writer };
        testbench.init(model, env, width, length, vbs)?;
        Ok(testbench)
    }

    fn init(
        &mut self,
        model: &ModelCard,
        env: &Environment,
        width: f64,
        length: f64,
        vbs: f64,
    ) -> MoscharResult<()> {
        self.writer.write_comment(format!(
            "characterization of {} at W={:e} L={:e} Vbs={}",
            model.name, width, length, vbs
        ))?;
        self.writer.write_include(&model.path)?;
        self.writer.write_temperature(env.temperature)?;
        self.writer.write_content("\n")?;

        // terminal sources, swept ones start at VSS
        self.writer.write_dc_voltage(Self::DRAIN_NET, Self::DRAIN_NET, env.vss)?;
        self.writer.write_dc_voltage(Self::GATE_NET, Self::GATE_NET, env.vss)?;
        self.writer.write_dc_voltage(Self::BULK_NET, Self::BULK_NET, vbs)?;

        self.writer.write_mosfet(
            "0",
            Self::DRAIN_NET,
            Self::GATE_NET,
            Self::GND_NET,
            Self::BULK_NET,
            &model.name,
            width,
            length,
        )?;
        self.writer.write_content("\n")?;

        let sweep = DcSweepSpec {
            outer_source: format!("v{}", Self::GATE_NET),
            inner_source: format!("v{}", Self::DRAIN_NET),
            start: env.vss,
            stop: env.vdd,
            step: env.step_dc,
        };
        self.writer.write_control(SaveList::device_params(Self::DUT_NAME), &sweep)?;
        self.writer.write_end()?;

        Ok(())
    }

    pub fn finish(self) -> MoscharResult<SpiceExecutor> {
        self.writer.close()
    }

    pub fn simulate(self, execute: &dyn SpiceCommand, temp_folder: impl AsRef<Path>) -> MoscharResult<SweepData> {
        let executor = self.finish()?;
        executor.simulate(execute, temp_folder.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ModelCard;
    use tempfile::TempDir;

    #[test]
    fn test_testbench_netlist() {
        let tmp = TempDir::new().unwrap();
        let netlist = tmp.path().join("point_0000.sp");
        let data = tmp.path().join("point_0000.dat");
        let model = ModelCard {
            name: "nmos".into(),
            path: tmp.path().join("90nm_bulk.lib"),
        };

        let testbench = DeviceTestbench::create(
            &model,
            &Environment::default(),
            1e-6,
            150e-9,
            -0.3,
            &netlist,
            &data,
        )
        .unwrap();
        testbench.finish().unwrap();

        let content = std::fs::read_to_string(&netlist).unwrap();
        assert!(content.contains(&format!(".include {}", model.path.display())));
        assert!(content.contains(".options temp=27 tnom=27"));
        assert!(content.contains("Vd d 0 0"));
        assert!(content.contains("Vg g 0 0"));
        assert!(content.contains("Vb b 0 -0.3"));
        assert!(content.contains("M0 d g 0 b nmos W=1e-6 L=1.5e-7"));
        assert!(content.contains("dc vd 0 1.2 0.01 vg 0 1.2 0.01"));
        assert!(content.contains(&format!("wrdata {}", data.display())));
        assert!(content.trim_end().ends_with(".end"));
    }
}
