use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use crate::MoscharResult;
use super::{SaveList, SpiceExecutor};

/// A nested DC sweep command: the outer source steps once per full
/// sweep of the inner source.
#[derive(Debug, Clone)]
pub struct DcSweepSpec {
    pub outer_source: String,
    pub inner_source: String,
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

pub struct SpiceWriter {
    netlist_path: PathBuf,
    data_path: PathBuf,
    file: File,
    save: Option<SaveList>,
}

impl SpiceWriter {
    pub fn open<P1, P2>(netlist_path: P1, data_path: P2) -> MoscharResult<Self>
    where
        P1: Into<PathBuf>,
        P2: Into<PathBuf>,
    {
        let netlist_path = netlist_path.into();
        let file = File::create(&netlist_path)?;
        Ok(Self {
            netlist_path,
            data_path: data_path.into(),
            file,
            save: None,
        })
    }

    pub fn close(mut self) -> MoscharResult<SpiceExecutor> {
        self.file.flush()?;
        Ok(SpiceExecutor {
            netlist_path: self.netlist_path,
            data_path: self.data_path,
            save: self.save,
        })
    }
}

impl SpiceWriter {
    pub fn netlist_path(&self) -> &Path {
        &self.netlist_path
    }

    pub fn write_content(&mut self, content: impl AsRef<str>) -> MoscharResult<()> {
        write!(self.file, "{}", content.as_ref())?;
        Ok(())
    }

    pub fn write_comment(&mut self, comment: impl AsRef<str>) -> MoscharResult<()> {
        writeln!(self.file, "* {}", comment.as_ref())?;
        Ok(())
    }

    pub fn write_include<P: AsRef<Path>>(&mut self, path: P) -> MoscharResult<()> {
        writeln!(self.file, ".include {}", path.as_ref().display())?;
        Ok(())
    }

    /// Operating and nominal temperature in one line, so the model is
    /// evaluated exactly at the characterization temperature.
    pub fn write_temperature(&mut self, temp: f64) -> MoscharResult<()> {
        writeln!(self.file, ".options temp={} tnom={}", temp, temp)?;
        Ok(())
    }

    pub fn write_dc_voltage(
        &mut self,
        voltage_name: impl AsRef<str>,
        net_name: impl AsRef<str>,
        voltage: f64,
    ) -> MoscharResult<()> {
        writeln!(self.file, "V{} {} 0 {}", voltage_name.as_ref(), net_name.as_ref(), voltage)?;
        Ok(())
    }

    pub fn write_mosfet(
        &mut self,
        name: impl AsRef<str>,
        drain: impl AsRef<str>,
        gate: impl AsRef<str>,
        source: impl AsRef<str>,
        bulk: impl AsRef<str>,
        model: impl AsRef<str>,
        width: f64,
        length: f64,
    ) -> MoscharResult<()> {
        writeln!(
            self.file,
            "M{} {} {} {} {} {} W={:e} L={:e}",
            name.as_ref(),
            drain.as_ref(),
            gate.as_ref(),
            source.as_ref(),
            bulk.as_ref(),
            model.as_ref(),
            width,
            length,
        )?;
        Ok(())
    }

    /// The batch-mode control block: save the device vectors, run the
    /// nested DC sweep, dump everything with `wrdata` and quit.
    pub fn write_control(&mut self, save: SaveList, sweep: &DcSweepSpec) -> MoscharResult<()> {
        let vectors = save.vectors().join(" ");

        writeln!(self.file, ".control")?;
        writeln!(self.file, "save {}", vectors)?;
        writeln!(
            self.file,
            "dc {} {} {} {} {} {} {} {}",
            sweep.inner_source, sweep.start, sweep.stop, sweep.step,
            sweep.outer_source, sweep.start, sweep.stop, sweep.step,
        )?;
        writeln!(self.file, "wrdata {} {}", self.data_path.display(), vectors)?;
        writeln!(self.file, "quit")?;
        writeln!(self.file, ".endc")?;

        self.save = Some(save);
        Ok(())
    }

    pub fn write_end(&mut self) -> MoscharResult<()> {
        writeln!(self.file, ".end")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn read_file_to_string(path: &Path) -> String {
        let mut f = std::fs::File::open(path).unwrap();
        let mut content = String::new();
        f.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_basic_commands_written() {
        let tmp = TempDir::new().unwrap();
        let netlist = tmp.path().join("tb.sp");
        let data = tmp.path().join("tb.dat");

        let mut writer = SpiceWriter::open(&netlist, &data).unwrap();
        writer.write_comment("device characterization").unwrap();
        writer.write_include("lib/90nm_bulk.lib").unwrap();
        writer.write_temperature(27.0).unwrap();
        writer.write_end().unwrap();
        writer.close().unwrap();

        let content = read_file_to_string(&netlist);
        assert!(content.contains("* device characterization"));
        assert!(content.contains(".include lib/90nm_bulk.lib"));
        assert!(content.contains(".options temp=27 tnom=27"));
        assert!(content.contains(".end"));
    }

    #[test]
    fn test_sources_and_device() {
        let tmp = TempDir::new().unwrap();
        let netlist = tmp.path().join("tb.sp");
        let data = tmp.path().join("tb.dat");

        let mut writer = SpiceWriter::open(&netlist, &data).unwrap();
        writer.write_dc_voltage("d", "d", 0.0).unwrap();
        writer.write_dc_voltage("b", "b", -0.5).unwrap();
        writer.write_mosfet("0", "d", "g", "0", "b", "nmos", 1e-6, 150e-9).unwrap();
        writer.close().unwrap();

        let content = read_file_to_string(&netlist);
        assert!(content.contains("Vd d 0 0"));
        assert!(content.contains("Vb b 0 -0.5"));
        assert!(content.contains("M0 d g 0 b nmos W=1e-6 L=1.5e-7"));
    }

    #[test]
    fn test_control_block() {
        let tmp = TempDir::new().unwrap();
        let netlist = tmp.path().join("tb.sp");
        let data = tmp.path().join("tb.dat");

        let mut writer = SpiceWriter::open(&netlist, &data).unwrap();
        let sweep = DcSweepSpec {
            outer_source: "vg".into(),
            inner_source: "vd".into(),
            start: 0.0,
            stop: 1.2,
            step: 0.01,
        };
        writer.write_control(SaveList::device_params("m0"), &sweep).unwrap();
        let executor = writer.close().unwrap();
        assert!(executor.save.is_some());

        let content = read_file_to_string(&netlist);
        assert!(content.contains(".control"));
        assert!(content.contains("save @m0[w] @m0[l] @m0[vds]"));
        assert!(content.contains("dc vd 0 1.2 0.01 vg 0 1.2 0.01"));
        assert!(content.contains(&format!("wrdata {} @m0[w]", data.display())));
        assert!(content.contains("quit"));
        assert!(content.contains(".endc"));
    }
}
