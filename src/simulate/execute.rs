use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;
use regex::Regex;
use crate::{ErrorContext, MoscharResult};
use super::error::SimulateError;
use super::parse::SweepData;
use super::save::SaveList;

/// A written netlist ready to run. Produced by `SpiceWriter::close`.
pub struct SpiceExecutor {
    pub netlist_path: PathBuf,
    pub data_path: PathBuf,
    pub save: Option<SaveList>,
}

impl SpiceExecutor {
    pub fn simulate(&self, execute: &dyn SpiceCommand, temp_folder: &Path) -> MoscharResult<SweepData> {
        let log_path = execute.execute(&self.netlist_path, temp_folder).context("Execute simulate")?;
        scan_log(&log_path)?;
        self.get_sweep_data().context("Get sweep data")
    }

    fn get_sweep_data(&self) -> MoscharResult<SweepData> {
        let save = match &self.save {
            Some(save) => save,
            None => return Err(SimulateError::EmptySweepData(self.data_path.clone()))?,
        };
        let content = std::fs::read_to_string(&self.data_path)
            .with_context(|| format!("read data file '{:?}'", self.data_path))?;
        if content.trim().is_empty() {
            return Err(SimulateError::EmptySweepData(self.data_path.clone()))?;
        }

        Ok(SweepData::from_wrdata(&content, save.columns())?)
    }
}

pub trait SpiceCommand: Send + Sync {
    /// Return the simulate command to execute
    fn simulate_command(&self, netlist_path: &Path, temp_folder: &Path) -> MoscharResult<String>;

    /// Return the simulator log filepath after simulate
    fn log_filepath(&self, netlist_path: &Path, temp_folder: &Path) -> MoscharResult<PathBuf> {
        let filename = netlist_path
            .file_name()
            .ok_or_else(|| SimulateError::InvalidPath(netlist_path.to_path_buf()))?;
        let mut filename = PathBuf::from(filename);
        filename.set_extension("log");

        Ok(temp_folder.join(filename))
    }

    fn execute(&self, netlist_path: &Path, temp_folder: &Path) -> MoscharResult<PathBuf> {
        let command = self.simulate_command(netlist_path, temp_folder)?;
        let status = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .status()
            .map_err(|e| SimulateError::ExecuteError(command.clone(), e.to_string()))?;

        match status.code() {
            Some(0) => Ok(self.log_filepath(netlist_path, temp_folder)?),
            Some(code) => Err(SimulateError::ExecuteError(command.clone(), format!("Command returns '{}'", code)))?,
            None => Err(SimulateError::ExecuteError(command.clone(), "Command quit unnormal".into()))?,
        }
    }
}

#[derive(Clone)]
pub struct NgSpice;

impl SpiceCommand for NgSpice {
    fn simulate_command(&self, netlist_path: &Path, temp_folder: &Path) -> MoscharResult<String> {
        Ok(format!(
            "ngspice -b -o {} {} > /dev/null 2>&1",
            self.log_filepath(netlist_path, temp_folder)?.display(),
            netlist_path.display()
        ))
    }
}

impl SpiceCommand for Box<dyn SpiceCommand> {
    fn simulate_command(&self, netlist_path: &Path, temp_folder: &Path) -> MoscharResult<String> {
        self.as_ref().simulate_command(netlist_path, temp_folder)
    }
}

static ERROR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^\s*error\s*[:,]\s*(.+)$").unwrap());

/// ngspice exits 0 even when the model card or the device is broken,
/// so the batch log is scanned for error lines.
fn scan_log(log_path: &Path) -> MoscharResult<()> {
    let content = match std::fs::read_to_string(log_path) {
        Ok(content) => content,
        // A missing log only means the simulator wrote nothing.
        Err(_) => return Ok(()),
    };

    if let Some(caps) = ERROR_LINE.captures(&content) {
        return Err(SimulateError::SimulatorReport(caps[1].trim().to_string()))?;
    }

    Ok(())
}
