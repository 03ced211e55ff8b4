mod error;
mod grid;
pub use error::*;
pub use grid::*;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use rayon::prelude::*;
use tracing::{debug, info};
use crate::library::ModelCard;
use crate::simulate::{DeviceTestbench, Environment, NgSpice, SpiceCommand, SweepData};
use crate::{ErrorContext, MoscharResult};

/// A full DC characterization job: every grid point is simulated on a
/// worker pool and the per-point measurement batches come back in
/// sweep order.
pub struct DcSweepCharz {
    pub model: ModelCard,
    pub env: Environment,
    pub grid: SweepGrid,
    pub command: Box<dyn SpiceCommand>,
    pub pool_size: usize,
    pub temp_folder: PathBuf,
}

impl DcSweepCharz {
    pub fn run(&self) -> MoscharResult<Vec<SweepData>> {
        let points = self.grid.points();
        if points.is_empty() {
            return Err(CharzError::EmptySweepGrid)?;
        }

        if !self.temp_folder.exists() {
            std::fs::create_dir_all(&self.temp_folder)?;
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.pool_size)
            .build()
            .map_err(|e| CharzError::ThreadPool(e.to_string()))?;

        info!(
            "simulating {} sweep points on {} workers",
            points.len(),
            self.pool_size
        );

        let total = points.len();
        let milestone = 1.max(total / 10);
        let finished = AtomicUsize::new(0);

        let batches: MoscharResult<Vec<SweepData>> = pool.install(|| {
            points
                .par_iter()
                .enumerate()
                .map(|(index, point)| {
                    let batch = self.run_point(index, point).with_context(|| {
                        format!(
                            "simulate point {} (W={:e} L={:e} Vbs={})",
                            index, point.w, point.l, point.vbs
                        )
                    })?;

                    let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % milestone == 0 || done == total {
                        info!("simulated {}/{} sweep points", done, total);
                    }

                    Ok(batch)
                })
                .collect()
        });

        batches
    }

    fn run_point(&self, index: usize, point: &SweepPoint) -> MoscharResult<SweepData> {
        debug!(
            "point {}: W={:e} L={:e} Vbs={}",
            index, point.w, point.l, point.vbs
        );

        let netlist_path = self.temp_folder.join(format!("point_{:04}.sp", index));
        let data_path = self.temp_folder.join(format!("point_{:04}.dat", index));

        let testbench = DeviceTestbench::create(
            &self.model,
            &self.env,
            point.w,
            point.l,
            point.vbs,
            &netlist_path,
            &data_path,
        )?;
        testbench.simulate(&self.command, &self.temp_folder)
    }
}

/// Default:
/// - command: ngspice
/// - pool_size: 6
/// - temp_folder: "./temp"
pub struct DcSweepCharzBuilder {
    pub model: Option<ModelCard>,
    pub env: Option<Environment>,
    pub grid: Option<SweepGrid>,
    pub command: Option<Box<dyn SpiceCommand>>,
    pub pool_size: Option<usize>,
    pub temp_folder: Option<PathBuf>,
}

impl Default for DcSweepCharzBuilder {
    fn default() -> Self {
        Self {
            model: None,
            env: Some(Environment::default()),
            grid: None,
            command: Some(Box::new(NgSpice)),
            pool_size: Some(6),
            temp_folder: Some("./temp".into()),
        }
    }
}

impl DcSweepCharzBuilder {
    pub fn model(mut self, model: ModelCard) -> Self {
        self.model = Some(model);
        self
    }

    pub fn env(mut self, env: impl Into<Environment>) -> Self {
        self.env = Some(env.into());
        self
    }

    pub fn grid(mut self, grid: impl Into<SweepGrid>) -> Self {
        self.grid = Some(grid.into());
        self
    }

    pub fn command(mut self, command: impl SpiceCommand + 'static) -> Self {
        self.command = Some(Box::new(command));
        self
    }

    pub fn command_box(mut self, command: Box<dyn SpiceCommand>) -> Self {
        self.command = Some(command);
        self
    }

    pub fn pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = Some(pool_size);
        self
    }

    pub fn temp_folder(mut self, temp_folder: impl Into<PathBuf>) -> Self {
        self.temp_folder = Some(temp_folder.into());
        self
    }

    pub fn build(self) -> Result<DcSweepCharz, CharzError> {
        Ok(DcSweepCharz {
            model: self.model.ok_or(CharzError::LackSweepConfigField("model"))?,
            env: self.env.ok_or(CharzError::LackSweepConfigField("env"))?,
            grid: self.grid.ok_or(CharzError::LackSweepConfigField("grid"))?,
            command: self.command.ok_or(CharzError::LackSweepConfigField("command"))?,
            pool_size: self.pool_size.ok_or(CharzError::LackSweepConfigField("pool_size"))?,
            temp_folder: self.temp_folder.ok_or(CharzError::LackSweepConfigField("temp_folder"))?,
        })
    }
}
