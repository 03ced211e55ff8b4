use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use tracing::{info, warn, Level};
use clap::Parser;
use moschar::{
    charz::{DcSweepCharzBuilder, SweepGrid, SweepGridBuilder},
    dataset::{Dataset, OutputFormat},
    library::ModelLibrary,
    plot,
    simulate::{Environment, NgSpice, SimulateError, SpiceCommand},
    ErrorContext,
};

fn main_result() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.level())
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    // load config
    let config: Config = match &args.config {
        Some(path) => {
            let context = std::fs::read_to_string(path).context("read config file")?;
            serde_json::from_str(&context).context("parse config file")?
        }
        None => Config::default(),
    };
    config.create_output_path()?;

    // find or download the device model card
    let library = ModelLibrary::open(&config.lib_path)?;
    let model = library
        .resolve(&config.model_base, &config.model_url)
        .context("resolve model card")?;

    // sweep every geometry/bias point on the worker pool
    let charz = DcSweepCharzBuilder::default()
        .model(model)
        .env(config.env)
        .grid(config.sweep.grid()?)
        .command_box(config.command()?)
        .pool_size(config.pool_size)
        .temp_folder(config.temp_folder_path())
        .build()?;
    let batches = charz.run()?;

    // one flat table, then the derived columns
    let mut data = Dataset::from_batches(&batches)?;
    data.derive_unity_gain_frequency()?;
    data.symmetrize_capacitances()?;
    info!("collected {} measurements of {} columns", data.len(), data.names().len());

    match config.output_format {
        OutputFormat::Csv => {
            let path = config.output_path.join(format!("{}.csv", config.model_base));
            data.write_csv(&path).context("write csv")?;
            info!("wrote dataset to {:?}", path);
        }
        OutputFormat::Json => {
            let path = config.output_path.join(format!("{}.json", config.model_base));
            data.write_json(&path).context("write json")?;
            info!("wrote dataset to {:?}", path);
        }
        OutputFormat::Unsupported => {
            warn!("no supported file format specified, data won't be written");
        }
    }

    if !args.no_plot {
        for column in ["Vgs", "Vds", "Vbs"] {
            data.round_column(column, 2)?;
        }
        let path = config.output_path.join(format!("{}.png", config.model_base));
        plot::plot_sample_curves(&data, &path)?;
        info!("wrote sample curves to {:?}", path);
    }

    Ok(())
}

fn main() {
    if let Err(e) = main_result() {
        eprint!("Err: {}\n", e);
    }
}

/// MOSFET DC characterization dataset generator
#[derive(Parser, Debug)]
#[command(name = "moschar")]
#[command(about = "A Mosfet DC Characterizer", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Skip the diagnostic plot
    #[arg(long)]
    no_plot: bool,
}

impl Args {
    pub fn level(&self) -> Level {
        if self.verbose { Level::DEBUG } else { Level::INFO }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub lib_path: PathBuf,
    pub model_base: String,
    pub model_url: String,
    pub simulator: String,
    pub output_path: PathBuf,
    pub output_format: OutputFormat,
    pub pool_size: usize,
    pub env: Environment,
    pub sweep: SweepConfig,
}

impl Default for Config {
    fn default() -> Self {
        let model_base = "90nm_bulk".to_string();
        Self {
            lib_path: "lib".into(),
            model_url: format!("http://ptm.asu.edu/modelcard/2006/{}.pm", model_base),
            model_base,
            simulator: "ngspice".to_string(),
            output_path: "./output".into(),
            output_format: OutputFormat::Csv,
            pool_size: 6,
            env: Environment::default(),
            sweep: SweepConfig::default(),
        }
    }
}

impl Config {
    pub fn command(&self) -> Result<Box<dyn SpiceCommand>, Box<dyn std::error::Error>> {
        match self.simulator.as_str() {
            "ngspice" => Ok(Box::new(NgSpice)),
            _ => Err(SimulateError::UnsupportExecute(self.simulator.clone()))?,
        }
    }

    pub fn create_output_path(&self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.output_path.exists() {
            std::fs::create_dir_all(&self.output_path)?;
            info!("created output directory: {:?}", self.output_path);
        }

        let temp_path = self.temp_folder_path();
        if !temp_path.exists() {
            std::fs::create_dir_all(&temp_path)?;
            info!("created temp directory: {:?}", temp_path);
        }

        Ok(())
    }

    pub fn temp_folder_path(&self) -> PathBuf {
        self.output_path.join("temp")
    }
}

/// Geometry and bulk-bias ranges of the characterization sweep.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SweepConfig {
    pub min_w: f64,
    pub max_w: f64,
    pub num_w: usize,
    pub min_l: f64,
    pub max_l: f64,
    pub num_l: usize,
    pub min_vb: f64,
    pub step_vb: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_w: 1e-6,
            max_w: 75e-6,
            num_w: 10,
            min_l: 150e-9,
            max_l: 10e-6,
            num_l: 10,
            min_vb: -1.0,
            step_vb: -0.1,
        }
    }
}

impl SweepConfig {
    pub fn grid(&self) -> Result<SweepGrid, Box<dyn std::error::Error>> {
        Ok(SweepGridBuilder::default()
            .min_w(self.min_w)
            .max_w(self.max_w)
            .num_w(self.num_w)
            .min_l(self.min_l)
            .max_l(self.max_l)
            .num_l(self.num_l)
            .min_vb(self.min_vb)
            .step_vb(self.step_vb)
            .build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model_base, "90nm_bulk");
        assert_eq!(config.model_url, "http://ptm.asu.edu/modelcard/2006/90nm_bulk.pm");
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert_eq!(config.pool_size, 6);
        assert_eq!(config.temp_folder_path(), PathBuf::from("./output/temp"));
    }

    #[test]
    fn test_partial_config_file() {
        let config: Config = serde_json::from_str(
            r#"{ "output_format": "json", "pool_size": 2, "sweep": { "num_w": 3 } }"#,
        )
        .unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.pool_size, 2);
        assert_eq!(config.sweep.num_w, 3);
        assert_eq!(config.sweep.num_l, 10);
        assert_eq!(config.model_base, "90nm_bulk");
    }

    #[test]
    fn test_unknown_format_tolerated() {
        let config: Config = serde_json::from_str(r#"{ "output_format": "hdf5" }"#).unwrap();
        assert_eq!(config.output_format, OutputFormat::Unsupported);
    }

    #[test]
    fn test_unknown_simulator_rejected() {
        let config: Config = serde_json::from_str(r#"{ "simulator": "xyce" }"#).unwrap();
        assert!(config.command().is_err());
    }

    #[test]
    fn test_sweep_config_grid() {
        let grid = SweepConfig::default().grid().unwrap();
        assert_eq!(grid.points().len(), 1000);
    }
}
