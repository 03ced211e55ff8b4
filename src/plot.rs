use std::path::Path;
use plotters::prelude::*;
use rand::seq::IndexedRandom;
use tracing::{info, warn};
use crate::dataset::Dataset;
use crate::{MoscharError, MoscharResult};

const CURVES_PER_PANEL: usize = 5;

// log-scale floor, leakage currents below this are off the chart anyway
const ID_FLOOR: f64 = 1e-14;

/// Draw a two-panel sanity plot for one randomly chosen geometry at
/// zero bulk bias: Id over Vgs (log current) on top, Id over Vds at
/// the bottom. Expects the swept voltage columns to be rounded first
/// so equality filtering works.
pub fn plot_sample_curves(dataset: &Dataset, path: &Path) -> MoscharResult<()> {
    draw(dataset, path).map_err(|e| MoscharError::Message(format!("draw plot failed: {}", e)))
}

type DrawResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

fn draw(dataset: &Dataset, path: &Path) -> DrawResult {
    let zero_bias = dataset.filter(&["Vbs"], |row| row[0] == 0.0)?;
    if zero_bias.is_empty() {
        warn!("no zero bulk-bias rows, skip plotting");
        return Ok(());
    }

    let mut rng = rand::rng();
    let width = pick(&zero_bias.unique_values("W")?, &mut rng)?;
    let length = pick(&zero_bias.unique_values("L")?, &mut rng)?;
    info!("plotting device W={:e} L={:e}", width, length);

    let device = zero_bias.filter(&["W", "L"], |row| row[0] == width && row[1] == length)?;

    let root = BitMapBackend::new(path, (800, 1000)).into_drawing_area();
    root.fill(&WHITE)?;
    let (top, bottom) = root.split_vertically(500);

    let caption = format!("W={:.2e} L={:.2e} Vbs=0", width, length);
    let transfer = curve_family(&device, "Vds", "Vgs", &mut rng)?;
    draw_panel(
        &top,
        &format!("Id-Vgs {}", caption),
        "Vgs [V]",
        "Vds",
        &transfer,
        true,
    )?;

    let output = curve_family(&device, "Vgs", "Vds", &mut rng)?;
    draw_panel(
        &bottom,
        &format!("Id-Vds {}", caption),
        "Vds [V]",
        "Vgs",
        &output,
        false,
    )?;

    root.present()?;
    Ok(())
}

struct Curve {
    fixed: f64,
    points: Vec<(f64, f64)>,
}

/// Id against `x_column` for a handful of random values of
/// `fixed_column`.
fn curve_family(
    device: &Dataset,
    fixed_column: &str,
    x_column: &str,
    rng: &mut impl rand::Rng,
) -> Result<Vec<Curve>, Box<dyn std::error::Error + Send + Sync>> {
    let mut chosen: Vec<f64> = device
        .unique_values(fixed_column)?
        .choose_multiple(rng, CURVES_PER_PANEL)
        .copied()
        .collect();
    chosen.sort_by(|a, b| a.total_cmp(b));

    let mut curves = Vec::with_capacity(chosen.len());
    for fixed in chosen {
        let subset = device.filter(&[fixed_column], |row| row[0] == fixed)?;
        let mut points: Vec<(f64, f64)> = subset
            .column(x_column)?
            .iter()
            .zip(subset.column("id")?)
            .map(|(&x, &id)| (x, id))
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        curves.push(Curve { fixed, points });
    }

    Ok(curves)
}

fn pick(values: &[f64], rng: &mut impl rand::Rng) -> Result<f64, MoscharError> {
    values
        .choose(rng)
        .copied()
        .ok_or_else(|| MoscharError::Message("no values to plot".to_string()))
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    caption: &str,
    x_desc: &str,
    legend_name: &str,
    curves: &[Curve],
    log_current: bool,
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let x_max = curves
        .iter()
        .flat_map(|c| c.points.iter().map(|p| p.0))
        .fold(0.0f64, f64::max);
    let id_max = curves
        .iter()
        .flat_map(|c| c.points.iter().map(|p| p.1))
        .fold(ID_FLOOR, f64::max);

    let mut builder = ChartBuilder::on(area);
    builder
        .caption(caption, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60);

    if log_current {
        let mut chart = builder
            .build_cartesian_2d(0.0..x_max * 1.05, (ID_FLOOR..id_max * 2.0).log_scale())?;
        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc("Id [A]")
            .draw()?;

        for (index, curve) in curves.iter().enumerate() {
            let color = Palette99::pick(index);
            let series = curve
                .points
                .iter()
                .map(|&(x, id)| (x, id.max(ID_FLOOR)));
            chart
                .draw_series(LineSeries::new(series, &color))?
                .label(format!("{}={:.2}", legend_name, curve.fixed))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x - 10, y), (x, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()?;
    } else {
        let mut chart = builder.build_cartesian_2d(0.0..x_max * 1.05, 0.0..id_max * 1.1)?;
        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc("Id [A]")
            .draw()?;

        for (index, curve) in curves.iter().enumerate() {
            let color = Palette99::pick(index);
            chart
                .draw_series(LineSeries::new(curve.points.iter().copied(), &color))?
                .label(format!("{}={:.2}", legend_name, curve.fixed))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x - 10, y), (x, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()?;
    }

    Ok(())
}
