use derive_builder::Builder;
use itertools::iproduct;

/// One geometry/bias combination handed to the simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub w: f64,
    pub l: f64,
    pub vbs: f64,
}

/// Cartesian sweep of channel width, channel length and bulk voltage.
///
/// Width and length are linearly spaced with both endpoints included;
/// the bulk voltage steps from 0 V towards `min_vb` exclusive.
/// Enumeration order is Vbs outermost, then L, then W, so W varies
/// fastest.
#[derive(Debug, Clone, Builder)]
#[builder(pattern = "owned", setter(into))]
pub struct SweepGrid {
    #[builder(default = "1e-6")]
    pub min_w: f64,
    #[builder(default = "75e-6")]
    pub max_w: f64,
    #[builder(default = "10")]
    pub num_w: usize,

    #[builder(default = "150e-9")]
    pub min_l: f64,
    #[builder(default = "10e-6")]
    pub max_l: f64,
    #[builder(default = "10")]
    pub num_l: usize,

    #[builder(default = "-1.0")]
    pub min_vb: f64,
    #[builder(default = "-0.1")]
    pub step_vb: f64,
}

impl SweepGrid {
    pub fn points(&self) -> Vec<SweepPoint> {
        let vbs = arange(0.0, self.min_vb, self.step_vb);
        let lengths = linspace(self.min_l, self.max_l, self.num_l);
        let widths = linspace(self.min_w, self.max_w, self.num_w);

        iproduct!(vbs, lengths, widths)
            .map(|(vbs, l, w)| SweepPoint { w, l, vbs })
            .collect()
    }

    pub fn len(&self) -> usize {
        arange(0.0, self.min_vb, self.step_vb).len() * self.num_l * self.num_w
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `num` evenly spaced values over `[start, end]`, endpoints included.
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => vec![],
        1 => vec![start],
        _ => (0..num)
            .map(|i| start + (end - start) * i as f64 / (num - 1) as f64)
            .collect(),
    }
}

/// Values from `start` towards `stop` (exclusive) in steps of `step`.
/// Works for negative steps; a zero or wrong-signed step yields
/// nothing.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let span = (stop - start) / step;
    if step == 0.0 || !span.is_finite() || span <= 0.0 {
        return vec![];
    }

    let num = span.ceil() as usize;
    (0..num).map(|i| start + i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linspace_endpoints() {
        let values = linspace(1e-6, 75e-6, 10);
        assert_eq!(values.len(), 10);
        assert_abs_diff_eq!(values[0], 1e-6);
        assert_abs_diff_eq!(values[9], 75e-6);
    }

    #[test]
    fn test_linspace_degenerate() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.5, 1.0, 1), vec![0.5]);
    }

    #[test]
    fn test_arange_negative_step_excludes_stop() {
        let values = arange(0.0, -1.0, -0.1);
        assert_eq!(values.len(), 10);
        assert_abs_diff_eq!(values[0], 0.0);
        assert_abs_diff_eq!(values[9], -0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_arange_guards() {
        assert!(arange(0.0, -1.0, 0.1).is_empty());
        assert!(arange(0.0, -1.0, 0.0).is_empty());
    }

    #[test]
    fn test_grid_size_and_order() {
        let grid = SweepGridBuilder::default().build().unwrap();
        let points = grid.points();
        assert_eq!(points.len(), 1000);
        assert_eq!(points.len(), grid.len());

        // W varies fastest, then L, then Vbs
        assert_abs_diff_eq!(points[0].w, 1e-6);
        assert_abs_diff_eq!(points[0].l, 150e-9);
        assert_abs_diff_eq!(points[0].vbs, 0.0);

        assert_abs_diff_eq!(points[1].w, points[0].w + 74e-6 / 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(points[1].l, points[0].l);

        assert_abs_diff_eq!(points[10].w, 1e-6);
        assert!(points[10].l > points[0].l);
        assert_abs_diff_eq!(points[10].vbs, 0.0);

        assert_abs_diff_eq!(points[100].vbs, -0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(points[999].w, 75e-6);
        assert_abs_diff_eq!(points[999].l, 10e-6);
        assert_abs_diff_eq!(points[999].vbs, -0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_grid_builder_overrides() {
        let grid = SweepGridBuilder::default()
            .num_w(2usize)
            .num_l(3usize)
            .min_vb(-0.2)
            .build()
            .unwrap();
        assert_eq!(grid.points().len(), 2 * 3 * 2);
    }
}
