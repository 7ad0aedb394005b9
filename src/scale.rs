use std::collections::BTreeMap;

use crate::data::{ColumnId, Dataset};
use crate::ir::Scale;

/// Inner padding of a cell, split evenly on both sides of each axis
pub const CELL_PADDING: f64 = 10.0;

/// Build a linear scale over the finite values of `values`.
///
/// NaN entries are skipped. With no finite value the domain collapses to
/// `(0, 0)`; a collapsed domain maps everything to the middle of the range.
pub fn build_scale<I>(values: I, range: (f64, f64), invert: bool) -> Scale
where
    I: IntoIterator<Item = f64>,
{
    let mm = calculate_min_max(values);
    Scale {
        domain: (mm.min, mm.max),
        range: if invert { (range.1, range.0) } else { range },
    }
}

#[derive(Debug, Clone, Copy)]
struct MinMax {
    min: f64,
    max: f64,
}

fn calculate_min_max<I>(values: I) -> MinMax
where
    I: IntoIterator<Item = f64>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for val in values {
        if val.is_nan() { continue; }
        if val < min { min = val; }
        if val > max { max = val; }
    }

    // Handle empty case
    if min > max {
        return MinMax { min: 0.0, max: 0.0 };
    }
    MinMax { min, max }
}

impl Scale {
    /// Map a domain value to the output range.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Map an output coordinate back into the domain.
    pub fn invert(&self, coord: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 || d1 == d0 {
            return d0;
        }
        d0 + (coord - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Roughly `count` round-numbered ticks inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        if lo == hi || count == 0 {
            return vec![lo];
        }

        let step0 = (hi - lo) / count as f64;
        let power = step0.log10().floor();
        let error = step0 / 10f64.powf(power);
        let factor = if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        };

        if power >= 0.0 {
            let step = factor * 10f64.powf(power);
            let first = (lo / step).ceil() as i64;
            let last = (hi / step).floor() as i64;
            (first..=last).map(|i| i as f64 * step).collect()
        } else {
            // Divide by the inverse step to keep decimals exact
            let inc = 10f64.powf(-power) / factor;
            let first = (lo * inc).ceil() as i64;
            let last = (hi * inc).floor() as i64;
            (first..=last).map(|i| i as f64 / inc).collect()
        }
    }
}

/// Format an axis tick: scientific for very large or very small magnitudes,
/// integer when integral, plain decimal otherwise.
pub fn format_tick(value: f64) -> String {
    let abs = value.abs();
    if abs > 10000.0 || (abs < 0.001 && abs != 0.0) {
        format!("{:e}", value)
    } else if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// X and Y scales for every plotted variable
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScaleSet {
    pub x: BTreeMap<String, Scale>,
    pub y: BTreeMap<String, Scale>,
}

impl ScaleSet {
    /// Build scales for `variables` over the given rows. Every x scale spans
    /// `[padding/2, cell_size - padding/2]`; y scales span the same range
    /// inverted so larger values sit higher in the cell.
    pub fn build(
        variables: &[(String, ColumnId)],
        data: &Dataset,
        rows: &[usize],
        cell_size: f64,
    ) -> Self {
        let range = (CELL_PADDING / 2.0, cell_size - CELL_PADDING / 2.0);
        let mut set = ScaleSet::default();

        for (name, column) in variables {
            let values: Vec<f64> = rows.iter().map(|&r| data.row(r).number(*column)).collect();
            set.x.insert(name.clone(), build_scale(values.iter().copied(), range, false));
            set.y.insert(name.clone(), build_scale(values, range, true));
        }

        set
    }
}
