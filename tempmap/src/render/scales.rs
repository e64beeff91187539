//! Scale mappings from data space to pixel space.

use crate::core::domain::TemperatureRange;

/// Maps a discrete ordered domain to evenly spaced pixel bands.
///
/// Same layout as d3's `scaleBand` with equal inner and outer padding and the
/// bands centered in the range.
#[derive(Debug, Clone)]
pub struct BandScale<T> {
    domain: Vec<T>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl<T: PartialEq + Copy> BandScale<T> {
    pub fn new(domain: Vec<T>, range: (f64, f64), padding: f64) -> Self {
        let (r0, r1) = range;
        let n = domain.len() as f64;
        let padding = padding.clamp(0.0, 1.0);

        let step = (r1 - r0) / f64::max(1.0, n - padding + 2.0 * padding);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;
        let bandwidth = step * (1.0 - padding);

        Self {
            domain,
            start,
            step,
            bandwidth,
        }
    }

    /// Left (or top) edge of the band for `value`, `None` if not in the domain.
    pub fn position(&self, value: T) -> Option<f64> {
        self.domain
            .iter()
            .position(|v| *v == value)
            .map(|i| self.start + self.step * i as f64)
    }

    /// Center of the band for `value`.
    pub fn center(&self, value: T) -> Option<f64> {
        self.position(value).map(|p| p + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn domain(&self) -> &[T] {
        &self.domain
    }
}

/// Continuous linear mapping from a numeric domain to a numeric range.
///
/// A degenerate domain (both ends equal) maps every input to the middle of
/// the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn from_temperature(range: TemperatureRange, output: (f64, f64)) -> Self {
        Self::new((range.min, range.max), output)
    }

    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Position of `value` within the domain as a fraction, clamped to [0, 1].
    pub fn normalize(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        if d1 == d0 {
            return 0.5;
        }
        ((value - d0) / (d1 - d0)).clamp(0.0, 1.0)
    }
}

/// Evenly spaced "nice" tick values covering `[start, stop]`.
///
/// The step is 1, 2 or 5 times a power of ten, chosen so that roughly `count`
/// ticks fit, the way d3's `ticks` picks them.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return vec![];
    }
    if start == stop {
        return vec![start];
    }

    let (lo, hi, reverse) = if start < stop {
        (start, stop, false)
    } else {
        (stop, start, true)
    };

    let step = tick_step(lo, hi, count);
    if step <= 0.0 || !step.is_finite() {
        return vec![];
    }

    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    let mut values: Vec<f64> = (first..=last).map(|i| round_tick(i as f64 * step, step)).collect();

    if reverse {
        values.reverse();
    }
    values
}

fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let raw = (stop - start) / count as f64;
    let power = raw.log10().floor();
    let error = raw / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };
    factor * 10f64.powf(power)
}

/// Strip float noise such as 0.30000000000000004 from a tick value.
fn round_tick(value: f64, step: f64) -> f64 {
    let decimals = (-step.log10().floor()).max(0.0) as i32 + 1;
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_band_scale_matches_d3_layout() {
        // d3.scaleBand().domain([1..=10]).range([0, 650]).padding(0.05)
        let years: Vec<i32> = (2015..=2024).collect();
        let scale = BandScale::new(years, (0.0, 650.0), 0.05);

        let step = 650.0 / 10.05;
        assert_close(scale.bandwidth(), step * 0.95);
        assert_close(scale.position(2015).unwrap(), step * 0.05);
        assert_close(scale.position(2024).unwrap(), step * 0.05 + 9.0 * step);
        let last_end = scale.position(2024).unwrap() + scale.bandwidth();
        assert_close(650.0 - last_end, step * 0.05);
        assert!(scale.position(2030).is_none());
    }

    #[test]
    fn test_band_scale_single_value() {
        let scale = BandScale::new(vec![7u32], (0.0, 100.0), 0.05);
        let step = 100.0 / 1.05;
        assert_close(scale.bandwidth(), step * 0.95);
        assert_close(scale.position(7).unwrap(), (100.0 - step * 0.95) / 2.0);
        assert_close(scale.center(7).unwrap(), 50.0);
    }

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new((-10.0, 30.0), (0.0, 400.0));
        assert_close(scale.scale(-10.0), 0.0);
        assert_close(scale.scale(10.0), 200.0);
        assert_close(scale.scale(30.0), 400.0);
        assert_close(scale.normalize(50.0), 1.0);

        let inverted = LinearScale::new((0.0, 10.0), (100.0, 0.0));
        assert_close(inverted.scale(2.5), 75.0);
    }

    #[test]
    fn test_linear_scale_degenerate_domain() {
        let scale = LinearScale::new((1.0, 1.0), (3.0, 13.0));
        assert_close(scale.scale(1.0), 8.0);
        assert_close(scale.normalize(1.0), 0.5);
    }

    #[test]
    fn test_ticks() {
        assert_eq!(ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks(-5.3, 21.7, 5), vec![-5.0, 0.0, 5.0, 10.0, 15.0, 20.0]);
        assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(3.0, 3.0, 5), vec![3.0]);
        assert_eq!(ticks(10.0, 0.0, 5), vec![10.0, 8.0, 6.0, 4.0, 2.0, 0.0]);
        assert!(ticks(0.0, 10.0, 0).is_empty());
    }
}
