//! Sequential yellow-orange-red color ramp.

use crate::core::domain::TemperatureRange;
use crate::render::scales::LinearScale;

/// ColorBrewer YlOrRd, 9 classes, light to dark.
const YL_OR_RD: [(u8, u8, u8); 9] = [
    (0xff, 0xff, 0xcc),
    (0xff, 0xed, 0xa0),
    (0xfe, 0xd9, 0x76),
    (0xfe, 0xb2, 0x4c),
    (0xfd, 0x8d, 0x3c),
    (0xfc, 0x4e, 0x2a),
    (0xe3, 0x1a, 0x1c),
    (0xbd, 0x00, 0x26),
    (0x80, 0x00, 0x26),
];

/// Color at `t` in [0, 1] along the YlOrRd ramp, as `#rrggbb`.
///
/// Values outside [0, 1] are clamped; the ramp is piecewise linear between
/// the nine stops.
pub fn interpolate_yl_or_rd(t: f64) -> String {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let segments = (YL_OR_RD.len() - 1) as f64;
    let position = t * segments;
    let index = (position.floor() as usize).min(YL_OR_RD.len() - 2);
    let local = position - index as f64;

    let (r0, g0, b0) = YL_OR_RD[index];
    let (r1, g1, b1) = YL_OR_RD[index + 1];
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * local).round() as u8;

    format!("#{:02x}{:02x}{:02x}", mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

/// Maps temperatures in a domain onto the YlOrRd ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialColor {
    scale: LinearScale,
}

impl SequentialColor {
    pub fn new(domain: TemperatureRange) -> Self {
        Self {
            scale: LinearScale::from_temperature(domain, (0.0, 1.0)),
        }
    }

    pub fn color(&self, value: f64) -> String {
        interpolate_yl_or_rd(self.scale.normalize(value))
    }
}
