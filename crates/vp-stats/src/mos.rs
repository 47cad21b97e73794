//! ITU-T G.107 E-model MOS estimation (spec §4.10).

/// Per-codec equipment impairment factor and packet-loss robustness
/// factor, as used by the E-model's `Ie_eff` term. Values follow the
/// commonly cited G.113 appendix entries; Opus has no ITU-assigned
/// entry so it reuses the wideband-codec shape the spec calls out
/// (`Bpl ≈ 10`) with a zero base impairment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodecQualityParams {
    pub ie: f32,
    pub bpl: f32,
}

impl CodecQualityParams {
    pub const G711: Self = Self { ie: 0.0, bpl: 4.3 };
    pub const G722: Self = Self { ie: 0.0, bpl: 4.3 };
    pub const OPUS: Self = Self { ie: 0.0, bpl: 10.0 };
}

/// Delay impairment factor `Id`. Zero below 100ms, then a piecewise-linear
/// rise with a slope change at 177.3ms (spec §4.10).
pub fn id_delay(one_way_delay_ms: f32) -> f32 {
    if one_way_delay_ms < 100.0 {
        return 0.0;
    }
    let t = one_way_delay_ms;
    let extra = if t > 177.3 { 0.11 * (t - 177.3) } else { 0.0 };
    0.024 * t + extra
}

/// Effective equipment impairment including packet loss, per codec.
pub fn ie_effective(codec: CodecQualityParams, loss_percent: f32) -> f32 {
    let p = loss_percent.max(0.0);
    codec.ie + (95.0 - codec.ie) * (p / (p + codec.bpl))
}

/// R-factor from delay and loss, per the spec's simplified E-model:
/// `R = 93.2 - 1.41 - Id(delay) - Ie_eff(codec, loss)`.
pub fn r_factor(one_way_delay_ms: f32, codec: CodecQualityParams, loss_percent: f32) -> f32 {
    93.2 - 1.41 - id_delay(one_way_delay_ms) - ie_effective(codec, loss_percent)
}

/// Convert an R-factor to MOS, clamped to `[1.0, 4.5]` (spec §4.10).
pub fn mos_from_r(r: f32) -> f32 {
    let mos = 1.0 + 0.035 * r + 7e-6 * r * (r - 60.0) * (100.0 - r);
    mos.clamp(1.0, 4.5)
}
