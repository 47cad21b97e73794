//! G.722 QMF (Quadrature Mirror Filter) Implementation
//!
//! This module implements the QMF analysis and synthesis filters used in G.722.
//! Based on the ITU-T G.722 reference implementation.

use crate::codecs::g722::tables::{QMF_COEFFS, limit};
use crate::codecs::g722::state::G722State;

/// QMF analysis filter (encoder)
/// 
/// Splits the input signal into low and high frequency bands.
/// Processes two input samples and produces one low-band and one high-band sample.
/// 
/// # Arguments
/// * `xin0` - First input sample
/// * `xin1` - Second input sample  
/// * `state` - G.722 state containing the QMF delay line
/// 
/// # Returns
/// * `(xl, xh)` - Low-band and high-band samples
pub fn qmf_analysis(xin0: i16, xin1: i16, state: &mut G722State) -> (i16, i16) {
    let delay = state.qmf_tx_delay_mut();
    
    // Shift delay line first (move older samples towards the end)
    for i in 0..22 {
        delay[23 - i] = delay[21 - i];
    }
    
    // Insert new samples at the beginning
    delay[0] = xin0;
    delay[1] = xin1;
    
    // QMF filtering
    let mut accum_a = 0i64;
    let mut accum_b = 0i64;
    
    for i in 0..12 {
        accum_a += (delay[i * 2] as i64) * (QMF_COEFFS[i * 2] as i64);
        accum_b += (delay[i * 2 + 1] as i64) * (QMF_COEFFS[i * 2 + 1] as i64);
    }
    
    // Compute low and high band outputs
    let comp_low = (accum_a + accum_b) * 2;
    let comp_high = (accum_a - accum_b) * 2;
    
    let xl = limit((comp_low >> 16) as i32);
    let xh = limit((comp_high >> 16) as i32);
    
    (xl, xh)
}

/// QMF synthesis filter (decoder)
/// 
/// Reconstructs the time-domain signal from low and high frequency bands.
/// Processes one low-band and one high-band sample and produces two output samples.
/// 
/// # Arguments
/// * `rl` - Low-band sample
/// * `rh` - High-band sample
/// * `state` - G.722 state containing the QMF delay line
/// 
/// # Returns
/// * `(xout1, xout2)` - Two reconstructed output samples
pub fn qmf_synthesis(rl: i16, rh: i16, state: &mut G722State) -> (i16, i16) {
    let delay = state.qmf_rx_delay_mut();
    
    // Shift delay line first (move older samples towards the end)
    for i in 0..22 {
        delay[23 - i] = delay[21 - i];
    }
    
    // Compute sum and difference from lower-band (rl) and higher-band (rh) signals
    delay[0] = saturated_sub(rl, rh);
    delay[1] = saturated_add(rl, rh);
    
    // QMF filtering
    let mut accum_a = 0i64;
    let mut accum_b = 0i64;
    
    for i in 0..12 {
        accum_a += (delay[i * 2] as i64) * (QMF_COEFFS[i * 2] as i64);
        accum_b += (delay[i * 2 + 1] as i64) * (QMF_COEFFS[i * 2 + 1] as i64);
    }
    
    // Compute output samples with right shift by 10 for proper scaling
    let comp_low = accum_a >> 10;
    let comp_high = accum_b >> 10;
    
    let xout1 = limit(comp_low as i32);
    let xout2 = limit(comp_high as i32);
    
    (xout1, xout2)
}

/// QMF synthesis filter optimized version (decoder)
/// 
/// Alternative implementation that doesn't shift the delay line in memory.
/// Used for performance optimization in some cases.
/// 
/// # Arguments
/// * `rl` - Low-band sample
/// * `rh` - High-band sample
/// * `delay` - QMF delay line (external management)
/// * `output` - Output buffer for the two samples
pub fn qmf_synthesis_buf(rl: i16, rh: i16, delay: &mut [i16], output: &mut [i16]) {
    if delay.len() < 24 || output.len() < 2 {
        return;
    }
    
    // Shift delay line first (move older samples towards the end)
    for i in 0..22 {
        delay[23 - i] = delay[21 - i];
    }
    
    // Compute sum and difference from lower-band (rl) and higher-band (rh) signals
    delay[0] = saturated_sub(rl, rh);
    delay[1] = saturated_add(rl, rh);
    
    // QMF filtering
    let mut accum_a = 0i64;
    let mut accum_b = 0i64;
    
    for i in 0..12 {
        accum_a += (delay[i * 2] as i64) * (QMF_COEFFS[i * 2] as i64);
        accum_b += (delay[i * 2 + 1] as i64) * (QMF_COEFFS[i * 2 + 1] as i64);
    }
    
    // Compute output samples with right shift by 10 for proper scaling
    let comp_low = accum_a >> 10;
    let comp_high = accum_b >> 10;
    
    output[0] = limit(comp_low as i32);
    output[1] = limit(comp_high as i32);
}

/// Saturated addition of two i16 values
fn saturated_add(a: i16, b: i16) -> i16 {
    limit((a as i32) + (b as i32))
}

/// Saturated subtraction of two i16 values
fn saturated_sub(a: i16, b: i16) -> i16 {
    limit((a as i32) - (b as i32))
}

/// Extract high 16 bits from 32-bit value (equivalent to right shift by 16)
fn extract_high(value: i64) -> i16 {
    // Cast to i32 first to handle 32-bit values properly, then extract high 16 bits
    let val32 = value as i32;
    (val32 >> 16) as i16
}

/// Reset QMF delay lines
pub fn reset_qmf_delays(state: &mut G722State) {
    state.qmf_tx_delay = [0; 24];
    state.qmf_rx_delay = [0; 24];
}

/// Get frequency response of QMF filter (for testing/validation)
pub fn get_qmf_response(frequency: f32, sample_rate: f32) -> f32 {
    let omega = 2.0 * std::f32::consts::PI * frequency / sample_rate;
    let mut response = 0.0f32;
    
    for (i, &coeff) in QMF_COEFFS.iter().enumerate() {
        response += (coeff as f32) * (omega * (i as f32)).cos();
    }
    
    response.abs()
}
