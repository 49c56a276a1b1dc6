//! Energy floor decoding
//!
//! The side channel carries E_SIZE coarse energy samples per packet. The
//! generated spectrogram has its own, unrelated number of time steps, so the
//! coarse map is stretched onto it with plain linear interpolation. Output
//! samples are spread uniformly over the coarse span `[0, E_SIZE]`; positions
//! past the last coarse sample hold its value. Downsampling uses the same
//! interpolation without any pre-filtering.

use echolink_core::{EchoError, EchoResult, EnergyMap};
use echolink_wire::ENERGY_SCALE;

/// Coarse energy samples at the native side-channel resolution
fn coarse_map(energy_bytes: &[u8]) -> Vec<f32> {
    energy_bytes
        .iter()
        .map(|&b| b as f32 / ENERGY_SCALE)
        .collect()
}

/// Fractional coarse position of output sample `index`
#[inline]
fn coarse_position(index: usize, coarse_len: usize, target_resolution: usize) -> f64 {
    if target_resolution < 2 {
        return 0.0;
    }
    index as f64 * coarse_len as f64 / (target_resolution - 1) as f64
}

/// Linearly interpolate `coarse` at fractional position `p`
#[inline]
fn sample(coarse: &[f32], p: f64) -> f32 {
    let last = coarse.len() - 1;
    let base = p.floor();
    let lo = (base as usize).min(last);
    let hi = (p.ceil() as usize).min(last);
    if lo == hi {
        return coarse[lo];
    }
    let frac = (p - base) as f32;
    coarse[lo] + (coarse[hi] - coarse[lo]) * frac
}

/// Stretch `coarse` to `target_resolution` samples
pub fn interpolate(coarse: &[f32], target_resolution: usize) -> EchoResult<Vec<f32>> {
    if coarse.is_empty() {
        return Err(EchoError::invalid("Cannot interpolate an empty energy map"));
    }
    if target_resolution == 0 {
        return Err(EchoError::invalid("target_resolution must be positive"));
    }
    Ok((0..target_resolution)
        .map(|i| sample(coarse, coarse_position(i, coarse.len(), target_resolution)))
        .collect())
}

/// Decode the energy floor field and stretch it to `target_resolution` steps
pub fn decode_energy_floor(
    energy_bytes: &[u8],
    e_size: usize,
    target_resolution: usize,
) -> EchoResult<EnergyMap> {
    if energy_bytes.len() != e_size {
        return Err(EchoError::InvalidInput(format!(
            "Energy floor must be {} bytes, got {}",
            e_size,
            energy_bytes.len()
        )));
    }
    interpolate(&coarse_map(energy_bytes), target_resolution).map(EnergyMap::new)
}
