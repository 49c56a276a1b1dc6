//! Linear 8-bit quantization
//!
//! `byte = round(clamp(value * scale, 0, 255))`
//!
//! Buffers whose length differs from the field size are normalized before
//! they go on the wire: longer inputs are truncated, shorter inputs are
//! stretched by nearest-neighbour resampling and empty inputs become a
//! zero-filled field. Callers should hand in vectors of the right length;
//! the resize only keeps the packet well formed.

use echolink_core::{ensure_finite, EchoError, EchoResult};

/// Scale for latent values already in a byte-like range
pub const LATENT_SCALE: f32 = 1.0;

/// Scale for normalized [0.0, 1.0] energy values
pub const ENERGY_SCALE: f32 = 255.0;

/// Quantize a single pre-validated value
#[inline]
fn quantize_value(value: f32, scale: f32) -> u8 {
    (value * scale).clamp(0.0, 255.0).round() as u8
}

fn check_scale(scale: f32) -> EchoResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(EchoError::InvalidInput(format!(
            "Quantization scale must be positive and finite, got {}",
            scale
        )));
    }
    Ok(())
}

/// Quantize `values` into exactly `target_size` bytes
pub fn quantize(values: &[f32], target_size: usize, scale: f32) -> EchoResult<Vec<u8>> {
    if target_size == 0 {
        return Err(EchoError::invalid("target_size must be positive"));
    }
    check_scale(scale)?;
    ensure_finite("quantizer input", values)?;

    let quantized: Vec<u8> = values.iter().map(|&v| quantize_value(v, scale)).collect();

    if quantized.len() == target_size {
        return Ok(quantized);
    }

    tracing::warn!(
        "Resizing quantized buffer from {} to {} bytes",
        quantized.len(),
        target_size
    );
    Ok(resize(&quantized, target_size))
}

/// Number of values that saturate at either end of the byte range
pub fn clipped_count(values: &[f32], scale: f32) -> usize {
    values
        .iter()
        .filter(|&&v| {
            let scaled = v * scale;
            scaled < 0.0 || scaled > 255.0
        })
        .count()
}

/// Map bytes back to floats: `value = byte / scale`
pub fn dequantize(bytes: &[u8], scale: f32) -> EchoResult<Vec<f32>> {
    check_scale(scale)?;
    Ok(bytes.iter().map(|&b| b as f32 / scale).collect())
}

/// Truncate, stretch (nearest neighbour) or zero-fill to `target_size`
fn resize(quantized: &[u8], target_size: usize) -> Vec<u8> {
    let len = quantized.len();
    if len == 0 {
        return vec![0u8; target_size];
    }
    if len > target_size {
        return quantized[..target_size].to_vec();
    }
    (0..target_size)
        .map(|i| quantized[i * len / target_size])
        .collect()
}
