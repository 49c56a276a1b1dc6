//! Spectrogram buffer
//!
//! Row-major `(time_steps, frequency_bins)` matrix of magnitudes. The shape
//! is checked once at construction so every row has the same width.

use crate::{EchoError, EchoResult};

/// Generated spectrogram
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrogram {
    data: Vec<f32>,
    time_steps: usize,
    frequency_bins: usize,
}

impl Spectrogram {
    /// Create a spectrogram filled with `value`
    ///
    /// # Panics
    ///
    /// Panics if `time_steps * frequency_bins` overflows `usize`, like
    /// `vec!` does for an impossible allocation. Use [`Spectrogram::from_vec`]
    /// for shapes that come from untrusted input.
    pub fn filled(time_steps: usize, frequency_bins: usize, value: f32) -> Self {
        let len = match time_steps.checked_mul(frequency_bins) {
            Some(len) => len,
            None => panic!(
                "Spectrogram shape ({}, {}) overflows",
                time_steps, frequency_bins
            ),
        };
        Spectrogram {
            data: vec![value; len],
            time_steps,
            frequency_bins,
        }
    }

    /// Create a silent spectrogram
    pub fn zeros(time_steps: usize, frequency_bins: usize) -> Self {
        Self::filled(time_steps, frequency_bins, 0.0)
    }

    /// Wrap a row-major buffer
    pub fn from_vec(time_steps: usize, frequency_bins: usize, data: Vec<f32>) -> EchoResult<Self> {
        let expected = time_steps
            .checked_mul(frequency_bins)
            .ok_or_else(|| EchoError::invalid("Spectrogram shape overflows"))?;
        if data.len() != expected {
            return Err(EchoError::InvalidInput(format!(
                "Spectrogram buffer has {} values, shape ({}, {}) needs {}",
                data.len(),
                time_steps,
                frequency_bins,
                expected
            )));
        }
        Ok(Spectrogram {
            data,
            time_steps,
            frequency_bins,
        })
    }

    /// Build from one row per time step
    pub fn from_rows(rows: &[Vec<f32>]) -> EchoResult<Self> {
        let frequency_bins = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * frequency_bins);
        for (t, row) in rows.iter().enumerate() {
            if row.len() != frequency_bins {
                return Err(EchoError::InvalidInput(format!(
                    "Ragged spectrogram: row {} has {} bins, expected {}",
                    t,
                    row.len(),
                    frequency_bins
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Spectrogram {
            data,
            time_steps: rows.len(),
            frequency_bins,
        })
    }

    #[inline]
    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    #[inline]
    pub fn frequency_bins(&self) -> usize {
        self.frequency_bins
    }

    /// `(time_steps, frequency_bins)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.time_steps, self.frequency_bins)
    }

    pub fn get(&self, step: usize, bin: usize) -> Option<f32> {
        if step >= self.time_steps || bin >= self.frequency_bins {
            return None;
        }
        Some(self.data[step * self.frequency_bins + bin])
    }

    pub fn row(&self, step: usize) -> Option<&[f32]> {
        if step >= self.time_steps {
            return None;
        }
        let start = step * self.frequency_bins;
        Some(&self.data[start..start + self.frequency_bins])
    }

    pub fn row_mut(&mut self, step: usize) -> Option<&mut [f32]> {
        if step >= self.time_steps {
            return None;
        }
        let start = step * self.frequency_bins;
        Some(&mut self.data[start..start + self.frequency_bins])
    }

    /// Iterate over rows in time order
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        let bins = self.frequency_bins;
        (0..self.time_steps).map(move |t| &self.data[t * bins..(t + 1) * bins])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Sum of all magnitudes
    pub fn total_energy(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "overflows")]
    fn test_filled_rejects_overflowing_shape() {
        Spectrogram::filled(usize::MAX, 2, 0.0);
    }

    #[test]
    fn test_from_vec_shape_check() {
        assert!(Spectrogram::from_vec(2, 3, vec![0.0; 6]).is_ok());
        assert!(Spectrogram::from_vec(2, 3, vec![0.0; 5]).is_err());
    }

    #[test]
    fn test_from_rows() {
        let spec = Spectrogram::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(spec.shape(), (2, 2));
        assert_eq!(spec.get(1, 0), Some(3.0));
        assert_eq!(spec.get(2, 0), None);
        assert_eq!(spec.row(0), Some(&[1.0, 2.0][..]));

        assert!(Spectrogram::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn test_rows_iterator() {
        let spec = Spectrogram::filled(3, 4, 1.0);
        assert_eq!(spec.rows().count(), 3);
        assert!(spec.rows().all(|r| r.len() == 4));

        let binless = Spectrogram::zeros(5, 0);
        assert_eq!(binless.rows().count(), 5);
    }

    #[test]
    fn test_total_energy() {
        let spec = Spectrogram::filled(100, 80, 1.0);
        assert_eq!(spec.total_energy(), 8000.0);
    }
}
