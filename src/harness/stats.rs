//! Reduction of timing samples to mean / standard deviation / standard error.

/// Summary statistics over retained timing samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    /// Sample standard deviation (Bessel-corrected). Zero for one sample.
    pub stddev: f64,
    /// `stddev / sqrt(count)`.
    pub std_error: f64,
    pub count: usize,
}

impl Summary {
    /// Returns `None` for an empty slice.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let count = samples.len();
        let n = count as f64;
        let mean = samples.iter().sum::<f64>() / n;

        let stddev = if count < 2 {
            0.0
        } else {
            let sum_sq: f64 = samples
                .iter()
                .map(|&s| {
                    let diff = s - mean;
                    diff * diff
                })
                .sum();
            (sum_sq / (n - 1.0)).sqrt()
        };

        Some(Self {
            mean,
            stddev,
            std_error: stddev / n.sqrt(),
            count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_two_three() {
        let s = Summary::from_samples(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(s.count, 3);
        assert!((s.mean - 2.0).abs() < 1e-12);
        assert!((s.stddev - 1.0).abs() < 1e-12);
        assert!((s.std_error - 1.0 / 3f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_has_zero_spread() {
        let s = Summary::from_samples(&[4.5]).unwrap();
        assert_eq!(s.mean, 4.5);
        assert_eq!(s.stddev, 0.0);
        assert_eq!(s.std_error, 0.0);
    }

    #[test]
    fn test_empty_has_no_summary() {
        assert_eq!(Summary::from_samples(&[]), None);
    }

    #[test]
    fn test_constant_samples() {
        let s = Summary::from_samples(&[7.0; 10]).unwrap();
        assert_eq!(s.mean, 7.0);
        assert_eq!(s.stddev, 0.0);
    }
}
