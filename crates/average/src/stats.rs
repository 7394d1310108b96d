//! Elementwise running and batch statistics over flat arrays

/// Single pass mean and variance, after Welford (1962)
///
/// Only one array of running sums is kept however many samples are added,
/// and `m2` is only allocated when a spread is wanted.
///
/// ```rust
/// # use mctools_average::Welford;
/// let mut welford = Welford::new(vec![1.0, 10.0], true);
/// welford.push(&[3.0, 10.0]);
/// welford.push(&[5.0, 10.0]);
///
/// assert_eq!(welford.count(), 3);
/// assert_eq!(welford.mean(), &[3.0, 10.0]);
/// assert_eq!(welford.stddev().unwrap(), vec![2.0, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Welford {
    mean: Vec<f64>,
    m2: Option<Vec<f64>>,
    count: usize,
}

impl Welford {
    /// Start from the first sample, tracking the spread if `spread` is set
    pub fn new(first: Vec<f64>, spread: bool) -> Self {
        let m2 = spread.then(|| vec![0.0; first.len()]);
        Self {
            mean: first,
            m2,
            count: 1,
        }
    }

    /// Add a sample of the same length
    pub fn push(&mut self, sample: &[f64]) {
        self.count += 1;
        let n = self.count as f64;

        match &mut self.m2 {
            Some(m2) => {
                for ((mean, m2), x) in self.mean.iter_mut().zip(m2.iter_mut()).zip(sample) {
                    let delta = x - *mean;
                    *mean += delta / n;
                    // second factor uses the updated mean
                    *m2 += delta * (x - *mean);
                }
            }
            None => {
                for (mean, x) in self.mean.iter_mut().zip(sample) {
                    *mean += (x - *mean) / n;
                }
            }
        }
    }

    /// Number of samples so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Running mean
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Sample standard deviation, zero for a single sample
    ///
    /// `None` if the spread was not tracked.
    pub fn stddev(&self) -> Option<Vec<f64>> {
        let m2 = self.m2.as_ref()?;
        Some(match self.count {
            1 => vec![0.0; m2.len()],
            n => m2.iter().map(|s| (s / (n - 1) as f64).sqrt()).collect(),
        })
    }

    /// Consume into the mean and the tracked spread
    pub fn into_parts(self) -> (Vec<f64>, Option<Vec<f64>>) {
        let stddev = self.stddev();
        (self.mean, stddev)
    }
}

/// Mean of every element over the samples, ignoring NaN
///
/// Elements that are NaN in every sample stay NaN.
pub fn nan_mean(samples: &[Vec<f64>]) -> Vec<f64> {
    let len = samples.first().map(Vec::len).unwrap_or_default();
    (0..len)
        .map(|i| {
            let (sum, n) = present_values(samples, i).fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
            match n {
                0 => f64::NAN,
                n => sum / n as f64,
            }
        })
        .collect()
}

/// Sample standard deviation of every element, ignoring NaN
///
/// Elements with fewer than two non-NaN values are NaN.
pub fn nan_stddev(samples: &[Vec<f64>], mean: &[f64]) -> Vec<f64> {
    mean.iter()
        .enumerate()
        .map(|(i, m)| {
            let (sum, n) = present_values(samples, i)
                .fold((0.0, 0usize), |(s, n), x| (s + (x - m).powi(2), n + 1));
            match n {
                0 | 1 => f64::NAN,
                n => (sum / (n - 1) as f64).sqrt(),
            }
        })
        .collect()
}

/// Values at index `i` over all samples, skipping NaN
fn present_values(samples: &[Vec<f64>], i: usize) -> impl Iterator<Item = f64> + '_ {
    samples
        .iter()
        .filter_map(move |s| s.get(i).copied())
        .filter(|x| !x.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn welford_without_spread() {
        let mut welford = Welford::new(vec![2.0], false);
        welford.push(&[4.0]);
        assert_eq!(welford.mean(), &[3.0]);
        assert_eq!(welford.stddev(), None);
    }

    #[test]
    fn welford_single_sample_has_zero_spread() {
        let welford = Welford::new(vec![1.0, f64::NAN], true);
        assert_eq!(welford.stddev().unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn welford_matches_two_pass() {
        let samples = [
            vec![1.0e6 + 4.0],
            vec![1.0e6 + 7.0],
            vec![1.0e6 + 13.0],
            vec![1.0e6 + 16.0],
        ];
        let mut welford = Welford::new(samples[0].clone(), true);
        samples[1..].iter().for_each(|s| welford.push(s));

        let (mean, stddev) = welford.into_parts();
        assert_relative_eq!(mean[0], 1.0e6 + 10.0, epsilon = 1e-9);
        assert_relative_eq!(stddev.unwrap()[0], 30.0f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn nan_statistics_per_element() {
        let samples = vec![
            vec![1.0, f64::NAN, f64::NAN],
            vec![3.0, 2.0, f64::NAN],
            vec![5.0, f64::NAN, f64::NAN],
        ];
        let mean = nan_mean(&samples);
        assert_eq!(mean[..2], [3.0, 2.0]);
        assert!(mean[2].is_nan());

        let stddev = nan_stddev(&samples, &mean);
        assert_relative_eq!(stddev[0], 2.0);
        assert!(stddev[1].is_nan());
        assert!(stddev[2].is_nan());
    }
}
