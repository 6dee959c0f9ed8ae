//! Association measures over finished corpus counts.
//!
//! Every measure resolves its zero-denominator case to an explicit `0.0`.

use std::collections::HashMap;

/// Marginal count from which a component counts as common.
pub const STRONG_PART_MIN: u64 = 100;

///Pointwise mutual information, base 2. `0` if either marginal is zero.
/// # Example
/// ```
/// use tarkib::stats::pmi;
/// assert!((pmi(10, 10, 10, 100) - 10f64.log2()).abs() < 1e-12);
/// assert_eq!(pmi(1, 0, 5, 100), 0.0);
/// ```
pub fn pmi(f12: u64, f1: u64, f2: u64, n: u64) -> f64 {
    if f1 == 0 || f2 == 0 || n == 0 {
        return 0.0;
    }
    let n = n as f64;
    ((f12 as f64 / n) / ((f1 as f64 / n) * (f2 as f64 / n))).log2()
}

/// `(f12 - f1*f2/N) / sqrt(f12)`, `0` if `f12` is zero.
pub fn t_score(f12: u64, f1: u64, f2: u64, n: u64) -> f64 {
    if f12 == 0 || n == 0 {
        return 0.0;
    }
    let expected = (f1 as f64 * f2 as f64) / n as f64;
    (f12 as f64 - expected) / (f12 as f64).sqrt()
}

/// Dunning's log-likelihood ratio over the 2x2 contingency table.
pub fn log_likelihood(f12: u64, f1: u64, f2: u64, n: u64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let (f12, f1, f2, n) = (f12 as f64, f1 as f64, f2 as f64, n as f64);
    let k11 = f12;
    let k12 = f1 - f12;
    let k21 = f2 - f12;
    let k22 = n - (f1 + f2 - f12);

    let (row1, row2) = (k11 + k12, k21 + k22);
    let (col1, col2) = (k11 + k21, k12 + k22);
    let cells = [
        (k11, row1 * col1 / n),
        (k12, row1 * col2 / n),
        (k21, row2 * col1 / n),
        (k22, row2 * col2 / n),
    ];
    2.0 * cells
        .iter()
        .map(|&(observed, expected)| ll_term(observed, expected))
        .sum::<f64>()
}

// Unigram marginals include file-final tokens, so a cell can go negative on
// tiny corpora; such cells contribute nothing, like empty ones.
fn ll_term(observed: f64, expected: f64) -> f64 {
    if observed <= 0.0 || expected <= 0.0 {
        0.0
    } else {
        observed * (observed / expected).ln()
    }
}

/// Shannon entropy (base 2) of a counter, `0` for an empty one.
pub fn entropy(counter: &HashMap<String, u64>) -> f64 {
    let total: u64 = counter.values().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    -counter
        .values()
        .map(|&c| {
            let p = c as f64 / total;
            p * p.log2()
        })
        .sum::<f64>()
}

/// Mean of the left and right context entropies.
pub fn context_entropy(left: &HashMap<String, u64>, right: &HashMap<String, u64>) -> f64 {
    (entropy(left) + entropy(right)) / 2.0
}

/// Occurrences per file among files containing the pair.
pub fn density(f12: u64, spread: usize) -> f64 {
    if spread == 0 {
        0.0
    } else {
        f12 as f64 / spread as f64
    }
}

pub fn pmi_ll_ratio(pmi: f64, ll: f64) -> f64 {
    if ll == 0.0 { 0.0 } else { pmi / ll }
}

pub fn strong_parts(f1: u64, f2: u64) -> bool {
    f1 >= STRONG_PART_MIN && f2 >= STRONG_PART_MIN
}

pub fn z_score(value: f64, mean: f64, std: f64) -> f64 {
    if std == 0.0 { 0.0 } else { (value - mean) / std }
}

/// Mean and population standard deviation of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Population {
    pub mean: f64,
    pub std: f64,
}

impl Population {
    /// An empty or constant sample has std 0, which makes every z-score 0.
    pub fn of(values: &[f64]) -> Self {
        let Some(&first) = values.first() else {
            return Self::default();
        };
        if values.iter().all(|&v| v == first) {
            return Self { mean: first, std: 0.0 };
        }
        let len = values.len() as f64;
        let mean = values.iter().sum::<f64>() / len;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / len;
        Self {
            mean,
            std: variance.sqrt(),
        }
    }

    pub fn z(&self, value: f64) -> f64 {
        z_score(value, self.mean, self.std)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn counter(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn zero_denominators_resolve_to_zero() {
        assert_eq!(pmi(3, 0, 4, 10), 0.0);
        assert_eq!(pmi(3, 4, 0, 10), 0.0);
        assert_eq!(t_score(0, 4, 4, 10), 0.0);
        assert_eq!(density(5, 0), 0.0);
        assert_eq!(pmi_ll_ratio(4.0, 0.0), 0.0);
        assert_eq!(z_score(3.0, 1.0, 0.0), 0.0);
        assert_eq!(entropy(&HashMap::new()), 0.0);
    }

    #[test]
    fn fixture_values() {
        // f12=3, f1=f2=3, N=5
        assert!((pmi(3, 3, 3, 5) - (5.0f64 / 3.0).log2()).abs() < EPS);
        assert!((t_score(3, 3, 3, 5) - 1.2 / 3f64.sqrt()).abs() < EPS);
        let expected_ll = 2.0 * (3.0 * (3.0f64 / 1.8).ln() + 2.0 * (2.0f64 / 0.8).ln());
        assert!((log_likelihood(3, 3, 3, 5) - expected_ll).abs() < EPS);
    }

    #[test]
    fn measures_grow_with_pair_frequency() {
        let (f1, f2, n) = (60, 80, 10_000);
        let mut last = (f64::MIN, f64::MIN, f64::MIN);
        for f12 in [1, 2, 5, 10, 20, 40, 60] {
            let cur = (
                pmi(f12, f1, f2, n),
                t_score(f12, f1, f2, n),
                log_likelihood(f12, f1, f2, n),
            );
            assert!(cur.0 >= last.0, "pmi fell at f12={f12}");
            assert!(cur.1 >= last.1, "t fell at f12={f12}");
            assert!(cur.2 >= last.2, "ll fell at f12={f12}");
            last = cur;
        }
    }

    #[test]
    fn entropy_single_key_is_zero() {
        assert_eq!(entropy(&counter(&[("x", 7)])), 0.0);
    }

    #[test]
    fn entropy_uniform_is_log2_k() {
        let c = counter(&[("a", 2), ("b", 2), ("c", 2), ("d", 2)]);
        assert!((entropy(&c) - 2.0).abs() < EPS);
        let c3 = counter(&[("a", 1), ("b", 1), ("c", 1)]);
        assert!((entropy(&c3) - 3f64.log2()).abs() < EPS);
    }

    #[test]
    fn context_entropy_averages_sides() {
        let left = counter(&[("a", 1), ("b", 1)]);
        assert!((context_entropy(&left, &HashMap::new()) - 0.5).abs() < EPS);
    }

    #[test]
    fn negative_cells_do_not_poison_ll() {
        // k22 = 2 - (2 + 2 - 1) = -1
        let ll = log_likelihood(1, 2, 2, 2);
        assert!(ll.is_finite());
    }

    #[test]
    fn population_z_scores() {
        let pop = Population::of(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((pop.mean - 3.0).abs() < EPS);
        assert!((pop.std - 2f64.sqrt()).abs() < EPS);
        assert_eq!(pop.z(pop.mean), 0.0);
        assert!((pop.z(5.0) - 2.0 / 2f64.sqrt()).abs() < EPS);

        let flat = Population::of(&[0.1, 0.1, 0.1]);
        assert_eq!(flat.std, 0.0);
        assert_eq!(flat.z(0.1), 0.0);
        assert_eq!(flat.z(10.0), 0.0);

        assert_eq!(Population::of(&[]).z(1.0), 0.0);
    }

    #[test]
    fn strong_parts_threshold() {
        assert!(strong_parts(100, 100));
        assert!(!strong_parts(99, 1000));
    }
}
