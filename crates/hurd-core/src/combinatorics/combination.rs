//! Symbolic ratios of integer factors.

/// Every factor of the numerator and denominator of a combinatorial expression.
///
/// Nothing is multiplied out until [`Combination::value`] is called, so large binomials can be
/// composed without their intermediate factorials ever being materialised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Combination {
    numerator: Vec<u64>,
    denominator: Vec<u64>,
}

impl Combination {
    pub fn new(numerator: Vec<u64>, denominator: Vec<u64>) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn numerator(&self) -> &[u64] {
        &self.numerator
    }

    pub fn denominator(&self) -> &[u64] {
        &self.denominator
    }

    /// Multiplies two ratios by concatenating their factor lists.
    pub fn product(mut self, other: Combination) -> Self {
        self.numerator.extend(other.numerator);
        self.denominator.extend(other.denominator);
        self
    }

    pub fn inverse(self) -> Self {
        Self {
            numerator: self.denominator,
            denominator: self.numerator,
        }
    }

    /// Resolves the ratio to a float.
    ///
    /// Both factor lists are sorted ascending; the running value is divided down whenever it
    /// exceeds one and multiplied up whenever it is at most one, which keeps every
    /// intermediate close to 1.0 regardless of how many factors are involved.
    pub fn value(&self) -> f64 {
        let mut numerator = self.numerator.clone();
        let mut denominator = self.denominator.clone();
        numerator.sort_unstable();
        denominator.sort_unstable();

        let (mut num_idx, mut den_idx) = (0, 0);
        let mut value = 1.0_f64;
        while num_idx < numerator.len() || den_idx < denominator.len() {
            while (num_idx == numerator.len() || value > 1.0) && den_idx < denominator.len() {
                value /= denominator[den_idx] as f64;
                den_idx += 1;
            }
            while (den_idx == denominator.len() || value <= 1.0) && num_idx < numerator.len() {
                value *= numerator[num_idx] as f64;
                num_idx += 1;
            }
        }
        value
    }
}

/// `n` choose `k` as an unevaluated ratio: `n·(n-1)···(n-k+1) / k!`.
///
/// Choosing more items than exist has no ways to happen and resolves to zero.
pub fn n_choose_k(n: u64, k: u64) -> Combination {
    if k > n {
        return Combination::new(vec![0], Vec::new());
    }
    let numerator = ((n - k + 1)..=n).rev().collect();
    let denominator = (1..=k).rev().collect();
    Combination::new(numerator, denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_two_choose_two() {
        assert_eq!(n_choose_k(52, 2).value(), 1326.0);
    }

    #[test]
    fn choose_zero_is_one() {
        let combo = n_choose_k(17, 0);
        assert!(combo.numerator().is_empty());
        assert!(combo.denominator().is_empty());
        assert_eq!(combo.value(), 1.0);
    }

    #[test]
    fn choosing_more_than_available_is_zero() {
        assert_eq!(n_choose_k(3, 5).value(), 0.0);
    }

    #[test]
    fn large_factor_lists_do_not_overflow() {
        // 10001! / 10000!
        let numerator = (1..=10_000u64).map(|i| i + 1).collect();
        let denominator = (1..=10_000u64).collect();
        let value = Combination::new(numerator, denominator).value();
        assert!((value - 10_001.0).abs() < 1e-6, "got {value}");
    }

    #[test]
    fn huge_binomial_ratio_stays_finite() {
        // C(300, 150) / C(300, 150) would overflow if either side were evaluated eagerly.
        let ratio = n_choose_k(300, 150).product(n_choose_k(300, 150).inverse());
        let value = ratio.value();
        assert!(value.is_finite());
        assert!((value - 1.0).abs() < 1e-9, "got {value}");
    }

    #[test]
    fn inverse_swaps_factor_lists() {
        let combo = n_choose_k(5, 2).inverse();
        assert_eq!(combo.numerator(), &[2, 1]);
        assert_eq!(combo.denominator(), &[5, 4]);
        assert!((combo.value() - 0.1).abs() < 1e-12);
    }
}
