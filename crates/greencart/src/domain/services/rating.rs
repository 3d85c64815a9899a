//! Rating aggregation

/// Average rating and number of ratings it was computed from
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}

impl RatingSummary {
    /// Unrounded mean; zero when there are no ratings
    pub fn from_ratings(ratings: &[i32]) -> Self {
        if ratings.is_empty() {
            return Self::default();
        }
        let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
        let count = ratings.len() as i64;
        Self {
            average: sum as f64 / count as f64,
            count,
        }
    }

    pub fn rounded(self, decimals: u32) -> Self {
        Self {
            average: round_to(self.average, decimals),
            count: self.count,
        }
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ratings() {
        let summary = RatingSummary::from_ratings(&[]);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.count, 0);
    }

    #[test]
    fn test_average_rounding() {
        let summary = RatingSummary::from_ratings(&[5, 4, 4]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.rounded(1).average, 4.3);
        assert_eq!(summary.rounded(2).average, 4.33);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_to(4.25, 1), 4.3);
        assert_eq!(round_to(3.0, 1), 3.0);
    }
}
