//! Balance arithmetic and sampling temperature selection.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::OrchestratorError;

/// Prices for served requests.
#[derive(Debug, Clone, PartialEq)]
pub struct Pricing {
    /// Characters counted as one token.
    pub chars_per_token: f64,
    /// Price of one token.
    pub price_per_token: f64,
    /// Flat price of one generated image.
    pub image_cost: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            chars_per_token: 0.75,
            price_per_token: 0.002,
            image_cost: 0.25,
        }
    }
}

impl Pricing {
    /// Check that every price is finite and non-negative and that a token
    /// spans a positive number of characters.
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        let fields = [
            ("chars_per_token", self.chars_per_token),
            ("price_per_token", self.price_per_token),
            ("image_cost", self.image_cost),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(OrchestratorError::Configuration(format!(
                    "{} must be a finite, non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.chars_per_token == 0.0 {
            return Err(OrchestratorError::Configuration(
                "chars_per_token must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Cost of serving a prompt, from its length in characters.
    pub fn required_cost(&self, text: &str) -> f64 {
        text.chars().count() as f64 / self.chars_per_token * self.price_per_token
    }
}

/// Whether a balance covers a cost and leaves something over.
///
/// Negative balances count as zero; a cost equal to the balance is refused.
pub fn can_afford(balance: f64, cost: f64) -> bool {
    balance.max(0.0) - cost > 0.0
}

/// Subtract a cost, clamping at zero.
pub fn deduct(balance: f64, cost: f64) -> f64 {
    (balance - cost).max(0.0)
}

/// Format an amount with two decimals and a currency symbol, e.g. `R5.00`.
pub fn format_balance(symbol: &str, amount: f64) -> String {
    format!("{}{:.2}", symbol, amount.max(0.0))
}

/// Largest number of values a [`TemperatureRange`] may hold.
pub const MAX_TEMPERATURE_VALUES: usize = 1000;

/// Discrete range of sampling temperatures, `{min, min + step, ..., max}`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureRange {
    values: Vec<f32>,
}

impl Default for TemperatureRange {
    fn default() -> Self {
        // 0.0..=1.0 in tenths
        Self {
            values: (0..=10).map(|i| i as f32 / 10.0).collect(),
        }
    }
}

impl TemperatureRange {
    /// Build a range; `step` must be positive and `min <= max`.
    pub fn new(min: f32, max: f32, step: f32) -> Result<Self, OrchestratorError> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(OrchestratorError::Configuration(
                "temperature bounds must be finite".to_string(),
            ));
        }
        if step <= 0.0 {
            return Err(OrchestratorError::Configuration(
                "temperature step must be positive".to_string(),
            ));
        }
        if min > max || min < 0.0 {
            return Err(OrchestratorError::Configuration(format!(
                "invalid temperature range {}..={}",
                min, max
            )));
        }

        let span = ((max - min) / step + 1e-4).floor();
        if span >= MAX_TEMPERATURE_VALUES as f32 {
            return Err(OrchestratorError::Configuration(format!(
                "temperature step {} yields more than {} values",
                step, MAX_TEMPERATURE_VALUES
            )));
        }
        let count = span as usize;
        let values = (0..=count)
            .map(|i| ((min + i as f32 * step) * 1000.0).round() / 1000.0)
            .collect();

        Ok(Self { values })
    }

    /// A range holding a single value.
    pub fn fixed(value: f32) -> Self {
        Self {
            values: vec![value],
        }
    }

    /// Every value in the range, ascending.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Lowest value in the range.
    pub fn min(&self) -> f32 {
        self.values.first().copied().unwrap_or(0.0)
    }

    /// Pick a value uniformly with the given generator.
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.values.choose(rng).copied().unwrap_or(0.0)
    }

    /// Pick a value uniformly.
    pub fn sample(&self) -> f32 {
        self.sample_with(&mut rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_required_cost() {
        let pricing = Pricing::default();
        let prompt = "x".repeat(300);
        assert!((pricing.required_cost(&prompt) - 0.8).abs() < 1e-9);
        assert_eq!(pricing.required_cost(""), 0.0);
        // Characters, not bytes
        assert_eq!(pricing.required_cost("é"), pricing.required_cost("e"));
    }

    #[test]
    fn test_can_afford_boundaries() {
        assert!(can_afford(1.0, 0.8));
        assert!(!can_afford(0.5, 0.8));
        assert!(!can_afford(0.8, 0.8));
        assert!(!can_afford(0.0, 0.0));
        assert!(!can_afford(-2.0, 0.1));
    }

    #[test]
    fn test_deduct_clamps() {
        assert!((deduct(1.0, 0.8) - 0.2).abs() < 1e-9);
        assert_eq!(deduct(0.1, 0.25), 0.0);
    }

    #[test]
    fn test_format_balance() {
        assert_eq!(format_balance("R", 5.0), "R5.00");
        assert_eq!(format_balance("$", 0.199), "$0.20");
        assert_eq!(format_balance("R", -1.0), "R0.00");
    }

    #[test]
    fn test_default_range() {
        let range = TemperatureRange::default();
        assert_eq!(range.values().len(), 11);
        assert_eq!(range.min(), 0.0);
        assert_eq!(range.values()[10], 1.0);
    }

    #[test]
    fn test_custom_range() {
        let range = TemperatureRange::new(0.2, 0.8, 0.3).unwrap();
        assert_eq!(range.values(), &[0.2_f32, 0.5, 0.8][..]);

        let range = TemperatureRange::new(0.0, 1.0, 0.1).unwrap();
        assert_eq!(range.values().len(), 11);
        assert_eq!(range.values()[3], 0.3);
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(TemperatureRange::new(0.0, 1.0, 0.0).is_err());
        assert!(TemperatureRange::new(1.0, 0.5, 0.1).is_err());
        assert!(TemperatureRange::new(f32::NAN, 1.0, 0.1).is_err());
        assert!(TemperatureRange::new(0.0, 1.0, 1e-9).is_err());
    }

    #[test]
    fn test_range_size_limit() {
        let range = TemperatureRange::new(0.0, 999.0, 1.0).unwrap();
        assert_eq!(range.values().len(), MAX_TEMPERATURE_VALUES);
        assert!(TemperatureRange::new(0.0, 1000.0, 1.0).is_err());
    }

    #[test]
    fn test_pricing_validation() {
        assert!(Pricing::default().validate().is_ok());

        let free_images = Pricing {
            image_cost: 0.0,
            ..Pricing::default()
        };
        assert!(free_images.validate().is_ok());

        for bad in [
            Pricing {
                chars_per_token: f64::NAN,
                ..Pricing::default()
            },
            Pricing {
                chars_per_token: 0.0,
                ..Pricing::default()
            },
            Pricing {
                price_per_token: -0.002,
                ..Pricing::default()
            },
            Pricing {
                image_cost: -1.0,
                ..Pricing::default()
            },
            Pricing {
                image_cost: f64::INFINITY,
                ..Pricing::default()
            },
        ] {
            assert!(
                matches!(bad.validate(), Err(OrchestratorError::Configuration(_))),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_sample_stays_in_range() {
        let range = TemperatureRange::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let t = range.sample_with(&mut rng);
            assert!(range.values().contains(&t));
        }
        assert_eq!(TemperatureRange::fixed(0.4).sample(), 0.4);
    }
}
