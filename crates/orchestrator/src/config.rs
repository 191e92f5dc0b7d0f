//! Configuration for the dispatch engine.

use std::env;
use std::str::FromStr;

use brain_core::DEFAULT_CONTEXT_WINDOW;

use crate::billing::{Pricing, TemperatureRange};
use crate::error::OrchestratorError;

/// Default opening credit for new users.
pub const DEFAULT_BALANCE: f64 = 5.0;

/// Default word budget for condensed replies.
pub const DEFAULT_SUMMARY_WORDS: usize = 200;

/// Configuration for [`crate::DispatchEngine`].
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Credit given to a user on first contact.
    pub default_balance: f64,
    /// Currency symbol shown in balance replies.
    pub currency_symbol: String,
    /// Prompt and image prices.
    pub pricing: Pricing,
    /// Trailing history entries sent with each prompt.
    pub context_window: usize,
    /// Temperatures a completion may be sampled at.
    pub temperature: TemperatureRange,
    /// Word budget for condensed replies.
    pub summary_words: usize,
    /// System prompt sent before the history; never stored.
    pub system_prompt: Option<String>,
    /// Name the assistant introduces itself with.
    pub assistant_name: String,
    /// Credit line appended to onboarding and about replies.
    pub attribution: String,
    /// Where users go to top up.
    pub payment_link: String,
    /// Image attached to the onboarding reply.
    pub logo_url: Option<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_balance: DEFAULT_BALANCE,
            currency_symbol: "R".to_string(),
            pricing: Pricing::default(),
            context_window: DEFAULT_CONTEXT_WINDOW,
            temperature: TemperatureRange::default(),
            summary_words: DEFAULT_SUMMARY_WORDS,
            system_prompt: None,
            assistant_name: "Relay".to_string(),
            attribution: "Answers are generated by an OpenAI language model and may contain mistakes."
                .to_string(),
            payment_link: "https://pay.example.com/relay".to_string(),
            logo_url: None,
        }
    }
}

/// Read and parse an optional variable, ignoring unparsable values.
fn parsed<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Read an optional, non-blank variable.
fn text(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl DispatchConfig {
    /// Create configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `RELAY_DEFAULT_BALANCE` - Opening credit (default: 5.0)
    /// - `RELAY_CURRENCY_SYMBOL` - Currency symbol (default: R)
    /// - `RELAY_CHARS_PER_TOKEN` - Characters per billed token (default: 0.75)
    /// - `RELAY_PRICE_PER_TOKEN` - Price per token (default: 0.002)
    /// - `RELAY_IMAGE_COST` - Price per image (default: 0.25)
    /// - `RELAY_CONTEXT_WINDOW` - History entries per prompt (default: 10)
    /// - `RELAY_TEMPERATURE_MIN` / `_MAX` / `_STEP` - Sampling range (default: 0.0, 1.0, 0.1)
    /// - `RELAY_SUMMARY_WORDS` - Condensed reply budget (default: 200)
    /// - `RELAY_SYSTEM_PROMPT` - System prompt (default: none)
    /// - `RELAY_ASSISTANT_NAME`, `RELAY_ATTRIBUTION`, `RELAY_PAYMENT_LINK`, `RELAY_LOGO_URL`
    pub fn from_env() -> Result<Self, OrchestratorError> {
        let defaults = Self::default();

        let pricing = Pricing {
            chars_per_token: parsed("RELAY_CHARS_PER_TOKEN")
                .unwrap_or(defaults.pricing.chars_per_token),
            price_per_token: parsed("RELAY_PRICE_PER_TOKEN")
                .unwrap_or(defaults.pricing.price_per_token),
            image_cost: parsed("RELAY_IMAGE_COST").unwrap_or(defaults.pricing.image_cost),
        };
        pricing.validate()?;

        let temperature = TemperatureRange::new(
            parsed("RELAY_TEMPERATURE_MIN").unwrap_or(0.0),
            parsed("RELAY_TEMPERATURE_MAX").unwrap_or(1.0),
            parsed("RELAY_TEMPERATURE_STEP").unwrap_or(0.1),
        )?;

        Ok(Self {
            default_balance: parsed::<f64>("RELAY_DEFAULT_BALANCE")
                .unwrap_or(defaults.default_balance)
                .max(0.0),
            currency_symbol: text("RELAY_CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
            pricing,
            context_window: parsed("RELAY_CONTEXT_WINDOW").unwrap_or(defaults.context_window),
            temperature,
            summary_words: parsed("RELAY_SUMMARY_WORDS").unwrap_or(defaults.summary_words),
            system_prompt: text("RELAY_SYSTEM_PROMPT"),
            assistant_name: text("RELAY_ASSISTANT_NAME").unwrap_or(defaults.assistant_name),
            attribution: text("RELAY_ATTRIBUTION").unwrap_or(defaults.attribution),
            payment_link: text("RELAY_PAYMENT_LINK").unwrap_or(defaults.payment_link),
            logo_url: text("RELAY_LOGO_URL"),
        })
    }

    /// Create a new config builder.
    pub fn builder() -> DispatchConfigBuilder {
        DispatchConfigBuilder::default()
    }
}

/// Builder for DispatchConfig.
#[derive(Debug, Default)]
pub struct DispatchConfigBuilder {
    config: DispatchConfig,
}

impl DispatchConfigBuilder {
    /// Set the opening credit.
    pub fn default_balance(mut self, balance: f64) -> Self {
        self.config.default_balance = balance.max(0.0);
        self
    }

    /// Set the currency symbol.
    pub fn currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.config.currency_symbol = symbol.into();
        self
    }

    /// Set prompt and image prices.
    pub fn pricing(mut self, pricing: Pricing) -> Self {
        self.config.pricing = pricing;
        self
    }

    /// Set the flat image price.
    pub fn image_cost(mut self, cost: f64) -> Self {
        self.config.pricing.image_cost = cost;
        self
    }

    /// Set the context window size.
    pub fn context_window(mut self, size: usize) -> Self {
        self.config.context_window = size;
        self
    }

    /// Set the temperature range.
    pub fn temperature(mut self, range: TemperatureRange) -> Self {
        self.config.temperature = range;
        self
    }

    /// Set the condensed reply budget.
    pub fn summary_words(mut self, words: usize) -> Self {
        self.config.summary_words = words;
        self
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set the assistant name.
    pub fn assistant_name(mut self, name: impl Into<String>) -> Self {
        self.config.assistant_name = name.into();
        self
    }

    /// Set the attribution line.
    pub fn attribution(mut self, attribution: impl Into<String>) -> Self {
        self.config.attribution = attribution.into();
        self
    }

    /// Set the payment link.
    pub fn payment_link(mut self, link: impl Into<String>) -> Self {
        self.config.payment_link = link.into();
        self
    }

    /// Set the onboarding logo.
    pub fn logo_url(mut self, url: impl Into<String>) -> Self {
        self.config.logo_url = Some(url.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> DispatchConfig {
        self.config
    }
}
