//! Simulated counterparty timing and display currency.

use serde::{Deserialize, Serialize};

const fn default_initial_delay_ms() -> u64 {
    500
}

const fn default_thinking_delay_ms() -> u64 {
    2_000
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NegotiationConfig {
    /// Delay before the simulated counterparty starts "typing".
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// How long the simulated counterparty "thinks" before answering.
    #[serde(default = "default_thinking_delay_ms")]
    pub thinking_delay_ms: u64,

    /// Prefix for budget and rate labels.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            thinking_delay_ms: default_thinking_delay_ms(),
            currency_symbol: default_currency_symbol(),
        }
    }
}
