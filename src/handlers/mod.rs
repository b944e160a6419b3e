//! # Handlers
//!
//! A handler sits between a chat message and an action: it decides whether
//! the message is meant for it, checks that a signing key is configured,
//! extracts parameters from the text, runs the action and turns the result
//! into a reply. Handler failures are always reported as a reply, never as an
//! error.

use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::blockchain::WalletProvider;
use crate::config::Config;
use crate::runtime::{Memory, RuntimeSettings};

pub mod basic_dex;
pub mod extract;
pub mod get_defi_data;
pub mod get_price;
pub mod simple_transfer;
pub mod token_search;

pub use basic_dex::BasicDexSwapHandler;
pub use get_defi_data::GetDefiDataHandler;
pub use get_price::GetPriceHandler;
pub use simple_transfer::SimpleTransferHandler;
pub use token_search::TokenSearchHandler;

/// A reply produced by a handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub text: String,
    pub action: String,
    /// Structured event payload for clients that want more than text.
    pub content: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerOutcome {
    pub success: bool,
    pub content: Content,
}

impl HandlerOutcome {
    pub fn success(action: &str, text: String, payload: Value) -> Self {
        Self {
            success: true,
            content: Content {
                text,
                action: action.to_string(),
                content: payload,
            },
        }
    }

    /// `"Error during <operation>: <message>"` with `{error: message}`.
    pub fn failure(action: &str, operation: &str, message: impl std::fmt::Display) -> Self {
        let message = message.to_string();
        Self {
            success: false,
            content: Content {
                text: format!("Error during {}: {}", operation, message),
                action: action.to_string(),
                content: json!({ "error": message }),
            },
        }
    }
}

/// One exchange showing how a user might trigger the action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionExample {
    pub user: &'static str,
    pub text: &'static str,
}

#[async_trait]
pub trait ActionHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn similes(&self) -> &'static [&'static str];

    fn examples(&self) -> Vec<ActionExample>;

    /// Whether the message text asks for this action.
    fn matches(&self, text: &str) -> bool;

    /// Only the credential is checked; parameters are checked in `handle`.
    fn validate(&self, settings: &RuntimeSettings) -> bool {
        has_evm_private_key(settings)
    }

    async fn handle(&self, message: &Memory) -> HandlerOutcome;
}

/// True when `EVM_PRIVATE_KEY` is set and starts with `0x`.
pub fn has_evm_private_key(settings: &RuntimeSettings) -> bool {
    settings
        .get_setting("EVM_PRIVATE_KEY")
        .map_or(false, |key| key.starts_with("0x"))
}

lazy_static! {
    static ref TRANSFER_INTENT: Regex = Regex::new(r"(?i)\b(send|transfer)\b").unwrap();
    static ref SWAP_INTENT: Regex = Regex::new(r"(?i)\bswap\b").unwrap();
    static ref SEARCH_INTENT: Regex = Regex::new(r"(?i)\bsearch\b").unwrap();
    static ref DEFI_DATA_INTENT: Regex = Regex::new(r"(?i)\b(tvl|volume|fees)\b").unwrap();
    static ref PRICE_INTENT: Regex = Regex::new(r"(?i)\bprice\b").unwrap();
}

/// Builds the fixed handler set in routing order: the first handler whose
/// intent matches a message gets it.
pub fn build_handlers(
    wallet_provider: Arc<dyn WalletProvider>,
    config: &Config,
) -> anyhow::Result<Vec<Arc<dyn ActionHandler>>> {
    let chain = config.chain_name.to_lowercase();
    Ok(vec![
        Arc::new(SimpleTransferHandler::new(
            crate::actions::SimpleTransferAction::from_config(wallet_provider.clone(), config)?,
            &chain,
        )),
        Arc::new(BasicDexSwapHandler::new(
            crate::actions::BasicDexOperationsAction::from_config(wallet_provider.clone(), config)?,
            &chain,
        )),
        Arc::new(TokenSearchHandler::new(
            crate::actions::TokenSearchAction::from_config(wallet_provider.clone(), config)?,
            &chain,
        )),
        Arc::new(GetDefiDataHandler::new(
            crate::actions::GetDefiDataAction::from_config(wallet_provider.clone(), config)?,
            &chain,
        )),
        Arc::new(GetPriceHandler::new(
            crate::actions::GetPriceAction::from_config(wallet_provider, config)?,
            &chain,
        )),
    ])
}

#[cfg(test)]
pub(crate) mod test_support {
    use secrecy::SecretString;

    use crate::runtime::{Memory, RuntimeSettings};

    pub const RECIPIENT: &str = "0x1234567890123456789012345678901234567890";

    pub fn message(text: &str) -> Memory {
        Memory::new("tester", uuid::Uuid::nil(), "test-room", text)
    }

    pub fn settings(key: Option<&str>) -> RuntimeSettings {
        RuntimeSettings::new(key.map(|k| SecretString::new(k.to_string())))
    }
}
