use async_trait::async_trait;
use serde_json::json;
use tracing::error;

use super::{extract, ActionExample, ActionHandler, HandlerOutcome, SWAP_INTENT};
use crate::actions::BasicDexOperationsAction;
use crate::runtime::Memory;

const NAME: &str = "BASIC_DEX_SWAP";

pub struct BasicDexSwapHandler {
    action: BasicDexOperationsAction,
    chain: String,
}

impl BasicDexSwapHandler {
    pub fn new(action: BasicDexOperationsAction, chain: &str) -> Self {
        Self {
            action,
            chain: chain.to_string(),
        }
    }
}

#[async_trait]
impl ActionHandler for BasicDexSwapHandler {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Swap tokens using BasicDEXOperations contract"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["BASIC_DEX_SWAP", "DEX_SWAP", "SWAP_TOKENS"]
    }

    fn examples(&self) -> Vec<ActionExample> {
        vec![ActionExample {
            user: "user",
            text: "Swap 1 AVAX to USDC",
        }]
    }

    fn matches(&self, text: &str) -> bool {
        SWAP_INTENT.is_match(text)
    }

    async fn handle(&self, message: &Memory) -> HandlerOutcome {
        let params = match extract::swap_params(&message.text) {
            Ok(params) => params,
            Err(e) => return HandlerOutcome::failure(NAME, "swap", e),
        };

        match self.action.swap_tokens(&params).await {
            Ok(tx) => HandlerOutcome::success(
                NAME,
                format!(
                    "Successfully swapped {} from {} to {}\nTransaction Hash: {}",
                    params.amount_in, params.token_in, params.token_out, tx.hash
                ),
                json!({
                    "success": true,
                    "hash": tx.hash,
                    "amount": params.amount_in,
                    "recipient": params.token_out,
                    "chain": self.chain,
                }),
            ),
            Err(e) => {
                error!("Swap failed: {}", e);
                HandlerOutcome::failure(NAME, "swap", e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::DryRunWalletProvider;
    use crate::config::Config;
    use crate::handlers::test_support::*;
    use ethers::types::Address;
    use std::sync::Arc;

    #[tokio::test]
    async fn swap_reply_names_both_tokens() {
        let provider = Arc::new(DryRunWalletProvider::new("avalancheFuji", Address::zero()));
        let action = BasicDexOperationsAction::from_config(provider.clone(), &Config::default()).unwrap();
        let handler = BasicDexSwapHandler::new(action, "avalanchefuji");

        let outcome = handler.handle(&message("Swap 1 AVAX to USDC")).await;

        assert!(outcome.success, "{}", outcome.content.text);
        assert!(outcome.content.text.starts_with("Successfully swapped 1 from 0x00 to 0x5425"));
        assert_eq!(
            outcome.content.content["recipient"],
            "0x5425890298aed601595a70AB815c96711a31Bc65"
        );
        assert_eq!(provider.calls()[0].method, "swapTokens");
    }
}
