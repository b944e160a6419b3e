use async_trait::async_trait;
use serde_json::json;
use tracing::error;

use super::{extract, ActionExample, ActionHandler, HandlerOutcome, PRICE_INTENT};
use crate::actions::GetPriceAction;
use crate::runtime::Memory;

const NAME: &str = "GET_PRICE";

pub struct GetPriceHandler {
    action: GetPriceAction,
    chain: String,
}

impl GetPriceHandler {
    pub fn new(action: GetPriceAction, chain: &str) -> Self {
        Self {
            action,
            chain: chain.to_string(),
        }
    }
}

#[async_trait]
impl ActionHandler for GetPriceHandler {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Call GetPrice contract to fetch price data"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["GET_PRICE", "FETCH_PRICE", "PRICE_QUERY"]
    }

    fn examples(&self) -> Vec<ActionExample> {
        vec![
            ActionExample {
                user: "user",
                text: "Get price for ETH",
            },
            ActionExample {
                user: "user",
                text: "What is the BTC price?",
            },
        ]
    }

    fn matches(&self, text: &str) -> bool {
        PRICE_INTENT.is_match(text)
    }

    async fn handle(&self, message: &Memory) -> HandlerOutcome {
        let params = match extract::price_params(&message.text) {
            Ok(params) => params,
            Err(e) => return HandlerOutcome::failure(NAME, "price request", e),
        };
        let symbol = params.args[0].clone();

        match self.action.send_request(&params).await {
            Ok(tx) => HandlerOutcome::success(
                NAME,
                format!(
                    "Successfully requested price for {}.\nTransaction Hash: {}",
                    symbol, tx.hash
                ),
                json!({
                    "success": true,
                    "hash": tx.hash,
                    "symbol": symbol,
                    "chain": self.chain,
                }),
            ),
            Err(e) => {
                error!("Price request for {} failed: {}", symbol, e);
                HandlerOutcome::failure(NAME, "price request", e)
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
    async fn price_reply() {
        let provider = Arc::new(DryRunWalletProvider::new("avalancheFuji", Address::zero()));
        let action = GetPriceAction::from_config(provider, &Config::default()).unwrap();
        let outcome = GetPriceHandler::new(action, "avalanchefuji")
            .handle(&message("Get price for ETH"))
            .await;

        assert_eq!(
            outcome.content.text,
            "Successfully requested price for ETH.\nTransaction Hash: 0xDUMMY_HASH"
        );
        assert_eq!(outcome.content.content["symbol"], "ETH");
    }
}
