use async_trait::async_trait;
use serde_json::json;
use tracing::error;

use super::{extract, ActionExample, ActionHandler, HandlerOutcome, SEARCH_INTENT};
use crate::actions::TokenSearchAction;
use crate::runtime::Memory;

const NAME: &str = "TOKEN_SEARCH";

pub struct TokenSearchHandler {
    action: TokenSearchAction,
    chain: String,
}

impl TokenSearchHandler {
    pub fn new(action: TokenSearchAction, chain: &str) -> Self {
        Self {
            action,
            chain: chain.to_string(),
        }
    }
}

#[async_trait]
impl ActionHandler for TokenSearchHandler {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Call TokenSearch contract to look up token information and addresses"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["TOKEN_SEARCH", "SEARCH_TOKEN", "FIND_TOKEN"]
    }

    fn examples(&self) -> Vec<ActionExample> {
        vec![ActionExample {
            user: "user",
            text: "Search USDC address on Avalanche",
        }]
    }

    fn matches(&self, text: &str) -> bool {
        SEARCH_INTENT.is_match(text)
    }

    async fn handle(&self, message: &Memory) -> HandlerOutcome {
        let params = match extract::token_search_params(&message.text) {
            Ok(params) => params,
            Err(e) => return HandlerOutcome::failure(NAME, "token search", e),
        };
        let token = params.args[0].clone();

        match self.action.send_token_search_request(&params).await {
            Ok(tx) => HandlerOutcome::success(
                NAME,
                format!(
                    "Successfully requested token search for {}.\nTransaction Hash: {}",
                    token, tx.hash
                ),
                json!({
                    "success": true,
                    "hash": tx.hash,
                    "token": token,
                    "chain": self.chain,
                }),
            ),
            Err(e) => {
                error!("Token search failed: {}", e);
                HandlerOutcome::failure(NAME, "token search", e)
            }
        }
    }
}
