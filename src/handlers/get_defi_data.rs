use async_trait::async_trait;
use serde_json::json;
use tracing::error;

use super::{extract, ActionExample, ActionHandler, HandlerOutcome, DEFI_DATA_INTENT};
use crate::actions::GetDefiDataAction;
use crate::runtime::Memory;

const NAME: &str = "DEFI_DATA";

pub struct GetDefiDataHandler {
    action: GetDefiDataAction,
    chain: String,
}

impl GetDefiDataHandler {
    pub fn new(action: GetDefiDataAction, chain: &str) -> Self {
        Self {
            action,
            chain: chain.to_string(),
        }
    }
}

#[async_trait]
impl ActionHandler for GetDefiDataHandler {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Call GetDeFiData contract to fetch protocol TVL, volume or fee data"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["DEFI_DATA", "GET_TVL", "PROTOCOL_DATA"]
    }

    fn examples(&self) -> Vec<ActionExample> {
        vec![
            ActionExample {
                user: "user",
                text: "What is the AAVE TVL?",
            },
            ActionExample {
                user: "user",
                text: "Show Uniswap volume",
            },
        ]
    }

    fn matches(&self, text: &str) -> bool {
        DEFI_DATA_INTENT.is_match(text)
    }

    async fn handle(&self, message: &Memory) -> HandlerOutcome {
        let params = match extract::defi_data_params(&message.text) {
            Ok(params) => params,
            Err(e) => return HandlerOutcome::failure(NAME, "DeFi data request", e),
        };
        let (data_type, object) = (params.args[0].clone(), params.args[1].clone());

        match self.action.send_request(&params).await {
            Ok(tx) => HandlerOutcome::success(
                NAME,
                format!(
                    "Successfully requested {} data for {}.\nTransaction Hash: {}",
                    data_type, object, tx.hash
                ),
                json!({
                    "success": true,
                    "hash": tx.hash,
                    "dataType": data_type,
                    "object": object,
                    "chain": self.chain,
                }),
            ),
            Err(e) => {
                error!("DeFi data request failed: {}", e);
                HandlerOutcome::failure(NAME, "DeFi data request", e)
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

    fn handler(config: &Config) -> GetDefiDataHandler {
        let provider = Arc::new(DryRunWalletProvider::new("avalancheFuji", Address::zero()));
        GetDefiDataHandler::new(
            GetDefiDataAction::from_config(provider, config).unwrap(),
            "avalanchefuji",
        )
    }

    #[tokio::test]
    async fn tvl_request() {
        let outcome = handler(&Config::default())
            .handle(&message("What is the AAVE TVL?"))
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.content.content["dataType"], "tvl");
        assert_eq!(outcome.content.content["object"], "aave");
    }

    #[tokio::test]
    async fn undeployed_contract_is_reported() {
        let mut config = Config::default();
        config.contracts.get_defi_data = String::new();

        let outcome = handler(&config).handle(&message("uniswap volume")).await;

        assert!(!outcome.success);
        assert_eq!(
            outcome.content.text,
            "Error during DeFi data request: Contract address is not set for GetDeFiData"
        );
    }
}
