use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use super::{extract, ActionExample, ActionHandler, HandlerOutcome, TRANSFER_INTENT};
use crate::actions::SimpleTransferAction;
use crate::runtime::Memory;

const NAME: &str = "SIMPLE_TRANSFER";

pub struct SimpleTransferHandler {
    action: SimpleTransferAction,
    chain: String,
}

impl SimpleTransferHandler {
    pub fn new(action: SimpleTransferAction, chain: &str) -> Self {
        Self {
            action,
            chain: chain.to_string(),
        }
    }
}

#[async_trait]
impl ActionHandler for SimpleTransferHandler {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Transfer AVAX or ERC20 token using SimpleTransfer contract"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["SIMPLE_TRANSFER", "TRANSFER", "SEND_TOKEN"]
    }

    fn examples(&self) -> Vec<ActionExample> {
        vec![
            ActionExample {
                user: "user",
                text: "Send 1 AVAX to 0x1234567890123456789012345678901234567890",
            },
            ActionExample {
                user: "user",
                text: "Send 10 USDT to 0x1234567890123456789012345678901234567890",
            },
        ]
    }

    fn matches(&self, text: &str) -> bool {
        TRANSFER_INTENT.is_match(text)
    }

    async fn handle(&self, message: &Memory) -> HandlerOutcome {
        let params = match extract::transfer_params(&message.text) {
            Ok(params) => params,
            Err(e) => return HandlerOutcome::failure(NAME, "transfer", e),
        };

        match self.action.transfer(&params).await {
            Ok(tx) => {
                info!("Transfer submitted: {}", tx.hash);
                HandlerOutcome::success(
                    NAME,
                    format!(
                        "Successfully transferred {} to {}\nTransaction Hash: {}",
                        params.amount, params.to, tx.hash
                    ),
                    json!({
                        "success": true,
                        "hash": tx.hash,
                        "amount": tx.value.to_string(),
                        "recipient": params.to,
                        "chain": self.chain,
                    }),
                )
            }
            Err(e) => {
                error!("Transfer failed: {}", e);
                HandlerOutcome::failure(NAME, "transfer", e)
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

    fn handler(provider: Arc<DryRunWalletProvider>) -> SimpleTransferHandler {
        let action = SimpleTransferAction::from_config(provider, &Config::default()).unwrap();
        SimpleTransferHandler::new(action, "avalanchefuji")
    }

    #[tokio::test]
    async fn reports_hash_and_amount() {
        let provider = Arc::new(DryRunWalletProvider::new("avalancheFuji", Address::zero()));
        let handler = handler(provider.clone());

        let outcome = handler
            .handle(&message(&format!("Send 1 AVAX to {RECIPIENT}")))
            .await;

        assert!(outcome.success);
        assert_eq!(
            outcome.content.text,
            format!("Successfully transferred 1 to {RECIPIENT}\nTransaction Hash: 0xDUMMY_HASH")
        );
        assert_eq!(outcome.content.content["amount"], "1000000000000000000");
        assert_eq!(outcome.content.content["chain"], "avalanchefuji");
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn unparseable_message_never_calls_contract() {
        let provider = Arc::new(DryRunWalletProvider::new("avalancheFuji", Address::zero()));
        let handler = handler(provider.clone());

        let outcome = handler.handle(&message("send some money to alice")).await;

        assert!(!outcome.success);
        assert!(outcome.content.text.starts_with("Error during transfer:"));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn send_failure_becomes_reply() {
        let provider = Arc::new(
            DryRunWalletProvider::new("avalancheFuji", Address::zero()).failing("execution reverted"),
        );
        let outcome = handler(provider)
            .handle(&message(&format!("transfer 3 LINK to {RECIPIENT}")))
            .await;

        assert!(!outcome.success);
        assert_eq!(
            outcome.content.content["error"],
            "Function call failed: execution reverted"
        );
    }

    #[test]
    fn intent_words() {
        let provider = Arc::new(DryRunWalletProvider::new("avalancheFuji", Address::zero()));
        let handler = handler(provider);
        assert!(handler.matches("Send 1 AVAX"));
        assert!(handler.matches("please TRANSFER"));
        assert!(!handler.matches("sender info"));
    }
}
