//! The agent runtime: an explicitly constructed context that owns the
//! handler set and routes chat messages to it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::blockchain::WalletProvider;
use crate::config::Config;
use crate::handlers::{build_handlers, ActionHandler, Content};

/// Reply used when no action produced any text.
pub const FALLBACK_RESPONSE: &str =
    "I understand your request, but I need more information to help you properly.";

/// Settings handlers may consult, e.g. to check credentials.
#[derive(Clone, Default)]
pub struct RuntimeSettings {
    evm_private_key: Option<SecretString>,
}

impl RuntimeSettings {
    pub fn new(evm_private_key: Option<SecretString>) -> Self {
        Self { evm_private_key }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.evm_private_key.clone())
    }

    pub fn get_setting(&self, key: &str) -> Option<&str> {
        match key {
            "EVM_PRIVATE_KEY" => self
                .evm_private_key
                .as_ref()
                .map(|k| k.expose_secret().as_str()),
            _ => None,
        }
    }
}

/// An incoming chat message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: Uuid,
    pub user_id: String,
    pub agent_id: Uuid,
    pub room_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Memory {
    pub fn new(user_id: &str, agent_id: Uuid, room_id: &str, text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            agent_id,
            room_id: room_id.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        }
    }
}

pub struct AgentRuntime {
    agent_id: Uuid,
    settings: RuntimeSettings,
    handlers: Vec<Arc<dyn ActionHandler>>,
    ready: AtomicBool,
}

impl AgentRuntime {
    pub fn new(settings: RuntimeSettings, handlers: Vec<Arc<dyn ActionHandler>>) -> Self {
        Self {
            agent_id: Uuid::new_v4(),
            settings,
            handlers,
            ready: AtomicBool::new(false),
        }
    }

    /// Builds the standard handler set for `config` on top of `wallet_provider`.
    pub fn from_config(
        config: &Config,
        wallet_provider: Arc<dyn WalletProvider>,
    ) -> anyhow::Result<Self> {
        let handlers = build_handlers(wallet_provider, config)?;
        Ok(Self::new(RuntimeSettings::from_config(config), handlers))
    }

    pub fn agent_id(&self) -> Uuid {
        self.agent_id
    }

    pub fn handlers(&self) -> &[Arc<dyn ActionHandler>] {
        &self.handlers
    }

    /// Marks the runtime ready to accept messages.
    pub fn initialize(&self) {
        info!("Initializing agent runtime {}", self.agent_id);
        for handler in &self.handlers {
            if !handler.validate(&self.settings) {
                warn!(
                    "Action {} is registered but will not run: EVM_PRIVATE_KEY is missing or malformed",
                    handler.name()
                );
            }
        }
        self.ready.store(true, Ordering::SeqCst);
        info!("Agent runtime initialized with {} actions", self.handlers.len());
    }

    pub fn shutdown(&self) {
        if self.ready.swap(false, Ordering::SeqCst) {
            info!("Agent runtime {} shut down", self.agent_id);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn message(&self, user_id: &str, room_id: &str, text: &str) -> Memory {
        Memory::new(user_id, self.agent_id, room_id, text)
    }

    /// Runs the first handler whose intent matches and whose credential check
    /// passes. Returns the replies produced, empty when nothing applied.
    pub async fn process_actions(&self, message: &Memory) -> Vec<Content> {
        let handler = self
            .handlers
            .iter()
            .filter(|h| h.matches(&message.text))
            .find(|h| {
                let valid = h.validate(&self.settings);
                if !valid {
                    debug!("Skipping {}: validation failed", h.name());
                }
                valid
            });

        match handler {
            Some(handler) => {
                info!("Dispatching message {} to {}", message.id, handler.name());
                vec![handler.handle(message).await.content]
            }
            None => {
                debug!("No action matched message {}", message.id);
                Vec::new()
            }
        }
    }

    /// Returns the reply text for `text`, or [`FALLBACK_RESPONSE`].
    pub async fn respond(&self, user_id: &str, room_id: &str, text: &str) -> String {
        let message = self.message(user_id, room_id, text);
        self.process_actions(&message)
            .await
            .into_iter()
            .find(|c| !c.text.is_empty())
            .map(|c| c.text)
            .unwrap_or_else(|| FALLBACK_RESPONSE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::DryRunWalletProvider;
    use ethers::types::Address;

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn runtime(key: Option<&str>) -> (AgentRuntime, Arc<DryRunWalletProvider>) {
        let config = Config {
            evm_private_key: key.map(|k| SecretString::new(k.to_string())),
            ..Config::default()
        };
        let provider = Arc::new(DryRunWalletProvider::new("avalancheFuji", Address::zero()));
        let runtime = AgentRuntime::from_config(&config, provider.clone()).unwrap();
        (runtime, provider)
    }

    #[test]
    fn lifecycle() {
        let (runtime, _) = runtime(Some(KEY));
        assert!(!runtime.is_ready());
        runtime.initialize();
        assert!(runtime.is_ready());
        runtime.shutdown();
        assert!(!runtime.is_ready());
    }

    #[tokio::test]
    async fn routes_to_matching_handler() {
        let (runtime, provider) = runtime(Some(KEY));

        let replies = runtime
            .process_actions(&runtime.message("u", "r", "Search USDC address on Avalanche"))
            .await;

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].action, "TOKEN_SEARCH");
        assert_eq!(provider.calls()[0].method, "sendTokenSearchRequest");
    }

    #[tokio::test]
    async fn missing_credential_skips_actions() {
        let (runtime, provider) = runtime(Some("not-hex"));

        let reply = runtime.respond("u", "r", "Get price for ETH").await;

        assert_eq!(reply, FALLBACK_RESPONSE);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn unmatched_message_falls_back() {
        let (runtime, _) = runtime(Some(KEY));
        assert_eq!(runtime.respond("u", "r", "hello there").await, FALLBACK_RESPONSE);
    }

    #[test]
    fn settings_expose_only_known_keys() {
        let settings = RuntimeSettings::new(Some(SecretString::new(KEY.into())));
        assert_eq!(settings.get_setting("EVM_PRIVATE_KEY"), Some(KEY));
        assert_eq!(settings.get_setting("OTHER"), None);
    }
}
