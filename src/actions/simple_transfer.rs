use std::sync::Arc;

use ethers::abi::Token;
use tracing::info;

use super::ContractCaller;
use crate::blockchain::{
    models::{ActionError, SimpleTransferParams, Transaction},
    ContractBinding, ContractKind, WalletProvider,
};
use crate::config::Config;
use crate::utils::{parse_address, parse_amount};

/// Sends AVAX or an ERC-20 token through the SimpleTransfer contract.
#[derive(Clone)]
pub struct SimpleTransferAction {
    caller: ContractCaller,
}

impl SimpleTransferAction {
    pub fn new(
        wallet_provider: Arc<dyn WalletProvider>,
        chain_name: &str,
        contract: ContractBinding,
    ) -> Self {
        Self {
            caller: ContractCaller::new(wallet_provider, chain_name, contract),
        }
    }

    pub fn from_config(
        wallet_provider: Arc<dyn WalletProvider>,
        config: &Config,
    ) -> anyhow::Result<Self> {
        let contract = ContractBinding::from_config(ContractKind::SimpleTransfer, &config.contracts)?;
        Ok(Self::new(wallet_provider, &config.chain_name, contract))
    }

    pub fn contract(&self) -> &ContractBinding {
        self.caller.contract()
    }

    /// Token `0x00` goes through the payable `transferAvax` with the amount
    /// attached; anything else through `transferToken`.
    pub async fn transfer(&self, params: &SimpleTransferParams) -> Result<Transaction, ActionError> {
        self.caller.require_address()?;

        let amount = parse_amount(&params.amount).map_err(ActionError::call_failed)?;
        let to = parse_address(&params.to).map_err(ActionError::call_failed)?;

        info!("Transferring {} of {} to {}", params.amount, params.token, params.to);

        if params.is_native() {
            self.caller
                .invoke(
                    "transferAvax",
                    vec![Token::Address(to), Token::Uint(amount)],
                    Some(amount),
                    amount,
                )
                .await
        } else {
            let token = parse_address(&params.token).map_err(ActionError::call_failed)?;
            self.caller
                .invoke(
                    "transferToken",
                    vec![Token::Address(token), Token::Address(to), Token::Uint(amount)],
                    None,
                    amount,
                )
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::*;
    use crate::config::DEFAULT_SIMPLE_TRANSFER_ADDRESS;
    use ethers::types::{Address, U256};

    const RECIPIENT: &str = "0xABCabcabcabcabcabcabcabcabcabcabcabcabca";

    fn params(token: &str, amount: &str) -> SimpleTransferParams {
        SimpleTransferParams {
            token: token.into(),
            to: RECIPIENT.into(),
            amount: amount.into(),
        }
    }

    #[tokio::test]
    async fn native_transfer_attaches_value() {
        let provider = dry_run();
        let action = SimpleTransferAction::from_config(provider.clone(), &config()).unwrap();

        let tx = action.transfer(&params("0x00", "1.0")).await.unwrap();

        assert_eq!(tx.hash, "0xDUMMY_HASH");
        assert_eq!(tx.from, signer());
        assert_eq!(tx.to, DEFAULT_SIMPLE_TRANSFER_ADDRESS.parse::<Address>().unwrap());
        assert_eq!(tx.value, U256::exp10(18));
        assert!(tx.data.is_empty());

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "transferAvax");
        assert_eq!(calls[0].value, Some(U256::exp10(18)));
    }

    #[tokio::test]
    async fn token_transfer_has_no_call_value() {
        let provider = dry_run();
        let action = SimpleTransferAction::from_config(provider.clone(), &config()).unwrap();
        let usdc = "0x5425890298aed601595a70AB815c96711a31Bc65";

        let tx = action.transfer(&params(usdc, "2.5")).await.unwrap();

        assert_eq!(tx.value, U256::exp10(17) * 25);
        let calls = provider.calls();
        assert_eq!(calls[0].method, "transferToken");
        assert_eq!(calls[0].value, None);
        assert_eq!(calls[0].args[0], Token::Address(usdc.parse().unwrap()));
    }

    #[tokio::test]
    async fn unset_contract_fails_before_calling() {
        let provider = dry_run();
        let action =
            SimpleTransferAction::from_config(provider.clone(), &unset_contracts()).unwrap();

        let err = action.transfer(&params("0x00", "1")).await.unwrap_err();

        assert!(matches!(err, ActionError::ContractAddressNotSet("SimpleTransfer")));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_wrapped() {
        let action =
            SimpleTransferAction::from_config(failing("insufficient funds"), &config()).unwrap();

        let err = action.transfer(&params("0x00", "1")).await.unwrap_err();

        assert_eq!(err.to_string(), "Function call failed: insufficient funds");
    }

    #[tokio::test]
    async fn bad_amount_is_a_call_failure() {
        let action = SimpleTransferAction::from_config(dry_run(), &config()).unwrap();
        let err = action.transfer(&params("0x00", "lots")).await.unwrap_err();
        assert!(matches!(err, ActionError::CallFailed(_)));
    }
}
