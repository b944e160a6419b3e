// src/blockchain/models.rs
use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// --- Error types for action execution ---

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Contract address is not set for {0}")]
    ContractAddressNotSet(&'static str),
    /// Anything that went wrong after the contract was resolved: signer,
    /// argument encoding, RPC or the send itself.
    #[error("Function call failed: {0}")]
    CallFailed(String),
}

impl ActionError {
    pub fn call_failed(err: impl std::fmt::Display) -> Self {
        ActionError::CallFailed(err.to_string())
    }
}

// --- Transaction Models ---

/// Normalized result of a submitted contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: String,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

// --- Action Parameter Models ---

/// Sentinel token address for the chain's native currency.
pub const NATIVE_TOKEN: &str = "0x00";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTransferParams {
    /// Token contract address, or `0x00` for AVAX.
    pub token: String,
    pub to: String,
    /// Amount in whole units, e.g. `"1.5"`.
    pub amount: String,
}

impl SimpleTransferParams {
    pub fn is_native(&self) -> bool {
        self.token == NATIVE_TOKEN
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicDexSwapParams {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: String,
    pub amount_out_min: String,
    pub bin_step: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPriceParams {
    /// `[symbol]`
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetDefiDataParams {
    /// `[dataType, object]`
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSearchParams {
    /// `[tokenName]`
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_failed_keeps_underlying_message() {
        let err = ActionError::call_failed("insufficient funds for gas");
        assert_eq!(err.to_string(), "Function call failed: insufficient funds for gas");
    }

    #[test]
    fn transaction_serializes_empty_data_as_0x() {
        let tx = Transaction {
            hash: "0xabc".into(),
            from: Address::zero(),
            to: Address::zero(),
            value: U256::zero(),
            data: Bytes::default(),
        };
        let v = serde_json::to_value(&tx).unwrap();
        assert_eq!(v["data"], "0x");
        assert_eq!(v["hash"], "0xabc");
    }

    #[test]
    fn swap_params_use_camel_case_on_the_wire() {
        let params: BasicDexSwapParams = serde_json::from_value(serde_json::json!({
            "tokenIn": "0x00",
            "tokenOut": "0x00",
            "amountIn": "1.0",
            "amountOutMin": "0.9",
            "binStep": "25"
        }))
        .unwrap();
        assert_eq!(params.amount_out_min, "0.9");
    }
}
