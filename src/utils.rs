//! Argument conversion helpers shared by the actions.

use anyhow::{anyhow, Result};
use ethers::abi::Token;
use ethers::types::{Address, U256};
use ethers::utils::parse_ether;
use std::str::FromStr;

use crate::blockchain::models::NATIVE_TOKEN;

/// Scales a decimal amount such as `"1.5"` to 18-decimal base units.
pub fn parse_amount(amount: &str) -> Result<U256> {
    parse_ether(amount.trim()).map_err(|e| anyhow!("Invalid amount '{}': {}", amount, e))
}

/// Parses an EVM address. The native-currency sentinel `0x00` maps to the
/// zero address.
pub fn parse_address(address: &str) -> Result<Address> {
    let address = address.trim();
    if address == NATIVE_TOKEN {
        return Ok(Address::zero());
    }
    Address::from_str(address).map_err(|_| anyhow!("Invalid address: {}", address))
}

/// Parses a plain integer argument such as a bin step.
pub fn parse_integer(value: &str) -> Result<U256> {
    U256::from_dec_str(value.trim()).map_err(|e| anyhow!("Invalid integer '{}': {}", value, e))
}

/// Encodes a list of strings as a `string[]` argument.
pub fn string_array(args: &[String]) -> Token {
    Token::Array(args.iter().cloned().map(Token::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_scale_to_wei() {
        assert_eq!(parse_amount("1.0").unwrap(), U256::exp10(18));
        assert_eq!(parse_amount("0.5").unwrap(), U256::exp10(17) * 5);
        assert!(parse_amount("one").is_err());
    }

    #[test]
    fn native_sentinel_is_zero_address() {
        assert_eq!(parse_address("0x00").unwrap(), Address::zero());
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("0x5425890298aed601595a70AB815c96711a31Bc65").is_ok());
    }

    #[test]
    fn bin_step_is_not_scaled() {
        assert_eq!(parse_integer("25").unwrap(), U256::from(25u64));
        assert!(parse_integer("2.5").is_err());
    }
}
