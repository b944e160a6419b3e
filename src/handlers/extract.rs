//! Pulls action parameters out of free-form chat messages.

use lazy_static::lazy_static;
use regex::Regex;

use crate::blockchain::models::{
    BasicDexSwapParams, GetDefiDataParams, GetPriceParams, SimpleTransferParams,
    TokenSearchParams, NATIVE_TOKEN,
};

pub const DEFAULT_BIN_STEP: &str = "25";
pub const DEFAULT_AMOUNT_OUT_MIN: &str = "0";

/// Fuji token list. AVAX itself uses the native sentinel.
pub const KNOWN_TOKENS: &[(&str, &str)] = &[
    ("AVAX", NATIVE_TOKEN),
    ("WAVAX", "0xd00ae08403B9bbb9124bB305C09058E32C39A48c"),
    ("USDC", "0x5425890298aed601595a70AB815c96711a31Bc65"),
    ("USDT", "0x94BCfc1A8A4b4152Fa0598b8A5Ff48D9BF6E3f71"),
    ("LINK", "0x0b9d5D9136855f6FEc3c0993feE6E9CE8a297846"),
];

const KNOWN_TICKERS: &[&str] = &["BTC", "ETH", "AVAX", "USDC", "USDT", "LINK", "WAVAX", "SOL"];

const KNOWN_PROTOCOLS: &[&str] = &[
    "aave", "uniswap", "curve", "lido", "compound", "gmx", "benqi", "traderjoe", "pangolin",
    "makerdao",
];

const NOT_A_SYMBOL: &[&str] = &["the", "a", "current", "what", "is", "token", "its", "latest"];

// Amounts start at a word boundary so "1,000" is never read as "000", and
// addresses end at one so an over-long address is not cut down to 40 digits.
lazy_static! {
    static ref TRANSFER_RE: Regex = Regex::new(
        r"(?i)(?:^|\s)(\d+(?:\.\d+)?)\s*(0x[0-9a-f]{40}\b|[a-z][a-z0-9]*)\s+to\s+(0x[0-9a-f]{40}\b)"
    )
    .unwrap();
    static ref SWAP_RE: Regex = Regex::new(
        r"(?i)(?:^|\s)(\d+(?:\.\d+)?)\s*(0x[0-9a-f]{40}\b|[a-z][a-z0-9]*)\s+(?:to|for|into)\s+(0x[0-9a-f]{40}\b|[a-z][a-z0-9]*)"
    )
    .unwrap();
    static ref MIN_OUT_RE: Regex =
        Regex::new(r"(?i)\bmin(?:imum)?(?:\s+out)?\s+(\d+(?:\.\d+)?)").unwrap();
    static ref BIN_STEP_RE: Regex = Regex::new(r"(?i)\bbin\s*step\s+(\d+)").unwrap();
    static ref PRICE_OF_RE: Regex = Regex::new(r"(?i)\bprice\s+(?:of|for)\s+([a-z0-9]+)").unwrap();
    static ref PRICE_SUFFIX_RE: Regex = Regex::new(r"(?i)\b([a-z0-9]+)\s+price\b").unwrap();
    static ref WORD_RE: Regex = Regex::new(r"[A-Za-z0-9]+").unwrap();
    static ref DATA_TYPE_RE: Regex = Regex::new(r"(?i)\b(tvl|volume|fees)\b").unwrap();
    static ref PROTOCOL_OF_RE: Regex =
        Regex::new(r"(?i)\b(?:of|for|on)\s+([a-z][a-z0-9-]*)").unwrap();
    static ref SEARCH_RE: Regex = Regex::new(
        r"(?i)\bsearch\s+(?:for\s+)?(?:the\s+)?(?:token\s+)?([a-z0-9]+)"
    )
    .unwrap();
}

/// Maps a symbol (case-insensitive) or a literal address to a token address.
pub fn resolve_token(symbol_or_address: &str) -> Option<String> {
    if let Some(hex) = symbol_or_address.strip_prefix("0x") {
        return (hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
            .then(|| symbol_or_address.to_string());
    }
    let symbol = symbol_or_address.to_uppercase();
    KNOWN_TOKENS
        .iter()
        .find(|(known, _)| *known == symbol)
        .map(|(_, address)| address.to_string())
}

fn resolve_or_err(token: &str) -> Result<String, String> {
    resolve_token(token).ok_or_else(|| format!("Unknown token: {}", token))
}

/// `"Send 1 AVAX to 0x…"`
pub fn transfer_params(text: &str) -> Result<SimpleTransferParams, String> {
    let caps = TRANSFER_RE
        .captures(text)
        .ok_or("Could not find '<amount> <token> to <address>' in the message")?;
    Ok(SimpleTransferParams {
        token: resolve_or_err(&caps[2])?,
        to: caps[3].to_string(),
        amount: caps[1].to_string(),
    })
}

/// `"Swap 1 AVAX to USDC"`, optionally with `min 0.9` and `bin step 20`.
pub fn swap_params(text: &str) -> Result<BasicDexSwapParams, String> {
    let caps = SWAP_RE
        .captures(text)
        .ok_or("Could not find '<amount> <token> to <token>' in the message")?;
    let amount_out_min = MIN_OUT_RE
        .captures(text)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| DEFAULT_AMOUNT_OUT_MIN.to_string());
    let bin_step = BIN_STEP_RE
        .captures(text)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| DEFAULT_BIN_STEP.to_string());
    Ok(BasicDexSwapParams {
        token_in: resolve_or_err(&caps[2])?,
        token_out: resolve_or_err(&caps[3])?,
        amount_in: caps[1].to_string(),
        amount_out_min,
        bin_step,
    })
}

/// `"price of ETH"`, `"BTC price"`, or any known ticker in the message.
pub fn price_params(text: &str) -> Result<GetPriceParams, String> {
    let explicit = PRICE_OF_RE
        .captures(text)
        .or_else(|| PRICE_SUFFIX_RE.captures(text))
        .map(|c| c[1].to_string())
        .filter(|s| !NOT_A_SYMBOL.contains(&s.to_lowercase().as_str()));

    let symbol = explicit
        .or_else(|| {
            WORD_RE
                .find_iter(text)
                .map(|m| m.as_str().to_uppercase())
                .find(|w| KNOWN_TICKERS.contains(&w.as_str()))
        })
        .ok_or("Could not tell which symbol to price")?;

    Ok(GetPriceParams {
        args: vec![symbol.to_uppercase()],
    })
}

/// `"AAVE TVL"`, `"volume of uniswap"` → `[dataType, protocol]`.
pub fn defi_data_params(text: &str) -> Result<GetDefiDataParams, String> {
    let data_type = DATA_TYPE_RE
        .captures(text)
        .map(|c| c[1].to_lowercase())
        .ok_or("Could not tell which data to fetch (tvl, volume or fees)")?;

    let lower = text.to_lowercase();
    let compact = lower.replace(' ', "");
    let protocol = KNOWN_PROTOCOLS
        .iter()
        .find(|p| compact.contains(*p))
        .map(|p| p.to_string())
        .or_else(|| {
            PROTOCOL_OF_RE
                .captures_iter(&lower)
                .map(|c| c[1].to_string())
                .find(|w| !DATA_TYPE_RE.is_match(w) && !NOT_A_SYMBOL.contains(&w.as_str()))
        })
        .ok_or("Could not tell which protocol to query")?;

    Ok(GetDefiDataParams {
        args: vec![data_type, protocol],
    })
}

/// `"Search USDC address on Avalanche"` → `[USDC]`.
pub fn token_search_params(text: &str) -> Result<TokenSearchParams, String> {
    let caps = SEARCH_RE
        .captures(text)
        .ok_or("Could not tell which token to search for")?;
    Ok(TokenSearchParams {
        args: vec![caps[1].to_string()],
    })
}
