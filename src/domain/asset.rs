//! The tracked asset universe.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A tracked crypto asset.
///
/// The universe is fixed at compile time; changing it is a code change,
/// not configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Btc,
    Eth,
    Sol,
    Bnb,
    Doge,
}

/// Every asset the scheduler refreshes each cycle.
pub const TRACKED_ASSETS: [Asset; 5] = [Asset::Btc, Asset::Eth, Asset::Sol, Asset::Bnb, Asset::Doge];

impl Asset {
    /// Ticker symbol, e.g. `BTC`.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Sol => "SOL",
            Asset::Bnb => "BNB",
            Asset::Doge => "DOGE",
        }
    }

    /// USDT trading pair used by the exchange endpoints, e.g. `BTCUSDT`.
    #[must_use]
    pub const fn pair(&self) -> &'static str {
        match self {
            Asset::Btc => "BTCUSDT",
            Asset::Eth => "ETHUSDT",
            Asset::Sol => "SOLUSDT",
            Asset::Bnb => "BNBUSDT",
            Asset::Doge => "DOGEUSDT",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Asset::Btc => "Bitcoin",
            Asset::Eth => "Ethereum",
            Asset::Sol => "Solana",
            Asset::Bnb => "BNB",
            Asset::Doge => "Dogecoin",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Error returned when parsing an unknown asset symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAssetError(pub String);

impl fmt::Display for ParseAssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown asset symbol: {}", self.0)
    }
}

impl std::error::Error for ParseAssetError {}

impl FromStr for Asset {
    type Err = ParseAssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BTC" => Ok(Asset::Btc),
            "ETH" => Ok(Asset::Eth),
            "SOL" => Ok(Asset::Sol),
            "BNB" => Ok(Asset::Bnb),
            "DOGE" => Ok(Asset::Doge),
            other => Err(ParseAssetError(other.to_string())),
        }
    }
}
