//! Network identifiers.
//!
//! Every supported chain is identified by its staking token ticker. The set
//! is fixed at compile time; new chains are appended in alphabetical order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Identifier of one supported chain, keyed by token ticker.
///
/// # Examples
///
/// ```
/// use naka_core::NetworkId;
/// let id: NetworkId = "mon".parse().unwrap();
/// assert_eq!(id, NetworkId::Mon);
/// assert_eq!(id.ticker(), "MON");
/// assert_eq!(id.chain_name(), "Monad");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NetworkId {
    Ada,
    Algo,
    Apt,
    Atom,
    Avail,
    Avax,
    Base,
    Bld,
    Bnb,
    Dot,
    Egld,
    Eth,
    Grt,
    Hbar,
    Hype,
    Juno,
    Matic,
    Mina,
    Mon,
    Nam,
    Near,
    Osmo,
    Pls,
    Plume,
    Regen,
    Rune,
    Sei,
    Sol,
    Stars,
    Story,
    Sui,
    Tia,
    Xno,
}

impl NetworkId {
    /// All known networks, in ticker order.
    pub const ALL: [NetworkId; 33] = [
        Self::Ada,
        Self::Algo,
        Self::Apt,
        Self::Atom,
        Self::Avail,
        Self::Avax,
        Self::Base,
        Self::Bld,
        Self::Bnb,
        Self::Dot,
        Self::Egld,
        Self::Eth,
        Self::Grt,
        Self::Hbar,
        Self::Hype,
        Self::Juno,
        Self::Matic,
        Self::Mina,
        Self::Mon,
        Self::Nam,
        Self::Near,
        Self::Osmo,
        Self::Pls,
        Self::Plume,
        Self::Regen,
        Self::Rune,
        Self::Sei,
        Self::Sol,
        Self::Stars,
        Self::Story,
        Self::Sui,
        Self::Tia,
        Self::Xno,
    ];

    /// Upper-case token ticker, e.g. `"ATOM"`.
    pub fn ticker(&self) -> &'static str {
        match self {
            Self::Ada => "ADA",
            Self::Algo => "ALGO",
            Self::Apt => "APT",
            Self::Atom => "ATOM",
            Self::Avail => "AVAIL",
            Self::Avax => "AVAX",
            Self::Base => "BASE",
            Self::Bld => "BLD",
            Self::Bnb => "BNB",
            Self::Dot => "DOT",
            Self::Egld => "EGLD",
            Self::Eth => "ETH",
            Self::Grt => "GRT",
            Self::Hbar => "HBAR",
            Self::Hype => "HYPE",
            Self::Juno => "JUNO",
            Self::Matic => "MATIC",
            Self::Mina => "MINA",
            Self::Mon => "MON",
            Self::Nam => "NAM",
            Self::Near => "NEAR",
            Self::Osmo => "OSMO",
            Self::Pls => "PLS",
            Self::Plume => "PLUME",
            Self::Regen => "REGEN",
            Self::Rune => "RUNE",
            Self::Sei => "SEI",
            Self::Sol => "SOL",
            Self::Stars => "STARS",
            Self::Story => "STORY",
            Self::Sui => "SUI",
            Self::Tia => "TIA",
            Self::Xno => "XNO",
        }
    }

    /// Human-readable chain name, e.g. `"Cosmos"` for ATOM.
    pub fn chain_name(&self) -> &'static str {
        match self {
            Self::Ada => "Cardano",
            Self::Algo => "Algo",
            Self::Apt => "Aptos",
            Self::Atom => "Cosmos",
            Self::Avail => "Avail DA",
            Self::Avax => "Avalanche",
            Self::Base => "Base",
            Self::Bld => "Agoric",
            Self::Bnb => "BNB Smart Chain",
            Self::Dot => "Polkadot",
            Self::Egld => "MultiversX",
            Self::Eth => "Ethereum",
            Self::Grt => "Graph Protocol",
            Self::Hbar => "Hedera",
            Self::Hype => "Hype",
            Self::Juno => "Juno",
            Self::Matic => "Polygon",
            Self::Mina => "Mina Protocol",
            Self::Mon => "Monad",
            Self::Nam => "Namada",
            Self::Near => "Near Protocol",
            Self::Osmo => "Osmosis",
            Self::Pls => "Pulsechain",
            Self::Plume => "Plume",
            Self::Regen => "Regen Network",
            Self::Rune => "Thorchain",
            Self::Sei => "Sei",
            Self::Sol => "Solana",
            Self::Stars => "Stargaze",
            Self::Story => "Story Protocol",
            Self::Sui => "Sui Protocol",
            Self::Tia => "Celestia",
            Self::Xno => "Nano",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

impl FromStr for NetworkId {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.ticker().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TrackerError::UnknownNetwork(s.to_string()))
    }
}
