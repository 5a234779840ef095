//! Canonical currency and currency-pair identity.
//!
//! A [`CurrencyPair`] reads "convert A to B". Rendering it as a venue symbol
//! only joins the two tickers; upper/lower casing is left to each adapter.

use std::fmt;

#[derive(Clone, Debug)]
pub struct Currency {
    pub symbol: String,
    pub desc: String,
}

impl Currency {
    pub fn new(symbol: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            desc: desc.into(),
        }
    }

    fn well_known(symbol: &str, desc: &str) -> Self {
        Self::new(symbol, desc)
    }
}

// Identity is the ticker; the description is informational only.
impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Currency {}

impl std::hash::Hash for Currency {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

// ============================================================================
// Well-known currencies
// ============================================================================

pub fn unknown() -> Currency {
    Currency::well_known("UNKNOWN", "")
}
pub fn btc() -> Currency {
    Currency::well_known("BTC", "bitcoin.org")
}
pub fn xbt() -> Currency {
    Currency::well_known("XBT", "bitcoin.org")
}
pub fn eth() -> Currency {
    Currency::well_known("ETH", "")
}
pub fn ltc() -> Currency {
    Currency::well_known("LTC", "litecoin.org")
}
pub fn bch() -> Currency {
    Currency::well_known("BCH", "bitcoin-abc")
}
pub fn usd() -> Currency {
    Currency::well_known("USD", "USA dollar")
}
pub fn usdt() -> Currency {
    Currency::well_known("USDT", "http://tether.io")
}
pub fn eur() -> Currency {
    Currency::well_known("EUR", "")
}

/// Quote currencies recognised when splitting a separator-less symbol,
/// longest first so that `USDT` wins over `USD`.
const KNOWN_QUOTES: &[&str] = &[
    "USDT", "USDC", "BUSD", "TUSD", "USDP", "USD", "EUR", "GBP", "JPY", "KRW", "CNY", "DAI",
    "BTC", "XBT", "ETH", "BNB", "HT", "QC",
];

// ============================================================================
// Currency Pair
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub a: Currency,
    pub b: Currency,
}

impl CurrencyPair {
    pub fn new(a: Currency, b: Currency) -> Self {
        Self { a, b }
    }

    /// The sentinel returned when a symbol cannot be parsed.
    pub fn unknown() -> Self {
        Self::new(unknown(), unknown())
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }

    /// Parses `"A_B"`. Anything that does not split into exactly two tokens
    /// yields [`CurrencyPair::unknown`].
    pub fn from_symbol(symbol: &str) -> Self {
        Self::from_symbol_with(symbol, "_")
    }

    pub fn from_symbol_with(symbol: &str, sep: &str) -> Self {
        if sep.is_empty() {
            return Self::unknown();
        }
        let tokens: Vec<&str> = symbol.split(sep).collect();
        match tokens.as_slice() {
            [a, b] => Self::new(Currency::new(*a, ""), Currency::new(*b, "")),
            _ => Self::unknown(),
        }
    }

    /// Best-effort split of a symbol with no separator, such as `ethbtc`
    /// or `BTCUSDT`. Case is preserved. Falls back to a three-character base
    /// when no known quote matches.
    pub fn from_compact(symbol: &str) -> Self {
        let upper = symbol.to_ascii_uppercase();
        for quote in KNOWN_QUOTES {
            if upper.len() > quote.len() && upper.ends_with(quote) {
                let split = symbol.len() - quote.len();
                return Self::new(
                    Currency::new(&symbol[..split], ""),
                    Currency::new(&symbol[split..], ""),
                );
            }
        }
        match (symbol.get(..3), symbol.get(3..)) {
            (Some(a), Some(b)) if !b.is_empty() => {
                Self::new(Currency::new(a, ""), Currency::new(b, ""))
            }
            _ => Self::unknown(),
        }
    }

    /// Renders A, then B, joined by `join`.
    pub fn to_symbol(&self, join: &str) -> String {
        format!("{}{}{}", self.a.symbol, join, self.b.symbol)
    }

    /// Renders B, then A, joined by `join`, for venues that list the quote first.
    pub fn to_symbol_reversed(&self, join: &str) -> String {
        format!("{}{}{}", self.b.symbol, join, self.a.symbol)
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_symbol("_"))
    }
}

impl std::str::FromStr for CurrencyPair {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_symbol(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_symbol_round_trip_preserves_case() {
        for symbol in ["BTC_USD", "eth_btc", "Ltc_Usdt"] {
            assert_eq!(CurrencyPair::from_symbol(symbol).to_symbol("_"), symbol);
        }
    }

    #[test]
    fn test_malformed_symbol_is_sentinel() {
        for symbol in ["", "BTC", "BTC_USD_X", "a__b", "BTC-USD"] {
            assert!(
                CurrencyPair::from_symbol(symbol).is_unknown(),
                "{symbol} should not parse"
            );
        }
    }

    #[test]
    fn test_custom_separator() {
        let pair = CurrencyPair::from_symbol_with("BTC-USDT", "-");
        assert_eq!(pair, CurrencyPair::new(btc(), usdt()));
        assert!(CurrencyPair::from_symbol_with("BTC-USDT", "").is_unknown());
    }

    #[test]
    fn test_reversed_rendering() {
        let pair = CurrencyPair::new(eth(), btc());
        assert_eq!(pair.to_symbol("-"), "ETH-BTC");
        assert_eq!(pair.to_symbol_reversed("-"), "BTC-ETH");
        assert_eq!(pair.to_symbol(""), "ETHBTC");
    }

    #[test]
    fn test_equality_ignores_description() {
        let plain = CurrencyPair::new(Currency::new("BTC", ""), Currency::new("USD", ""));
        assert_eq!(plain, CurrencyPair::new(btc(), usd()));
        assert_ne!(plain, CurrencyPair::new(usd(), btc()));
    }

    #[test]
    fn test_from_compact() {
        assert_eq!(CurrencyPair::from_compact("BTCUSDT").to_symbol("_"), "BTC_USDT");
        assert_eq!(CurrencyPair::from_compact("ethbtc").to_symbol("_"), "eth_btc");
        assert_eq!(CurrencyPair::from_compact("XRPUSD").to_symbol("_"), "XRP_USD");
        assert_eq!(CurrencyPair::from_compact("abcxyz").to_symbol("_"), "abc_xyz");
        assert!(CurrencyPair::from_compact("ab").is_unknown());
    }

    #[test]
    fn test_from_compact_four_letter_stablecoins() {
        assert_eq!(CurrencyPair::from_compact("ETHBUSD").to_symbol("_"), "ETH_BUSD");
        assert_eq!(CurrencyPair::from_compact("btcusdc").to_symbol("_"), "btc_usdc");
        assert_eq!(CurrencyPair::from_compact("LTCTUSD").to_symbol("_"), "LTC_TUSD");
        assert_eq!(CurrencyPair::from_compact("ETHDAI").to_symbol("_"), "ETH_DAI");
    }

    #[test]
    fn test_display_and_parse() {
        let pair: CurrencyPair = "LTC_BTC".parse().unwrap();
        assert_eq!(pair.to_string(), "LTC_BTC");
        assert_eq!(pair, CurrencyPair::new(ltc(), btc()));
    }
}
