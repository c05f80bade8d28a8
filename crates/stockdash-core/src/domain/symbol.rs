use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Normalized market symbol/ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    ///
    /// Index (`^GSPC`) and currency (`EURUSD=X`) tickers are accepted as the
    /// provider spells them.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        let mut chars = normalized.chars();
        if let Some(first) = chars.next() {
            // `^` only prefixes an index name, so a letter must follow it.
            let index_prefix =
                first == '^' && chars.next().is_some_and(|ch| ch.is_ascii_alphabetic());
            if !first.is_ascii_alphabetic() && !index_prefix {
                return Err(ValidationError::SymbolInvalidStart { ch: first });
            }
        }

        for (index, ch) in normalized.chars().enumerate().skip(1) {
            let valid = ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '=');
            if !valid {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    /// Parse a comma or whitespace separated list, skipping empty entries.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, ValidationError> {
        input
            .split(|ch: char| ch == ',' || ch.is_whitespace())
            .filter(|part| !part.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_symbol() {
        let parsed = Symbol::parse(" aapl ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "AAPL");
    }

    #[test]
    fn accepts_index_and_currency_tickers() {
        assert_eq!(Symbol::parse("^gspc").expect("index").as_str(), "^GSPC");
        assert_eq!(
            Symbol::parse("eurusd=x").expect("currency").as_str(),
            "EURUSD=X"
        );
        assert_eq!(Symbol::parse("brk.b").expect("class").as_str(), "BRK.B");
    }

    #[test]
    fn rejects_invalid_start() {
        let err = Symbol::parse("1AAPL").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidStart { .. }));
    }

    #[test]
    fn caret_needs_an_index_name() {
        assert!(Symbol::parse("^").is_err());
        assert!(Symbol::parse("^1").is_err());
        assert!(Symbol::parse("^^GSPC").is_err());
        assert_eq!(Symbol::parse("^vix").expect("index").as_str(), "^VIX");
    }

    #[test]
    fn rejects_invalid_chars() {
        let err = Symbol::parse("AAPL$").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidChar { .. }));
    }

    #[test]
    fn parses_mixed_separator_lists() {
        let symbols = Symbol::parse_list("aapl, msft  spy,").expect("list");
        let raw = symbols.iter().map(Symbol::as_str).collect::<Vec<_>>();
        assert_eq!(raw, vec!["AAPL", "MSFT", "SPY"]);
    }
}
