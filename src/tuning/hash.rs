//! Canonical note hashes
//!
//! A hash is the nominal index followed by `(symbol code, count)` pairs in
//! strictly ascending symbol-code order, all space separated. For example
//! nominal 0 spelled with one double flat (code 6) and one mirrored flat
//! (code 10) hashes to `"0 6 1 10 1"`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Result, TuningError};
use crate::symbols::SymbolCode;

/// Accidental multiset: symbol code -> number of occurrences.
pub type AccidentalSymbols = BTreeMap<SymbolCode, u32>;

/// A distinguishable pitch spelling.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct XenNote {
    /// Nominal index relative to the reference nominal.
    pub nominal: usize,
    /// Symbols in left-to-right display order.
    pub ordered_symbols: Vec<SymbolCode>,
    /// The accidental multiset; `None` for a bare nominal.
    pub accidentals: Option<AccidentalSymbols>,
    /// Canonical identity of this spelling.
    pub hash: String,
}

impl XenNote {
    /// Build a note from its nominal and display-ordered symbols.
    pub fn new(nominal: usize, ordered_symbols: Vec<SymbolCode>) -> Self {
        let accidentals = multiset(&ordered_symbols);
        let hash = hash_of(nominal, accidentals.as_ref());
        Self {
            nominal,
            ordered_symbols,
            accidentals,
            hash,
        }
    }
}

/// Count symbol occurrences. Returns `None` when `symbols` is empty.
pub fn multiset(symbols: &[SymbolCode]) -> Option<AccidentalSymbols> {
    if symbols.is_empty() {
        return None;
    }
    let mut acc = AccidentalSymbols::new();
    for &code in symbols {
        *acc.entry(code).or_insert(0) += 1;
    }
    Some(acc)
}

/// Canonical hash for a nominal and its accidental multiset.
pub fn hash_of(nominal: usize, accidentals: Option<&AccidentalSymbols>) -> String {
    let mut hash = nominal.to_string();
    for (code, count) in accidentals.into_iter().flatten() {
        hash.push_str(&format!(" {} {}", code, count));
    }
    hash
}

/// Decode a canonical hash back into its nominal and accidental multiset.
pub fn parse_hash(hash: &str) -> Result<(usize, Option<AccidentalSymbols>)> {
    let malformed = || TuningError::MalformedHash {
        hash: hash.to_string(),
    };

    let mut tokens = hash.split(' ');
    let nominal = tokens
        .next()
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(malformed)?;

    let rest: Vec<&str> = tokens.collect();
    if rest.len() % 2 != 0 {
        return Err(malformed());
    }

    let mut acc = AccidentalSymbols::new();
    let mut last: Option<SymbolCode> = None;
    for pair in rest.chunks(2) {
        let code = pair[0].parse::<u32>().map(SymbolCode).map_err(|_| malformed())?;
        let count = pair[1].parse::<u32>().map_err(|_| malformed())?;
        if count == 0 || last.is_some_and(|prev| prev >= code) {
            return Err(malformed());
        }
        acc.insert(code, count);
        last = Some(code);
    }

    Ok((nominal, (!acc.is_empty()).then_some(acc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_sorts_by_symbol_code() {
        let note = XenNote::new(0, vec![SymbolCode(10), SymbolCode(6)]);
        assert_eq!(note.hash, "0 6 1 10 1");
        assert_eq!(note.ordered_symbols, vec![SymbolCode(10), SymbolCode(6)]);
    }

    #[test]
    fn test_hash_counts_repeats() {
        let note = XenNote::new(3, vec![SymbolCode(11), SymbolCode(4), SymbolCode(11)]);
        assert_eq!(note.hash, "3 4 1 11 2");
    }

    #[test]
    fn test_bare_nominal() {
        let note = XenNote::new(5, vec![]);
        assert_eq!(note.hash, "5");
        assert!(note.accidentals.is_none());
    }

    #[test]
    fn test_parse_hash_round_trip() {
        let note = XenNote::new(2, vec![SymbolCode(12), SymbolCode(7), SymbolCode(12)]);
        let (nominal, accidentals) = parse_hash(&note.hash).unwrap();
        assert_eq!(nominal, 2);
        assert_eq!(accidentals, note.accidentals);

        assert_eq!(parse_hash("4").unwrap(), (4, None));
    }

    #[test]
    fn test_parse_hash_rejects_garbage() {
        for bad in ["", "x", "0 4", "0 4 0", "0 7 1 4 1", "0 4 1 4 1", "0  4 1", "-1"] {
            assert!(parse_hash(bad).is_err(), "accepted `{}`", bad);
        }
    }
}
