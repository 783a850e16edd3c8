// Copyright 2025 Tyler Neely (tylerneely@gmail.com).
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.
//
// See http://creativecommons.org/licenses/MIT/ for more information.

//! Accidental chains
//!
//! A chain is a contiguous run of signed degrees, each spelled with zero or
//! more symbols and tuned by a cents offset. Degree 0 is the unaltered note.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TuningError};
use crate::symbols::{SymbolCode, SymbolResolver};

/// One declared degree of a chain, before symbol resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DegreeEntry {
    /// Signed chain degree.
    pub degree: i32,
    /// Symbol tokens composing this degree, in declared order.
    pub symbols: Vec<String>,
    /// Tuning offset in cents.
    pub cents: f64,
}

impl DegreeEntry {
    /// Convenience constructor.
    pub fn new(degree: i32, symbols: &[&str], cents: f64) -> Self {
        Self {
            degree,
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            cents,
        }
    }
}

/// A declared chain: degree entries in any order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainDeclaration {
    /// The degree entries.
    pub entries: Vec<DegreeEntry>,
}

/// A resolved accidental chain.
///
/// `degrees_symbols[n]` and `tunings[n]` describe degree `n - central_idx`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccidentalChain {
    /// Symbols of each degree, in declared order. Empty at `central_idx`.
    pub degrees_symbols: Vec<Vec<SymbolCode>>,
    /// Cents of each degree. Zero at `central_idx`.
    pub tunings: Vec<f64>,
    /// Array position of degree 0.
    pub central_idx: usize,
    /// Every distinct symbol used by this chain, in first-use order.
    pub symbols_used: Vec<SymbolCode>,
}

impl AccidentalChain {
    /// Validate `decl` and resolve its symbols. `chain` is the chain's
    /// 0-based declaration index, used for error reporting.
    pub fn build(
        chain: usize,
        decl: &ChainDeclaration,
        resolver: &dyn SymbolResolver,
    ) -> Result<Self> {
        let malformed = |reason: String| TuningError::MalformedChainDeclaration { chain, reason };

        let mut seen = HashSet::new();
        for entry in &decl.entries {
            if !seen.insert(entry.degree) {
                return Err(malformed(format!("duplicate degree {}", entry.degree)));
            }
            if !entry.cents.is_finite() {
                return Err(malformed(format!(
                    "degree {} has non-finite cents {}",
                    entry.degree, entry.cents
                )));
            }
        }
        if !seen.contains(&0) {
            return Err(TuningError::MissingCentralDegree { chain });
        }

        let mut entries: Vec<&DegreeEntry> = decl.entries.iter().collect();
        entries.sort_by_key(|e| e.degree);

        let min = entries[0].degree;
        let max = entries[entries.len() - 1].degree;
        let span = max
            .checked_sub(min)
            .ok_or_else(|| malformed(format!("degrees {}..={} span too wide", min, max)))?;
        if span as usize + 1 != entries.len() {
            let missing = (min..=max).find(|d| !seen.contains(d)).unwrap_or(min);
            return Err(malformed(format!(
                "degrees {}..={} have a gap at {}",
                min, max, missing
            )));
        }

        let central_idx = min.unsigned_abs() as usize;
        let central = entries[central_idx];
        if !central.symbols.is_empty() {
            return Err(malformed(format!(
                "central degree must have no symbols (got `{}`)",
                central.symbols.join(".")
            )));
        }
        if central.cents != 0.0 {
            return Err(malformed(format!(
                "central degree must be tuned to 0 cents (got {})",
                central.cents
            )));
        }

        let mut degrees_symbols = Vec::with_capacity(entries.len());
        let mut tunings = Vec::with_capacity(entries.len());
        let mut symbols_used = Vec::new();
        for entry in entries {
            let mut codes = Vec::with_capacity(entry.symbols.len());
            for token in &entry.symbols {
                let code = resolver.resolve(token)?;
                if !symbols_used.contains(&code) {
                    symbols_used.push(code);
                }
                codes.push(code);
            }
            degrees_symbols.push(codes);
            tunings.push(entry.cents);
        }

        debug!(
            "chain {}: degrees {}..={}, {} symbols used",
            chain,
            min,
            max,
            symbols_used.len()
        );

        Ok(Self {
            degrees_symbols,
            tunings,
            central_idx,
            symbols_used,
        })
    }

    /// Number of degrees, including the central one.
    pub fn len(&self) -> usize {
        self.tunings.len()
    }

    /// Always false for a built chain; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.tunings.is_empty()
    }

    /// Lowest declared degree.
    pub fn min_degree(&self) -> i32 {
        -(self.central_idx as i32)
    }

    /// Highest declared degree.
    pub fn max_degree(&self) -> i32 {
        (self.len() - 1 - self.central_idx) as i32
    }

    /// Array position of `degree`, if declared.
    pub fn index_of(&self, degree: i32) -> Option<usize> {
        let idx = degree + self.central_idx as i32;
        (idx >= 0 && (idx as usize) < self.len()).then_some(idx as usize)
    }

    /// Symbols spelling `degree`; empty for the central degree.
    pub fn symbols_of(&self, degree: i32) -> &[SymbolCode] {
        self.index_of(degree)
            .map(|i| self.degrees_symbols[i].as_slice())
            .unwrap_or(&[])
    }

    /// Cents of `degree`, if declared.
    pub fn cents_of(&self, degree: i32) -> Option<f64> {
        self.index_of(degree).map(|i| self.tunings[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolTable;

    fn sharps_flats() -> ChainDeclaration {
        ChainDeclaration {
            entries: vec![
                DegreeEntry::new(-2, &["bb"], -40.0),
                DegreeEntry::new(-1, &["b"], -20.0),
                DegreeEntry::new(0, &[], 0.0),
                DegreeEntry::new(1, &["#"], 20.0),
                DegreeEntry::new(2, &["x"], 40.0),
            ],
        }
    }

    #[test]
    fn test_build_chain() {
        let table = SymbolTable::standard();
        let chain = AccidentalChain::build(0, &sharps_flats(), &table).unwrap();

        assert_eq!(chain.len(), 5);
        assert_eq!(chain.central_idx, 2);
        assert_eq!(chain.tunings, vec![-40.0, -20.0, 0.0, 20.0, 40.0]);
        assert_eq!(chain.min_degree(), -2);
        assert_eq!(chain.max_degree(), 2);
        assert!(chain.degrees_symbols[2].is_empty());
        assert_eq!(chain.symbols_of(1), &[SymbolCode(4)]);
        assert_eq!(chain.symbols_used.len(), 4);
        assert_eq!(chain.index_of(3), None);
        assert_eq!(chain.cents_of(-1), Some(-20.0));
    }

    #[test]
    fn test_entry_order_does_not_matter() {
        let table = SymbolTable::standard();
        let mut decl = sharps_flats();
        decl.entries.reverse();
        let chain = AccidentalChain::build(0, &decl, &table).unwrap();
        assert_eq!(chain.tunings, vec![-40.0, -20.0, 0.0, 20.0, 40.0]);
    }

    #[test]
    fn test_non_monotonic_cents_allowed() {
        let table = SymbolTable::standard();
        let decl = ChainDeclaration {
            entries: vec![
                DegreeEntry::new(0, &[], 0.0),
                DegreeEntry::new(1, &["/"], 30.0),
                DegreeEntry::new(2, &["#"], 10.0),
            ],
        };
        let chain = AccidentalChain::build(0, &decl, &table).unwrap();
        assert_eq!(chain.central_idx, 0);
        assert_eq!(chain.tunings, vec![0.0, 30.0, 10.0]);
    }

    #[test]
    fn test_gap_is_malformed() {
        let table = SymbolTable::standard();
        let mut decl = sharps_flats();
        decl.entries.remove(1);
        match AccidentalChain::build(3, &decl, &table) {
            Err(TuningError::MalformedChainDeclaration { chain, reason }) => {
                assert_eq!(chain, 3);
                assert!(reason.contains("gap at -1"), "{}", reason);
            }
            other => panic!("expected MalformedChainDeclaration, got {:?}", other),
        }
    }

    #[test]
    fn test_extreme_degrees_are_malformed() {
        let table = SymbolTable::standard();
        for degree in [i32::MIN, i32::MAX] {
            let decl = ChainDeclaration {
                entries: vec![
                    DegreeEntry::new(degree, &["b"], -1.0),
                    DegreeEntry::new(0, &[], 0.0),
                ],
            };
            assert!(
                matches!(
                    AccidentalChain::build(0, &decl, &table),
                    Err(TuningError::MalformedChainDeclaration { chain: 0, .. })
                ),
                "accepted degree {}",
                degree
            );
        }
    }

    #[test]
    fn test_duplicate_is_malformed() {
        let table = SymbolTable::standard();
        let mut decl = sharps_flats();
        decl.entries.push(DegreeEntry::new(1, &["+"], 10.0));
        assert!(matches!(
            AccidentalChain::build(0, &decl, &table),
            Err(TuningError::MalformedChainDeclaration { .. })
        ));
    }

    #[test]
    fn test_missing_central_degree() {
        let table = SymbolTable::standard();
        let decl = ChainDeclaration {
            entries: vec![DegreeEntry::new(1, &["#"], 20.0)],
        };
        assert!(matches!(
            AccidentalChain::build(0, &decl, &table),
            Err(TuningError::MissingCentralDegree { chain: 0 })
        ));
        assert!(matches!(
            AccidentalChain::build(1, &ChainDeclaration::default(), &table),
            Err(TuningError::MissingCentralDegree { chain: 1 })
        ));
    }

    #[test]
    fn test_unknown_symbol_propagates() {
        let table = SymbolTable::standard();
        let decl = ChainDeclaration {
            entries: vec![
                DegreeEntry::new(0, &[], 0.0),
                DegreeEntry::new(1, &["sharpish"], 20.0),
            ],
        };
        assert!(matches!(
            AccidentalChain::build(0, &decl, &table),
            Err(TuningError::UnknownSymbol { .. })
        ));
    }
}
