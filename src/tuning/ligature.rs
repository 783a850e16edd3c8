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

//! Ligatures: display-only substitution of a combination of chain degrees by
//! a composite symbol sequence.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TuningError};
use crate::symbols::{SymbolCode, SymbolResolver};

/// A declared ligature, before symbol resolution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LigatureDeclaration {
    /// 0-based chain indices this ligature looks at, in key order.
    pub regarding: Vec<usize>,
    /// Rows of (degree per regarded chain, replacement symbol tokens).
    pub entries: Vec<(Vec<i32>, Vec<String>)>,
}

/// A resolved ligature.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ligature {
    /// 0-based chain indices, in key order.
    pub regarding: Vec<usize>,
    /// Restricted-vector key -> replacement symbols.
    pub lig_av_to_symbols: HashMap<String, Vec<SymbolCode>>,
}

/// Encode degrees as a lookup key.
pub fn vector_key(degrees: &[i32]) -> String {
    degrees
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl Ligature {
    /// Validate `decl` against `num_chains` and resolve its symbols.
    /// `ligature` is the 0-based declaration index, used for error reporting.
    pub fn build(
        ligature: usize,
        decl: &LigatureDeclaration,
        num_chains: usize,
        resolver: &dyn SymbolResolver,
    ) -> Result<Self> {
        let invalid = |reason: String| TuningError::InvalidLigatureSubset { ligature, reason };

        if decl.regarding.is_empty() {
            return Err(invalid("no chains regarded".to_string()));
        }
        for (i, &chain) in decl.regarding.iter().enumerate() {
            if chain >= num_chains {
                return Err(invalid(format!(
                    "chain index {} is outside 0..{}",
                    chain, num_chains
                )));
            }
            if decl.regarding[..i].contains(&chain) {
                return Err(invalid(format!("chain index {} is repeated", chain)));
            }
        }

        let mut lig_av_to_symbols = HashMap::with_capacity(decl.entries.len());
        for (degrees, tokens) in &decl.entries {
            if degrees.len() != decl.regarding.len() {
                return Err(invalid(format!(
                    "entry `{}` has {} degrees for {} chains",
                    vector_key(degrees),
                    degrees.len(),
                    decl.regarding.len()
                )));
            }
            let symbols = tokens
                .iter()
                .map(|t| resolver.resolve(t))
                .collect::<Result<Vec<_>>>()?;
            // first row wins within a ligature too
            lig_av_to_symbols
                .entry(vector_key(degrees))
                .or_insert(symbols);
        }

        Ok(Self {
            regarding: decl.regarding.clone(),
            lig_av_to_symbols,
        })
    }

    /// Key of `vector` restricted to this ligature's chains.
    pub fn restricted_key(&self, vector: &[i32]) -> String {
        let restricted: Vec<i32> = self.regarding.iter().map(|&i| vector[i]).collect();
        vector_key(&restricted)
    }

    /// Replacement symbols for `vector`, if this ligature matches it.
    pub fn lookup(&self, vector: &[i32]) -> Option<&[SymbolCode]> {
        self.lig_av_to_symbols
            .get(&self.restricted_key(vector))
            .map(Vec::as_slice)
    }

    /// Lowest regarded chain index; the ligature's symbols are drawn there.
    pub fn anchor(&self) -> usize {
        self.regarding.iter().copied().min().unwrap_or(0)
    }

    /// Every symbol any replacement uses.
    pub fn symbols_used(&self) -> impl Iterator<Item = SymbolCode> + '_ {
        self.lig_av_to_symbols.values().flatten().copied()
    }
}

/// Which ligature (by declaration index) matches each distinct full vector.
#[derive(Clone, Debug, Default, Serialize)]
pub struct LigatureOverlay {
    matches: HashMap<String, usize>,
}

impl LigatureOverlay {
    /// Precompute matches for every vector in `vectors`. Ligatures are tried
    /// in declaration order and the first match wins.
    pub fn build<'a, I>(ligatures: &[Ligature], vectors: I) -> Self
    where
        I: IntoIterator<Item = &'a [i32]>,
    {
        let mut matches = HashMap::new();
        if ligatures.is_empty() {
            return Self { matches };
        }
        for vector in vectors {
            let key = vector_key(vector);
            if matches.contains_key(&key) {
                continue;
            }
            if let Some(idx) = ligatures.iter().position(|l| l.lookup(vector).is_some()) {
                matches.insert(key, idx);
            }
        }
        Self { matches }
    }

    /// Declaration index of the ligature matching `vector`.
    pub fn ligature_for(&self, vector: &[i32]) -> Option<usize> {
        self.matches.get(&vector_key(vector)).copied()
    }

    /// Number of vectors with a ligature.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// True if no vector has a ligature.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
