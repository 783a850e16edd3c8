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

//! Note enumeration: every nominal crossed with every combination of chain
//! degrees.

use std::ops::RangeInclusive;

use log::debug;

use super::chain::AccidentalChain;
use crate::error::{Result, TuningError};
use crate::symbols::SymbolCode;

/// Per-chain degree tuple, in chain declaration order.
pub type AccidentalVector = Vec<i32>;

/// One enumerated (nominal, vector) combination before equave reduction.
#[derive(Clone, Debug, PartialEq)]
pub struct RawNote {
    /// Nominal index.
    pub nominal: usize,
    /// Degree of each chain.
    pub vector: AccidentalVector,
    /// Nominal cents plus every chain's degree cents.
    pub raw_cents: f64,
    /// Symbols of each non-central chain degree, concatenated in chain order.
    pub ordered_symbols: Vec<SymbolCode>,
}

/// Degree range to enumerate for `chain`, clamped to `[-cap, cap]` if a cap is set.
pub fn degree_range(chain: &AccidentalChain, cap: Option<u32>) -> RangeInclusive<i32> {
    match cap {
        Some(cap) => {
            let cap = cap.min(i32::MAX as u32) as i32;
            chain.min_degree().max(-cap)..=chain.max_degree().min(cap)
        }
        None => chain.min_degree()..=chain.max_degree(),
    }
}

/// Number of candidates [`enumerate`] would produce.
pub fn candidate_count(num_nominals: usize, chains: &[AccidentalChain], cap: Option<u32>) -> u128 {
    chains.iter().fold(num_nominals as u128, |acc, chain| {
        let range = degree_range(chain, cap);
        acc * (range.end() - range.start() + 1) as u128
    })
}

/// Enumerate every candidate note.
///
/// Order is nominal-major; within a nominal, vectors run like an odometer
/// with the first chain most significant and degrees ascending. Later
/// stages rely on this order for first-seen precedence.
pub fn enumerate(
    nominals: &[f64],
    chains: &[AccidentalChain],
    cap: Option<u32>,
    limit: usize,
) -> Result<Vec<RawNote>> {
    let candidates = candidate_count(nominals.len(), chains, cap);
    if candidates > limit as u128 {
        return Err(TuningError::EnumerationLimitExceeded { candidates, limit });
    }
    debug!(
        "enumerating {} candidates ({} nominals x {} chains)",
        candidates,
        nominals.len(),
        chains.len()
    );

    let ranges: Vec<RangeInclusive<i32>> = chains.iter().map(|c| degree_range(c, cap)).collect();
    let vectors = odometer(&ranges);

    let mut notes = Vec::with_capacity(candidates as usize);
    for (nominal, &nominal_cents) in nominals.iter().enumerate() {
        for vector in &vectors {
            let mut raw_cents = nominal_cents;
            let mut ordered_symbols = Vec::new();
            for (chain, &degree) in chains.iter().zip(vector) {
                // degree_range never leaves the declared range
                raw_cents += chain.cents_of(degree).unwrap_or(0.0);
                ordered_symbols.extend_from_slice(chain.symbols_of(degree));
            }
            notes.push(RawNote {
                nominal,
                vector: vector.clone(),
                raw_cents,
                ordered_symbols,
            });
        }
    }

    Ok(notes)
}

/// All vectors in the cartesian product of `ranges`, last index fastest.
fn odometer(ranges: &[RangeInclusive<i32>]) -> Vec<AccidentalVector> {
    let mut vectors: Vec<AccidentalVector> = vec![Vec::with_capacity(ranges.len())];
    for range in ranges {
        vectors = vectors
            .into_iter()
            .flat_map(|prefix| {
                range.clone().map(move |degree| {
                    let mut v = prefix.clone();
                    v.push(degree);
                    v
                })
            })
            .collect();
    }
    vectors
}
