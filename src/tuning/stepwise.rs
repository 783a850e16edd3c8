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

//! Stepwise index
//!
//! Orders every spelling by ascending pitch within the equave, groups
//! enharmonic equivalents into classes, and links the members of each class
//! into a cycle for enharmonic respelling.

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

/// Ascending-pitch partition of the catalog, its reverse index, and the
/// enharmonic successor graph.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StepwiseIndex {
    classes: Vec<Vec<String>>,
    lookup: HashMap<String, usize>,
    enharmonics: HashMap<String, String>,
}

impl StepwiseIndex {
    /// Build from `(hash, cents)` pairs in catalog insertion order.
    ///
    /// Entries are sorted by cents (stable, so ties keep insertion order).
    /// An entry joins the current class if it is within `tolerance` cents of
    /// the class's first member; otherwise it starts a new class. Members of
    /// a class are kept in insertion order. Grouping does not wrap around
    /// the equave.
    pub fn build(entries: &[(String, f64)], tolerance: f64) -> Self {
        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by(|&a, &b| entries[a].1.total_cmp(&entries[b].1));

        let mut grouped: Vec<Vec<usize>> = Vec::new();
        let mut class_start = f64::NEG_INFINITY;
        for idx in order {
            let cents = entries[idx].1;
            match grouped.last_mut() {
                Some(class) if cents - class_start <= tolerance => class.push(idx),
                _ => {
                    grouped.push(vec![idx]);
                    class_start = cents;
                }
            }
        }

        let mut classes = Vec::with_capacity(grouped.len());
        let mut lookup = HashMap::with_capacity(entries.len());
        let mut enharmonics = HashMap::new();
        for (class_idx, mut members) in grouped.into_iter().enumerate() {
            members.sort_unstable();
            let hashes: Vec<String> = members.iter().map(|&i| entries[i].0.clone()).collect();

            for hash in &hashes {
                lookup.insert(hash.clone(), class_idx);
            }
            if hashes.len() > 1 {
                for (i, hash) in hashes.iter().enumerate() {
                    let next = &hashes[(i + 1) % hashes.len()];
                    enharmonics.insert(hash.clone(), next.clone());
                }
            }
            classes.push(hashes);
        }

        debug!(
            "stepwise index: {} notes in {} classes, {} with enharmonics",
            entries.len(),
            classes.len(),
            enharmonics.len()
        );

        Self {
            classes,
            lookup,
            enharmonics,
        }
    }

    /// Index of the class containing `hash`.
    pub fn class_of(&self, hash: &str) -> Option<usize> {
        self.lookup.get(hash).copied()
    }

    /// Members of class `index`, in insertion order.
    pub fn members(&self, index: usize) -> Option<&[String]> {
        self.classes.get(index).map(Vec::as_slice)
    }

    /// Next enharmonic spelling of `hash`, or `None` if it has none.
    pub fn next_in_cycle(&self, hash: &str) -> Option<&str> {
        self.enharmonics.get(hash).map(String::as_str)
    }

    /// All classes in ascending pitch order.
    pub fn classes(&self) -> &[Vec<String>] {
        &self.classes
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True if there are no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
