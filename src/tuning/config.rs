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

//! Tuning configuration: the immutable result of compiling a declaration.

use std::collections::{BTreeSet, HashMap};

use log::debug;
use serde::Serialize;

use super::chain::AccidentalChain;
use super::enumerate::{self, AccidentalVector};
use super::equave;
use super::hash::{hash_of, multiset, XenNote};
use super::ligature::{Ligature, LigatureOverlay};
use super::reference::ReferenceNote;
use super::stepwise::StepwiseIndex;
use crate::declaration::TuningDeclaration;
use crate::error::{Result, TuningError};
use crate::options::EngineOptions;
use crate::symbols::{SymbolCode, SymbolResolver};

/// Cents of one spelling within the equave.
///
/// `raw cents == cents + equaves_adjusted * equave size`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TuningEntry {
    /// Cents above the reference nominal, in `[0, equave)`.
    pub cents: f64,
    /// Equaves subtracted (positive) or added (negative) to get there.
    pub equaves_adjusted: i32,
}

/// Direction of a stepwise move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepDirection {
    /// Towards higher pitch.
    Up,
    /// Towards lower pitch.
    Down,
}

/// Spellings eligible as the next step from some note.
#[derive(Clone, Debug, PartialEq)]
pub struct StepCandidates {
    /// Stepwise class the candidates belong to.
    pub class_index: usize,
    /// Qualifying hashes, in class order.
    pub hashes: Vec<String>,
    /// Equaves crossed by wrapping around the stepwise list.
    pub equave_wrap: i32,
}

/// A compiled tuning. Built once by [`TuningConfig::build`]; read-only afterwards.
#[derive(Clone, Debug, Serialize)]
pub struct TuningConfig {
    notes_table: HashMap<String, XenNote>,
    tuning_table: HashMap<String, TuningEntry>,
    av_table: HashMap<String, AccidentalVector>,
    hashes: Vec<String>,
    stepwise: StepwiseIndex,
    chains: Vec<AccidentalChain>,
    ligatures: Vec<Ligature>,
    overlay: LigatureOverlay,
    display_hashes: HashMap<String, String>,
    nominals: Vec<f64>,
    equave_size: f64,
    reference: ReferenceNote,
    aux_list: Vec<Option<Vec<usize>>>,
    used_symbols: BTreeSet<SymbolCode>,
    collisions: usize,
}

impl TuningConfig {
    /// Parse `text` and build it.
    pub fn from_text(
        text: &str,
        resolver: &dyn SymbolResolver,
        options: &EngineOptions,
    ) -> Result<Self> {
        let decl = TuningDeclaration::parse(text)?;
        Self::build(&decl, resolver, options)
    }

    /// Compile a declaration.
    pub fn build(
        decl: &TuningDeclaration,
        resolver: &dyn SymbolResolver,
        options: &EngineOptions,
    ) -> Result<Self> {
        let equave_size = decl.equave_size;
        if !(equave_size > 0.0) {
            return Err(TuningError::EquaveNonPositive { equave_size });
        }

        let chains = decl
            .chains
            .iter()
            .enumerate()
            .map(|(i, c)| AccidentalChain::build(i, c, resolver))
            .collect::<Result<Vec<_>>>()?;

        let ligatures = decl
            .ligatures
            .iter()
            .enumerate()
            .map(|(i, l)| Ligature::build(i, l, chains.len(), resolver))
            .collect::<Result<Vec<_>>>()?;

        let mut aux_list = Vec::with_capacity(decl.aux.len() + 1);
        aux_list.push(None);
        for (i, constrictions) in decl.aux.iter().enumerate() {
            if let Some(&index) = constrictions.iter().find(|&&c| c > chains.len()) {
                return Err(TuningError::InvalidAuxConstriction {
                    aux: i + 1,
                    index,
                    max: chains.len(),
                });
            }
            aux_list.push(Some(constrictions.clone()));
        }

        let raw_notes = enumerate::enumerate(
            &decl.nominals,
            &chains,
            options.max_degree,
            options.max_candidates,
        )?;

        let mut notes_table = HashMap::with_capacity(raw_notes.len());
        let mut tuning_table = HashMap::with_capacity(raw_notes.len());
        let mut av_table = HashMap::with_capacity(raw_notes.len());
        let mut hashes = Vec::with_capacity(raw_notes.len());
        let mut collisions = 0;

        for raw in raw_notes {
            let (cents, equaves_adjusted) = equave::normalize(raw.raw_cents, equave_size)?;
            let note = XenNote::new(raw.nominal, raw.ordered_symbols);
            if notes_table.contains_key(&note.hash) {
                collisions += 1;
                debug!(
                    "spelling {} (vector {:?}) already declared, keeping first",
                    note.hash, raw.vector
                );
                continue;
            }
            let hash = note.hash.clone();
            tuning_table.insert(
                hash.clone(),
                TuningEntry {
                    cents,
                    equaves_adjusted,
                },
            );
            av_table.insert(hash.clone(), raw.vector);
            notes_table.insert(hash.clone(), note);
            hashes.push(hash);
        }

        let stepwise_entries: Vec<(String, f64)> = hashes
            .iter()
            .map(|h| (h.clone(), tuning_table[h].cents))
            .collect();
        let stepwise = StepwiseIndex::build(&stepwise_entries, options.enharmonic_tolerance);

        let overlay = LigatureOverlay::build(
            &ligatures,
            hashes.iter().map(|h| av_table[h].as_slice()),
        );

        let mut used_symbols: BTreeSet<SymbolCode> = chains
            .iter()
            .flat_map(|c| c.symbols_used.iter().copied())
            .collect();
        used_symbols.extend(ligatures.iter().flat_map(|l| l.symbols_used()));

        let mut display_hashes = HashMap::new();
        for hash in &hashes {
            let vector = &av_table[hash];
            if let Some(idx) = overlay.ligature_for(vector) {
                let symbols = spliced_symbols(&chains, &ligatures[idx], vector);
                let display = hash_of(notes_table[hash].nominal, multiset(&symbols).as_ref());
                if !notes_table.contains_key(&display) {
                    display_hashes.entry(display).or_insert_with(|| hash.clone());
                }
            }
        }

        debug!(
            "built tuning: {} nominals, {} chains, {} notes ({} collisions), {} stepwise classes, {} ligatured spellings",
            decl.nominals.len(),
            chains.len(),
            hashes.len(),
            collisions,
            stepwise.len(),
            overlay.len()
        );

        Ok(Self {
            notes_table,
            tuning_table,
            av_table,
            hashes,
            stepwise,
            chains,
            ligatures,
            overlay,
            display_hashes,
            nominals: decl.nominals.clone(),
            equave_size,
            reference: decl.reference,
            aux_list,
            used_symbols,
            collisions,
        })
    }

    /// Every spelling, keyed by hash.
    pub fn notes_table(&self) -> &HashMap<String, XenNote> {
        &self.notes_table
    }

    /// Tuning of every spelling, keyed by hash.
    pub fn tuning_table(&self) -> &HashMap<String, TuningEntry> {
        &self.tuning_table
    }

    /// Accidental vector of every spelling, keyed by hash.
    pub fn av_table(&self) -> &HashMap<String, AccidentalVector> {
        &self.av_table
    }

    /// All hashes in enumeration order.
    pub fn hashes(&self) -> &[String] {
        &self.hashes
    }

    /// Stepwise list, lookup and enharmonic graph.
    pub fn stepwise(&self) -> &StepwiseIndex {
        &self.stepwise
    }

    /// The spelling with `hash`.
    pub fn note(&self, hash: &str) -> Option<&XenNote> {
        self.notes_table.get(hash)
    }

    /// Tuning of `hash`.
    pub fn tuning(&self, hash: &str) -> Option<TuningEntry> {
        self.tuning_table.get(hash).copied()
    }

    /// Accidental vector of `hash`.
    pub fn vector(&self, hash: &str) -> Option<&[i32]> {
        self.av_table.get(hash).map(Vec::as_slice)
    }

    /// Accidental chains in declaration order.
    pub fn chains(&self) -> &[AccidentalChain] {
        &self.chains
    }

    /// Ligatures in declaration order.
    pub fn ligatures(&self) -> &[Ligature] {
        &self.ligatures
    }

    /// Cents of each nominal.
    pub fn nominals(&self) -> &[f64] {
        &self.nominals
    }

    /// Number of nominals per equave.
    pub fn num_nominals(&self) -> usize {
        self.nominals.len()
    }

    /// Equave width in cents.
    pub fn equave_size(&self) -> f64 {
        self.equave_size
    }

    /// Reference note for nominal 0.
    pub fn reference(&self) -> &ReferenceNote {
        &self.reference
    }

    /// Constant constrictions per aux operation. Entry 0 is always `None`.
    pub fn aux_list(&self) -> &[Option<Vec<usize>>] {
        &self.aux_list
    }

    /// Symbols that affect spelling. Anything else is ignored when reading notes.
    pub fn used_symbols(&self) -> &BTreeSet<SymbolCode> {
        &self.used_symbols
    }

    /// Enumerated spellings discarded because an earlier one had the same hash.
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Symbols to draw for `hash`, left to right, with ligatures applied.
    pub fn display_symbols(&self, hash: &str) -> Option<Vec<SymbolCode>> {
        let note = self.notes_table.get(hash)?;
        let vector = self.av_table.get(hash)?;
        Some(match self.overlay.ligature_for(vector) {
            Some(idx) => spliced_symbols(&self.chains, &self.ligatures[idx], vector),
            None => note.ordered_symbols.clone(),
        })
    }

    /// Find the spelling written as `nominal` with `symbols` (in any order).
    /// Unused symbols are ignored; ligature spellings are recognized.
    pub fn resolve_spelling(&self, nominal: usize, symbols: &[SymbolCode]) -> Option<&XenNote> {
        let relevant: Vec<SymbolCode> = symbols
            .iter()
            .copied()
            .filter(|s| self.used_symbols.contains(s))
            .collect();
        let hash = hash_of(nominal, multiset(&relevant).as_ref());
        self.notes_table.get(&hash).or_else(|| {
            self.display_hashes
                .get(&hash)
                .and_then(|canonical| self.notes_table.get(canonical))
        })
    }

    /// Frequency in Hz of `hash` written `equaves` equaves from the reference note.
    pub fn frequency(&self, hash: &str, equaves: i32) -> Option<f64> {
        let entry = self.tuning_table.get(hash)?;
        let cents =
            entry.cents + (entry.equaves_adjusted + equaves) as f64 * self.equave_size;
        Some(self.reference.freq_hz * 2f64.powf(cents / 1200.0))
    }

    /// Candidates for the next step from `hash` in `direction`, honouring the
    /// constant constrictions of aux operation `aux` (0 = unconstrained).
    ///
    /// Returns `Ok(None)` for an unknown hash or when no spelling anywhere
    /// satisfies the constrictions.
    pub fn step_candidates(
        &self,
        hash: &str,
        direction: StepDirection,
        aux: usize,
    ) -> Result<Option<StepCandidates>> {
        let constrictions = self
            .aux_list
            .get(aux)
            .ok_or(TuningError::UnknownAuxOperation {
                aux,
                available: self.aux_list.len(),
            })?
            .as_deref()
            .unwrap_or(&[]);

        let (Some(origin_class), Some(origin)) =
            (self.stepwise.class_of(hash), self.notes_table.get(hash))
        else {
            return Ok(None);
        };
        let origin_vector = &self.av_table[hash];
        let num_classes = self.stepwise.len() as i64;

        for step in 1..=num_classes {
            let offset = match direction {
                StepDirection::Up => step,
                StepDirection::Down => -step,
            };
            let target = origin_class as i64 + offset;
            let class_index = target.rem_euclid(num_classes) as usize;
            let equave_wrap = target.div_euclid(num_classes) as i32;

            let hashes: Vec<String> = self
                .stepwise
                .members(class_index)
                .unwrap_or(&[])
                .iter()
                .filter(|candidate| {
                    constrictions.iter().all(|&c| match c {
                        0 => self.notes_table[candidate.as_str()].nominal == origin.nominal,
                        n => self.av_table[candidate.as_str()][n - 1] == origin_vector[n - 1],
                    })
                })
                .cloned()
                .collect();

            if !hashes.is_empty() {
                return Ok(Some(StepCandidates {
                    class_index,
                    hashes,
                    equave_wrap,
                }));
            }
        }

        Ok(None)
    }
}

/// Ordered symbols for `vector` with `ligature` applied: its symbols sit at
/// its lowest regarded chain, other regarded chains draw nothing, and the
/// remaining chains keep their own symbols.
fn spliced_symbols(
    chains: &[AccidentalChain],
    ligature: &Ligature,
    vector: &[i32],
) -> Vec<SymbolCode> {
    let anchor = ligature.anchor();
    let mut symbols = Vec::new();
    for (i, (chain, &degree)) in chains.iter().zip(vector).enumerate() {
        if i == anchor {
            symbols.extend_from_slice(ligature.lookup(vector).unwrap_or(&[]));
        } else if !ligature.regarding.contains(&i) {
            symbols.extend_from_slice(chain.symbols_of(degree));
        }
    }
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolTable;

    const TWELVE: &str = "A4: 440\n0 200 300 500 700 800 1000 1200\nbb b (100) # x\n";

    fn build(text: &str) -> TuningConfig {
        TuningConfig::from_text(text, &SymbolTable::standard(), &EngineOptions::default()).unwrap()
    }

    #[test]
    fn test_twelve_edo_catalog() {
        let config = build(TWELVE);
        assert_eq!(config.notes_table().len(), 35);
        assert_eq!(config.hashes().len(), 35);
        assert_eq!(config.collisions(), 0);
        assert_eq!(config.stepwise().len(), 12);
        assert_eq!(config.num_nominals(), 7);
        assert_eq!(config.aux_list().len(), 1);
        assert!(config.aux_list()[0].is_none());
    }

    #[test]
    fn test_twelve_edo_enharmonics() {
        let config = build(TWELVE);
        // A, Bbb and Gx all sit at 0 cents
        let class = config.stepwise().class_of("0").unwrap();
        assert_eq!(class, 0);
        assert_eq!(
            config.stepwise().members(0).unwrap(),
            &["0".to_string(), "1 6 1".to_string(), "6 3 1".to_string()]
        );
        assert_eq!(config.tuning("6 3 1").unwrap().equaves_adjusted, 1);
        assert_eq!(config.stepwise().next_in_cycle("6 3 1"), Some("0"));

        // G# / Ab: only two spellings
        let gs = config.stepwise().class_of("6 4 1").unwrap();
        assert_eq!(config.stepwise().class_of("0 7 1"), Some(gs));
        assert_eq!(config.stepwise().members(gs).unwrap().len(), 2);
    }

    #[test]
    fn test_collision_keeps_first() {
        // two degrees spelled the same way: the second is a duplicate
        let config = build("A4: 440\n0 1200\n#(-50) () #(100)\n");
        assert_eq!(config.notes_table().len(), 2);
        assert_eq!(config.collisions(), 1);
        assert_eq!(config.tuning("0 4 1").unwrap().cents, 1150.0);
        assert_eq!(config.vector("0 4 1"), Some(&[-1][..]));
    }

    #[test]
    fn test_aux_validation() {
        let text = format!("{}aux(2)\n", TWELVE);
        match TuningConfig::from_text(&text, &SymbolTable::standard(), &EngineOptions::default()) {
            Err(TuningError::InvalidAuxConstriction { aux, index, max }) => {
                assert_eq!((aux, index, max), (1, 2, 1));
            }
            other => panic!("expected InvalidAuxConstriction, got {:?}", other),
        }
    }

    #[test]
    fn test_equave_non_positive() {
        let result = TuningConfig::from_text(
            "A4: 440\n0 0\nb (1) #\n",
            &SymbolTable::standard(),
            &EngineOptions::default(),
        );
        assert!(matches!(result, Err(TuningError::EquaveNonPositive { .. })));
    }

    #[test]
    fn test_nominal_too_far_from_reference() {
        let result = TuningConfig::from_text(
            "A4: 440\n0 3000000000 1\nb (100) #\n",
            &SymbolTable::standard(),
            &EngineOptions::default(),
        );
        assert!(matches!(result, Err(TuningError::CentsOutOfRange { .. })));
    }

    #[test]
    fn test_step_candidates_unconstrained() {
        let config = build(TWELVE);
        let up = config.step_candidates("0", StepDirection::Up, 0).unwrap().unwrap();
        assert_eq!(up.class_index, 1);
        assert_eq!(up.equave_wrap, 0);
        assert!(up.hashes.contains(&"0 4 1".to_string()));
        assert!(up.hashes.contains(&"1 7 1".to_string()));

        let down = config.step_candidates("0", StepDirection::Down, 0).unwrap().unwrap();
        assert_eq!(down.class_index, 11);
        assert_eq!(down.equave_wrap, -1);
    }

    #[test]
    fn test_step_candidates_constrained() {
        let text = format!("{}aux(0)\naux(1)\n", TWELVE);
        let config = build(&text);

        // nominal fixed: A -> A#
        let up = config.step_candidates("0", StepDirection::Up, 1).unwrap().unwrap();
        assert_eq!(up.hashes, vec!["0 4 1".to_string()]);

        // sharps/flats fixed: A -> B (natural), two classes up
        let up = config.step_candidates("0", StepDirection::Up, 2).unwrap().unwrap();
        assert_eq!(up.class_index, 2);
        assert_eq!(up.hashes, vec!["1".to_string()]);

        assert!(matches!(
            config.step_candidates("0", StepDirection::Up, 3),
            Err(TuningError::UnknownAuxOperation { aux: 3, available: 3 })
        ));
        assert_eq!(config.step_candidates("nope", StepDirection::Up, 0).unwrap(), None);
    }

    #[test]
    fn test_frequency() {
        let config = build(TWELVE);
        assert!((config.frequency("0", 0).unwrap() - 440.0).abs() < 1e-9);
        assert!((config.frequency("0", 1).unwrap() - 880.0).abs() < 1e-9);
        // Gx is written below A but wraps up to it
        assert!((config.frequency("6 3 1", 0).unwrap() - 880.0).abs() < 1e-9);
        assert!((config.frequency("6 3 1", -1).unwrap() - 440.0).abs() < 1e-9);
        assert_eq!(config.frequency("nope", 0), None);
    }

    #[test]
    fn test_resolve_spelling_ignores_unused_symbols() {
        let config = build(TWELVE);
        let note = config
            .resolve_spelling(3, &[SymbolCode(11), SymbolCode(4)])
            .unwrap();
        assert_eq!(note.hash, "3 4 1");
        assert!(config.resolve_spelling(3, &[SymbolCode(5)]).is_some());
        assert!(config.resolve_spelling(9, &[]).is_none());
    }
}
