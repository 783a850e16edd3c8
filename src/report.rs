use std::fmt::Write;

use anyhow::{anyhow, Result};
use xentune::{StepDirection, SymbolCode, SymbolTable, TuningConfig};

/// Symbols as their display labels, `[code]` for labels the table lacks.
fn spell(symbols: &[SymbolCode], table: &SymbolTable) -> String {
    symbols
        .iter()
        .map(|&code| match table.label(code) {
            Some(label) => label.to_string(),
            None => format!("[{}]", code),
        })
        .collect()
}

/// `nominal` followed by its displayed accidentals.
fn note_name(config: &TuningConfig, table: &SymbolTable, hash: &str) -> String {
    match (config.note(hash), config.display_symbols(hash)) {
        (Some(note), Some(symbols)) => format!("{}{}", note.nominal, spell(&symbols, table)),
        _ => hash.to_string(),
    }
}

pub fn summary(config: &TuningConfig, table: &SymbolTable) -> String {
    let mut ret = String::new();
    let reference = config.reference();
    let nominals: Vec<String> = config.nominals().iter().map(|c| format!("{:.3}", c)).collect();

    let _ = writeln!(
        ret,
        "reference: MIDI {} at {:.3} Hz ({} nominals from A4)",
        reference.midi_note, reference.freq_hz, reference.nominals_from_a4
    );
    let _ = writeln!(ret, "equave: {:.3} cents", config.equave_size());
    let _ = writeln!(ret, "nominals ({}): {}", config.num_nominals(), nominals.join(" "));

    for (i, chain) in config.chains().iter().enumerate() {
        let degrees: Vec<String> = (chain.min_degree()..=chain.max_degree())
            .map(|d| {
                let symbols = spell(chain.symbols_of(d), table);
                let cents = chain.cents_of(d).unwrap_or(0.0);
                if d == 0 {
                    format!("({:.3})", cents)
                } else {
                    format!("{}({:.3})", symbols, cents)
                }
            })
            .collect();
        let _ = writeln!(ret, "chain {}: {}", i + 1, degrees.join(" "));
    }

    let _ = writeln!(ret, "ligatures: {}", config.ligatures().len());
    let _ = writeln!(ret, "aux operations: {}", config.aux_list().len() - 1);
    let _ = writeln!(
        ret,
        "spellings: {} ({} duplicate spellings dropped)",
        config.hashes().len(),
        config.collisions()
    );
    let _ = writeln!(ret, "stepwise classes: {}", config.stepwise().len());
    ret
}

pub fn steps(config: &TuningConfig, table: &SymbolTable) -> String {
    let mut ret = String::new();
    for (i, class) in config.stepwise().classes().iter().enumerate() {
        let cents = class
            .first()
            .and_then(|h| config.tuning(h))
            .map(|t| t.cents)
            .unwrap_or(0.0);
        let names: Vec<String> = class.iter().map(|h| note_name(config, table, h)).collect();
        let _ = writeln!(ret, "{:>4} {:>10.3}c  {}", i, cents, names.join(" | "));
    }
    ret
}

pub fn note(config: &TuningConfig, table: &SymbolTable, hash: &str, aux: usize) -> Result<String> {
    let note = config
        .note(hash)
        .ok_or_else(|| anyhow!("no spelling with hash '{}'", hash))?;
    let tuning = config
        .tuning(hash)
        .ok_or_else(|| anyhow!("no tuning for hash '{}'", hash))?;

    let mut ret = String::new();
    let _ = writeln!(ret, "hash: {}", note.hash);
    let _ = writeln!(ret, "spelling: {}", note_name(config, table, hash));
    let _ = writeln!(
        ret,
        "cents: {:.3} (equaves adjusted: {})",
        tuning.cents, tuning.equaves_adjusted
    );
    let _ = writeln!(ret, "vector: {:?}", config.vector(hash).unwrap_or(&[]));
    if let Some(class) = config.stepwise().class_of(hash) {
        let _ = writeln!(ret, "class: {} of {}", class, config.stepwise().len());
    }
    if let Some(freq) = config.frequency(hash, 0) {
        let _ = writeln!(ret, "frequency: {:.3} Hz", freq);
    }
    match config.stepwise().next_in_cycle(hash) {
        Some(next) => {
            let _ = writeln!(ret, "enharmonic: {}", note_name(config, table, next));
        }
        None => {
            let _ = writeln!(ret, "enharmonic: none");
        }
    }

    for (label, direction) in [("up", StepDirection::Up), ("down", StepDirection::Down)] {
        match config.step_candidates(hash, direction, aux)? {
            Some(step) => {
                let names: Vec<String> = step
                    .hashes
                    .iter()
                    .map(|h| note_name(config, table, h))
                    .collect();
                let _ = writeln!(
                    ret,
                    "{}: {} (equave {:+})",
                    label,
                    names.join(" | "),
                    step.equave_wrap
                );
            }
            None => {
                let _ = writeln!(ret, "{}: none", label);
            }
        }
    }

    Ok(ret)
}
