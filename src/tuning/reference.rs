//! Reference note: which written note nominal 0 sits on, and its frequency.

use serde::{Deserialize, Serialize};

/// 12-edo letter -> nominals from A.
const LETTERS_TO_NOMINAL: [(char, i32); 7] = [
    ('a', 0),
    ('b', 1),
    ('c', 2),
    ('d', 3),
    ('e', 4),
    ('f', 5),
    ('g', 6),
];

/// 12-edo letter -> semitones from A (within the A-based octave).
const LETTERS_TO_SEMITONES: [(char, i32); 7] = [
    ('a', 0),
    ('b', 2),
    ('c', -9),
    ('d', -7),
    ('e', -5),
    ('f', -4),
    ('g', -2),
];

/// The reference note of a tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceNote {
    /// MIDI note number of the reference note.
    pub midi_note: i32,
    /// 12-edo nominals (letter steps) from A4. Negative below A4.
    pub nominals_from_a4: i32,
    /// Frequency of the reference note in Hz.
    pub freq_hz: f64,
}

impl Default for ReferenceNote {
    fn default() -> Self {
        Self {
            midi_note: 69,
            nominals_from_a4: 0,
            freq_hz: 440.0,
        }
    }
}

impl ReferenceNote {
    /// Reference note from a letter (a-g, any case), a scientific-pitch
    /// octave and a frequency. Returns `None` for an unknown letter or an
    /// octave too far from A4 to number.
    pub fn from_letter(letter: char, octave: i32, freq_hz: f64) -> Option<Self> {
        let letter = letter.to_ascii_lowercase();
        let nominal = lookup(&LETTERS_TO_NOMINAL, letter)?;
        let semitones = lookup(&LETTERS_TO_SEMITONES, letter)?;

        // Octave numbers change at C, but the A-based octave changes at A,
        // so C..G belong to the A-octave below.
        let below_a = if semitones < 0 { 7 } else { 0 };
        let octaves = octave.checked_sub(4)?;

        Some(Self {
            midi_note: octaves.checked_mul(12)?.checked_add(69 + semitones)?,
            nominals_from_a4: octaves.checked_mul(7)?.checked_add(nominal - below_a)?,
            freq_hz,
        })
    }
}

fn lookup(table: &[(char, i32)], letter: char) -> Option<i32> {
    table.iter().find(|(l, _)| *l == letter).map(|(_, v)| *v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4() {
        let reference = ReferenceNote::from_letter('A', 4, 440.0).unwrap();
        assert_eq!(reference, ReferenceNote::default());
    }

    #[test]
    fn test_c4() {
        let reference = ReferenceNote::from_letter('c', 4, 261.63).unwrap();
        assert_eq!(reference.midi_note, 60);
        assert_eq!(reference.nominals_from_a4, -5);
    }

    #[test]
    fn test_other_octaves() {
        let b3 = ReferenceNote::from_letter('b', 3, 246.94).unwrap();
        assert_eq!(b3.midi_note, 59);
        assert_eq!(b3.nominals_from_a4, -6);

        let g5 = ReferenceNote::from_letter('g', 5, 783.99).unwrap();
        assert_eq!(g5.midi_note, 79);
        assert_eq!(g5.nominals_from_a4, 6);
    }

    #[test]
    fn test_unknown_letter() {
        assert!(ReferenceNote::from_letter('h', 4, 440.0).is_none());
    }

    #[test]
    fn test_extreme_octaves() {
        assert!(ReferenceNote::from_letter('a', i32::MAX, 440.0).is_none());
        assert!(ReferenceNote::from_letter('c', i32::MIN, 440.0).is_none());
        let low = ReferenceNote::from_letter('a', -1, 13.75).unwrap();
        assert_eq!(low.midi_note, 9);
        assert_eq!(low.nominals_from_a4, -35);
    }
}
