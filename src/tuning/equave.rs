//! Equave reduction.

use crate::error::{Result, TuningError};

/// Values this close below the equave are treated as the next equave's 0.
/// Guards against float noise (e.g. `-1e-13`) landing a note at the top
/// of the equave instead of the bottom.
const SNAP: f64 = 1e-9;

/// Reduce `raw_cents` into `[0, equave_size)`.
///
/// Returns `(cents, equaves_adjusted)` such that
/// `raw_cents == cents + equaves_adjusted * equave_size`. A positive
/// adjustment means equaves were subtracted.
pub fn normalize(raw_cents: f64, equave_size: f64) -> Result<(f64, i32)> {
    if !(equave_size > 0.0) {
        return Err(TuningError::EquaveNonPositive { equave_size });
    }

    let mut cents = raw_cents.rem_euclid(equave_size);
    let mut adjusted = ((raw_cents - cents) / equave_size).round();

    if equave_size - cents < SNAP {
        cents = 0.0;
        adjusted += 1.0;
    }

    if !(adjusted >= i32::MIN as f64 && adjusted <= i32::MAX as f64) {
        return Err(TuningError::CentsOutOfRange {
            raw_cents,
            equave_size,
        });
    }

    Ok((cents, adjusted as i32))
}
