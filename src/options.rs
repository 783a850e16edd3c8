//! Engine options supplied by the host.

use serde::{Deserialize, Serialize};

/// Default enharmonic tolerance in cents.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Default ceiling on enumerated candidate notes.
pub const DEFAULT_MAX_CANDIDATES: usize = 2_000_000;

/// Knobs controlling how a declaration is compiled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Spellings within this many cents of a class's first member are enharmonic.
    ///
    /// Classes are grouped within one equave and do not wrap: a spelling just
    /// below the equave (e.g. 1199.996 cents) stays separate from one at 0
    /// even when the gap across the boundary is within tolerance. Only float
    /// noise under 1e-9 cents is folded onto 0 during equave reduction.
    pub enharmonic_tolerance: f64,
    /// If set, chains are only enumerated over degrees `-max_degree..=max_degree`.
    pub max_degree: Option<u32>,
    /// Builds that would enumerate more candidates than this fail.
    pub max_candidates: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            enharmonic_tolerance: DEFAULT_TOLERANCE,
            max_degree: None,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options_fill_defaults() {
        let options: EngineOptions = toml::from_str("max_degree = 2").unwrap();
        assert_eq!(options.max_degree, Some(2));
        assert_eq!(options.enharmonic_tolerance, DEFAULT_TOLERANCE);
        assert_eq!(options.max_candidates, DEFAULT_MAX_CANDIDATES);
    }
}
