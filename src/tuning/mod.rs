//! Tuning configuration engine
//!
//! Compiles a declaration into a catalog of spellings, their tunings, and the
//! stepwise/enharmonic indices used for transposition and respelling.
//!
//! Pipeline: [`chain`] -> [`enumerate`] -> [`equave`] -> [`hash`] ->
//! [`stepwise`], with [`ligature`] producing a display overlay. [`config`]
//! drives it and holds the result.

pub mod chain;
pub mod config;
pub mod enumerate;
pub mod equave;
pub mod hash;
pub mod ligature;
pub mod reference;
pub mod stepwise;

pub use chain::{AccidentalChain, ChainDeclaration, DegreeEntry};
pub use config::{StepCandidates, StepDirection, TuningConfig, TuningEntry};
pub use enumerate::AccidentalVector;
pub use hash::{parse_hash, AccidentalSymbols, XenNote};
pub use ligature::{Ligature, LigatureDeclaration};
pub use reference::ReferenceNote;
pub use stepwise::StepwiseIndex;
