//! Errors raised while compiling a tuning declaration.
//!
//! Every build failure is fatal to that build attempt only: nothing partial
//! is ever returned or cached.

use thiserror::Error;

/// Errors returned by the tuning engine.
#[derive(Debug, Error)]
pub enum TuningError {
    /// An accidental chain has a gap, a duplicate degree, or an unusable entry.
    #[error("malformed accidental chain {chain}: {reason}")]
    MalformedChainDeclaration {
        /// 0-based index of the offending chain.
        chain: usize,
        /// What is wrong with it, including the offending fragment.
        reason: String,
    },

    /// An accidental chain declares no degree 0.
    #[error("accidental chain {chain} has no central (degree 0) entry")]
    MissingCentralDegree {
        /// 0-based index of the offending chain.
        chain: usize,
    },

    /// A symbol token is not known to the symbol resolver.
    #[error("unknown accidental symbol `{token}`")]
    UnknownSymbol {
        /// The unrecognized token, verbatim.
        token: String,
    },

    /// The equave must be a positive number of cents.
    #[error("equave size must be positive (got {equave_size} cents)")]
    EquaveNonPositive {
        /// The declared equave size.
        equave_size: f64,
    },

    /// A note's raw cents lie too many equaves away from the reference to count.
    #[error("{raw_cents} cents is out of range for an equave of {equave_size} cents")]
    CentsOutOfRange {
        /// The unreduced cents value.
        raw_cents: f64,
        /// The declared equave size.
        equave_size: f64,
    },

    /// A ligature refers to a chain that does not exist (or is otherwise unusable).
    #[error("ligature {ligature} has an invalid chain subset: {reason}")]
    InvalidLigatureSubset {
        /// 0-based index of the ligature in declaration order.
        ligature: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// General syntax error in the declaration text.
    #[error("line {line}: {reason} (at `{fragment}`)")]
    MalformedDeclaration {
        /// 1-based line number in the declaration text.
        line: usize,
        /// The offending fragment.
        fragment: String,
        /// What was expected.
        reason: String,
    },

    /// An auxiliary operation constrains a chain that does not exist.
    #[error("aux operation {aux} constrains index {index}, but only 0..={max} are valid")]
    InvalidAuxConstriction {
        /// 1-based aux operation number.
        aux: usize,
        /// The offending constriction index.
        index: usize,
        /// Largest valid index (the number of chains).
        max: usize,
    },

    /// The cartesian product of nominals and chain degrees is larger than allowed.
    #[error("tuning would enumerate {candidates} candidate notes (limit is {limit})")]
    EnumerationLimitExceeded {
        /// Number of candidates the declaration would produce.
        candidates: u128,
        /// The configured ceiling.
        limit: usize,
    },

    /// A string is not a canonical note hash.
    #[error("malformed note hash `{hash}`")]
    MalformedHash {
        /// The string that failed to decode.
        hash: String,
    },

    /// A stepwise query named an aux operation that was never declared.
    #[error("aux operation {aux} is not declared (have {available})")]
    UnknownAuxOperation {
        /// The requested aux operation.
        aux: usize,
        /// How many aux operations exist, including the reserved operation 0.
        available: usize,
    },

    /// A symbol table entry is unusable.
    #[error("invalid symbol table entry {labels:?}: {reason}")]
    InvalidSymbolEntry {
        /// Labels of the offending entry.
        labels: Vec<String>,
        /// What is wrong with it.
        reason: String,
    },

    /// A symbol table resource could not be parsed.
    #[error("invalid symbol table: {0}")]
    SymbolTableFormat(#[from] toml::de::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TuningError>;
