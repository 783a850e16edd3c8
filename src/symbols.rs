//! Accidental symbol codes and the resolver that maps textual tokens to them.
//!
//! A single [`SymbolCode`] stands for every internal name/glyph that looks
//! identical on the page, so the lookup is many-to-one.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TuningError};

/// Identifies one visually unique accidental symbol. Codes start at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolCode(pub u32);

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps a symbol token to its [`SymbolCode`].
pub trait SymbolResolver {
    /// Resolve `token`, failing with [`TuningError::UnknownSymbol`] if it is not known.
    fn resolve(&self, token: &str) -> Result<SymbolCode>;
}

/// Built-in text codes: (code, labels). The first label is the display label.
const STANDARD_SYMBOLS: &[(u32, &[&str])] = &[
    (1, &["#x", "SHARP_SHARP_SHARP", "accidentalTripleSharp"]),
    (2, &["#+", "SHARP_ARROW_UP", "accidentalThreeQuarterTonesSharpStein"]),
    (3, &["x", "SHARP2", "accidentalDoubleSharp"]),
    (4, &["#", "SHARP", "accidentalSharp"]),
    (5, &["+", "SHARP_SLASH", "accidentalQuarterToneSharpStein"]),
    (6, &["bb", "FLAT2", "accidentalDoubleFlat"]),
    (7, &["b", "FLAT", "accidentalFlat"]),
    (8, &["db", "MIRRORED_FLAT2", "accidentalThreeQuarterTonesFlatZimmermann"]),
    (9, &["bbb", "FLAT_FLAT_FLAT", "accidentalTripleFlat"]),
    (10, &["d", "MIRRORED_FLAT", "accidentalQuarterToneFlatStein"]),
    (11, &["/", "ARROW_UP", "accidentalArrowUp"]),
    (12, &["\\", "ARROW_DOWN", "accidentalArrowDown"]),
    (13, &["^", "SYNTONIC_COMMA_UP", "accidentalRaiseOneSeptimalComma"]),
    (14, &["v", "SYNTONIC_COMMA_DOWN", "accidentalLowerOneSeptimalComma"]),
];

/// One entry of a symbol table resource.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// The code every label maps to.
    pub code: u32,
    /// All labels for this code; the first is used for display.
    pub labels: Vec<String>,
}

#[derive(Deserialize)]
struct SymbolTableFile {
    symbol: Vec<SymbolEntry>,
}

/// Label lookup backed by an inverted code -> labels list.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    labels_to_code: HashMap<String, SymbolCode>,
    code_to_labels: HashMap<SymbolCode, Vec<String>>,
}

impl SymbolTable {
    /// Build from (code, labels) entries. Later entries win on label clashes.
    /// Code 0 is reserved and rejected.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = SymbolEntry>,
    {
        let mut table = SymbolTable::default();
        for entry in entries {
            if entry.code == 0 {
                return Err(TuningError::InvalidSymbolEntry {
                    labels: entry.labels,
                    reason: "symbol codes start at 1".to_string(),
                });
            }
            table.insert(entry);
        }
        Ok(table)
    }

    /// Parse a TOML resource of `[[symbol]]` tables.
    pub fn from_toml_str(data: &str) -> Result<Self> {
        let file: SymbolTableFile = toml::from_str(data)?;
        Self::from_entries(file.symbol)
    }

    /// Small built-in table of common text codes.
    pub fn standard() -> Self {
        let mut table = SymbolTable::default();
        for (code, labels) in STANDARD_SYMBOLS {
            table.insert(SymbolEntry {
                code: *code,
                labels: labels.iter().map(|l| l.to_string()).collect(),
            });
        }
        table
    }

    fn insert(&mut self, entry: SymbolEntry) {
        let code = SymbolCode(entry.code);
        for label in &entry.labels {
            self.labels_to_code.insert(label.clone(), code);
        }
        self.code_to_labels
            .entry(code)
            .or_default()
            .extend(entry.labels);
    }

    /// Display label for `code`, if the table knows it.
    pub fn label(&self, code: SymbolCode) -> Option<&str> {
        self.code_to_labels
            .get(&code)
            .and_then(|labels| labels.first())
            .map(String::as_str)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels_to_code.len()
    }

    /// True if the table knows no labels.
    pub fn is_empty(&self) -> bool {
        self.labels_to_code.is_empty()
    }
}

impl SymbolResolver for SymbolTable {
    fn resolve(&self, token: &str) -> Result<SymbolCode> {
        self.labels_to_code
            .get(token)
            .copied()
            .ok_or_else(|| TuningError::UnknownSymbol {
                token: token.to_string(),
            })
    }
}
