//! Tuning declaration text
//!
//! ```text
//! // reference note, then nominals (the last value is the equave)
//! A4: 440
//! 0 200 300 500 700 800 1000 1200
//! // one line per accidental chain; `(step)` marks degree 0
//! bb b (100) # x
//! \ (25) /
//! // ligatures over chains 1 and 2 (1-based)
//! lig(1,2)
//! 1 1 #+
//! // auxiliary operations; 0 fixes the nominal, n fixes chain n
//! aux(0)
//! aux(1)
//! ```

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TuningError};
use crate::tuning::chain::{ChainDeclaration, DegreeEntry};
use crate::tuning::ligature::LigatureDeclaration;
use crate::tuning::reference::ReferenceNote;

/// A parsed but unresolved tuning declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TuningDeclaration {
    /// Reference note for nominal 0.
    pub reference: ReferenceNote,
    /// Cents of each nominal within the equave.
    pub nominals: Vec<f64>,
    /// Width of the equave in cents.
    pub equave_size: f64,
    /// Accidental chains in declaration order.
    pub chains: Vec<ChainDeclaration>,
    /// Ligatures in declaration order.
    pub ligatures: Vec<LigatureDeclaration>,
    /// Constant constrictions of aux operations 1, 2, ...
    pub aux: Vec<Vec<usize>>,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Reference,
    Nominals,
    Chains,
    Extras,
}

impl TuningDeclaration {
    /// Parse declaration text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut section = Section::Reference;
        let mut reference = ReferenceNote::default();
        let mut nominals = Vec::new();
        let mut equave_size = 0.0;
        let mut chains = Vec::new();
        let mut ligatures: Vec<LigatureDeclaration> = Vec::new();
        let mut in_ligature = false;
        let mut aux = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            trace!("declaration line {}: {}", line_no, line);

            match section {
                Section::Reference => {
                    reference = parse_reference(line, line_no)?;
                    section = Section::Nominals;
                }
                Section::Nominals => {
                    let values = parse_numbers(line, line_no)?;
                    if values.len() < 2 {
                        return Err(malformed(
                            line_no,
                            line,
                            "expected nominal cents followed by the equave size",
                        ));
                    }
                    equave_size = values[values.len() - 1];
                    nominals = values[..values.len() - 1].to_vec();
                    section = Section::Chains;
                }
                Section::Chains if !is_directive(line) => {
                    chains.push(parse_chain(line, line_no, chains.len())?);
                }
                Section::Chains | Section::Extras => {
                    if chains.is_empty() {
                        return Err(malformed(
                            line_no,
                            line,
                            "expected at least one accidental chain",
                        ));
                    }
                    section = Section::Extras;

                    if let Some(inner) = directive_args(line, "lig") {
                        let regarding = parse_ligature_header(inner, line_no, ligatures.len())?;
                        ligatures.push(LigatureDeclaration {
                            regarding,
                            entries: Vec::new(),
                        });
                        in_ligature = true;
                    } else if let Some(inner) = directive_args(line, "aux") {
                        aux.push(parse_index_list(inner, line_no)?);
                        in_ligature = false;
                    } else if let (true, Some(lig)) = (in_ligature, ligatures.last_mut()) {
                        lig.entries
                            .push(parse_ligature_row(line, line_no, lig.regarding.len())?);
                    } else {
                        return Err(malformed(
                            line_no,
                            line,
                            "expected `lig(...)`, `aux(...)` or a ligature row",
                        ));
                    }
                }
            }
        }

        match section {
            Section::Reference => Err(malformed(0, "", "missing reference note line")),
            Section::Nominals => Err(malformed(0, "", "missing nominals line")),
            Section::Chains if chains.is_empty() => {
                Err(malformed(0, "", "expected at least one accidental chain"))
            }
            _ => Ok(Self {
                reference,
                nominals,
                equave_size,
                chains,
                ligatures,
                aux,
            }),
        }
    }
}

fn malformed(line: usize, fragment: &str, reason: &str) -> TuningError {
    TuningError::MalformedDeclaration {
        line,
        fragment: fragment.to_string(),
        reason: reason.to_string(),
    }
}

fn is_directive(line: &str) -> bool {
    directive_args(line, "lig").is_some() || directive_args(line, "aux").is_some()
}

/// `name(args)` -> `args`.
fn directive_args<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    line.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// `A4: 440` or `c4: 261.63hz` style reference lines. Only natural letters
/// are accepted.
fn parse_reference(line: &str, line_no: usize) -> Result<ReferenceNote> {
    let (name, freq) = line
        .split_once(':')
        .ok_or_else(|| malformed(line_no, line, "expected `<note><octave>: <frequency>`"))?;

    let name = name.trim();
    let mut chars = name.chars();
    let letter = chars
        .next()
        .ok_or_else(|| malformed(line_no, line, "missing reference note name"))?;
    let octave: i32 = chars
        .as_str()
        .parse()
        .map_err(|_| malformed(line_no, name, "expected a note letter followed by an octave"))?;

    let freq = freq.trim().to_ascii_lowercase();
    let freq_str = freq.strip_suffix("hz").unwrap_or(&freq).trim();
    let freq_hz: f64 = freq_str
        .parse()
        .map_err(|_| malformed(line_no, freq_str, "expected a frequency in Hz"))?;
    if !(freq_hz.is_finite() && freq_hz > 0.0) {
        return Err(malformed(line_no, freq_str, "frequency must be positive"));
    }

    if !matches!(letter.to_ascii_lowercase(), 'a'..='g') {
        return Err(malformed(line_no, name, "note letter must be one of a-g"));
    }
    ReferenceNote::from_letter(letter, octave, freq_hz)
        .ok_or_else(|| malformed(line_no, name, "octave is out of range"))
}

fn parse_numbers(line: &str, line_no: usize) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| malformed(line_no, tok, "expected a number of cents"))
        })
        .collect()
}

fn parse_symbols(token: &str) -> Vec<String> {
    token
        .split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `bb b (100) # x` or `b(-113.7) () #(113.7)`.
fn parse_chain(line: &str, line_no: usize, chain: usize) -> Result<ChainDeclaration> {
    let chain_err = |reason: String| TuningError::MalformedChainDeclaration {
        chain,
        reason: format!("line {}: {}", line_no, reason),
    };

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let centrals: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.starts_with('('))
        .map(|(i, _)| i)
        .collect();
    let central_pos = match centrals.as_slice() {
        [] => return Err(TuningError::MissingCentralDegree { chain }),
        [pos] => *pos,
        _ => return Err(chain_err(format!("more than one central token in `{}`", line))),
    };

    let step = {
        let central = tokens[central_pos];
        let inner = central
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| chain_err(format!("bad central token `{}`", central)))?
            .trim();
        if inner.is_empty() {
            None
        } else {
            Some(
                inner
                    .parse::<f64>()
                    .map_err(|_| chain_err(format!("bad step size `{}`", central)))?,
            )
        }
    };

    let mut entries = Vec::with_capacity(tokens.len());
    for (pos, token) in tokens.iter().enumerate() {
        let degree = pos as i32 - central_pos as i32;
        if degree == 0 {
            entries.push(DegreeEntry {
                degree,
                symbols: Vec::new(),
                cents: 0.0,
            });
            continue;
        }

        let (symbols, explicit) = match token.split_once('(') {
            Some((symbols, rest)) => {
                let cents = rest
                    .strip_suffix(')')
                    .and_then(|c| c.trim().parse::<f64>().ok())
                    .ok_or_else(|| chain_err(format!("bad explicit tuning in `{}`", token)))?;
                (symbols, Some(cents))
            }
            None => (*token, None),
        };

        let symbols = parse_symbols(symbols);
        if symbols.is_empty() {
            return Err(chain_err(format!("degree {} has no symbols (`{}`)", degree, token)));
        }
        let cents = explicit
            .or_else(|| step.map(|s| s * degree as f64))
            .ok_or_else(|| {
                chain_err(format!(
                    "degree {} (`{}`) has no tuning and the chain has no step size",
                    degree, token
                ))
            })?;

        entries.push(DegreeEntry {
            degree,
            symbols,
            cents,
        });
    }

    Ok(ChainDeclaration { entries })
}

fn parse_index_list(inner: &str, line_no: usize) -> Result<Vec<usize>> {
    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| malformed(line_no, s, "expected a non-negative index"))
        })
        .collect()
}

/// 1-based chain numbers -> 0-based chain indices.
fn parse_ligature_header(inner: &str, line_no: usize, ligature: usize) -> Result<Vec<usize>> {
    parse_index_list(inner, line_no)?
        .into_iter()
        .map(|n| {
            n.checked_sub(1).ok_or_else(|| TuningError::InvalidLigatureSubset {
                ligature,
                reason: "chain numbers start at 1".to_string(),
            })
        })
        .collect()
}

fn parse_ligature_row(line: &str, line_no: usize, arity: usize) -> Result<(Vec<i32>, Vec<String>)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != arity + 1 {
        return Err(malformed(
            line_no,
            line,
            &format!("expected {} degrees followed by the ligature symbols", arity),
        ));
    }
    let degrees = tokens[..arity]
        .iter()
        .map(|t| {
            t.parse::<i32>()
                .map_err(|_| malformed(line_no, t, "expected an integer chain degree"))
        })
        .collect::<Result<Vec<_>>>()?;
    let symbols = parse_symbols(tokens[arity]);
    if symbols.is_empty() {
        return Err(malformed(line_no, tokens[arity], "ligature has no symbols"));
    }
    Ok((degrees, symbols))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWELVE: &str = "
// 12edo spelled with sharps and flats
A4: 440
0 200 300 500 700 800 1000 1200
bb b (100) # x
";

    #[test]
    fn test_parse_basic() {
        let decl = TuningDeclaration::parse(TWELVE).unwrap();
        assert_eq!(decl.reference, ReferenceNote::default());
        assert_eq!(decl.nominals, vec![0.0, 200.0, 300.0, 500.0, 700.0, 800.0, 1000.0]);
        assert_eq!(decl.equave_size, 1200.0);
        assert_eq!(decl.chains.len(), 1);

        let entries = &decl.chains[0].entries;
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0], DegreeEntry::new(-2, &["bb"], -200.0));
        assert_eq!(entries[2], DegreeEntry::new(0, &[], 0.0));
        assert_eq!(entries[4], DegreeEntry::new(2, &["x"], 200.0));
        assert!(decl.ligatures.is_empty());
        assert!(decl.aux.is_empty());
    }

    #[test]
    fn test_explicit_tunings_and_compound_symbols() {
        let decl = TuningDeclaration::parse(
            "C4: 261.63Hz\n0 1200\nb.\\(-120) (10) #.# /(7.5)\n",
        )
        .unwrap();
        assert_eq!(decl.reference.midi_note, 60);
        let entries = &decl.chains[0].entries;
        assert_eq!(entries[0], DegreeEntry::new(-1, &["b", "\\"], -120.0));
        assert_eq!(entries[2], DegreeEntry::new(1, &["#", "#"], 10.0));
        assert_eq!(entries[3], DegreeEntry::new(2, &["/"], 7.5));
    }

    #[test]
    fn test_ligatures_and_aux() {
        let text = format!("{}\\ (25) /\nlig(1, 2)\n1 1 #+\n-1 -1 db\naux(0)\naux()\naux(1,2)\n", TWELVE);
        let decl = TuningDeclaration::parse(&text).unwrap();
        assert_eq!(decl.chains.len(), 2);
        assert_eq!(decl.ligatures.len(), 1);
        assert_eq!(decl.ligatures[0].regarding, vec![0, 1]);
        assert_eq!(
            decl.ligatures[0].entries,
            vec![
                (vec![1, 1], vec!["#+".to_string()]),
                (vec![-1, -1], vec!["db".to_string()]),
            ]
        );
        assert_eq!(decl.aux, vec![vec![0], vec![], vec![1, 2]]);
    }

    #[test]
    fn test_missing_lines() {
        assert!(matches!(
            TuningDeclaration::parse(""),
            Err(TuningError::MalformedDeclaration { .. })
        ));
        assert!(matches!(
            TuningDeclaration::parse("A4: 440\n"),
            Err(TuningError::MalformedDeclaration { .. })
        ));
        assert!(matches!(
            TuningDeclaration::parse("A4: 440\n0 1200\n"),
            Err(TuningError::MalformedDeclaration { .. })
        ));
        assert!(matches!(
            TuningDeclaration::parse("A4: 440\n0 1200\naux(0)\n"),
            Err(TuningError::MalformedDeclaration { .. })
        ));
    }

    #[test]
    fn test_bad_reference() {
        for text in [
            "A: 440\n",
            "H4: 440\n",
            "A4 440\n",
            "A4: -3\n",
            "A4: loud\n",
            "A2147483647: 440\n",
            "c-2147483648: 440\n",
        ] {
            assert!(
                matches!(
                    TuningDeclaration::parse(text),
                    Err(TuningError::MalformedDeclaration { line: 1, .. })
                ),
                "accepted {:?}",
                text
            );
        }
    }

    #[test]
    fn test_huge_octave_names_fragment() {
        match TuningDeclaration::parse("A2147483647: 440\n0 1200\nb (100) #\n") {
            Err(TuningError::MalformedDeclaration { line, fragment, .. }) => {
                assert_eq!(line, 1);
                assert_eq!(fragment, "A2147483647");
            }
            other => panic!("expected MalformedDeclaration, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_nominals() {
        match TuningDeclaration::parse("A4: 440\n0 abc 1200\nb (1) #\n") {
            Err(TuningError::MalformedDeclaration { line, fragment, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(fragment, "abc");
            }
            other => panic!("expected MalformedDeclaration, got {:?}", other),
        }
        assert!(TuningDeclaration::parse("A4: 440\n1200\nb (1) #\n").is_err());
    }

    #[test]
    fn test_chain_errors() {
        assert!(matches!(
            TuningDeclaration::parse("A4: 440\n0 1200\nb #\n"),
            Err(TuningError::MissingCentralDegree { chain: 0 })
        ));
        assert!(matches!(
            TuningDeclaration::parse("A4: 440\n0 1200\nb (1) # (2)\n"),
            Err(TuningError::MalformedChainDeclaration { chain: 0, .. })
        ));
        assert!(matches!(
            TuningDeclaration::parse("A4: 440\n0 1200\nb (1) #\nb () #\n"),
            Err(TuningError::MalformedChainDeclaration { chain: 1, .. })
        ));
        assert!(matches!(
            TuningDeclaration::parse("A4: 440\n0 1200\nb(x) (1) #\n"),
            Err(TuningError::MalformedChainDeclaration { .. })
        ));
    }

    #[test]
    fn test_ligature_errors() {
        let base = "A4: 440\n0 1200\nb (1) #\n";
        assert!(matches!(
            TuningDeclaration::parse(&format!("{}lig(0)\n", base)),
            Err(TuningError::InvalidLigatureSubset { .. })
        ));
        assert!(matches!(
            TuningDeclaration::parse(&format!("{}lig(1)\n1 2 #\n", base)),
            Err(TuningError::MalformedDeclaration { line: 5, .. })
        ));
        assert!(matches!(
            TuningDeclaration::parse(&format!("{}1 #\n", base)),
            Err(TuningError::MalformedChainDeclaration { .. })
                | Err(TuningError::MissingCentralDegree { .. })
        ));
        assert!(matches!(
            TuningDeclaration::parse(&format!("{}aux(0)\n1 #\n", base)),
            Err(TuningError::MalformedDeclaration { line: 5, .. })
        ));
    }
}
