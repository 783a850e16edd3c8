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

//! Microtonal tuning configuration engine.
//!
//! This crate compiles a declarative tuning (nominals, an equave, and stacked
//! chains of accidental symbols) into:
//!
//! - a catalog of every distinguishable spelling within one equave,
//! - the cents tuning of each spelling,
//! - an ascending-pitch list of enharmonic classes with its reverse lookup,
//! - a cyclic successor graph for enharmonic respelling.
//!
//! ```
//! use xentune::{EngineOptions, SymbolTable, TuningConfig};
//!
//! let text = "A4: 440\n0 200 300 500 700 800 1000 1200\nbb b (100) # x\n";
//! let config = TuningConfig::from_text(text, &SymbolTable::standard(), &EngineOptions::default())
//!     .unwrap();
//!
//! // A# and Bb sound the same
//! let stepwise = config.stepwise();
//! assert_eq!(stepwise.class_of("0 4 1"), stepwise.class_of("1 7 1"));
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod declaration;
pub mod error;
pub mod options;
pub mod symbols;
pub mod tuning;

pub use cache::TuningCache;
pub use declaration::TuningDeclaration;
pub use error::{Result, TuningError};
pub use options::EngineOptions;
pub use symbols::{SymbolCode, SymbolResolver, SymbolTable};
pub use tuning::{StepCandidates, StepDirection, TuningConfig, TuningEntry, XenNote};
