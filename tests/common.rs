#![allow(dead_code)]

use xentune::{EngineOptions, SymbolCode, SymbolTable, TuningConfig};

/// Seven equal nominals with a +/-20 cent sharps/flats chain.
pub const SEVEN_EQUAL: &str = "
A4: 440
0 171.42857142857142 342.85714285714283 514.2857142857143 685.7142857142857 857.1428571428571 1028.5714285714284 1200
bb(-40) b(-20) () #(20) x(40)
";

/// 12-edo spelled with sharps and flats.
pub const TWELVE: &str = "
A4: 440
0 200 300 500 700 800 1000 1200
bb b (100) # x
";

/// 24-edo-ish: sharps/flats plus quarter-tone arrows, with ligatures and aux ops.
pub const ARROWS: &str = "
C4: 261.6256
0 200 400 500 700 900 1100 1200
bb b (100) # x
\\ (50) /
lig(1,2)
1 1 #+
-1 -1 db
lig(2,1)
1 1 ^
1 0 +
aux(0)
aux(1)
aux(2)
";

pub const SHARP: SymbolCode = SymbolCode(4);
pub const FLAT: SymbolCode = SymbolCode(7);
pub const DOUBLE_SHARP: SymbolCode = SymbolCode(3);
pub const DOUBLE_FLAT: SymbolCode = SymbolCode(6);
pub const UP: SymbolCode = SymbolCode(11);
pub const DOWN: SymbolCode = SymbolCode(12);

pub fn build(text: &str) -> TuningConfig {
    TuningConfig::from_text(text, &SymbolTable::standard(), &EngineOptions::default())
        .expect("declaration should build")
}

pub fn assert_cents(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {} cents, got {}",
        expected,
        actual
    );
}
