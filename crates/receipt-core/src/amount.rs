//! Money amounts and their extraction from recognized receipt text.
//!
//! Amounts are stored as integer centavos so arithmetic and comparisons are
//! exact. Extraction runs an ordered cascade of patterns over the text: a
//! keyword-cued amount ("Monto: Bs. 150.00") beats a bare currency-marked
//! number ("Bs 75") anywhere in the text, which in turn beats a number that
//! precedes its marker ("150 Bs"). Text with no recognizable amount yields
//! `None`; that is a normal outcome for a blurry photo, not an error.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

macro_rules! re {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("invalid regex"))
        }
    };
}

// Keyword cue, then a currency marker, then the number, all on one line.
re!(
    re_cued_amount,
    r"(?i)\b(?:pag[oó]|monto\s+a\s+transferir|importe\s+pagado|la\s+suma\s+de|monto)\b.*?\b(?:bs|bolivianos)\.?\s*(\d+(?:[.,]\d{2})?)\b"
);

// A currency marker directly followed by the number.
re!(
    re_marked_amount,
    r"(?i)\b(?:bs|bolivianos)\.?\s*(\d+(?:[.,]\d{2})?)\b"
);

// The number first, marker after, as some banks print it.
re!(
    re_trailing_marker,
    r"(?i)\b(\d+(?:[.,]\d{2})?)\s*(?:bs|bolivianos)\b"
);

/// One entry of the extraction cascade. The first capture group of the
/// pattern is the amount candidate.
struct Cue {
    name: &'static str,
    regex: fn() -> &'static Regex,
}

/// Patterns in priority order. Each pattern is tried against every line of
/// the text before the cascade falls through to the next one, so a
/// higher-priority pattern late in the receipt beats a lower-priority one
/// near the top.
const CASCADE: &[Cue] = &[
    Cue {
        name: "keyword-cued amount",
        regex: re_cued_amount,
    },
    Cue {
        name: "currency-marked amount",
        regex: re_marked_amount,
    },
    Cue {
        name: "amount before marker",
        regex: re_trailing_marker,
    },
];

/// A money amount in centavos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const fn from_centavos(centavos: i64) -> Self {
        Self(centavos)
    }

    pub const fn centavos(self) -> i64 {
        self.0
    }

    /// Parse a numeral like `150.00`, `99,50` or `75` into an amount.
    ///
    /// Both `.` and `,` are accepted as the decimal separator. Negative or
    /// unparseable input yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().replace(',', ".");
        let value = Decimal::from_str(&normalized).ok()?;
        if value.is_sign_negative() {
            return None;
        }
        (value * Decimal::ONE_HUNDRED).round().to_i64().map(Self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Amount::parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid amount: {raw}")))
    }
}

/// Extract the paid amount from recognized receipt text.
///
/// Returns `None` when no pattern matches anywhere in the text.
pub fn extract_amount(text: &str) -> Option<Amount> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    for cue in CASCADE {
        let regex = (cue.regex)();
        for line in &lines {
            let Some(captures) = regex.captures(line) else {
                continue;
            };
            let Some(candidate) = captures.get(1) else {
                continue;
            };
            if let Some(amount) = Amount::parse(candidate.as_str()) {
                debug!(
                    pattern = cue.name,
                    line = *line,
                    amount = %amount,
                    "extracted amount from receipt text"
                );
                return Some(amount);
            }
        }
    }
    None
}
