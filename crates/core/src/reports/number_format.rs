//! Deterministic amount formatting for report cells.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// How negative amounts are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeFormat {
    /// `-1,000.00`
    #[default]
    Minus,
    /// `(1,000.00)`
    Parentheses,
}

/// Amount formatting options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    /// Digits after the decimal point.
    pub precision: u32,
    /// Group separator for the integer part; `None` disables grouping.
    pub thousands_separator: Option<char>,
    /// Render zero amounts as an empty string.
    pub hide_zero: bool,
    /// Negative amount style.
    pub negative: NegativeFormat,
    /// Currency code prefixed to every amount.
    pub currency_code: Option<String>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            precision: 2,
            thousands_separator: Some(','),
            hide_zero: false,
            negative: NegativeFormat::Minus,
            currency_code: None,
        }
    }
}

impl NumberFormat {
    /// Largest supported precision.
    pub const MAX_PRECISION: u32 = 10;

    /// Default format with the given precision.
    #[must_use]
    pub fn with_precision(precision: u32) -> Self {
        Self {
            precision: precision.min(Self::MAX_PRECISION),
            ..Self::default()
        }
    }

    /// Formats an amount.
    ///
    /// Rounds half away from zero. An amount that rounds to zero is never
    /// written with a sign.
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        let precision = self.precision.min(Self::MAX_PRECISION);
        let mut rounded =
            amount.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);

        if rounded.is_zero() {
            if self.hide_zero {
                return String::new();
            }
            rounded = Decimal::ZERO;
        }

        let negative = rounded.is_sign_negative();
        let mut magnitude = rounded.abs();
        magnitude.rescale(precision);
        let digits = magnitude.to_string();

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits.as_str(), None),
        };

        let mut body = self.group(int_part);
        if let Some(frac) = frac_part {
            body.push('.');
            body.push_str(frac);
        }
        if let Some(code) = &self.currency_code {
            body = format!("{code} {body}");
        }

        match (negative, self.negative) {
            (false, _) => body,
            (true, NegativeFormat::Minus) => format!("-{body}"),
            (true, NegativeFormat::Parentheses) => format!("({body})"),
        }
    }

    fn group(&self, int_part: &str) -> String {
        let Some(sep) = self.thousands_separator else {
            return int_part.to_string();
        };
        let len = int_part.len();
        let mut out = String::with_capacity(len + len / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(sep);
            }
            out.push(ch);
        }
        out
    }
}
