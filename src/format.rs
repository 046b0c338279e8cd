//! Number formatting helpers used by the exporters
//!
//! None of these fail: input that is not a number comes back unchanged as
//! [`Formatted::Original`].

use std::borrow::Cow;
use std::fmt;

use log::debug;

use crate::model::CellValue;

/// Outcome of a formatting call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatted<'a> {
    /// The input was numeric and has been formatted
    Number(String),
    /// The input was not numeric; its text is returned as given
    Original(Cow<'a, str>),
}

impl Formatted<'_> {
    pub fn is_number(&self) -> bool {
        matches!(self, Formatted::Number(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Formatted::Number(s) => s,
            Formatted::Original(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Formatted::Number(s) => s,
            Formatted::Original(s) => s.into_owned(),
        }
    }
}

impl fmt::Display for Formatted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`number_to_currency`]
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyOptions {
    /// Fractional digits
    pub precision: usize,
    /// Replaces `%u` in the format
    pub unit: String,
    /// Between integer and fractional part; `"."` when unset and precision > 0
    pub separator: Option<String>,
    /// Thousands delimiter
    pub delimiter: String,
    /// Template, `%u` is the unit and `%n` the number
    pub format: String,
}

impl Default for CurrencyOptions {
    fn default() -> Self {
        Self {
            precision: 2,
            unit: String::new(),
            separator: None,
            delimiter: String::new(),
            format: "%u%n".to_string(),
        }
    }
}

impl CurrencyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    fn effective_separator(&self) -> &str {
        match &self.separator {
            Some(separator) => separator,
            None if self.precision > 0 => ".",
            None => "",
        }
    }
}

/// Round to `precision` fractional digits (half away from zero) and render
/// exactly that many digits
///
/// Numeric strings are accepted; anything else is returned unchanged.
pub fn number_with_precision(value: &CellValue, precision: usize) -> Formatted<'_> {
    let Some(number) = value.as_number().filter(|n| n.is_finite()) else {
        debug!("not formatting non-numeric value {:?}", value);
        return Formatted::Original(value.display());
    };
    if u16::try_from(precision).is_err() {
        debug!("precision {} out of range, not formatting {:?}", precision, value);
        return Formatted::Original(value.display());
    }

    let rounded = i32::try_from(precision)
        .ok()
        .map(|p| 10f64.powi(p))
        .map(|factor| (number * factor).round() / factor)
        .filter(|r| r.is_finite())
        .unwrap_or(number);
    // Avoid rendering "-0.00"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };

    Formatted::Number(format!("{:.*}", precision, rounded))
}

/// Insert `delimiter` every three integer digits and join the fractional part
/// with `separator`
///
/// Only plain decimal strings (optional sign, digits, optional `.` and digits)
/// are formatted; anything else is returned unchanged.
pub fn number_with_delimiter<'a>(number: &'a str, delimiter: &str, separator: &str) -> Formatted<'a> {
    let trimmed = number.trim();
    let (sign, unsigned) = match trimmed.strip_prefix(['-', '+']) {
        Some(rest) => (&trimmed[..1], rest),
        None => ("", trimmed),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if integer.is_empty() || !all_digits(integer) || !fraction.map_or(true, all_digits) {
        debug!("not delimiting non-numeric string {:?}", number);
        return Formatted::Original(Cow::Borrowed(number));
    }

    let mut out = String::from(sign);
    out.push_str(&group_thousands(integer, delimiter));
    if let Some(fraction) = fraction {
        out.push_str(separator);
        out.push_str(fraction);
    }
    Formatted::Number(out)
}

/// Render a number as currency: precision, delimiter, separator and unit
///
/// Falls back to the value's own text when it is not numeric.
pub fn number_to_currency<'a>(value: &'a CellValue, options: &CurrencyOptions) -> Formatted<'a> {
    let precise = match number_with_precision(value, options.precision) {
        Formatted::Number(s) => s,
        original => return original,
    };
    let (integer, fraction) = precise.split_once('.').unwrap_or((precise.as_str(), ""));

    let integer = match number_with_delimiter(integer, &options.delimiter, ".") {
        Formatted::Number(s) => s,
        Formatted::Original(_) => return Formatted::Original(value.display()),
    };
    let body = format!("{}{}{}", integer, options.effective_separator(), fraction);

    Formatted::Number(options.format.replace("%n", &body).replace("%u", &options.unit))
}

fn group_thousands(digits: &str, delimiter: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * delimiter.len());
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(delimiter);
        }
        out.push(digit);
    }
    out
}
