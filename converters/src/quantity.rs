// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Resource quantities.
//!
//! Quantities are parsed and rendered back in the canonical form the API server
//! stores, so that a configured value compares equal to the one read back.
//! Values are kept as an exact number of nano units.

use std::fmt::Display;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

use crate::ExpandError;

const NANOS: i128 = 1_000_000_000;
const BINARY_SUFFIXES: [&str; 7] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];
const MAX_DECIMAL_SI_EXPONENT: i32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Powers of 1024: `Ki`, `Mi`, ...
    BinarySI,
    /// Powers of 1000: `m`, `k`, `M`, ...
    DecimalSI,
    /// Scientific notation: `1e3`
    DecimalExponent,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuantityError {
    #[error("quantities must match the regular expression '^([+-]?[0-9.]+)([eEinumkKMGTP]*[-+]?[0-9]*)$'")]
    Syntax,
    #[error("precision finer than 1n is not supported")]
    TooPrecise,
    #[error("quantity is too large")]
    TooLarge,
}

/// A parsed quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedQuantity {
    nanos: i128,
    format: Format,
}

fn pow(base: i128, exp: u32) -> Result<i128, QuantityError> {
    base.checked_pow(exp).ok_or(QuantityError::TooLarge)
}

fn split_number(raw: &str) -> (&str, &str) {
    let numeric = |idx: usize, c: char| {
        c.is_ascii_digit() || c == '.' || (idx == 0 && (c == '+' || c == '-'))
    };
    let end = raw
        .char_indices()
        .find(|(idx, c)| !numeric(*idx, *c))
        .map_or(raw.len(), |(idx, _)| idx);
    raw.split_at(end)
}

/// Decode a suffix into its format and its multiplier, as powers of 2 and 10
fn parse_suffix(suffix: &str) -> Result<(Format, u32, i32), QuantityError> {
    let decimal = |exp| Ok((Format::DecimalSI, 0, exp));
    match suffix {
        "" => decimal(0),
        "n" => decimal(-9),
        "u" => decimal(-6),
        "m" => decimal(-3),
        "k" => decimal(3),
        "M" => decimal(6),
        "G" => decimal(9),
        "T" => decimal(12),
        "P" => decimal(15),
        "E" => decimal(18),
        "Ki" => Ok((Format::BinarySI, 10, 0)),
        "Mi" => Ok((Format::BinarySI, 20, 0)),
        "Gi" => Ok((Format::BinarySI, 30, 0)),
        "Ti" => Ok((Format::BinarySI, 40, 0)),
        "Pi" => Ok((Format::BinarySI, 50, 0)),
        "Ei" => Ok((Format::BinarySI, 60, 0)),
        exp if exp.starts_with(['e', 'E']) => {
            let exp = &exp[1..];
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(QuantityError::Syntax);
            }
            let exp = exp.parse::<i32>().map_err(|_| QuantityError::TooLarge)?;
            Ok((Format::DecimalExponent, 0, exp))
        }
        _ => Err(QuantityError::Syntax),
    }
}

impl ParsedQuantity {
    /// Parse the textual form of a quantity.
    ///
    /// # Errors
    /// Fails on malformed input, on values below the nano unit, and on values which
    /// do not fit the internal representation.
    pub fn parse(raw: &str) -> Result<Self, QuantityError> {
        let raw = raw.trim();
        let (number, suffix) = split_number(raw);
        let (negative, number) = match number.as_bytes().first() {
            Some(b'-') => (true, &number[1..]),
            Some(b'+') => (false, &number[1..]),
            _ => (false, number),
        };
        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(QuantityError::Syntax);
        }
        let (format, exp2, exp10) = parse_suffix(suffix)?;

        let digits = format!("{whole}{fraction}");
        let digits = digits.trim_start_matches('0');
        let mantissa = if digits.is_empty() {
            0
        } else {
            digits.parse::<i128>().map_err(|_| QuantityError::TooLarge)?
        };
        let fraction_len = i32::try_from(fraction.len()).map_err(|_| QuantityError::TooPrecise)?;

        // value = mantissa * 2^exp2 * 10^(exp10 - fraction_len), in nano units
        let mut nanos = mantissa
            .checked_mul(pow(2, exp2)?)
            .ok_or(QuantityError::TooLarge)?;
        let scale = exp10
            .checked_sub(fraction_len)
            .and_then(|s| s.checked_add(9))
            .ok_or(QuantityError::TooLarge)?;
        if nanos != 0 {
            if scale >= 0 {
                nanos = nanos
                    .checked_mul(pow(10, scale.unsigned_abs())?)
                    .ok_or(QuantityError::TooLarge)?;
            } else {
                let divisor = pow(10, scale.unsigned_abs()).map_err(|_| QuantityError::TooPrecise)?;
                if nanos % divisor != 0 {
                    return Err(QuantityError::TooPrecise);
                }
                nanos /= divisor;
            }
        }
        Ok(Self {
            nanos: if negative { -nanos } else { nanos },
            format,
        })
    }

    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    /// The value, in nano units
    #[must_use]
    pub fn nanos(&self) -> i128 {
        self.nanos
    }

    fn fmt_binary(&self, f: &mut std::fmt::Formatter<'_>) -> Option<std::fmt::Result> {
        if self.nanos % NANOS != 0 {
            return None;
        }
        let mut value = self.nanos / NANOS;
        if value.abs() < 1024 {
            return None;
        }
        let mut exp = 0;
        while value % 1024 == 0 && exp < BINARY_SUFFIXES.len() - 1 {
            value /= 1024;
            exp += 1;
        }
        Some(write!(f, "{value}{}", BINARY_SUFFIXES[exp]))
    }

    fn fmt_decimal(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut mantissa = self.nanos;
        let mut exp: i32 = -9;
        let max_exp = match self.format {
            Format::DecimalExponent => i32::MAX,
            _ => MAX_DECIMAL_SI_EXPONENT,
        };
        while mantissa % 1000 == 0 && exp < max_exp {
            mantissa /= 1000;
            exp += 3;
        }
        match (self.format, exp) {
            (Format::DecimalExponent, 0) => write!(f, "{mantissa}"),
            (Format::DecimalExponent, exp) => write!(f, "{mantissa}e{exp}"),
            (_, exp) => {
                let suffix = match exp {
                    -9 => "n",
                    -6 => "u",
                    -3 => "m",
                    3 => "k",
                    6 => "M",
                    9 => "G",
                    12 => "T",
                    15 => "P",
                    18 => "E",
                    _ => "",
                };
                write!(f, "{mantissa}{suffix}")
            }
        }
    }
}

/// The canonical form: the largest suffix representing the value exactly. Binary
/// quantities fall back to decimal ones when they are below 1Ki or not whole.
impl Display for ParsedQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.nanos == 0 {
            return write!(f, "0");
        }
        if self.format == Format::BinarySI
            && let Some(result) = self.fmt_binary(f)
        {
            return result;
        }
        self.fmt_decimal(f)
    }
}

/// Canonical form of the quantity `raw`
///
/// # Errors
/// Fails if `raw` is not a valid quantity.
pub fn canonicalize(raw: &str) -> Result<String, QuantityError> {
    ParsedQuantity::parse(raw).map(|q| q.to_string())
}

/// Build a quantity from the configuration value `raw` found under `key`
pub fn expand_quantity(key: &str, raw: &str) -> Result<Quantity, ExpandError> {
    canonicalize(raw)
        .map(Quantity)
        .map_err(|e| ExpandError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Describe a quantity read from the remote side. Quantities which do not parse are
/// passed through as they are.
#[must_use]
pub fn flatten_quantity(quantity: &Quantity) -> String {
    canonicalize(&quantity.0).unwrap_or_else(|_| quantity.0.clone())
}
