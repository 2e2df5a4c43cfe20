// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use std::collections::BTreeMap;
use std::ops::Bound;

use bolero::{Driver, ValueGenerator};

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const LETTERS: u8 = 26;
const ALPHANUMERICS: u8 = 36;

/// Generates lowercase alphanumeric labels, starting with a letter
pub struct LabelGenerator {
    max_len: u16,
}

impl LabelGenerator {
    #[must_use]
    pub fn new(max_len: u16) -> Self {
        Self {
            max_len: max_len.max(1),
        }
    }
}

impl Default for LabelGenerator {
    fn default() -> Self {
        Self::new(12)
    }
}

impl ValueGenerator for LabelGenerator {
    type Output = String;

    fn generate<D: Driver>(&self, d: &mut D) -> Option<Self::Output> {
        let len = d.gen_u16(Bound::Included(&1), Bound::Included(&self.max_len))?;
        let mut label = String::with_capacity(usize::from(len));
        for idx in 0..len {
            let max = if idx == 0 { LETTERS } else { ALPHANUMERICS };
            let pos = d.gen_u8(Bound::Included(&0), Bound::Excluded(&max))?;
            label.push(char::from(ALPHABET[usize::from(pos)]));
        }
        Some(label)
    }
}

/// Generates absolute paths made of a few labels
pub struct PathGenerator;

impl ValueGenerator for PathGenerator {
    type Output = String;

    fn generate<D: Driver>(&self, d: &mut D) -> Option<Self::Output> {
        let depth = d.gen_u8(Bound::Included(&1), Bound::Included(&4))?;
        let mut path = String::new();
        for _ in 0..depth {
            path.push('/');
            path.push_str(&LabelGenerator::new(8).generate(d)?);
        }
        Some(path)
    }
}

/// Generates between `min` and `max` labels
pub struct LabelsGenerator {
    min: u16,
    max: u16,
}

impl LabelsGenerator {
    #[must_use]
    pub fn new(min: u16, max: u16) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }
}

impl ValueGenerator for LabelsGenerator {
    type Output = Vec<String>;

    fn generate<D: Driver>(&self, d: &mut D) -> Option<Self::Output> {
        let count = d.gen_u16(Bound::Included(&self.min), Bound::Included(&self.max))?;
        (0..count)
            .map(|_| LabelGenerator::default().generate(d))
            .collect()
    }
}

/// Generates string maps with up to `max` entries
pub struct StringMapGenerator {
    max: u16,
}

impl StringMapGenerator {
    #[must_use]
    pub fn new(max: u16) -> Self {
        Self { max }
    }
}

impl ValueGenerator for StringMapGenerator {
    type Output = BTreeMap<String, String>;

    fn generate<D: Driver>(&self, d: &mut D) -> Option<Self::Output> {
        let count = d.gen_u16(Bound::Included(&1), Bound::Included(&self.max.max(1)))?;
        (0..count)
            .map(|_| {
                Some((
                    LabelGenerator::default().generate(d)?,
                    LabelGenerator::new(20).generate(d)?,
                ))
            })
            .collect()
    }
}

const DECIMAL_SUFFIXES: [&str; 4] = ["", "k", "M", "G"];
const BINARY_SUFFIXES: [&str; 4] = ["Ki", "Mi", "Gi", "Ti"];

/// Generates storage quantities already in their canonical form, the one the
/// API server hands back.
pub struct QuantityGenerator;

impl ValueGenerator for QuantityGenerator {
    type Output = String;

    fn generate<D: Driver>(&self, d: &mut D) -> Option<Self::Output> {
        let suffix = usize::from(d.gen_u8(Bound::Included(&0), Bound::Excluded(&4))?);
        let quantity = if d.gen_bool(None)? {
            let value = d.gen_u16(Bound::Included(&1), Bound::Included(&1023))?;
            format!("{value}{}", BINARY_SUFFIXES[suffix])
        } else {
            let value = d.gen_u16(Bound::Included(&1), Bound::Included(&999))?;
            format!("{value}{}", DECIMAL_SUFFIXES[suffix])
        };
        Some(quantity)
    }
}

/// Generate `Some(value)` or `None`, with equal odds
pub fn maybe<D: Driver, T>(
    d: &mut D,
    generate: impl FnOnce(&mut D) -> Option<T>,
) -> Option<Option<T>> {
    if d.gen_bool(None)? {
        generate(d).map(Some)
    } else {
        Some(None)
    }
}

pub fn maybe_label<D: Driver>(d: &mut D) -> Option<Option<String>> {
    maybe(d, |d| LabelGenerator::default().generate(d))
}

pub fn maybe_bool<D: Driver>(d: &mut D) -> Option<Option<bool>> {
    maybe(d, |d| d.gen_bool(None))
}

/// Pick one of `choices`
pub fn one_of<D: Driver>(d: &mut D, choices: &[&str]) -> Option<String> {
    let max = u16::try_from(choices.len()).ok()?;
    let pos = d.gen_u16(Bound::Included(&0), Bound::Excluded(&max))?;
    choices.get(usize::from(pos)).map(|c| (*c).to_string())
}

/// An empty string is what the configuration language calls unset
#[must_use]
pub fn norm_str(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}

/// A list of strings with set semantics: sorted and deduplicated
#[must_use]
pub fn norm_set(values: &[String]) -> Vec<String> {
    let mut values = values.to_vec();
    values.sort();
    values.dedup();
    values
}

#[must_use]
pub fn norm_opt_set(values: Option<&Vec<String>>) -> Option<Vec<String>> {
    values.filter(|v| !v.is_empty()).map(|v| norm_set(v))
}

#[must_use]
pub fn norm_opt_list(values: Option<&Vec<String>>) -> Option<Vec<String>> {
    values.filter(|v| !v.is_empty()).cloned()
}

#[must_use]
pub fn norm_opt_map(values: Option<&BTreeMap<String, String>>) -> Option<BTreeMap<String, String>> {
    values.filter(|m| !m.is_empty()).cloned()
}
