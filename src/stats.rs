//! Aggregation helpers shared by the dashboard sections
//!
//! Small, allocation-light functions over iterators of categorical or numeric
//! values: frequency counts, mode, mean, extremes, and the number formatting used
//! on KPI cards.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// How [`mode`] picks a winner when several values share the highest count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// The tied value that appears first in the input
    #[default]
    FirstSeen,
    /// The smallest tied value
    Lowest,
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first_seen" | "first" => Ok(TieBreak::FirstSeen),
            "lowest" | "sorted" => Ok(TieBreak::Lowest),
            _ => Err("expected 'first_seen' or 'lowest'".to_string()),
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreak::FirstSeen => f.write_str("first_seen"),
            TieBreak::Lowest => f.write_str("lowest"),
        }
    }
}

/// Counts occurrences, ordered by descending count
///
/// Values with equal counts keep the order in which they first appeared.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts = first_seen_counts(values);
    // sort_by is stable, so first-appearance order survives among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Counts occurrences in first-appearance order
fn first_seen_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }
    counts
}

/// Most frequent value, or `None` for empty input
pub fn mode<T, I>(values: I, tie_break: TieBreak) -> Option<T>
where
    T: Eq + Hash + Ord + Clone,
    I: IntoIterator<Item = T>,
{
    let counts = first_seen_counts(values);
    let max = counts.iter().map(|(_, count)| *count).max()?;
    let mut tied = counts
        .into_iter()
        .filter(|(_, count)| *count == max)
        .map(|(value, _)| value);
    match tie_break {
        TieBreak::FirstSeen => tied.next(),
        TieBreak::Lowest => tied.min(),
    }
}

/// Number of distinct values
pub fn unique_count<T, I>(values: I) -> usize
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    values
        .into_iter()
        .collect::<std::collections::HashSet<T>>()
        .len()
}

/// Arithmetic mean, or `None` for empty input
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Smallest and largest value, or `None` for empty input
pub fn min_max<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Division that yields 0 when the denominator is 0
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Formats a number with `,` thousands separators and a fixed number of decimals
///
/// Non-finite values render as `N/A`.
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Formats an integer count with thousands separators
pub fn format_count(count: usize) -> String {
    format_number(count as f64, 0)
}

/// `part / total` as a percentage string, `0.0%` when `total` is 0
pub fn format_percentage(part: usize, total: usize, decimals: usize) -> String {
    let pct = safe_ratio(part as f64, total as f64) * 100.0;
    format!("{}%", format_number(pct, decimals))
}

/// Shortens `text` to at most `max_chars` characters, ending in `...` when cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    const SUFFIX: &str = "...";
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(SUFFIX.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(SUFFIX);
    out
}
