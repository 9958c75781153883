//! Display statistics computed from normalized datasets
//!
//! Every summary is a pure function of its rows. Empty input produces an empty
//! summary (zero counts, `None` for means and modes) rather than an error, so a
//! section whose dataset failed to load still renders.

use std::collections::{HashMap, HashSet};

use super::{DiagnosisRow, DiagnosisSexRow, MortalityRisk, Severity, SeverityRow, Sex, WeightStayRow};
use crate::stats::{self, TieBreak};

/// Diagnoses shown in the "top" bar chart
pub const TOP_DIAGNOSES: usize = 10;

/// Rows in the per-sex comparison table
pub const SEX_COMPARISON_ROWS: usize = 20;

/// Severity codes at or above this count as severe (Grave or Extremo)
pub const SEVERE_CODE: u8 = 3;

/// Headline numbers for the overview cards
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewSummary {
    pub total_cases: usize,
    pub mean_stay: Option<f64>,
    pub severe_cases: usize,
    pub unique_diagnoses: usize,
}

/// Computes the overview KPIs
///
/// # Arguments
/// * `diagnoses` - Rows of the diagnoses dataset (case count, unique diagnoses)
/// * `weight_stay` - Rows of the weight/stay dataset (mean stay)
/// * `severity` - Rows of the severity dataset (severe case count)
pub fn overview(
    diagnoses: &[DiagnosisRow],
    weight_stay: &[WeightStayRow],
    severity: &[SeverityRow],
) -> OverviewSummary {
    OverviewSummary {
        total_cases: diagnoses.len(),
        mean_stay: stats::mean(weight_stay.iter().map(|r| r.stay_days)),
        severe_cases: severe_cases(severity),
        unique_diagnoses: stats::unique_count(diagnoses.iter().map(|r| &r.principal_diagnosis)),
    }
}

fn severe_cases(rows: &[SeverityRow]) -> usize {
    rows.iter().filter(|r| r.severity_code >= SEVERE_CODE).count()
}

/// Diagnosis and demographic breakdowns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiagnosisSummary {
    pub total: usize,
    pub unique_diagnoses: usize,
    /// Most frequent diagnoses, at most [`TOP_DIAGNOSES`]
    pub top_diagnoses: Vec<(String, usize)>,
    /// Cases per age range, most frequent first
    pub age_distribution: Vec<(String, usize)>,
    /// Admissions per month, in month order
    pub monthly_admissions: Vec<(String, usize)>,
    pub most_common_age_range: Option<String>,
    pub most_common_diagnosis: Option<String>,
}

pub fn diagnoses(rows: &[DiagnosisRow], tie_break: TieBreak) -> DiagnosisSummary {
    let mut top_diagnoses = stats::value_counts(rows.iter().map(|r| r.principal_diagnosis.clone()));
    top_diagnoses.truncate(TOP_DIAGNOSES);

    DiagnosisSummary {
        total: rows.len(),
        unique_diagnoses: stats::unique_count(rows.iter().map(|r| &r.principal_diagnosis)),
        top_diagnoses,
        age_distribution: stats::value_counts(rows.iter().map(|r| r.age_range.clone())),
        monthly_admissions: counts_by_key(rows.iter().map(|r| r.admission_month.clone())),
        most_common_age_range: stats::mode(rows.iter().map(|r| r.age_range.clone()), tie_break),
        most_common_diagnosis: stats::mode(
            rows.iter().map(|r| r.principal_diagnosis.clone()),
            tie_break,
        ),
    }
}

/// Counts sorted by key: numerically when every key is a number, else as text
fn counts_by_key<I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut counts = stats::value_counts(values);
    let as_number = |key: &str| key.trim().parse::<f64>().ok();

    if counts.iter().all(|(key, _)| as_number(key).is_some()) {
        counts.sort_by(|a, b| {
            let x = as_number(&a.0).unwrap_or(f64::NAN);
            let y = as_number(&b.0).unwrap_or(f64::NAN);
            x.total_cmp(&y)
        });
    } else {
        counts.sort_by(|a, b| a.0.cmp(&b.0));
    }
    counts
}

/// Cases of one diagnosis split by sex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SexComparison {
    pub diagnosis: String,
    pub male: usize,
    pub female: usize,
}

impl SexComparison {
    pub fn total(&self) -> usize {
        self.male + self.female
    }
}

/// Breakdown of the diagnosis/sex dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenderSummary {
    pub total: usize,
    /// Cases per sex, always male then female
    pub cases: Vec<(Sex, usize)>,
    /// Distinct diagnoses seen per sex, same order as `cases`
    pub unique_diagnoses: Vec<(Sex, usize)>,
    /// Most frequent diagnoses overall with their split, by descending total
    pub comparison: Vec<SexComparison>,
}

impl GenderSummary {
    pub fn cases_for(&self, sex: Sex) -> usize {
        lookup(&self.cases, sex)
    }

    pub fn unique_diagnoses_for(&self, sex: Sex) -> usize {
        lookup(&self.unique_diagnoses, sex)
    }
}

fn lookup<K: PartialEq>(pairs: &[(K, usize)], key: K) -> usize {
    pairs
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(0, |(_, count)| *count)
}

pub fn gender(rows: &[DiagnosisSexRow], top_n: usize) -> GenderSummary {
    let cases = Sex::ALL
        .iter()
        .map(|sex| (*sex, rows.iter().filter(|r| r.sex == *sex).count()))
        .collect();
    let unique_diagnoses = Sex::ALL
        .iter()
        .map(|sex| {
            let distinct: HashSet<&str> = rows
                .iter()
                .filter(|r| r.sex == *sex)
                .map(|r| r.principal_diagnosis.as_str())
                .collect();
            (*sex, distinct.len())
        })
        .collect();

    let mut split: HashMap<&str, (usize, usize)> = HashMap::new();
    for row in rows {
        let entry = split.entry(row.principal_diagnosis.as_str()).or_default();
        match row.sex {
            Sex::Male => entry.0 += 1,
            Sex::Female => entry.1 += 1,
        }
    }
    let comparison = stats::value_counts(rows.iter().map(|r| r.principal_diagnosis.as_str()))
        .into_iter()
        .take(top_n)
        .map(|(diagnosis, _)| {
            let (male, female) = split.get(diagnosis).copied().unwrap_or_default();
            SexComparison {
                diagnosis: diagnosis.to_string(),
                male,
                female,
            }
        })
        .collect();

    GenderSummary {
        total: rows.len(),
        cases,
        unique_diagnoses,
        comparison,
    }
}

/// Severity x mortality contingency table, indexed `[severity][mortality]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Crosstab {
    pub cells: [[usize; 4]; 4],
}

impl Crosstab {
    pub fn cell(&self, severity: Severity, mortality: MortalityRisk) -> usize {
        self.cells[ordinal(severity.code())][ordinal(mortality.code())]
    }

    pub fn row_total(&self, severity: Severity) -> usize {
        self.cells[ordinal(severity.code())].iter().sum()
    }

    pub fn column_total(&self, mortality: MortalityRisk) -> usize {
        let column = ordinal(mortality.code());
        self.cells.iter().map(|row| row[column]).sum()
    }

    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }

    /// Largest single cell, used to scale heat shading
    pub fn max_cell(&self) -> usize {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }
}

fn ordinal(code: u8) -> usize {
    usize::from(code.saturating_sub(1)).min(3)
}

/// Breakdown of the severity/mortality dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeveritySummary {
    pub total: usize,
    /// Cases per severity level in ordinal order
    pub severity_counts: Vec<(Severity, usize)>,
    /// Cases per mortality risk in ordinal order
    pub mortality_counts: Vec<(MortalityRisk, usize)>,
    pub crosstab: Crosstab,
    pub most_common_severity: Option<Severity>,
    pub most_common_mortality: Option<MortalityRisk>,
    pub severe_cases: usize,
    pub extreme_severity: usize,
    pub extreme_mortality: usize,
}

pub fn severity(rows: &[SeverityRow], tie_break: TieBreak) -> SeveritySummary {
    let mut crosstab = Crosstab::default();
    for row in rows {
        crosstab.cells[ordinal(row.severity_code)][ordinal(row.mortality_code)] += 1;
    }

    SeveritySummary {
        total: rows.len(),
        severity_counts: Severity::ALL
            .iter()
            .map(|s| (*s, crosstab.row_total(*s)))
            .collect(),
        mortality_counts: MortalityRisk::ALL
            .iter()
            .map(|m| (*m, crosstab.column_total(*m)))
            .collect(),
        most_common_severity: stats::mode(rows.iter().map(|r| r.severity), tie_break),
        most_common_mortality: stats::mode(rows.iter().map(|r| r.mortality), tie_break),
        severe_cases: severe_cases(rows),
        extreme_severity: crosstab.row_total(Severity::Extreme),
        extreme_mortality: crosstab.column_total(MortalityRisk::Extreme),
        crosstab,
    }
}

/// Weight and length-of-stay figures
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightStaySummary {
    pub count: usize,
    pub mean_weight: Option<f64>,
    pub mean_stay: Option<f64>,
    /// Shortest and longest stay
    pub stay_range: Option<(f64, f64)>,
    /// Lightest and heaviest relative weight
    pub weight_range: Option<(f64, f64)>,
}

pub fn weight_stay(rows: &[WeightStayRow]) -> WeightStaySummary {
    WeightStaySummary {
        count: rows.len(),
        mean_weight: stats::mean(rows.iter().map(|r| r.relative_weight)),
        mean_stay: stats::mean(rows.iter().map(|r| r.stay_days)),
        stay_range: stats::min_max(rows.iter().map(|r| r.stay_days)),
        weight_range: stats::min_max(rows.iter().map(|r| r.relative_weight)),
    }
}

/// A titled one-line finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    pub title: &'static str,
    pub text: String,
}

pub const NOT_AVAILABLE: &str = "Data not available";

/// Key findings across the diagnoses, severity and weight/stay datasets
pub fn insights(
    diagnoses: &[DiagnosisRow],
    severity: &[SeverityRow],
    weight_stay: &[WeightStayRow],
    tie_break: TieBreak,
) -> Vec<Insight> {
    let unique = stats::unique_count(diagnoses.iter().map(|r| &r.principal_diagnosis));
    let severe = severe_cases(severity);
    let age_range = stats::mode(diagnoses.iter().map(|r| r.age_range.as_str()), tie_break);
    let mean_stay = stats::mean(weight_stay.iter().map(|r| r.stay_days)).filter(|m| *m > 0.0);

    vec![
        Insight {
            title: "Diagnoses",
            text: if unique > 0 {
                format!("{} distinct principal diagnoses recorded", stats::format_count(unique))
            } else {
                NOT_AVAILABLE.to_string()
            },
        },
        Insight {
            title: "Severity",
            text: if severe > 0 {
                format!(
                    "{} of cases are major or extreme severity",
                    stats::format_percentage(severe, severity.len(), 1)
                )
            } else {
                NOT_AVAILABLE.to_string()
            },
        },
        Insight {
            title: "Demographics",
            text: match age_range {
                Some(range) => format!("Predominant age range: {range}"),
                None => NOT_AVAILABLE.to_string(),
            },
        },
        Insight {
            title: "Length of stay",
            text: match mean_stay {
                Some(mean) => format!("Mean stay of {} days", stats::format_number(mean, 1)),
                None => NOT_AVAILABLE.to_string(),
            },
        },
    ]
}
