//! Plain-text summary printed by `--summary`
//!
//! Mirrors the dashboard sections without the terminal UI, which makes it handy
//! for cron jobs and for checking a deployment from a shell.

use std::fmt;

use chrono::{DateTime, Local};

use crate::data::summary::{self, SEX_COMPARISON_ROWS};
use crate::data::{DatasetBundle, DatasetKind};
use crate::stats::{format_count, format_number, format_percentage, truncate_text, TieBreak};

const LABEL_WIDTH: usize = 40;

/// A rendered-on-demand text report over one [`DatasetBundle`]
pub struct SummaryReport<'a> {
    bundle: &'a DatasetBundle,
    tie_break: TieBreak,
    generated_at: DateTime<Local>,
}

impl<'a> SummaryReport<'a> {
    pub fn new(bundle: &'a DatasetBundle, tie_break: TieBreak, generated_at: DateTime<Local>) -> Self {
        Self {
            bundle,
            tie_break,
            generated_at,
        }
    }

    fn write_failures(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bundle.all_failed() {
            writeln!(f, "!! Data could not be loaded from the API")?;
        }
        for kind in self.bundle.failures() {
            if let Some(err) = self.bundle.error(kind) {
                writeln!(f, "!! {} unavailable: {}", kind.title(), err)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diagnoses = self.bundle.get(DatasetKind::Diagnoses);
        let diagnosis_sex = self.bundle.get(DatasetKind::DiagnosisSex);
        let severity = self.bundle.get(DatasetKind::SeverityMortality);
        let weight_stay = self.bundle.get(DatasetKind::WeightStay);

        writeln!(f, "Hospital discharge summary")?;
        writeln!(f, "Generated {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        self.write_failures(f)?;

        let overview = summary::overview(
            diagnoses.diagnoses(),
            weight_stay.weight_stay(),
            severity.severity_mortality(),
        );
        heading(f, "Overview")?;
        line(f, "Total cases", format_count(overview.total_cases))?;
        line(f, "Mean stay (days)", optional(overview.mean_stay, 1))?;
        line(f, "Severe cases", format_count(overview.severe_cases))?;
        line(f, "Unique diagnoses", format_count(overview.unique_diagnoses))?;

        let diag = summary::diagnoses(diagnoses.diagnoses(), self.tie_break);
        heading(f, DatasetKind::Diagnoses.title())?;
        line(f, "Most common age range", diag.most_common_age_range.as_deref().unwrap_or("N/A"))?;
        for (diagnosis, count) in &diag.top_diagnoses {
            line(f, &truncate_text(diagnosis, LABEL_WIDTH), format_count(*count))?;
        }

        let gender = summary::gender(diagnosis_sex.diagnosis_sex(), SEX_COMPARISON_ROWS);
        heading(f, DatasetKind::DiagnosisSex.title())?;
        for (sex, count) in &gender.cases {
            line(
                f,
                sex.label(),
                format!("{} ({})", format_count(*count), format_percentage(*count, gender.total, 1)),
            )?;
        }

        let sev = summary::severity(severity.severity_mortality(), self.tie_break);
        heading(f, DatasetKind::SeverityMortality.title())?;
        for (level, count) in &sev.severity_counts {
            line(f, &format!("Severity {}", level.label()), format_count(*count))?;
        }
        for (risk, count) in &sev.mortality_counts {
            line(f, &format!("Mortality {}", risk.label()), format_count(*count))?;
        }

        let stay = summary::weight_stay(weight_stay.weight_stay());
        heading(f, DatasetKind::WeightStay.title())?;
        line(f, "Records", format_count(stay.count))?;
        line(f, "Mean relative weight", optional(stay.mean_weight, 3))?;
        line(f, "Mean stay (days)", optional(stay.mean_stay, 1))?;
        if let Some((min, max)) = stay.stay_range {
            line(f, "Stay range (days)", format!("{} - {}", format_number(min, 0), format_number(max, 0)))?;
        }

        heading(f, "Insights")?;
        for insight in summary::insights(
            diagnoses.diagnoses(),
            severity.severity_mortality(),
            weight_stay.weight_stay(),
            self.tie_break,
        ) {
            writeln!(f, "  {}: {}", insight.title, insight.text)?;
        }
        Ok(())
    }
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{title}")?;
    writeln!(f, "{}", "-".repeat(title.chars().count()))
}

fn line(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "  {label:<width$} {value}", width = LABEL_WIDTH)
}

fn optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format_number(v, decimals))
}
