//! Dashboard sections
//!
//! The dashboard shows one section at a time as a tab. Each section draws on
//! one or more datasets.

use crate::data::DatasetKind;

/// Sections of the dashboard, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    /// KPI cards and key insights
    #[default]
    Overview,
    /// Top diagnoses, age ranges and monthly admissions
    Diagnoses,
    /// Diagnoses split by patient sex
    Sex,
    /// Severity and mortality distributions with the contingency table
    Severity,
    /// Relative weight against length of stay
    Stay,
}

impl Section {
    /// Returns a slice containing all sections in tab order.
    pub fn all() -> &'static [Section] {
        &[
            Section::Overview,
            Section::Diagnoses,
            Section::Sex,
            Section::Severity,
            Section::Stay,
        ]
    }

    /// Returns the tab label.
    pub fn label(&self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::Diagnoses => "Diagnoses",
            Section::Sex => "Sex",
            Section::Severity => "Severity",
            Section::Stay => "Stay",
        }
    }

    /// Position in tab order, starting at 0.
    pub fn index(&self) -> usize {
        Section::all()
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Section {
        let all = Section::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> Section {
        let all = Section::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }

    /// Section at tab position `index`, if any.
    pub fn from_index(index: usize) -> Option<Section> {
        Section::all().get(index).copied()
    }

    /// Datasets whose failure affects this section.
    pub fn datasets(&self) -> &'static [DatasetKind] {
        match self {
            Section::Overview => &[
                DatasetKind::Diagnoses,
                DatasetKind::WeightStay,
                DatasetKind::SeverityMortality,
            ],
            Section::Diagnoses => &[DatasetKind::Diagnoses],
            Section::Sex => &[DatasetKind::DiagnosisSex],
            Section::Severity => &[DatasetKind::SeverityMortality],
            Section::Stay => &[DatasetKind::WeightStay],
        }
    }

    /// Parses user input into a Section.
    ///
    /// Matching is case-insensitive and supports aliases:
    /// - "overview" | "kpi" | "summary" -> Overview
    /// - "diagnoses" | "diagnosis" | "diag" -> Diagnoses
    /// - "sex" | "gender" -> Sex
    /// - "severity" | "mortality" | "sev" -> Severity
    /// - "stay" | "weight" | "los" -> Stay
    ///
    /// Returns `None` if the input doesn't match any section.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Section> {
        match s.to_lowercase().trim() {
            "overview" | "kpi" | "summary" => Some(Section::Overview),
            "diagnoses" | "diagnosis" | "diag" => Some(Section::Diagnoses),
            "sex" | "gender" => Some(Section::Sex),
            "severity" | "mortality" | "sev" => Some(Section::Severity),
            "stay" | "weight" | "los" => Some(Section::Stay),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_aliases() {
        assert_eq!(Section::from_str("KPI"), Some(Section::Overview));
        assert_eq!(Section::from_str("diag"), Some(Section::Diagnoses));
        assert_eq!(Section::from_str(" gender "), Some(Section::Sex));
        assert_eq!(Section::from_str("mortality"), Some(Section::Severity));
        assert_eq!(Section::from_str("los"), Some(Section::Stay));
        assert_eq!(Section::from_str("pharmacy"), None);
    }

    #[test]
    fn test_section_cycle_wraps() {
        assert_eq!(Section::Overview.next(), Section::Diagnoses);
        assert_eq!(Section::Stay.next(), Section::Overview);
        assert_eq!(Section::Overview.previous(), Section::Stay);
    }

    #[test]
    fn test_section_index_round_trip() {
        for (i, section) in Section::all().iter().enumerate() {
            assert_eq!(section.index(), i);
            assert_eq!(Section::from_index(i), Some(*section));
        }
        assert_eq!(Section::from_index(5), None);
    }

    #[test]
    fn test_overview_depends_on_three_datasets() {
        assert_eq!(Section::Overview.datasets().len(), 3);
        assert_eq!(Section::Sex.datasets(), &[DatasetKind::DiagnosisSex]);
    }
}
