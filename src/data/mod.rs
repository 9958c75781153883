//! Core data models for the hospital discharge dashboard
//!
//! This module contains the raw record type returned by the REST API, the four
//! dataset tags with their endpoints, and the typed rows each dataset normalizes
//! into.

pub mod catalog;
pub mod client;
pub mod normalize;
pub mod summary;

pub use catalog::{Catalog, DatasetBundle};
pub use client::{DataError, FetchError, OrdsClient, PageRequest, RecordSource};
pub use normalize::normalize;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One flat item of a page: field name to scalar value
pub type Record = serde_json::Map<String, serde_json::Value>;

/// The logical datasets exposed by the API
///
/// Each tag owns its endpoint name, its cache key and its normalization rule, so a
/// new dataset is one more variant here plus one arm in [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetKind {
    /// Relative APR-DRG weight against length of stay
    WeightStay,
    /// Age range, principal diagnosis and admission month
    Diagnoses,
    /// Principal diagnosis against patient sex
    DiagnosisSex,
    /// APR severity level against APR mortality risk
    SeverityMortality,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::WeightStay,
        DatasetKind::Diagnoses,
        DatasetKind::DiagnosisSex,
        DatasetKind::SeverityMortality,
    ];

    /// Name of the remote collection
    pub fn endpoint(self) -> &'static str {
        match self {
            DatasetKind::WeightStay => "peso_vs_estancia",
            DatasetKind::Diagnoses => "vista_muy_interesante",
            DatasetKind::DiagnosisSex => "diagnostico principal vs sexo",
            DatasetKind::SeverityMortality => "severidad_apr vs mortadilad_apr",
        }
    }

    /// Key under which the normalized dataset is cached
    pub fn cache_key(self) -> String {
        format!("endpoint_{}", self.endpoint())
    }

    /// Stable identifier used in logs and reports
    pub fn name(self) -> &'static str {
        match self {
            DatasetKind::WeightStay => "peso_estancia",
            DatasetKind::Diagnoses => "diagnosticos",
            DatasetKind::DiagnosisSex => "diagnostico_sexo",
            DatasetKind::SeverityMortality => "severidad_mortalidad",
        }
    }

    /// Human-readable title
    pub fn title(self) -> &'static str {
        match self {
            DatasetKind::WeightStay => "Weight / length of stay",
            DatasetKind::Diagnoses => "Diagnoses & demographics",
            DatasetKind::DiagnosisSex => "Diagnoses by sex",
            DatasetKind::SeverityMortality => "Severity & mortality",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Patient sex as coded by the source (1 = male, 2 = female)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "Masculino")]
    Male,
    #[serde(rename = "Femenino")]
    Female,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Sex::Male),
            2 => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Masculino",
            Sex::Female => "Femenino",
        }
    }
}

/// APR severity of illness, ordinal 1-4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "Leve")]
    Mild,
    #[serde(rename = "Moderado")]
    Moderate,
    #[serde(rename = "Grave")]
    Major,
    #[serde(rename = "Extremo")]
    Extreme,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Mild,
        Severity::Moderate,
        Severity::Major,
        Severity::Extreme,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Severity::Mild),
            2 => Some(Severity::Moderate),
            3 => Some(Severity::Major),
            4 => Some(Severity::Extreme),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8 + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Mild => "Leve",
            Severity::Moderate => "Moderado",
            Severity::Major => "Grave",
            Severity::Extreme => "Extremo",
        }
    }
}

/// APR risk of mortality, ordinal 1-4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MortalityRisk {
    #[serde(rename = "Bajo")]
    Minor,
    #[serde(rename = "Moderado")]
    Moderate,
    #[serde(rename = "Alto")]
    Major,
    #[serde(rename = "Extremo")]
    Extreme,
}

impl MortalityRisk {
    pub const ALL: [MortalityRisk; 4] = [
        MortalityRisk::Minor,
        MortalityRisk::Moderate,
        MortalityRisk::Major,
        MortalityRisk::Extreme,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(MortalityRisk::Minor),
            2 => Some(MortalityRisk::Moderate),
            3 => Some(MortalityRisk::Major),
            4 => Some(MortalityRisk::Extreme),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8 + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            MortalityRisk::Minor => "Bajo",
            MortalityRisk::Moderate => "Moderado",
            MortalityRisk::Major => "Alto",
            MortalityRisk::Extreme => "Extremo",
        }
    }
}

/// Relative weight against length of stay for one discharge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightStayRow {
    #[serde(rename = "peso_espanol_apr")]
    pub relative_weight: f64,
    #[serde(rename = "estancia_dias")]
    pub stay_days: f64,
}

/// Demographic and diagnostic fields for one discharge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRow {
    #[serde(rename = "rango_de_edad")]
    pub age_range: String,
    #[serde(rename = "diagnostico_principal")]
    pub principal_diagnosis: String,
    #[serde(rename = "mes_de_ingreso")]
    pub admission_month: String,
}

/// Principal diagnosis with the patient's sex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisSexRow {
    #[serde(rename = "diagnostico_principal")]
    pub principal_diagnosis: String,
    #[serde(rename = "sexo")]
    pub sex_code: u8,
    #[serde(rename = "sexo_label")]
    pub sex: Sex,
}

/// Severity level and mortality risk with their labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityRow {
    #[serde(rename = "nivel_severidad_apr")]
    pub severity_code: u8,
    #[serde(rename = "riesgo_mortalidad_apr")]
    pub mortality_code: u8,
    #[serde(rename = "severidad_label")]
    pub severity: Severity,
    #[serde(rename = "mortalidad_label")]
    pub mortality: MortalityRisk,
}

/// A normalized dataset: one variant per [`DatasetKind`]
///
/// Rows sit behind an `Arc` so handing a cached dataset to the UI is cheap.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    WeightStay(Arc<Vec<WeightStayRow>>),
    Diagnoses(Arc<Vec<DiagnosisRow>>),
    DiagnosisSex(Arc<Vec<DiagnosisSexRow>>),
    SeverityMortality(Arc<Vec<SeverityRow>>),
}

impl Dataset {
    /// An empty dataset of the given kind
    pub fn empty(kind: DatasetKind) -> Self {
        match kind {
            DatasetKind::WeightStay => Dataset::WeightStay(Arc::default()),
            DatasetKind::Diagnoses => Dataset::Diagnoses(Arc::default()),
            DatasetKind::DiagnosisSex => Dataset::DiagnosisSex(Arc::default()),
            DatasetKind::SeverityMortality => Dataset::SeverityMortality(Arc::default()),
        }
    }

    pub fn kind(&self) -> DatasetKind {
        match self {
            Dataset::WeightStay(_) => DatasetKind::WeightStay,
            Dataset::Diagnoses(_) => DatasetKind::Diagnoses,
            Dataset::DiagnosisSex(_) => DatasetKind::DiagnosisSex,
            Dataset::SeverityMortality(_) => DatasetKind::SeverityMortality,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Dataset::WeightStay(rows) => rows.len(),
            Dataset::Diagnoses(rows) => rows.len(),
            Dataset::DiagnosisSex(rows) => rows.len(),
            Dataset::SeverityMortality(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Weight/stay rows, or an empty slice for any other kind
    pub fn weight_stay(&self) -> &[WeightStayRow] {
        match self {
            Dataset::WeightStay(rows) => rows.as_slice(),
            _ => &[],
        }
    }

    /// Diagnosis rows, or an empty slice for any other kind
    pub fn diagnoses(&self) -> &[DiagnosisRow] {
        match self {
            Dataset::Diagnoses(rows) => rows.as_slice(),
            _ => &[],
        }
    }

    /// Diagnosis/sex rows, or an empty slice for any other kind
    pub fn diagnosis_sex(&self) -> &[DiagnosisSexRow] {
        match self {
            Dataset::DiagnosisSex(rows) => rows.as_slice(),
            _ => &[],
        }
    }

    /// Severity/mortality rows, or an empty slice for any other kind
    pub fn severity_mortality(&self) -> &[SeverityRow] {
        match self {
            Dataset::SeverityMortality(rows) => rows.as_slice(),
            _ => &[],
        }
    }
}
