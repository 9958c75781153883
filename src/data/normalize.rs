//! Per-dataset normalization of raw API records
//!
//! Every rule keeps or drops whole rows. A value that is missing and a value that
//! fails to coerce are treated the same way: the row is excluded, never imputed.

use std::sync::Arc;

use serde_json::Value;

use super::{
    Dataset, DatasetKind, DiagnosisRow, DiagnosisSexRow, MortalityRisk, Record, Severity,
    SeverityRow, Sex, WeightStayRow,
};

/// Converts raw records of one endpoint into the typed dataset for `kind`
pub fn normalize(kind: DatasetKind, records: &[Record]) -> Dataset {
    let dataset = match kind {
        DatasetKind::WeightStay => {
            Dataset::WeightStay(Arc::new(records.iter().filter_map(weight_stay_row).collect()))
        }
        DatasetKind::Diagnoses => {
            Dataset::Diagnoses(Arc::new(records.iter().filter_map(diagnosis_row).collect()))
        }
        DatasetKind::DiagnosisSex => Dataset::DiagnosisSex(Arc::new(
            records.iter().filter_map(diagnosis_sex_row).collect(),
        )),
        DatasetKind::SeverityMortality => Dataset::SeverityMortality(Arc::new(
            records.iter().filter_map(severity_row).collect(),
        )),
    };

    tracing::debug!(
        dataset = %kind,
        received = records.len(),
        kept = dataset.len(),
        dropped = records.len() - dataset.len(),
        "Normalized dataset"
    );

    dataset
}

fn weight_stay_row(record: &Record) -> Option<WeightStayRow> {
    Some(WeightStayRow {
        relative_weight: to_number(record.get("peso_espanol_apr")?)?,
        stay_days: to_number(record.get("estancia_dias")?)?,
    })
}

fn diagnosis_row(record: &Record) -> Option<DiagnosisRow> {
    Some(DiagnosisRow {
        age_range: to_text(record.get("rango_de_edad")?)?,
        principal_diagnosis: to_text(record.get("diagnostico_principal")?)?,
        admission_month: to_text(record.get("mes_de_ingreso")?)?,
    })
}

fn diagnosis_sex_row(record: &Record) -> Option<DiagnosisSexRow> {
    let principal_diagnosis = to_text(record.get("diagnostico_principal")?)?;
    let sex_code = to_code(record.get("sexo")?)?;
    let sex = Sex::from_code(sex_code)?;
    Some(DiagnosisSexRow {
        principal_diagnosis,
        sex_code,
        sex,
    })
}

fn severity_row(record: &Record) -> Option<SeverityRow> {
    let severity_code = to_code(record.get("nivel_severidad_apr")?)?;
    let mortality_code = to_code(record.get("riesgo_mortalidad_apr")?)?;
    Some(SeverityRow {
        severity_code,
        mortality_code,
        severity: Severity::from_code(severity_code)?,
        mortality: MortalityRisk::from_code(mortality_code)?,
    })
}

/// Numeric coercion: JSON numbers as-is, numeric strings parsed, anything else fails
fn to_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Integral code in `u8` range, e.g. `2`, `2.0` or `"2"`
fn to_code(value: &Value) -> Option<u8> {
    let number = to_number(value)?;
    if number.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&number) {
        return None;
    }
    Some(number as u8)
}

/// Presence check for categorical fields; scalars are carried as text
fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: Vec<Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| v.as_object().cloned().expect("test records are objects"))
            .collect()
    }

    #[test]
    fn test_weight_stay_coerces_and_drops() {
        let raw = records(vec![
            json!({"peso_espanol_apr": 0.75, "estancia_dias": 4}),
            json!({"peso_espanol_apr": "1.25", "estancia_dias": " 10 "}),
            json!({"peso_espanol_apr": "n/a", "estancia_dias": 3}),
            json!({"peso_espanol_apr": 0.5, "estancia_dias": null}),
            json!({"estancia_dias": 2}),
        ]);

        let dataset = normalize(DatasetKind::WeightStay, &raw);

        assert_eq!(
            dataset.weight_stay(),
            &[
                WeightStayRow {
                    relative_weight: 0.75,
                    stay_days: 4.0
                },
                WeightStayRow {
                    relative_weight: 1.25,
                    stay_days: 10.0
                },
            ]
        );
    }

    #[test]
    fn test_weight_stay_normalization_is_idempotent() {
        let raw = records(vec![
            json!({"peso_espanol_apr": "0.9", "estancia_dias": "5"}),
            json!({"peso_espanol_apr": 2.1, "estancia_dias": 12}),
            json!({"peso_espanol_apr": "", "estancia_dias": 1}),
        ]);
        let once = normalize(DatasetKind::WeightStay, &raw);

        let reserialized: Vec<Record> = once
            .weight_stay()
            .iter()
            .map(|row| serde_json::to_value(row).unwrap().as_object().cloned().unwrap())
            .collect();
        let twice = normalize(DatasetKind::WeightStay, &reserialized);

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 2);
    }

    #[test]
    fn test_diagnoses_require_all_three_fields() {
        let raw = records(vec![
            json!({"rango_de_edad": "30-39", "diagnostico_principal": "F32.9", "mes_de_ingreso": 3, "nombre_enc": "x"}),
            json!({"rango_de_edad": null, "diagnostico_principal": "F20.0", "mes_de_ingreso": 4}),
            json!({"rango_de_edad": "40-49", "mes_de_ingreso": "05"}),
            json!({"rango_de_edad": "50-59", "diagnostico_principal": "F31.1", "mes_de_ingreso": "2024-05"}),
        ]);

        let dataset = normalize(DatasetKind::Diagnoses, &raw);
        let rows = dataset.diagnoses();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].admission_month, "3");
        assert_eq!(rows[0].principal_diagnosis, "F32.9");
        assert_eq!(rows[1].age_range, "50-59");
    }

    #[test]
    fn test_sex_mapping_keeps_known_codes_only() {
        let raw = records(vec![
            json!({"diagnostico_principal": "A", "sexo": 1}),
            json!({"diagnostico_principal": "B", "sexo": 2}),
            json!({"diagnostico_principal": "C", "sexo": 3}),
        ]);

        let dataset = normalize(DatasetKind::DiagnosisSex, &raw);
        let labels: Vec<&str> = dataset.diagnosis_sex().iter().map(|r| r.sex.label()).collect();

        assert_eq!(labels, ["Masculino", "Femenino"]);
    }

    #[test]
    fn test_sex_rows_require_diagnosis_and_code() {
        let raw = records(vec![
            json!({"diagnostico_principal": null, "sexo": 1}),
            json!({"diagnostico_principal": "B", "sexo": "x"}),
            json!({"diagnostico_principal": "C", "sexo": "2"}),
            json!({"diagnostico_principal": "D", "sexo": 1.5}),
        ]);

        let dataset = normalize(DatasetKind::DiagnosisSex, &raw);

        assert_eq!(
            dataset.diagnosis_sex(),
            &[DiagnosisSexRow {
                principal_diagnosis: "C".to_string(),
                sex_code: 2,
                sex: Sex::Female,
            }]
        );
    }

    #[test]
    fn test_severity_label_mapping_is_total_over_known_codes() {
        let mut raw = Vec::new();
        for severity in 1..=4 {
            for mortality in 1..=4 {
                raw.push(json!({"nivel_severidad_apr": severity, "riesgo_mortalidad_apr": mortality}));
            }
        }
        let dataset = normalize(DatasetKind::SeverityMortality, &records(raw));
        let rows = dataset.severity_mortality();

        assert_eq!(rows.len(), 16);
        for row in rows {
            assert_eq!(row.severity.code(), row.severity_code);
            assert_eq!(row.mortality.code(), row.mortality_code);
        }
    }

    #[test]
    fn test_severity_codes_outside_range_are_dropped() {
        let raw = records(vec![
            json!({"nivel_severidad_apr": 0, "riesgo_mortalidad_apr": 1}),
            json!({"nivel_severidad_apr": 2, "riesgo_mortalidad_apr": 5}),
            json!({"nivel_severidad_apr": "3", "riesgo_mortalidad_apr": "4"}),
            json!({"nivel_severidad_apr": null, "riesgo_mortalidad_apr": 2}),
            json!({"nivel_severidad_apr": -1, "riesgo_mortalidad_apr": 2}),
        ]);

        let dataset = normalize(DatasetKind::SeverityMortality, &raw);
        let rows = dataset.severity_mortality();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].severity, Severity::Major);
        assert_eq!(rows[0].mortality, MortalityRisk::Extreme);
    }

    #[test]
    fn test_empty_input_yields_empty_dataset() {
        for kind in DatasetKind::ALL {
            let dataset = normalize(kind, &[]);
            assert_eq!(dataset, Dataset::empty(kind));
        }
    }

    #[test]
    fn test_to_number_rejects_non_scalars() {
        assert_eq!(to_number(&json!(true)), None);
        assert_eq!(to_number(&json!([1])), None);
        assert_eq!(to_number(&json!("")), None);
        assert_eq!(to_number(&json!("1e2")), Some(100.0));
    }
}
