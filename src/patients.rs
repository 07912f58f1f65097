//! Builtin catalog of synthetic NHS test patients.

use serde::{Deserialize, Serialize};

/// A synthetic test patient whose fields can be substituted into
/// segment templates via `{PATIENT_*}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPatient {
    /// HL7-formatted name (`FAMILY^GIVEN`).
    pub name: String,
    /// Ten-digit test NHS number.
    pub patient_id: String,
    /// Date of birth, `YYYYMMDD`.
    pub dob: String,
    /// Administrative gender code.
    pub gender: String,
    /// HL7-formatted address components.
    pub address: String,
    /// Contact phone number.
    pub phone: String,
}

impl TestPatient {
    /// Substitute this patient's fields for `{PATIENT_*}` placeholders.
    pub fn apply(&self, text: &str) -> String {
        text.replace("{PATIENT_NAME}", &self.name)
            .replace("{PATIENT_ID}", &self.patient_id)
            .replace("{PATIENT_DOB}", &self.dob)
            .replace("{PATIENT_GENDER}", &self.gender)
            .replace("{PATIENT_ADDRESS}", &self.address)
            .replace("{PATIENT_PHONE}", &self.phone)
    }
}

/// The builtin test patients.
pub fn builtin_patients() -> Vec<TestPatient> {
    vec![
        TestPatient {
            name: "TEST^PATIENT".into(),
            patient_id: "9876543210".into(),
            dob: "19700101".into(),
            gender: "M".into(),
            address: "1 Test Street^^Testville^London^SE1 2AB".into(),
            phone: "02079460000".into(),
        },
        TestPatient {
            name: "TEST^JOHN".into(),
            patient_id: "1234567890".into(),
            dob: "19850523".into(),
            gender: "M".into(),
            address: "2 Example Road^^Sampleton^Manchester^M1 1AA".into(),
            phone: "01611234567".into(),
        },
        TestPatient {
            name: "TEST^EMILY".into(),
            patient_id: "1029384756".into(),
            dob: "19921212".into(),
            gender: "F".into(),
            address: "3 Demo Lane^^Mockbury^Bristol^BS1 5AH".into(),
            phone: "01179234567".into(),
        },
    ]
}

/// Look up a builtin patient by name, case-insensitively.
pub fn find_patient(name: &str) -> Option<TestPatient> {
    builtin_patients()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_three_patients() {
        assert_eq!(builtin_patients().len(), 3);
    }

    #[test]
    fn test_find_patient_case_insensitive() {
        assert!(find_patient("test^john").is_some());
        assert!(find_patient("TEST^JOHN").is_some());
        assert!(find_patient("TEST^NOBODY").is_none());
    }

    #[test]
    fn test_apply_substitutes_all_fields() {
        let patient = find_patient("TEST^EMILY").unwrap();
        let out = patient.apply("{PATIENT_NAME}|{PATIENT_ID}|{PATIENT_DOB}|{PATIENT_GENDER}");
        assert_eq!(out, "TEST^EMILY|1029384756|19921212|F");
    }

    #[test]
    fn test_apply_leaves_other_text_alone() {
        let patient = find_patient("TEST^PATIENT").unwrap();
        assert_eq!(patient.apply("PID|||fixed"), "PID|||fixed");
    }
}
