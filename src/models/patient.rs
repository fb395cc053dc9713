use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::attachment::FileAttachment;
use super::lenient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "lenient::optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub medical_history: String,
    #[serde(default)]
    pub files: Vec<FileAttachment>,
}

/// Fields supplied when registering a patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "lenient::optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub medical_history: String,
}

impl NewPatient {
    pub(crate) fn into_patient(self, id: String) -> Patient {
        Patient {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            date_of_birth: self.date_of_birth,
            medical_history: self.medical_history,
            files: Vec::new(),
        }
    }
}

/// Partial update: `None` leaves the stored field untouched.
///
/// `date_of_birth: Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub medical_history: Option<String>,
}

impl PatientPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into a stored record. Identity and attachments are never touched.
    pub fn apply_to(self, patient: &mut Patient) {
        if let Some(name) = self.name {
            patient.name = name;
        }
        if let Some(email) = self.email {
            patient.email = email;
        }
        if let Some(phone) = self.phone {
            patient.phone = phone;
        }
        if let Some(address) = self.address {
            patient.address = address;
        }
        if let Some(dob) = self.date_of_birth {
            patient.date_of_birth = dob;
        }
        if let Some(history) = self.medical_history {
            patient.medical_history = history;
        }
    }
}
