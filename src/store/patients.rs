use serde::Serialize;

use super::{new_id, ClinicStore, StoreError};
use crate::db::KeyValueStore;
use crate::models::{Appointment, NewPatient, Patient, PatientPatch};

/// Records removed by a cascading patient delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CascadeDelete {
    pub patient: Option<Patient>,
    pub appointments: Vec<Appointment>,
}

impl CascadeDelete {
    pub fn is_empty(&self) -> bool {
        self.patient.is_none() && self.appointments.is_empty()
    }
}

impl<S: KeyValueStore> ClinicStore<S> {
    /// Register a patient with a fresh id and no attachments.
    pub fn add_patient(&mut self, fields: NewPatient) -> Result<Patient, StoreError> {
        let patient = fields.into_patient(new_id());
        self.patients.push(patient.clone());
        tracing::info!(patient_id = %patient.id, "Patient added");
        self.persist_patients()?;
        Ok(patient)
    }

    /// Merge `patch` into the patient. Returns `false` (and writes nothing)
    /// when the id is unknown.
    pub fn update_patient(&mut self, id: &str, patch: PatientPatch) -> Result<bool, StoreError> {
        let Some(patient) = self.patients.iter_mut().find(|p| p.id == id) else {
            tracing::debug!(patient_id = id, "Update skipped: patient not found");
            return Ok(false);
        };
        patch.apply_to(patient);
        self.persist_patients()?;
        Ok(true)
    }

    /// Remove the patient and every appointment that references it.
    pub fn delete_patient(&mut self, id: &str) -> Result<bool, StoreError> {
        let removed = self.delete_patient_cascade(id)?;
        Ok(removed.patient.is_some())
    }

    /// Cascading delete: the patient record first, then all appointments
    /// whose `patient_id` equals `id`, then both collections are written.
    /// Appointments are removed by id even when the patient record itself
    /// is already gone, so no orphan survives.
    pub fn delete_patient_cascade(&mut self, id: &str) -> Result<CascadeDelete, StoreError> {
        let patient = self
            .patients
            .iter()
            .position(|p| p.id == id)
            .map(|idx| self.patients.remove(idx));

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.appointments)
            .into_iter()
            .partition(|a| a.patient_id == id);
        self.appointments = kept;

        let outcome = CascadeDelete {
            patient,
            appointments: removed,
        };
        if outcome.is_empty() {
            return Ok(outcome);
        }

        tracing::info!(
            patient_id = id,
            appointments_removed = outcome.appointments.len(),
            "Patient deleted"
        );
        self.persist_patients()?;
        self.persist_appointments()?;
        Ok(outcome)
    }

    pub fn get_patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// Patient record for a portal login (email match, case-insensitive).
    pub fn find_patient_by_email(&self, email: &str) -> Option<&Patient> {
        let email = email.trim();
        self.patients
            .iter()
            .find(|p| p.email.trim().eq_ignore_ascii_case(email))
    }
}
