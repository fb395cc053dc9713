use chrono::Utc;

use super::{new_id, ClinicStore, StoreError};
use crate::db::KeyValueStore;
use crate::models::{FileAttachment, FileInput};

/// Stamp an upload with an id and the current time. The encoded data is
/// kept as given; size and encoding were checked by the caller.
fn stamp(input: FileInput) -> FileAttachment {
    FileAttachment {
        id: new_id(),
        name: input.name,
        mime_type: input.mime_type,
        data: input.data,
        upload_date: Utc::now(),
    }
}

fn remove_by_id(files: &mut Vec<FileAttachment>, file_id: &str) -> bool {
    let before = files.len();
    files.retain(|f| f.id != file_id);
    files.len() != before
}

impl<S: KeyValueStore> ClinicStore<S> {
    /// Append a file to the patient's attachments. `None` when the patient
    /// does not exist.
    pub fn add_file_to_patient(
        &mut self,
        patient_id: &str,
        input: FileInput,
    ) -> Result<Option<FileAttachment>, StoreError> {
        let Some(patient) = self.patients.iter_mut().find(|p| p.id == patient_id) else {
            return Ok(None);
        };
        let file = stamp(input);
        patient.files.push(file.clone());
        tracing::info!(patient_id, file_id = %file.id, "File attached to patient");
        self.persist_patients()?;
        Ok(Some(file))
    }

    pub fn remove_file_from_patient(
        &mut self,
        patient_id: &str,
        file_id: &str,
    ) -> Result<bool, StoreError> {
        let removed = self
            .patients
            .iter_mut()
            .find(|p| p.id == patient_id)
            .is_some_and(|p| remove_by_id(&mut p.files, file_id));
        if !removed {
            return Ok(false);
        }
        tracing::info!(patient_id, file_id, "File removed from patient");
        self.persist_patients()?;
        Ok(true)
    }

    pub fn add_file_to_appointment(
        &mut self,
        appointment_id: &str,
        input: FileInput,
    ) -> Result<Option<FileAttachment>, StoreError> {
        let Some(appointment) = self.appointments.iter_mut().find(|a| a.id == appointment_id)
        else {
            return Ok(None);
        };
        let file = stamp(input);
        appointment.files.push(file.clone());
        tracing::info!(appointment_id, file_id = %file.id, "File attached to appointment");
        self.persist_appointments()?;
        Ok(Some(file))
    }

    pub fn remove_file_from_appointment(
        &mut self,
        appointment_id: &str,
        file_id: &str,
    ) -> Result<bool, StoreError> {
        let removed = self
            .appointments
            .iter_mut()
            .find(|a| a.id == appointment_id)
            .is_some_and(|a| remove_by_id(&mut a.files, file_id));
        if !removed {
            return Ok(false);
        }
        tracing::info!(appointment_id, file_id, "File removed from appointment");
        self.persist_appointments()?;
        Ok(true)
    }
}
