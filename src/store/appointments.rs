use super::{new_id, ClinicStore, StoreError};
use crate::db::KeyValueStore;
use crate::models::{Appointment, AppointmentPatch, NewAppointment};

impl<S: KeyValueStore> ClinicStore<S> {
    /// Book an appointment. The status always starts as scheduled,
    /// whatever the input asked for.
    pub fn add_appointment(&mut self, fields: NewAppointment) -> Result<Appointment, StoreError> {
        self.ensure_patient(&fields.patient_id)?;
        if let Some(requested) = fields.status.filter(|s| s.is_terminal()) {
            tracing::debug!(%requested, "Ignoring requested status on new appointment");
        }

        let appointment = fields.into_appointment(new_id());
        self.appointments.push(appointment.clone());
        tracing::info!(
            appointment_id = %appointment.id,
            patient_id = %appointment.patient_id,
            date = %appointment.date,
            "Appointment added"
        );
        self.persist_appointments()?;
        Ok(appointment)
    }

    /// Merge `patch` into the appointment. This is the only way status and
    /// the completion fields change. Returns `false` for an unknown id.
    pub fn update_appointment(
        &mut self,
        id: &str,
        patch: AppointmentPatch,
    ) -> Result<bool, StoreError> {
        let Some(idx) = self.appointments.iter().position(|a| a.id == id) else {
            tracing::debug!(appointment_id = id, "Update skipped: appointment not found");
            return Ok(false);
        };
        if let Some(patient_id) = &patch.patient_id {
            self.ensure_patient(patient_id)?;
        }

        let appointment = &mut self.appointments[idx];

        let previous = appointment.status;
        patch.apply_to(appointment);
        if appointment.status != previous {
            tracing::info!(
                appointment_id = id,
                from = %previous,
                to = %appointment.status,
                "Appointment status changed"
            );
        }
        self.persist_appointments()?;
        Ok(true)
    }

    /// Remove a single appointment. Nothing depends on appointments, so
    /// there is no cascade.
    pub fn delete_appointment(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(idx) = self.appointments.iter().position(|a| a.id == id) else {
            return Ok(false);
        };
        self.appointments.remove(idx);
        tracing::info!(appointment_id = id, "Appointment deleted");
        self.persist_appointments()?;
        Ok(true)
    }

    pub fn get_appointment(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    /// Appointments of one patient in collection order; callers sort.
    pub fn get_patient_appointments(&self, patient_id: &str) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .collect()
    }

    fn ensure_patient(&self, patient_id: &str) -> Result<(), StoreError> {
        if self.get_patient(patient_id).is_none() {
            return Err(StoreError::UnknownPatient(patient_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::super::test_support::*;
    use crate::config::APPOINTMENTS_KEY;
    use crate::db::KeyValueStore;
    use crate::models::enums::AppointmentStatus;
    use crate::models::AppointmentPatch;
    use crate::store::StoreError;

    #[test]
    fn add_forces_scheduled_status() {
        let mut store = empty_store();
        let patient = store.add_patient(new_patient("Ada")).unwrap();
        let mut input = new_appointment(&patient.id, (2025, 7, 5), (9, 0));
        input.status = Some(AppointmentStatus::Completed);

        let appt = store.add_appointment(input).unwrap();
        assert_eq!(appt.status, AppointmentStatus::Scheduled);
        assert_eq!(store.get_appointment(&appt.id).unwrap().status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn add_rejects_unknown_patient() {
        let mut store = empty_store();
        let err = store
            .add_appointment(new_appointment("nobody", (2025, 7, 5), (9, 0)))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownPatient(id) if id == "nobody"));
        assert!(store.appointments().is_empty());
    }

    #[test]
    fn completing_keeps_schedule_fields() {
        let mut store = empty_store();
        let patient = store.add_patient(new_patient("Ada")).unwrap();
        let appt = store
            .add_appointment(new_appointment(&patient.id, (2025, 7, 5), (9, 0)))
            .unwrap();

        let patch = AppointmentPatch {
            status: Some(AppointmentStatus::Completed),
            cost: Some(Some(50.0)),
            ..Default::default()
        };
        assert!(store.update_appointment(&appt.id, patch).unwrap());

        let stored = store.get_appointment(&appt.id).unwrap();
        assert_eq!(stored.status, AppointmentStatus::Completed);
        assert_eq!(stored.cost, Some(50.0));
        assert_eq!(stored.date, NaiveDate::from_ymd_opt(2025, 7, 5).unwrap());
        assert_eq!(stored.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(stored.patient_id, patient.id);
    }

    #[test]
    fn update_to_unknown_patient_rejected() {
        let mut store = empty_store();
        let patient = store.add_patient(new_patient("Ada")).unwrap();
        let appt = store
            .add_appointment(new_appointment(&patient.id, (2025, 7, 5), (9, 0)))
            .unwrap();

        let patch = AppointmentPatch {
            patient_id: Some("nobody".into()),
            ..Default::default()
        };
        assert!(store.update_appointment(&appt.id, patch).is_err());
        assert_eq!(store.get_appointment(&appt.id).unwrap().patient_id, patient.id);
    }

    #[test]
    fn update_unknown_is_noop() {
        let mut store = empty_store();
        let updated = store
            .update_appointment("missing", AppointmentPatch::status(AppointmentStatus::NoShow))
            .unwrap();
        assert!(!updated);
    }

    #[test]
    fn update_unknown_with_unknown_patient_is_noop() {
        let mut store = empty_store();
        let patch = AppointmentPatch {
            patient_id: Some("nobody".into()),
            ..Default::default()
        };
        assert!(!store.update_appointment("missing", patch).unwrap());
        assert_eq!(store.backend().load(APPOINTMENTS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn delete_removes_only_that_appointment() {
        let mut store = empty_store();
        let patient = store.add_patient(new_patient("Ada")).unwrap();
        let a = store
            .add_appointment(new_appointment(&patient.id, (2025, 7, 5), (9, 0)))
            .unwrap();
        let b = store
            .add_appointment(new_appointment(&patient.id, (2025, 7, 6), (9, 0)))
            .unwrap();

        assert!(store.delete_appointment(&a.id).unwrap());
        assert!(!store.delete_appointment(&a.id).unwrap());
        assert!(store.get_appointment(&a.id).is_none());
        assert!(store.get_appointment(&b.id).is_some());
        assert!(store.get_patient(&patient.id).is_some());

        let raw = store.backend().load(APPOINTMENTS_KEY).unwrap().unwrap();
        assert!(!raw.contains(&a.id));
        assert!(raw.contains(&b.id));
    }

    #[test]
    fn patient_appointments_in_collection_order() {
        let mut store = empty_store();
        let ada = store.add_patient(new_patient("Ada")).unwrap();
        let bob = store.add_patient(new_patient("Bob")).unwrap();
        let late = store.add_appointment(new_appointment(&ada.id, (2025, 9, 1), (9, 0))).unwrap();
        store.add_appointment(new_appointment(&bob.id, (2025, 8, 1), (9, 0))).unwrap();
        let early = store.add_appointment(new_appointment(&ada.id, (2025, 7, 1), (9, 0))).unwrap();

        let ids: Vec<_> = store
            .get_patient_appointments(&ada.id)
            .into_iter()
            .map(|a| a.id.clone())
            .collect();
        assert_eq!(ids, vec![late.id, early.id]);
    }
}
