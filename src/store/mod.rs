//! Clinic data store: the single source of truth for patients and
//! appointments.
//!
//! The store keeps an in-memory mirror of both collections and writes the
//! whole affected collection through to the key-value backend on every
//! mutation. Reads never touch the backend.
//!
//! A failed write leaves the in-memory mutation in place and returns the
//! error; the next successful write of that collection re-converges.

mod appointments;
mod attachments;
mod consistency;
mod patients;
mod seed;

pub use consistency::*;
pub use patients::CascadeDelete;
pub use seed::{sample_appointments, sample_patients};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{APPOINTMENTS_KEY, PATIENTS_KEY};
use crate::db::{DatabaseError, KeyValueStore};
use crate::models::{Appointment, Patient};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Stored entry '{key}' is not valid: {reason}")]
    Corrupt { key: &'static str, reason: String },

    #[error("Patient not found: {0}")]
    UnknownPatient(String),
}

pub struct ClinicStore<S: KeyValueStore> {
    backend: S,
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
}

impl<S: KeyValueStore> ClinicStore<S> {
    /// Load both collections, seeding any absent entry with the sample
    /// dataset and writing the seed back.
    pub fn open(backend: S) -> Result<Self, StoreError> {
        let patients = load_or_seed(&backend, PATIENTS_KEY, sample_patients)?;
        let appointments = load_or_seed(&backend, APPOINTMENTS_KEY, sample_appointments)?;
        tracing::info!(
            patients = patients.len(),
            appointments = appointments.len(),
            "Clinic store opened"
        );
        let store = Self {
            backend,
            patients,
            appointments,
        };

        // Each key seeds on its own, so sample appointments can land next to
        // a stored patient list that lacks their patients.
        let orphans = store.find_orphaned_appointments().len();
        if orphans > 0 {
            tracing::warn!(orphans, "Appointments reference missing patients");
        }
        Ok(store)
    }

    /// Discard the mirror and read both collections again.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.patients = load_or_seed(&self.backend, PATIENTS_KEY, sample_patients)?;
        self.appointments = load_or_seed(&self.backend, APPOINTMENTS_KEY, sample_appointments)?;
        Ok(())
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// All patients in insertion order.
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// All appointments in insertion order.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    fn persist_patients(&self) -> Result<(), StoreError> {
        write_collection(&self.backend, PATIENTS_KEY, &self.patients)
    }

    fn persist_appointments(&self) -> Result<(), StoreError> {
        write_collection(&self.backend, APPOINTMENTS_KEY, &self.appointments)
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn load_or_seed<S, T>(
    backend: &S,
    key: &'static str,
    seed: fn() -> Vec<T>,
) -> Result<Vec<T>, StoreError>
where
    S: KeyValueStore,
    T: Serialize + DeserializeOwned,
{
    match backend.load(key)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| {
            tracing::warn!(key, error = %e, "Stored collection could not be parsed");
            StoreError::Corrupt {
                key,
                reason: e.to_string(),
            }
        }),
        None => {
            let items = seed();
            tracing::info!(key, count = items.len(), "Seeding empty collection");
            write_collection(backend, key, &items)?;
            Ok(items)
        }
    }
}

fn write_collection<S, T>(backend: &S, key: &'static str, items: &[T]) -> Result<(), StoreError>
where
    S: KeyValueStore,
    T: Serialize,
{
    let json = serde_json::to_string(items).map_err(DatabaseError::from)?;
    backend.save(key, &json)?;
    tracing::debug!(key, count = items.len(), bytes = json.len(), "Collection written");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::db::{MemoryKeyValueStore, SqliteKeyValueStore};

    #[test]
    fn first_open_seeds_and_writes_back() {
        let kv = MemoryKeyValueStore::new();
        let store = ClinicStore::open(kv.clone()).unwrap();

        assert_eq!(store.patients().len(), 2);
        assert_eq!(store.appointments().len(), 2);
        assert_eq!(store.patients()[0].name, "John Doe");
        assert!(kv.load(PATIENTS_KEY).unwrap().is_some());
        assert!(kv.load(APPOINTMENTS_KEY).unwrap().is_some());
    }

    #[test]
    fn existing_entries_are_not_reseeded() {
        let kv = MemoryKeyValueStore::new();
        kv.save(PATIENTS_KEY, "[]").unwrap();
        let store = ClinicStore::open(kv.clone()).unwrap();

        assert!(store.patients().is_empty());
        // Only the absent entry got seeded, leaving its appointments orphaned
        assert_eq!(store.appointments().len(), 2);
        assert_eq!(store.find_orphaned_appointments().len(), 2);
    }

    #[test]
    fn corrupt_entry_is_reported_not_overwritten() {
        let kv = MemoryKeyValueStore::new();
        kv.save(PATIENTS_KEY, "{not json").unwrap();
        let err = ClinicStore::open(kv.clone()).err().unwrap();

        assert!(matches!(err, StoreError::Corrupt { key: PATIENTS_KEY, .. }));
        assert_eq!(kv.load(PATIENTS_KEY).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn non_finite_cost_is_corrupt() {
        let kv = MemoryKeyValueStore::new();
        kv.save(PATIENTS_KEY, r#"[{"id":"1","name":"John Doe"}]"#).unwrap();
        kv.save(
            APPOINTMENTS_KEY,
            r#"[{"id":"a","patientId":"1","date":"2025-07-05","time":"09:00","type":"Check-up","status":"completed","cost":"NaN"}]"#,
        )
        .unwrap();

        let err = ClinicStore::open(kv).err().unwrap();
        assert!(matches!(err, StoreError::Corrupt { key: APPOINTMENTS_KEY, .. }));
    }

    #[test]
    fn round_trip_through_backend_is_deep_equal() {
        let kv = MemoryKeyValueStore::new();
        let mut store = ClinicStore::open(kv.clone()).unwrap();
        let patient = store.add_patient(new_patient("Ada Lovelace")).unwrap();
        let appt = store
            .add_appointment(new_appointment(&patient.id, (2025, 7, 20), (10, 30)))
            .unwrap();
        store
            .update_appointment(&appt.id, crate::models::AppointmentPatch::completed(75.5, "Filling"))
            .unwrap();

        let reopened = ClinicStore::open(kv).unwrap();
        assert_eq!(reopened.patients(), store.patients());
        assert_eq!(reopened.appointments(), store.appointments());
    }

    #[test]
    fn round_trip_through_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.db");
        let expected = {
            let mut store = ClinicStore::open(SqliteKeyValueStore::open(&path).unwrap()).unwrap();
            store.add_patient(new_patient("Grace Hopper")).unwrap();
            (store.patients().to_vec(), store.appointments().to_vec())
        };

        let store = ClinicStore::open(SqliteKeyValueStore::open(&path).unwrap()).unwrap();
        assert_eq!(store.patients(), expected.0.as_slice());
        assert_eq!(store.appointments(), expected.1.as_slice());
    }

    #[test]
    fn failed_write_keeps_memory_and_reconverges() {
        let mut store = ClinicStore::open(FlakyStore::default()).unwrap();
        store.backend().fail_writes(true);

        let result = store.add_patient(new_patient("Offline"));
        assert!(matches!(result, Err(StoreError::Database(_))));
        // Memory already holds the new record
        assert_eq!(store.patients().len(), 3);

        store.backend().fail_writes(false);
        store.add_patient(new_patient("Online")).unwrap();

        let persisted: Vec<Patient> =
            serde_json::from_str(&store.backend().inner.load(PATIENTS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted.len(), 4);
    }

    #[test]
    fn reload_reads_backend_again() {
        let kv = MemoryKeyValueStore::new();
        let mut store = ClinicStore::open(kv.clone()).unwrap();
        let mut other = ClinicStore::open(kv).unwrap();
        other.add_patient(new_patient("Elsewhere")).unwrap();

        assert_eq!(store.patients().len(), 2);
        store.reload().unwrap();
        assert_eq!(store.patients().len(), 3);
    }
}
