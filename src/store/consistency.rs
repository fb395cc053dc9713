use std::collections::HashSet;

use serde::Serialize;

use super::{ClinicStore, StoreError};
use crate::db::KeyValueStore;
use crate::models::Appointment;

/// A single consistency issue detected by the checker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencyIssue {
    pub category: &'static str,
    pub description: String,
    pub record_id: String,
}

/// Result of a consistency check over both collections.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConsistencyReport {
    pub issues: Vec<ConsistencyIssue>,
    pub patients_checked: usize,
    pub appointments_checked: usize,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl<S: KeyValueStore> ClinicStore<S> {
    /// Appointments whose patient no longer exists. Cascade delete prevents
    /// these; they only appear in data written by another client.
    pub fn find_orphaned_appointments(&self) -> Vec<&Appointment> {
        let known: HashSet<&str> = self.patients.iter().map(|p| p.id.as_str()).collect();
        self.appointments
            .iter()
            .filter(|a| !known.contains(a.patient_id.as_str()))
            .collect()
    }

    /// Detects:
    /// - appointments referencing a missing patient
    /// - duplicate ids within a collection
    /// - attachments with no data
    pub fn check_consistency(&self) -> ConsistencyReport {
        let mut issues = Vec::new();

        for appt in self.find_orphaned_appointments() {
            issues.push(ConsistencyIssue {
                category: "orphaned_appointment",
                description: format!("Appointment references missing patient {}", appt.patient_id),
                record_id: appt.id.clone(),
            });
        }

        let mut seen = HashSet::new();
        for patient in &self.patients {
            if !seen.insert(patient.id.as_str()) {
                issues.push(ConsistencyIssue {
                    category: "duplicate_patient_id",
                    description: "Patient id appears more than once".into(),
                    record_id: patient.id.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for appt in &self.appointments {
            if !seen.insert(appt.id.as_str()) {
                issues.push(ConsistencyIssue {
                    category: "duplicate_appointment_id",
                    description: "Appointment id appears more than once".into(),
                    record_id: appt.id.clone(),
                });
            }
        }

        let patient_files = self.patients.iter().flat_map(|p| p.files.iter());
        let appointment_files = self.appointments.iter().flat_map(|a| a.files.iter());
        for file in patient_files.chain(appointment_files) {
            if file.data.trim().is_empty() {
                issues.push(ConsistencyIssue {
                    category: "missing_attachment_data",
                    description: format!("Attachment '{}' has no data", file.name),
                    record_id: file.id.clone(),
                });
            }
        }

        ConsistencyReport {
            issues,
            patients_checked: self.patients.len(),
            appointments_checked: self.appointments.len(),
        }
    }

    /// Drop orphaned appointments and write the collection back.
    /// Returns how many were removed.
    pub fn repair_orphans(&mut self) -> Result<usize, StoreError> {
        let known: HashSet<String> = self.patients.iter().map(|p| p.id.clone()).collect();
        let before = self.appointments.len();
        self.appointments.retain(|a| known.contains(&a.patient_id));
        let removed = before - self.appointments.len();

        if removed > 0 {
            tracing::warn!(removed, "Removed orphaned appointments");
            self.persist_appointments()?;
        }
        Ok(removed)
    }
}
