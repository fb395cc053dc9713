//! Input checks run by callers before invoking store mutations.
//!
//! The store itself trusts its input; these mirror the scheduling and
//! registration forms so every front-end rejects the same things.

use serde::Serialize;
use thiserror::Error;

use crate::models::{AppointmentPatch, NewAppointment, NewPatient, PatientPatch};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} invalid field(s): {}", .0.len(), summarize(.0))]
pub struct ValidationError(pub Vec<FieldError>);

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }
}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn require(&mut self, field: &'static str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.push(field, message);
        }
    }

    fn push(&mut self, field: &'static str, message: &str) {
        self.0.push(FieldError {
            field,
            message: message.to_string(),
        });
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(self.0))
        }
    }
}

impl NewPatient {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Collector::default();
        errors.require("name", &self.name, "Name is required");
        errors.require("email", &self.email, "Email is required");
        errors.require("phone", &self.phone, "Phone is required");
        errors.finish()
    }
}

impl PatientPatch {
    /// Present fields must not blank out required ones.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Collector::default();
        if let Some(name) = &self.name {
            errors.require("name", name, "Name is required");
        }
        if let Some(email) = &self.email {
            errors.require("email", email, "Email is required");
        }
        if let Some(phone) = &self.phone {
            errors.require("phone", phone, "Phone is required");
        }
        errors.finish()
    }
}

impl NewAppointment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Collector::default();
        errors.require("patientId", &self.patient_id, "Patient is required");
        errors.require("type", &self.appointment_type, "Appointment type is required");
        if self.duration == 0 {
            errors.push("duration", "Duration must be positive");
        }
        errors.finish()
    }
}

impl AppointmentPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Collector::default();
        if let Some(patient_id) = &self.patient_id {
            errors.require("patientId", patient_id, "Patient is required");
        }
        if let Some(kind) = &self.appointment_type {
            errors.require("type", kind, "Appointment type is required");
        }
        if self.duration == Some(0) {
            errors.push("duration", "Duration must be positive");
        }
        if let Some(Some(cost)) = self.cost {
            if !cost.is_finite() || cost < 0.0 {
                errors.push("cost", "Cost cannot be negative");
            }
        }
        errors.finish()
    }
}
