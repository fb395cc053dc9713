use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::attachment::FileAttachment;
use super::enums::AppointmentStatus;
use super::lenient;

/// Appointment categories offered by the scheduling form.
pub const APPOINTMENT_TYPES: &[&str] = &[
    "Check-up",
    "Cleaning",
    "Filling",
    "Root Canal",
    "Crown",
    "Extraction",
    "Consultation",
    "Follow-up",
];

/// Slot lengths offered by the scheduling form, in minutes.
pub const APPOINTMENT_DURATIONS: &[u32] = &[30, 60, 90, 120];

pub const DEFAULT_DURATION_MINUTES: u32 = 60;

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub date: NaiveDate,
    #[serde(with = "lenient::hhmm")]
    pub time: NaiveTime,
    #[serde(default = "default_duration", deserialize_with = "lenient::minutes")]
    pub duration: u32,
    #[serde(rename = "type")]
    pub appointment_type: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(
        default,
        deserialize_with = "lenient::optional_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_appointment_date: Option<NaiveDate>,
    #[serde(default)]
    pub files: Vec<FileAttachment>,
}

impl Appointment {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.starts_at() + Duration::minutes(i64::from(self.duration))
    }
}

/// Fields supplied when booking. `status` is accepted for wire
/// compatibility but every new appointment starts as scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub patient_id: String,
    pub date: NaiveDate,
    #[serde(with = "lenient::hhmm")]
    pub time: NaiveTime,
    #[serde(default = "default_duration", deserialize_with = "lenient::minutes")]
    pub duration: u32,
    #[serde(rename = "type")]
    pub appointment_type: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

impl NewAppointment {
    pub(crate) fn into_appointment(self, id: String) -> Appointment {
        Appointment {
            id,
            patient_id: self.patient_id,
            date: self.date,
            time: self.time,
            duration: self.duration,
            appointment_type: self.appointment_type,
            notes: self.notes,
            status: AppointmentStatus::Scheduled,
            cost: None,
            treatment: None,
            next_appointment_date: None,
            files: Vec::new(),
        }
    }
}

/// Partial update: `None` leaves the stored field untouched; for the
/// completion fields `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentPatch {
    pub patient_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub duration: Option<u32>,
    pub appointment_type: Option<String>,
    pub notes: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub cost: Option<Option<f64>>,
    pub treatment: Option<Option<String>>,
    pub next_appointment_date: Option<Option<NaiveDate>>,
}

impl AppointmentPatch {
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Mark completed and record what was done.
    pub fn completed(cost: f64, treatment: impl Into<String>) -> Self {
        Self {
            status: Some(AppointmentStatus::Completed),
            cost: Some(Some(cost)),
            treatment: Some(Some(treatment.into())),
            ..Default::default()
        }
    }

    pub fn with_next_appointment(mut self, date: NaiveDate) -> Self {
        self.next_appointment_date = Some(Some(date));
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(self, appointment: &mut Appointment) {
        if let Some(patient_id) = self.patient_id {
            appointment.patient_id = patient_id;
        }
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(time) = self.time {
            appointment.time = time;
        }
        if let Some(duration) = self.duration {
            appointment.duration = duration;
        }
        if let Some(kind) = self.appointment_type {
            appointment.appointment_type = kind;
        }
        if let Some(notes) = self.notes {
            appointment.notes = notes;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        if let Some(cost) = self.cost {
            appointment.cost = cost;
        }
        if let Some(treatment) = self.treatment {
            appointment.treatment = treatment;
        }
        if let Some(next) = self.next_appointment_date {
            appointment.next_appointment_date = next;
        }
    }
}
