//! Read-side views: dashboard, appointment list, patient search, and the
//! patient portal history.
//!
//! All functions are pure over the store's collections; "now" is passed in
//! so results are reproducible.

use std::cmp::Reverse;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::KeyValueStore;
use crate::models::enums::AppointmentStatus;
use crate::models::{Appointment, Patient};
use crate::store::ClinicStore;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary<'a> {
    pub total_patients: usize,
    pub total_appointments: usize,
    /// Scheduled and not yet started, soonest first.
    pub upcoming: Vec<&'a Appointment>,
    /// Booked for today, excluding cancelled and no-show.
    pub today: Vec<&'a Appointment>,
}

pub fn dashboard<'a>(
    patients: &[Patient],
    appointments: &'a [Appointment],
    now: NaiveDateTime,
) -> DashboardSummary<'a> {
    let mut upcoming: Vec<_> = appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Scheduled && a.starts_at() >= now)
        .collect();
    upcoming.sort_by_key(|a| a.starts_at());

    let today = appointments
        .iter()
        .filter(|a| a.date == now.date())
        .filter(|a| !matches!(a.status, AppointmentStatus::Cancelled | AppointmentStatus::NoShow))
        .collect();

    DashboardSummary {
        total_patients: patients.len(),
        total_appointments: appointments.len(),
        upcoming,
        today,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AppointmentStatus),
}

impl StatusFilter {
    fn matches(self, status: AppointmentStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

/// Admin appointment list: status filter plus a free-text search over the
/// appointment type, the patient's name and the `YYYY-MM-DD` date. Sorted by
/// date and time.
pub fn filter_appointments<'a>(
    appointments: &'a [Appointment],
    patients: &[Patient],
    status: StatusFilter,
    search: &str,
) -> Vec<&'a Appointment> {
    let term = search.trim().to_lowercase();
    let mut result: Vec<_> = appointments
        .iter()
        .filter(|a| status.matches(a.status))
        .filter(|a| {
            if term.is_empty() {
                return true;
            }
            let patient_name = patients
                .iter()
                .find(|p| p.id == a.patient_id)
                .map(|p| p.name.to_lowercase())
                .unwrap_or_default();
            a.appointment_type.to_lowercase().contains(&term)
                || patient_name.contains(&term)
                || a.date.to_string().contains(&term)
        })
        .collect();
    result.sort_by_key(|a| a.starts_at());
    result
}

/// Case-insensitive match on name or email; phone matches as typed.
pub fn search_patients<'a>(patients: &'a [Patient], search: &str) -> Vec<&'a Patient> {
    let raw = search.trim();
    let term = raw.to_lowercase();
    patients
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&term)
                || p.email.to_lowercase().contains(&term)
                || p.phone.contains(raw)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortalFilter {
    /// Scheduled and in the future, soonest first.
    #[default]
    Upcoming,
    /// In the past or already closed, most recent first.
    Past,
    /// Everything, most recent first.
    All,
}

/// A patient's own appointment history as shown in the portal.
pub fn patient_portal_appointments<'a>(
    appointments: &'a [Appointment],
    patient_id: &str,
    filter: PortalFilter,
    now: NaiveDateTime,
) -> Vec<&'a Appointment> {
    let mine = appointments.iter().filter(|a| a.patient_id == patient_id);
    let mut result: Vec<_> = match filter {
        PortalFilter::Upcoming => mine
            .filter(|a| a.starts_at() >= now && a.status == AppointmentStatus::Scheduled)
            .collect(),
        PortalFilter::Past => mine
            .filter(|a| a.starts_at() < now || a.status.is_terminal())
            .collect(),
        PortalFilter::All => mine.collect(),
    };

    if filter == PortalFilter::Upcoming {
        result.sort_by_key(|a| a.starts_at());
    } else {
        result.sort_by_key(|a| Reverse(a.starts_at()));
    }
    result
}

impl<S: KeyValueStore> ClinicStore<S> {
    pub fn dashboard(&self, now: NaiveDateTime) -> DashboardSummary<'_> {
        dashboard(self.patients(), self.appointments(), now)
    }

    pub fn filter_appointments(&self, status: StatusFilter, search: &str) -> Vec<&Appointment> {
        filter_appointments(self.appointments(), self.patients(), status, search)
    }

    pub fn search_patients(&self, search: &str) -> Vec<&Patient> {
        search_patients(self.patients(), search)
    }

    /// Portal view for the patient whose email matches the login.
    /// Empty when no patient record carries that email.
    pub fn portal_appointments(
        &self,
        email: &str,
        filter: PortalFilter,
        now: NaiveDateTime,
    ) -> Vec<&Appointment> {
        match self.find_patient_by_email(email) {
            Some(patient) => {
                patient_portal_appointments(self.appointments(), &patient.id, filter, now)
            }
            None => Vec::new(),
        }
    }
}
