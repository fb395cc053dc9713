use chrono::{NaiveDate, NaiveTime};

use crate::models::enums::AppointmentStatus;
use crate::models::{Appointment, Patient};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default()
}

/// Patients written on first run.
pub fn sample_patients() -> Vec<Patient> {
    vec![
        Patient {
            id: "1".into(),
            name: "John Doe".into(),
            email: "patient1@example.com".into(),
            phone: "555-123-4567".into(),
            address: "123 Main St, Anytown, ST 12345".into(),
            date_of_birth: Some(date(1985, 6, 15)),
            medical_history: "No significant dental history.".into(),
            files: Vec::new(),
        },
        Patient {
            id: "2".into(),
            name: "Jane Smith".into(),
            email: "patient2@example.com".into(),
            phone: "555-987-6543".into(),
            address: "456 Oak Ave, Somewhere, ST 67890".into(),
            date_of_birth: Some(date(1990, 9, 22)),
            medical_history: "Root canal on tooth #18 in 2020.".into(),
            files: Vec::new(),
        },
    ]
}

/// Appointments written on first run, one per sample patient.
pub fn sample_appointments() -> Vec<Appointment> {
    vec![
        Appointment {
            id: "1".into(),
            patient_id: "1".into(),
            date: date(2025, 7, 5),
            time: time(9, 0),
            duration: 60,
            appointment_type: "Check-up".into(),
            notes: "Regular dental check-up".into(),
            status: AppointmentStatus::Scheduled,
            cost: None,
            treatment: None,
            next_appointment_date: None,
            files: Vec::new(),
        },
        Appointment {
            id: "2".into(),
            patient_id: "2".into(),
            date: date(2025, 7, 10),
            time: time(14, 0),
            duration: 90,
            appointment_type: "Cleaning".into(),
            notes: "Dental cleaning".into(),
            status: AppointmentStatus::Scheduled,
            cost: None,
            treatment: None,
            next_appointment_date: None,
            files: Vec::new(),
        },
    ]
}
