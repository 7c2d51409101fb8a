//! Community outage board.
//!
//! Users report outages, maintenance work and emergencies; reports are shown
//! newest first with a relative age.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{EcoWattError, Result};

/// Latitude range used to place new reports on the map.
const LAT_RANGE: (f64, f64) = (5.3, 5.5);
/// Longitude range used to place new reports on the map.
const LNG_RANGE: (f64, f64) = (-4.0, -3.8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
}

impl ReportStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "En attente",
            ReportStatus::InProgress => "En cours",
            ReportStatus::Resolved => "Résolu",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    #[default]
    Outage,
    Maintenance,
    Emergency,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutageReport {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub coordinates: Coordinates,
    pub status: ReportStatus,
    pub kind: ReportKind,
    pub timestamp: DateTime<Utc>,
}

/// Form fields for a new report.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewReport {
    pub title: String,
    pub description: String,
    pub location: String,
    pub kind: ReportKind,
}

/// In-memory list of community reports, newest first.
pub struct OutageBoard {
    reports: Mutex<Vec<OutageReport>>,
}

impl Default for OutageBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl OutageBoard {
    pub fn new() -> Self {
        Self {
            reports: Mutex::new(Vec::new()),
        }
    }

    /// Board pre-filled with two reports relative to `now`.
    pub fn with_demo_data(now: DateTime<Utc>) -> Self {
        let reports = vec![
            OutageReport {
                id: "1".to_string(),
                title: "Panne secteur Cocody".to_string(),
                description: "Coupure générale depuis 14h".to_string(),
                location: "Cocody Riviera".to_string(),
                coordinates: Coordinates {
                    lat: 5.3599,
                    lng: -3.9877,
                },
                status: ReportStatus::InProgress,
                kind: ReportKind::Outage,
                timestamp: now - Duration::hours(2),
            },
            OutageReport {
                id: "2".to_string(),
                title: "Maintenance programmée".to_string(),
                description: "Travaux sur le réseau moyenne tension".to_string(),
                location: "Plateau Centre".to_string(),
                coordinates: Coordinates {
                    lat: 5.3164,
                    lng: -4.0282,
                },
                status: ReportStatus::Pending,
                kind: ReportKind::Maintenance,
                timestamp: now - Duration::minutes(30),
            },
        ];
        Self {
            reports: Mutex::new(reports),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<OutageReport>>> {
        self.reports
            .lock()
            .map_err(|e| EcoWattError::State(format!("Lock poisoned: {}", e)))
    }

    /// Submit a report. It starts `Pending` and is placed at a random point
    /// inside the service area.
    pub fn submit<R: Rng>(
        &self,
        new: NewReport,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<OutageReport> {
        for (field, value) in [
            ("title", &new.title),
            ("description", &new.description),
            ("location", &new.location),
        ] {
            if value.trim().is_empty() {
                return Err(EcoWattError::Validation(format!("{} is required", field)));
            }
        }

        let report = OutageReport {
            id: Uuid::new_v4().to_string(),
            title: new.title.trim().to_string(),
            description: new.description.trim().to_string(),
            location: new.location.trim().to_string(),
            coordinates: Coordinates {
                lat: rng.random_range(LAT_RANGE.0..LAT_RANGE.1),
                lng: rng.random_range(LNG_RANGE.0..LNG_RANGE.1),
            },
            status: ReportStatus::Pending,
            kind: new.kind,
            timestamp: now,
        };

        self.lock()?.insert(0, report.clone());
        info!(report_id = %report.id, kind = ?report.kind, location = %report.location, "Outage report submitted");
        Ok(report)
    }

    pub fn set_status(&self, id: &str, status: ReportStatus) -> Result<OutageReport> {
        let mut reports = self.lock()?;
        let report = reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EcoWattError::ReportNotFound(id.to_string()))?;
        report.status = status;
        info!(report_id = %id, status = ?status, "Outage report status changed");
        Ok(report.clone())
    }

    pub fn reports(&self) -> Result<Vec<OutageReport>> {
        Ok(self.lock()?.clone())
    }

    pub fn count_by_status(&self, status: ReportStatus) -> Result<usize> {
        Ok(self.lock()?.iter().filter(|r| r.status == status).count())
    }
}

/// Relative age of a report: whole hours, then whole minutes, then "now".
pub fn time_ago(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let elapsed = now - then;
    let hours = elapsed.num_hours();
    let minutes = elapsed.num_minutes();

    if hours > 0 {
        format!("Il y a {}h", hours)
    } else if minutes > 0 {
        format!("Il y a {}min", minutes)
    } else {
        "À l'instant".to_string()
    }
}
