//! Core domain for EcoWatt.
//!
//! Holds the device and sample types, the synthetic consumption signal, the
//! flat tariff and bill calculator, the application-state store, the
//! community outage board and the timer abstraction.

pub mod config;
pub mod error;
pub mod outage;
pub mod scheduler;
pub mod signal;
pub mod state;
pub mod tariff;
pub mod types;

pub use config::EcoWattConfig;
pub use error::{EcoWattError, Result};
pub use outage::{Coordinates, NewReport, OutageBoard, OutageReport, ReportKind, ReportStatus};
pub use scheduler::{ImmediateScheduler, RefreshLoop, Scheduler, ShutdownHandle, TokioScheduler};
pub use signal::{SeriesStats, SignalSynthesizer, SAMPLES_PER_DAY};
pub use state::{AppStateStore, DashboardSummary, RoomGroup};
pub use tariff::{BillInputs, BillPrediction, FlatTariff, Savings};
pub use types::*;
