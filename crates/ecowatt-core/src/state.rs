//! Application state container.
//!
//! Owns devices, alerts, the monthly budget, the theme flag and the latest
//! consumption series. Created once at startup and passed explicitly to the
//! components that read or mutate it.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::EcoWattConfig;
use crate::error::{EcoWattError, Result};
use crate::tariff::FlatTariff;
use crate::types::{
    Alert, AlertKind, Device, DeviceIcon, DeviceStatus, DeviceType, DeviceUpdate, EnergySample,
    NewDevice,
};

/// Devices sharing a room, in the order the room first appears.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomGroup {
    pub room: String,
    pub devices: Vec<Device>,
}

/// Figures shown on the home dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Sum of the consumption of devices currently on.
    pub current_consumption_watts: f64,
    /// Sum of the last 24 hourly samples.
    pub today_consumption_watts: u64,
    pub today_cost: u64,
    /// `today_cost` relative to the monthly budget, in percent.
    pub budget_usage_percent: f64,
    pub unread_alerts: usize,
}

struct StateInner {
    devices: Vec<Device>,
    alerts: Vec<Alert>,
    energy_series: Vec<EnergySample>,
    monthly_budget: f64,
    dark_mode: bool,
}

/// Shared, mutex-protected application state.
pub struct AppStateStore {
    inner: Mutex<StateInner>,
    tariff: FlatTariff,
}

impl AppStateStore {
    /// Create an empty store using the configured tariff and budget.
    pub fn new(config: &EcoWattConfig) -> Self {
        Self {
            inner: Mutex::new(StateInner {
                devices: Vec::new(),
                alerts: Vec::new(),
                energy_series: Vec::new(),
                monthly_budget: config.dashboard.monthly_budget,
                dark_mode: false,
            }),
            tariff: config.tariff.flat_tariff(),
        }
    }

    /// Create a store pre-filled with the demo household.
    pub fn with_demo_data(config: &EcoWattConfig) -> Self {
        let store = Self::new(config);
        if let Ok(mut inner) = store.inner.lock() {
            inner.devices = demo_devices();
            inner.alerts = vec![Alert {
                id: "1".to_string(),
                kind: AlertKind::Warning,
                title: "Consommation élevée".to_string(),
                message: "Votre consommation dépasse 80% de votre budget mensuel.".to_string(),
                timestamp: Utc::now(),
                is_read: false,
            }];
        }
        store
    }

    pub fn tariff(&self) -> FlatTariff {
        self.tariff
    }

    fn lock(&self) -> Result<MutexGuard<'_, StateInner>> {
        self.inner
            .lock()
            .map_err(|e| EcoWattError::State(format!("Lock poisoned: {}", e)))
    }

    // -----------------------------------------------------------------
    // Devices
    // -----------------------------------------------------------------

    pub fn devices(&self) -> Result<Vec<Device>> {
        Ok(self.lock()?.devices.clone())
    }

    pub fn device(&self, id: &str) -> Result<Device> {
        self.lock()?
            .devices
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| EcoWattError::DeviceNotFound(id.to_string()))
    }

    /// Register a device. New devices start switched off.
    pub fn add_device(&self, new: NewDevice) -> Result<Device> {
        validate_name("name", &new.name)?;
        validate_name("room", &new.room)?;
        validate_consumption(new.consumption_watts)?;

        let device = Device {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            device_type: new.device_type,
            consumption_watts: new.consumption_watts,
            status: DeviceStatus::Off,
            room: new.room.trim().to_string(),
            icon: new.icon,
        };

        self.lock()?.devices.push(device.clone());
        info!(device_id = %device.id, name = %device.name, "Device added");
        Ok(device)
    }

    /// Apply a partial update to a device.
    pub fn update_device(&self, id: &str, update: DeviceUpdate) -> Result<Device> {
        if let Some(ref name) = update.name {
            validate_name("name", name)?;
        }
        if let Some(ref room) = update.room {
            validate_name("room", room)?;
        }
        if let Some(watts) = update.consumption_watts {
            validate_consumption(watts)?;
        }

        let mut inner = self.lock()?;
        let device = inner
            .devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| EcoWattError::DeviceNotFound(id.to_string()))?;

        if let Some(name) = update.name {
            device.name = name.trim().to_string();
        }
        if let Some(device_type) = update.device_type {
            device.device_type = device_type;
        }
        if let Some(watts) = update.consumption_watts {
            device.consumption_watts = watts;
        }
        if let Some(status) = update.status {
            device.status = status;
        }
        if let Some(room) = update.room {
            device.room = room.trim().to_string();
        }
        if let Some(icon) = update.icon {
            device.icon = icon;
        }

        debug!(device_id = %id, "Device updated");
        Ok(device.clone())
    }

    pub fn remove_device(&self, id: &str) -> Result<Device> {
        let mut inner = self.lock()?;
        let pos = inner
            .devices
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| EcoWattError::DeviceNotFound(id.to_string()))?;
        let removed = inner.devices.remove(pos);
        info!(device_id = %id, "Device removed");
        Ok(removed)
    }

    /// Switch a device on or off. Standby devices are switched on.
    pub fn toggle_device(&self, id: &str) -> Result<Device> {
        let mut inner = self.lock()?;
        let device = inner
            .devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| EcoWattError::DeviceNotFound(id.to_string()))?;
        device.status = device.status.toggled();
        info!(device_id = %id, status = ?device.status, "Device toggled");
        Ok(device.clone())
    }

    /// Total draw of the devices currently on, in watts.
    pub fn current_consumption(&self) -> Result<f64> {
        Ok(self
            .lock()?
            .devices
            .iter()
            .filter(|d| d.is_on())
            .map(|d| d.consumption_watts)
            .sum())
    }

    /// Device list and the consumption of those switched on, read under one
    /// lock so the total always matches the list.
    pub fn devices_with_consumption(&self) -> Result<(f64, Vec<Device>)> {
        let inner = self.lock()?;
        let total = inner
            .devices
            .iter()
            .filter(|d| d.is_on())
            .map(|d| d.consumption_watts)
            .sum();
        Ok((total, inner.devices.clone()))
    }

    pub fn active_device_count(&self) -> Result<usize> {
        Ok(self.lock()?.devices.iter().filter(|d| d.is_on()).count())
    }

    /// Devices whose name or room contains `query`, ignoring case.
    pub fn search_devices(&self, query: &str) -> Result<Vec<Device>> {
        let needle = query.to_lowercase();
        Ok(self
            .lock()?
            .devices
            .iter()
            .filter(|d| {
                d.name.to_lowercase().contains(&needle) || d.room.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    /// Group the devices matching `query` by room.
    pub fn devices_by_room(&self, query: &str) -> Result<Vec<RoomGroup>> {
        let mut groups: Vec<RoomGroup> = Vec::new();
        for device in self.search_devices(query)? {
            match groups.iter_mut().find(|g| g.room == device.room) {
                Some(group) => group.devices.push(device),
                None => groups.push(RoomGroup {
                    room: device.room.clone(),
                    devices: vec![device],
                }),
            }
        }
        Ok(groups)
    }

    // -----------------------------------------------------------------
    // Alerts
    // -----------------------------------------------------------------

    pub fn alerts(&self) -> Result<Vec<Alert>> {
        Ok(self.lock()?.alerts.clone())
    }

    pub fn push_alert(
        &self,
        kind: AlertKind,
        title: &str,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Alert> {
        let alert = Alert {
            id: Uuid::new_v4().to_string(),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            timestamp,
            is_read: false,
        };
        self.lock()?.alerts.push(alert.clone());
        info!(alert_id = %alert.id, kind = ?kind, "Alert raised");
        Ok(alert)
    }

    pub fn mark_alert_read(&self, id: &str) -> Result<()> {
        let mut inner = self.lock()?;
        let alert = inner
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| EcoWattError::AlertNotFound(id.to_string()))?;
        alert.is_read = true;
        Ok(())
    }

    pub fn unread_alert_count(&self) -> Result<usize> {
        Ok(self.lock()?.alerts.iter().filter(|a| !a.is_read).count())
    }

    // -----------------------------------------------------------------
    // Budget, theme and series
    // -----------------------------------------------------------------

    pub fn monthly_budget(&self) -> Result<f64> {
        Ok(self.lock()?.monthly_budget)
    }

    pub fn set_monthly_budget(&self, budget: f64) -> Result<()> {
        if !budget.is_finite() || budget <= 0.0 {
            return Err(EcoWattError::Validation(format!(
                "monthly budget must be positive, got {}",
                budget
            )));
        }
        self.lock()?.monthly_budget = budget;
        info!(budget, "Monthly budget updated");
        Ok(())
    }

    pub fn is_dark_mode(&self) -> Result<bool> {
        Ok(self.lock()?.dark_mode)
    }

    /// Flip the theme flag and return the new value.
    pub fn toggle_theme(&self) -> Result<bool> {
        let mut inner = self.lock()?;
        inner.dark_mode = !inner.dark_mode;
        Ok(inner.dark_mode)
    }

    pub fn energy_series(&self) -> Result<Vec<EnergySample>> {
        Ok(self.lock()?.energy_series.clone())
    }

    /// Replace the stored series with a freshly generated one.
    pub fn replace_energy_series(&self, series: Vec<EnergySample>) -> Result<()> {
        let len = series.len();
        self.lock()?.energy_series = series;
        debug!(samples = len, "Energy series replaced");
        Ok(())
    }

    pub fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let inner = self.lock()?;
        let current_consumption_watts = inner
            .devices
            .iter()
            .filter(|d| d.is_on())
            .map(|d| d.consumption_watts)
            .sum();
        let today_consumption_watts: u64 = inner
            .energy_series
            .iter()
            .map(|s| u64::from(s.consumption_watts))
            .sum();
        let today_cost = self.tariff.cost_of_watts(today_consumption_watts as f64) as u64;

        Ok(DashboardSummary {
            current_consumption_watts,
            today_consumption_watts,
            today_cost,
            budget_usage_percent: today_cost as f64 / inner.monthly_budget * 100.0,
            unread_alerts: inner.alerts.iter().filter(|a| !a.is_read).count(),
        })
    }
}

fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EcoWattError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_consumption(watts: f64) -> Result<()> {
    if !watts.is_finite() || watts <= 0.0 {
        return Err(EcoWattError::Validation(format!(
            "consumption must be a positive number of watts, got {}",
            watts
        )));
    }
    Ok(())
}

fn demo_devices() -> Vec<Device> {
    vec![
        Device {
            id: "1".to_string(),
            name: "Réfrigérateur".to_string(),
            device_type: DeviceType::Appliance,
            consumption_watts: 150.0,
            status: DeviceStatus::On,
            room: "Cuisine".to_string(),
            icon: DeviceIcon::Refrigerator,
        },
        Device {
            id: "2".to_string(),
            name: "Climatiseur Salon".to_string(),
            device_type: DeviceType::Cooling,
            consumption_watts: 1200.0,
            status: DeviceStatus::Off,
            room: "Salon".to_string(),
            icon: DeviceIcon::Wind,
        },
        Device {
            id: "3".to_string(),
            name: "Téléviseur".to_string(),
            device_type: DeviceType::Entertainment,
            consumption_watts: 80.0,
            status: DeviceStatus::On,
            room: "Salon".to_string(),
            icon: DeviceIcon::Tv,
        },
    ]
}
