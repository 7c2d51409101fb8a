//! Point-in-time view of application state handed to the response engine.

use ecowatt_core::{AppStateStore, Device};
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Read-only copy of the state a response is computed from.
///
/// Captured when the user sends a message so the answer reflects send-time
/// state even if devices change before it is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatContextSnapshot {
    pub current_total_consumption_watts: f64,
    pub devices: Vec<Device>,
}

impl ChatContextSnapshot {
    pub fn new(current_total_consumption_watts: f64, devices: Vec<Device>) -> Self {
        Self {
            current_total_consumption_watts,
            devices,
        }
    }

    /// Copy the current consumption and device list out of the store in a
    /// single read, so the total agrees with the list.
    pub fn capture(store: &AppStateStore) -> Result<Self, ChatError> {
        let (current_total_consumption_watts, devices) = store.devices_with_consumption()?;
        Ok(Self::new(current_total_consumption_watts, devices))
    }

    pub fn active_device_count(&self) -> usize {
        self.devices.iter().filter(|d| d.is_on()).count()
    }

    /// Devices switched on, highest consumption first. Ties keep list order.
    pub fn active_devices_by_consumption(&self) -> Vec<&Device> {
        let mut active: Vec<&Device> = self.devices.iter().filter(|d| d.is_on()).collect();
        active.sort_by(|a, b| b.consumption_watts.total_cmp(&a.consumption_watts));
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecowatt_core::{DeviceIcon, DeviceStatus, DeviceType, EcoWattConfig};

    fn device(id: &str, watts: f64, status: DeviceStatus) -> Device {
        Device {
            id: id.to_string(),
            name: id.to_string(),
            device_type: DeviceType::Other,
            consumption_watts: watts,
            status,
            room: "Salon".to_string(),
            icon: DeviceIcon::Power,
        }
    }

    #[test]
    fn test_active_devices_sorted_descending() {
        let snapshot = ChatContextSnapshot::new(
            600.0,
            vec![
                device("A", 100.0, DeviceStatus::On),
                device("B", 500.0, DeviceStatus::On),
                device("C", 300.0, DeviceStatus::Off),
            ],
        );
        let names: Vec<&str> = snapshot
            .active_devices_by_consumption()
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(snapshot.active_device_count(), 2);
    }

    #[test]
    fn test_ties_keep_list_order() {
        let snapshot = ChatContextSnapshot::new(
            0.0,
            vec![
                device("first", 200.0, DeviceStatus::On),
                device("big", 900.0, DeviceStatus::On),
                device("second", 200.0, DeviceStatus::On),
                device("third", 200.0, DeviceStatus::On),
            ],
        );
        let names: Vec<&str> = snapshot
            .active_devices_by_consumption()
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["big", "first", "second", "third"]);
    }

    #[test]
    fn test_standby_is_not_active() {
        let snapshot =
            ChatContextSnapshot::new(0.0, vec![device("tv", 80.0, DeviceStatus::Standby)]);
        assert!(snapshot.active_devices_by_consumption().is_empty());
        assert_eq!(snapshot.active_device_count(), 0);
    }

    #[test]
    fn test_capture_from_store() {
        let store = AppStateStore::with_demo_data(&EcoWattConfig::default());
        let snapshot = ChatContextSnapshot::capture(&store).unwrap();
        assert_eq!(snapshot.current_total_consumption_watts, 230.0);
        assert_eq!(snapshot.devices.len(), 3);

        // Later changes do not leak into an existing snapshot.
        store.toggle_device("2").unwrap();
        assert_eq!(snapshot.active_device_count(), 2);
    }

    #[test]
    fn test_capture_total_matches_devices_under_concurrent_toggles() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let store = Arc::new(AppStateStore::with_demo_data(&EcoWattConfig::default()));
        let stop = Arc::new(AtomicBool::new(false));

        let toggler = {
            let store = Arc::clone(&store);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                while !stop.load(Ordering::SeqCst) {
                    store.toggle_device("2").unwrap();
                }
            })
        };

        for _ in 0..2000 {
            let snapshot = ChatContextSnapshot::capture(&store).unwrap();
            let listed: f64 = snapshot
                .active_devices_by_consumption()
                .iter()
                .map(|d| d.consumption_watts)
                .sum();
            assert_eq!(snapshot.current_total_consumption_watts, listed);
        }

        stop.store(true, Ordering::SeqCst);
        toggler.join().unwrap();
    }
}
