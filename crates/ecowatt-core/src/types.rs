use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Category of a household device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    /// Large household appliance (fridge, washing machine).
    #[default]
    Appliance,
    /// Air conditioning and fans.
    Cooling,
    /// TV, audio, consoles.
    Entertainment,
    /// Lamps and light fixtures.
    Lighting,
    /// Small kitchen appliances.
    Kitchen,
    /// Anything else.
    Other,
}

/// Power state of a device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    On,
    #[default]
    Off,
    Standby,
}

impl DeviceStatus {
    /// Human-readable label shown next to the device.
    pub fn label(&self) -> &'static str {
        match self {
            DeviceStatus::On => "Allumé",
            DeviceStatus::Off => "Éteint",
            DeviceStatus::Standby => "En veille",
        }
    }

    /// Status after a user toggle: `On` switches off, anything else switches on.
    pub fn toggled(&self) -> Self {
        match self {
            DeviceStatus::On => DeviceStatus::Off,
            DeviceStatus::Off | DeviceStatus::Standby => DeviceStatus::On,
        }
    }
}

/// Icon used to render a device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceIcon {
    Refrigerator,
    Wind,
    Tv,
    Lightbulb,
    Microwave,
    WashingMachine,
    #[default]
    Power,
}

impl DeviceIcon {
    /// Resolve an icon from its kebab-case name. Unknown names map to `Power`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "refrigerator" => DeviceIcon::Refrigerator,
            "wind" => DeviceIcon::Wind,
            "tv" => DeviceIcon::Tv,
            "lightbulb" => DeviceIcon::Lightbulb,
            "microwave" => DeviceIcon::Microwave,
            "washing-machine" => DeviceIcon::WashingMachine,
            _ => DeviceIcon::Power,
        }
    }

    /// Kebab-case name of the icon.
    pub fn name(&self) -> &'static str {
        match self {
            DeviceIcon::Refrigerator => "refrigerator",
            DeviceIcon::Wind => "wind",
            DeviceIcon::Tv => "tv",
            DeviceIcon::Lightbulb => "lightbulb",
            DeviceIcon::Microwave => "microwave",
            DeviceIcon::WashingMachine => "washing-machine",
            DeviceIcon::Power => "power",
        }
    }
}

/// Severity of a dashboard alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Warning,
    Danger,
    Info,
}

// =============================================================================
// Records
// =============================================================================

/// One synthesized hourly consumption point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnergySample {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Whole watts, never below the synthesizer floor.
    pub consumption_watts: u32,
    /// Cost in local currency units.
    pub cost: u32,
}

/// A device tracked by the application state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub consumption_watts: f64,
    pub status: DeviceStatus,
    pub room: String,
    pub icon: DeviceIcon,
}

impl Device {
    pub fn is_on(&self) -> bool {
        self.status == DeviceStatus::On
    }
}

/// Fields supplied when registering a device. The id and initial status are
/// assigned by the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewDevice {
    pub name: String,
    pub device_type: DeviceType,
    pub consumption_watts: f64,
    pub room: String,
    pub icon: DeviceIcon,
}

/// Partial update applied to an existing device. `None` leaves a field as is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceUpdate {
    pub name: Option<String>,
    pub device_type: Option<DeviceType>,
    pub consumption_watts: Option<f64>,
    pub status: Option<DeviceStatus>,
    pub room: Option<String>,
    pub icon: Option<DeviceIcon>,
}

/// Dashboard notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}
