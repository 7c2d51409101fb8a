//! Keyword-based intent classification.
//!
//! Utterances are lowercased and matched by substring against fixed keyword
//! sets. Sets are checked in priority order and the first hit wins.

use serde::{Deserialize, Serialize};

/// Topic selected for a user utterance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatIntent {
    /// Why is my bill high?
    Billing,
    /// How do I reduce / save?
    Savings,
    /// Which devices consume the most?
    DeviceConsumption,
    /// Air conditioning.
    Cooling,
    /// Tariff and off-peak hours.
    Tariff,
    /// Nothing matched.
    General,
}

/// Keyword sets in priority order. `General` has no keywords.
const INTENT_KEYWORDS: [(ChatIntent, &[&str]); 5] = [
    (ChatIntent::Billing, &["facture", "élevée", "cher"]),
    (ChatIntent::Savings, &["réduire", "économiser", "conseils"]),
    (ChatIntent::DeviceConsumption, &["appareils", "consomment"]),
    (ChatIntent::Cooling, &["climatisation", "clim"]),
    (ChatIntent::Tariff, &["heures creuses", "tarif"]),
];

/// Lowercase an utterance for matching.
pub fn normalize(utterance: &str) -> String {
    utterance.to_lowercase()
}

/// Classify an already-normalized utterance.
pub fn classify_intent(normalized: &str) -> ChatIntent {
    INTENT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(intent, _)| *intent)
        .unwrap_or(ChatIntent::General)
}
