//! Canned answers for chat utterances.
//!
//! Each intent maps to a French template filled from the context snapshot and
//! three fixed follow-up suggestions. No language model is involved: the same
//! utterance and snapshot always produce the same text.

use ecowatt_core::{EcoWattConfig, FlatTariff};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::ChatContextSnapshot;
use crate::error::ChatError;
use crate::parser::{classify_intent, normalize, ChatIntent};

const BILLING_SUGGESTIONS: [&str; 3] = [
    "Comment optimiser ma climatisation ?",
    "Quels appareils éteindre en priorité ?",
    "Calculer mes économies potentielles",
];

const SAVINGS_SUGGESTIONS: [&str; 3] = [
    "Programmer mes appareils",
    "Heures creuses en Côte d'Ivoire",
    "Changer mes habitudes",
];

const DEVICE_SUGGESTIONS: [&str; 3] = [
    "Comment optimiser ces appareils ?",
    "Programmer l'extinction automatique",
    "Alternatives économiques",
];

const COOLING_SUGGESTIONS: [&str; 3] = [
    "Programmer ma climatisation",
    "Alternatives au climatiseur",
    "Isolation de ma maison",
];

const TARIFF_SUGGESTIONS: [&str; 3] = [
    "Programmer mes appareils",
    "Calculer mes économies",
    "Planning optimal de consommation",
];

const GENERAL_SUGGESTIONS: [&str; 3] = [
    "Analyser ma consommation",
    "Conseils d'économie",
    "Optimiser ma facture",
];

// =============================================================================
// EngineResponse
// =============================================================================

/// Answer selected for one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineResponse {
    pub intent: ChatIntent,
    pub text: String,
    pub suggestions: Vec<String>,
}

// =============================================================================
// ResponseEngine
// =============================================================================

/// Stateless mapping from `(utterance, snapshot)` to an [`EngineResponse`].
#[derive(Debug, Clone)]
pub struct ResponseEngine {
    tariff: FlatTariff,
    currency: String,
}

impl Default for ResponseEngine {
    fn default() -> Self {
        Self::new(FlatTariff::default(), "FCFA")
    }
}

impl ResponseEngine {
    pub fn new(tariff: FlatTariff, currency: impl Into<String>) -> Self {
        Self {
            tariff,
            currency: currency.into(),
        }
    }

    pub fn from_config(config: &EcoWattConfig) -> Self {
        Self::new(config.tariff.flat_tariff(), config.tariff.currency.clone())
    }

    /// Classify `utterance` and fill the matching template.
    ///
    /// Blank input has no matching semantics and is rejected.
    pub fn generate_response(
        &self,
        utterance: &str,
        context: &ChatContextSnapshot,
    ) -> Result<EngineResponse, ChatError> {
        if utterance.trim().is_empty() {
            return Err(ChatError::InvalidInput("utterance is empty".to_string()));
        }

        let intent = classify_intent(&normalize(utterance));
        let (text, suggestions) = match intent {
            ChatIntent::Billing => (billing_text(context), BILLING_SUGGESTIONS),
            ChatIntent::Savings => (savings_text(), SAVINGS_SUGGESTIONS),
            ChatIntent::DeviceConsumption => (devices_text(context), DEVICE_SUGGESTIONS),
            ChatIntent::Cooling => (cooling_text(), COOLING_SUGGESTIONS),
            ChatIntent::Tariff => (self.tariff_text(), TARIFF_SUGGESTIONS),
            ChatIntent::General => (general_text(), GENERAL_SUGGESTIONS),
        };
        debug!(intent = ?intent, chars = text.chars().count(), "Response rule selected");

        Ok(EngineResponse {
            intent,
            text,
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn tariff_text(&self) -> String {
        [
            "⚡ **Optimisation tarifaire en Côte d'Ivoire :**".to_string(),
            String::new(),
            format!(
                "Votre électricité est facturée au tarif unique de **{} {}/kWh**, quelle que soit l'heure.",
                self.tariff.rate_per_kwh, self.currency
            ),
            String::new(),
            "**Conseils :**".to_string(),
            "• Utilisez gros électroménagers tôt le matin (6h-8h)".to_string(),
            "• Évitez les pics de 18h-22h".to_string(),
            "• Étalez votre consommation".to_string(),
        ]
        .join("\n")
    }
}

fn billing_text(context: &ChatContextSnapshot) -> String {
    [
        format!(
            "Votre consommation actuelle est de {}W. Les principales causes d'une facture élevée sont souvent :",
            context.current_total_consumption_watts
        ),
        String::new(),
        "• La climatisation (utilise 60-70% de l'énergie)".to_string(),
        "• Les appareils en veille (jusqu'à 15% de perte)".to_string(),
        "• L'éclairage inefficace".to_string(),
        "• Un réfrigérateur mal réglé".to_string(),
        String::new(),
        format!(
            "Je vois que vous avez {} appareils allumés actuellement.",
            context.active_device_count()
        ),
    ]
    .join("\n")
}

fn savings_text() -> String {
    [
        "Voici mes conseils personnalisés pour réduire votre consommation :",
        "",
        "💡 **Actions immédiates :**",
        "• Réglez votre climatisation à 25°C (au lieu de 18°C)",
        "• Éteignez les appareils en veille",
        "• Utilisez l'éclairage LED",
        "• Dégivrez régulièrement votre réfrigérateur",
        "",
        "📊 **Potentiel d'économie : 30-40% sur votre facture**",
    ]
    .join("\n")
}

fn devices_text(context: &ChatContextSnapshot) -> String {
    let mut lines = vec![
        "Voici vos appareils qui consomment le plus actuellement :".to_string(),
        String::new(),
    ];

    let active = context.active_devices_by_consumption();
    if active.is_empty() {
        lines.push("Aucun appareil n'est allumé pour le moment.".to_string());
    } else {
        lines.extend(active.iter().enumerate().map(|(i, d)| {
            format!(
                "{}. **{}** : {}W ({})",
                i + 1,
                d.name,
                d.consumption_watts,
                d.room
            )
        }));
    }

    lines.push(String::new());
    lines.push(format!(
        "**Total actuel : {}W**",
        context.current_total_consumption_watts
    ));
    lines.push(String::new());
    lines.push("Le climatiseur est généralement votre plus gros consommateur !".to_string());
    lines.join("\n")
}

fn cooling_text() -> String {
    [
        "🌡️ **Optimisation de la climatisation :**",
        "",
        "• **Température idéale : 25°C** (chaque degré en moins = +8% de consommation)",
        "• Fermez portes et fenêtres",
        "• Utilisez des ventilateurs pour brasser l'air",
        "• Nettoyez les filtres mensuellement",
        "• Programmez des plages horaires",
        "",
        "**Économie possible : 40-50% sur la climatisation**",
    ]
    .join("\n")
}

fn general_text() -> String {
    [
        "Je comprends votre question sur l'énergie ! 🔌",
        "",
        "Je peux vous aider avec :",
        "• L'analyse de votre consommation",
        "• Des conseils d'économie personnalisés",
        "• La programmation d'appareils",
        "• L'optimisation de votre facture",
        "• Les pannes et incidents",
        "",
        "Que souhaitez-vous savoir précisément ?",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecowatt_core::{Device, DeviceIcon, DeviceStatus, DeviceType};

    fn engine() -> ResponseEngine {
        ResponseEngine::default()
    }

    fn device(name: &str, watts: f64, status: DeviceStatus, room: &str) -> Device {
        Device {
            id: name.to_string(),
            name: name.to_string(),
            device_type: DeviceType::Appliance,
            consumption_watts: watts,
            status,
            room: room.to_string(),
            icon: DeviceIcon::Power,
        }
    }

    fn demo_context() -> ChatContextSnapshot {
        ChatContextSnapshot::new(
            230.0,
            vec![
                device("Réfrigérateur", 150.0, DeviceStatus::On, "Cuisine"),
                device("Climatiseur Salon", 1200.0, DeviceStatus::Off, "Salon"),
                device("Téléviseur", 80.0, DeviceStatus::On, "Salon"),
            ],
        )
    }

    fn abc_context() -> ChatContextSnapshot {
        ChatContextSnapshot::new(
            600.0,
            vec![
                device("A", 100.0, DeviceStatus::On, "Salon"),
                device("B", 500.0, DeviceStatus::On, "Cuisine"),
                device("C", 300.0, DeviceStatus::Off, "Chambre"),
            ],
        )
    }

    #[test]
    fn test_billing_interpolates_live_values() {
        let r = engine()
            .generate_response("Pourquoi ma facture est-elle élevée ?", &demo_context())
            .unwrap();
        assert_eq!(r.intent, ChatIntent::Billing);
        assert!(r.text.starts_with("Votre consommation actuelle est de 230W."));
        assert!(r
            .text
            .ends_with("Je vois que vous avez 2 appareils allumés actuellement."));
        assert_eq!(r.suggestions[0], "Comment optimiser ma climatisation ?");
    }

    #[test]
    fn test_priority_billing_over_cooling() {
        let r = engine()
            .generate_response("facture climatisation", &demo_context())
            .unwrap();
        assert_eq!(r.intent, ChatIntent::Billing);
        assert_eq!(r.suggestions, BILLING_SUGGESTIONS.map(String::from).to_vec());
    }

    #[test]
    fn test_device_listing_sorted_and_filtered() {
        let r = engine()
            .generate_response("Quels appareils consomment le plus ?", &abc_context())
            .unwrap();
        assert_eq!(r.intent, ChatIntent::DeviceConsumption);

        let b = r.text.find("1. **B** : 500W (Cuisine)").unwrap();
        let a = r.text.find("2. **A** : 100W (Salon)").unwrap();
        assert!(b < a);
        assert!(!r.text.contains("**C**"));
        assert!(r.text.contains("**Total actuel : 600W**"));
        assert_eq!(r.suggestions.len(), 3);
    }

    #[test]
    fn test_device_listing_ties_keep_order() {
        let context = ChatContextSnapshot::new(
            300.0,
            vec![
                device("Lampe", 100.0, DeviceStatus::On, "Salon"),
                device("Radio", 100.0, DeviceStatus::On, "Salon"),
                device("Box", 100.0, DeviceStatus::On, "Salon"),
            ],
        );
        let r = engine().generate_response("appareils", &context).unwrap();
        let lampe = r.text.find("1. **Lampe**").unwrap();
        let radio = r.text.find("2. **Radio**").unwrap();
        let bx = r.text.find("3. **Box**").unwrap();
        assert!(lampe < radio && radio < bx);
    }

    #[test]
    fn test_device_listing_with_nothing_on() {
        let context = ChatContextSnapshot::new(
            0.0,
            vec![device("Climatiseur", 1200.0, DeviceStatus::Off, "Salon")],
        );
        let r = engine().generate_response("appareils", &context).unwrap();
        assert!(r.text.contains("Aucun appareil n'est allumé pour le moment."));
        assert!(r.text.contains("**Total actuel : 0W**"));
    }

    #[test]
    fn test_savings_and_cooling_rules() {
        let r = engine()
            .generate_response("Comment réduire ma consommation ?", &demo_context())
            .unwrap();
        assert_eq!(r.intent, ChatIntent::Savings);
        assert!(r.text.contains("30-40%"));
        assert_eq!(r.suggestions[1], "Heures creuses en Côte d'Ivoire");

        let r = engine()
            .generate_response("ma clim", &demo_context())
            .unwrap();
        assert_eq!(r.intent, ChatIntent::Cooling);
        assert!(r.text.contains("25°C"));
        assert_eq!(r.suggestions[2], "Isolation de ma maison");
    }

    #[test]
    fn test_tariff_rule_states_flat_rate() {
        let r = engine()
            .generate_response("Heures creuses ?", &demo_context())
            .unwrap();
        assert_eq!(r.intent, ChatIntent::Tariff);
        assert!(r.text.contains("**80 FCFA/kWh**"));
        assert!(r.text.contains("Évitez les pics de 18h-22h"));

        let custom = ResponseEngine::new(FlatTariff::new(95.5), "XOF");
        let r = custom.generate_response("tarif", &demo_context()).unwrap();
        assert!(r.text.contains("**95.5 XOF/kWh**"));
    }

    #[test]
    fn test_fallback_rule() {
        let r = engine().generate_response("bonjour", &demo_context()).unwrap();
        assert_eq!(r.intent, ChatIntent::General);
        assert!(r.text.starts_with("Je comprends votre question sur l'énergie !"));
        assert_eq!(
            r.suggestions,
            vec![
                "Analyser ma consommation".to_string(),
                "Conseils d'économie".to_string(),
                "Optimiser ma facture".to_string(),
            ]
        );
    }

    #[test]
    fn test_blank_input_rejected() {
        for input in ["", "   ", "\n\t"] {
            let err = engine().generate_response(input, &demo_context()).unwrap_err();
            assert!(matches!(err, ChatError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_deterministic() {
        let context = abc_context();
        let first = engine().generate_response("appareils", &context).unwrap();
        let second = engine().generate_response("appareils", &context).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_rule_offers_three_suggestions() {
        let context = demo_context();
        for input in ["cher", "conseils", "consomment", "clim", "tarif", "salut"] {
            let r = engine().generate_response(input, &context).unwrap();
            assert_eq!(r.suggestions.len(), 3, "input {input}");
        }
    }

    #[test]
    fn test_from_config() {
        let mut config = EcoWattConfig::default();
        config.tariff.rate_per_kwh = 100.0;
        config.tariff.currency = "F".to_string();
        let r = ResponseEngine::from_config(&config)
            .generate_response("tarif", &demo_context())
            .unwrap();
        assert!(r.text.contains("**100 F/kWh**"));
    }
}
