//! Offline scripted assistant.
//!
//! Keyword responder from before the backend existed. Useful for tests and
//! for running the CLI without a network.

use async_trait::async_trait;
use folio_core::assistant::{AssistantClient, AssistantError};
use folio_core::transcript::Turn;

/// Assistant that answers from a fixed set of French guidance replies.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAssistant;

impl ScriptedAssistant {
    pub fn new() -> Self {
        Self
    }

    fn reply_for(message: &str) -> &'static str {
        let lower = message.to_lowercase();
        if lower.contains("commencer") || lower.contains("débuter") {
            "Excellent ! Commençons par choisir un modèle pour votre portfolio. \
             Préférez-vous un design minimaliste ou plus créatif ?"
        } else if lower.contains("minimaliste") {
            "Un design minimaliste est parfait pour mettre en valeur votre travail. \
             Commençons par ajouter vos informations personnelles et vos projets les \
             plus importants. Quelles sont vos principales compétences ?"
        } else if lower.contains("créatif") {
            "Un design créatif peut vraiment faire ressortir votre personnalité. \
             Parlons des couleurs et des éléments graphiques qui représentent le \
             mieux votre style. Quelles sont vos couleurs préférées ?"
        } else {
            "Je comprends. Pouvez-vous me donner plus de détails sur ce que vous \
             recherchez pour votre portfolio ? Je suis là pour vous guider à chaque \
             étape."
        }
    }
}

#[async_trait]
impl AssistantClient for ScriptedAssistant {
    async fn ask(&self, message: &str, _history: &[Turn]) -> Result<String, AssistantError> {
        Ok(Self::reply_for(message).to_string())
    }
}
