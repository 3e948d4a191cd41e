//! Prompt templates sent to the completion backend.

use crate::retrieval::RetrievalOutcome;

/// Persona sent as the system message on every call.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Tu es un assistant médical intelligent spécialisé en pharmacogénétique. \
Tu dois rédiger des réponses précises, fiables et professionnelles. \
Ne mentionne jamais d'où vient l'information, mais indique son degré de fiabilité.";

/// Closing sentence required when answering from local context.
pub const RELIABLE_CLOSING: &str = "✅ Les données semblent fiables et bien documentées.";

/// Closing sentence required when answering from general knowledge.
pub const CAUTION_CLOSING: &str = "⚠️ Les informations sont générales et doivent être confirmées.";

pub fn context_prompt(context: &str, question: &str) -> String {
    format!(
        "Voici des données contextuelles extraites :\n{context}\n\n\
         Réponds maintenant à la question suivante en t'appuyant uniquement sur ces données : {question}.\n\
         Termine ta réponse par : {RELIABLE_CLOSING}"
    )
}

pub fn fallback_prompt(question: &str) -> String {
    format!(
        "{question}\n\n\
         Aucune donnée pharmacogénétique complète n'a été trouvée localement. \
         Réponds librement en utilisant tes connaissances médicales fiables, \
         et indique que l'information doit être confirmée par un professionnel de santé.\n\
         Termine ta réponse par : {CAUTION_CLOSING}"
    )
}

/// User turn for `question` given the retrieval outcome.
pub fn build_user_prompt(question: &str, outcome: &RetrievalOutcome) -> String {
    match outcome {
        RetrievalOutcome::Context(context) => context_prompt(context, question),
        RetrievalOutcome::NoMatch(_) | RetrievalOutcome::FallbackRequired => fallback_prompt(question),
    }
}
