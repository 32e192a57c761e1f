//! Crisis keyword check.
//!
//! A single boolean classifier: any of six fixed phrases in the text, or the
//! lowest possible mood score, flags the entry. A flag always comes with the
//! same static list of hotlines.

use serde::Serialize;

use super::mentions_any;

pub const CRISIS_PHRASES: [&str; 6] = [
    "suicidio",
    "me matar",
    "acabar com tudo",
    "quero morrer",
    "sem saída",
    "sem esperança",
];

pub const MIN_MOOD_SCORE: i32 = 1;

pub const SUPPORT_MESSAGE: &str =
    "Percebo sinais que me preocupam. Sua vida tem valor. Por favor, entre em contato com apoio profissional.";

pub const REASSURANCE_MESSAGE: &str = "Nenhum sinal de crise detectado. Continue se cuidando!";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SupportResource {
    pub name: &'static str,
    pub description: &'static str,
    pub phone: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'static str>,
}

pub static SUPPORT_RESOURCES: [SupportResource; 2] = [
    SupportResource {
        name: "CVV - Centro de Valorização da Vida",
        description: "Ligue 188 ou acesse o chat online.",
        phone: "188",
        url: Some("https://cvv.org.br"),
    },
    SupportResource {
        name: "SAMU - Emergência Médica",
        description: "Em caso de emergência, ligue 192.",
        phone: "192",
        url: None,
    },
];

pub fn is_crisis(content: Option<&str>, mood_score: Option<i32>) -> bool {
    let flagged_text = content
        .map(|text| mentions_any(text, &CRISIS_PHRASES))
        .unwrap_or(false);
    flagged_text || mood_score == Some(MIN_MOOD_SCORE)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CrisisAssessment {
    pub is_crisis: bool,
    pub message: &'static str,
    pub resources: &'static [SupportResource],
}

pub fn assess(content: Option<&str>, mood_score: Option<i32>) -> CrisisAssessment {
    if is_crisis(content, mood_score) {
        CrisisAssessment {
            is_crisis: true,
            message: SUPPORT_MESSAGE,
            resources: &SUPPORT_RESOURCES,
        }
    } else {
        CrisisAssessment {
            is_crisis: false,
            message: REASSURANCE_MESSAGE,
            resources: &[],
        }
    }
}
