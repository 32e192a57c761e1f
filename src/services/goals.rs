//! Adaptive goals: a fixed list of gentle goals trimmed by how much energy
//! the user reports, plus a message keyed on mood and energy.

use serde::Serialize;

pub static GENTLE_GOALS: [&str; 5] = [
    "Tomar um copo d'água",
    "Fazer 5 minutos de alongamento",
    "Responder UM email",
    "Arrumar a cama",
    "Ser gentil consigo mesmo(a)",
];

pub const DEFAULT_LEVEL: i32 = 3;

pub fn adaptation_message(energy: i32, mood: i32) -> &'static str {
    if mood <= 2 {
        "Hoje está difícil. Metas adaptadas para focar no essencial. 💙"
    } else if energy <= 2 {
        "Energia baixa. Metas ajustadas para serem mais gentis. 🌱"
    } else if energy >= 4 {
        "Boa energia hoje! Você consegue! ⚡"
    } else {
        "Metas ajustadas para equilibrar desafio e gentileza. 🎯"
    }
}

/// The first `6 - energy` goals, clamped to the list.
pub fn adapted_goals(energy: i32) -> &'static [&'static str] {
    let count = (6 - energy).clamp(0, GENTLE_GOALS.len() as i32) as usize;
    &GENTLE_GOALS[..count]
}

#[derive(Debug, Serialize)]
pub struct AdaptedGoals {
    pub energy: i32,
    pub mood: i32,
    pub message: &'static str,
    pub goals: &'static [&'static str],
}

pub fn adapt(energy: i32, mood: i32) -> AdaptedGoals {
    AdaptedGoals {
        energy,
        mood,
        message: adaptation_message(energy, mood),
        goals: adapted_goals(energy),
    }
}
