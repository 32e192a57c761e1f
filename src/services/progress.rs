//! Progress figures shown on the dashboard. These are fixed values, not
//! computed from the user's rows.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ProgressStats {
    pub completion_rate: u32,
    pub effort_points: u32,
    pub current_streak: u32,
    pub journal_entries: u32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Achievement {
    pub name: &'static str,
    pub unlocked: bool,
}

pub const STATS: ProgressStats = ProgressStats {
    completion_rate: 60,
    effort_points: 1250,
    current_streak: 7,
    journal_entries: 15,
};

pub static ACHIEVEMENTS: [Achievement; 4] = [
    Achievement { name: "Primeira Reflexão", unlocked: true },
    Achievement { name: "Primeira Tarefa", unlocked: true },
    Achievement { name: "Constância", unlocked: true },
    Achievement { name: "Esforço Reconhecido", unlocked: false },
];

pub const MOTTO: &str = "Celebre sua jornada, não apenas o destino. Cada passo é uma vitória.";

#[derive(Debug, Serialize)]
pub struct ProgressReport {
    pub motto: &'static str,
    pub stats: ProgressStats,
    pub achievements: &'static [Achievement],
}

pub fn report() -> ProgressReport {
    ProgressReport {
        motto: MOTTO,
        stats: STATS,
        achievements: &ACHIEVEMENTS,
    }
}
