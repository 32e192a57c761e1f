//! Brain dump organizer: one thought per line, bucketed by keyword.

use serde::Serialize;

use super::mentions_any;

pub const TASK_KEYWORDS: [&str; 5] = ["fazer", "comprar", "resolver", "enviar", "ligar"];
pub const WORRY_KEYWORDS: [&str; 4] = ["preocupado", "e se", "medo", "ansioso"];
pub const IDEA_KEYWORDS: [&str; 4] = ["ideia", "que tal", "poderia", "imagina"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThoughtKind {
    Task,
    Worry,
    Idea,
}

/// First match wins: task, then worry, then idea. Unmatched lines are tasks.
pub fn classify_line(line: &str) -> ThoughtKind {
    if mentions_any(line, &TASK_KEYWORDS) {
        ThoughtKind::Task
    } else if mentions_any(line, &WORRY_KEYWORDS) {
        ThoughtKind::Worry
    } else if mentions_any(line, &IDEA_KEYWORDS) {
        ThoughtKind::Idea
    } else {
        ThoughtKind::Task
    }
}

#[derive(Debug, Default, Clone, Serialize, PartialEq)]
pub struct OrganizedThoughts {
    pub tasks: Vec<String>,
    pub worries: Vec<String>,
    pub ideas: Vec<String>,
}

pub fn organize(dump: &str) -> OrganizedThoughts {
    let mut organized = OrganizedThoughts::default();
    for line in dump.lines().filter(|l| !l.trim().is_empty()) {
        let bucket = match classify_line(line) {
            ThoughtKind::Task => &mut organized.tasks,
            ThoughtKind::Worry => &mut organized.worries,
            ThoughtKind::Idea => &mut organized.ideas,
        };
        bucket.push(line.to_string());
    }
    organized
}
