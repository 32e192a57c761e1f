use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub mood_score: Option<i32>,
    pub ai_insights: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct NewJournalEntry<'a> {
    pub user_id: Uuid,
    pub content: &'a str,
    pub mood_score: Option<i32>,
    pub ai_insights: &'a str,
}

/// Coarse bucket for rendering a mood score as an icon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoodBand {
    Low,
    Neutral,
    Good,
}

impl MoodBand {
    /// A zero score renders no band, same as a missing one.
    pub fn from_score(score: i32) -> Option<Self> {
        match score {
            0 => None,
            s if s <= 2 => Some(MoodBand::Low),
            s if s <= 3 => Some(MoodBand::Neutral),
            _ => Some(MoodBand::Good),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JournalEntryView {
    #[serde(flatten)]
    pub entry: JournalEntry,
    pub mood_band: Option<MoodBand>,
}

impl From<JournalEntry> for JournalEntryView {
    fn from(entry: JournalEntry) -> Self {
        let mood_band = entry.mood_score.and_then(MoodBand::from_score);
        Self { entry, mood_band }
    }
}
