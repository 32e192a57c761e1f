//! Scripted wellness content: fixed word lists, canned replies and the small
//! amount of branching around them. Nothing here touches the backend.

pub mod brain_dump;
pub mod chat;
pub mod crisis;
pub mod encouragement;
pub mod goals;
pub mod progress;
pub mod reflection;
pub mod values;

/// Case-insensitive substring test against a keyword list.
///
/// `text` is lower-cased here; keywords are expected to be lower-case already.
pub fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    keywords.iter().any(|kw| lowered.contains(kw))
}
