pub mod conversation;
pub mod journal;
pub mod profile;
pub mod task;
