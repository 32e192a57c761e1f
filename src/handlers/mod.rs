pub mod auth;
pub mod clarity;
pub mod goals;
pub mod health;
pub mod journal;
pub mod overview;
pub mod safenet;
pub mod tasks;
pub mod ws;
