pub mod auth_cmd;
pub mod common;
pub mod completions;
pub mod messages;
pub mod products;
pub mod recover;
pub mod setup;
