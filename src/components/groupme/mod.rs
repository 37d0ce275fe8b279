mod client;
pub mod models;

pub use client::GroupMeClient;
pub use models::{FetchOutcome, RemoteEvent};
