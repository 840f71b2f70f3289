//! YouTube Music companion-service integration (client, DTOs, adapter).

pub mod adapter;
pub mod client;
pub mod dto;

pub use client::{DEFAULT_SERVICE_URL, YtMusicClient};
