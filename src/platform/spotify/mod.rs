//! Spotify Web API integration (client, DTOs, adapter).

pub mod adapter;
pub mod client;
pub mod dto;

pub use client::SpotifyClient;
