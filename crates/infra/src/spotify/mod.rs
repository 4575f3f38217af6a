//! Spotify Web API integration

mod client;
mod transport;

pub use client::SpotifyApiClient;
pub use transport::RetryPolicy;
