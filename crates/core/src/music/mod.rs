//! Insert-song-link use case and its ports

pub mod ports;
pub mod service;

pub use service::SongLinkService;
