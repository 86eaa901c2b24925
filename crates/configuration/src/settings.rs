use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub snapshot: SnapshotSource,
    pub server: Server,
}

/// Where the snapshot file lives.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotSource {
    /// Path to the snapshot JSON exported by the upstream tracker.
    pub path: PathBuf,
}

/// Bind parameters for the JSON API server.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    /// The interface to listen on (e.g., "127.0.0.1").
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}
