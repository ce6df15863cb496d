//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether scheduled jobs run inside the server process.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}
