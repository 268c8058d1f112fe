// ── Administrative domain ──

use serde::{Deserialize, Serialize};

/// An ADOM. Names are unique per controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministrativeDomain {
    pub name: String,
}
