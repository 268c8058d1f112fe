//! Query layer between `fortimgr-api` and consumers (CLI, automation).
//!
//! This crate owns the business logic and domain model for the
//! FortiManager workspace:
//!
//! - **[`Controller`]**: Query facade. Each operation builds one controller
//!   request, runs it through the [`RequestExecutor`], and normalizes the
//!   reply into [`model`] records.
//!
//! - **[`RequestExecutor`]**: Retries the controller's spurious `-11`
//!   ("no permission for the resource") status per [`RetryPolicy`], opening
//!   a fresh session for every attempt.
//!
//! - **[`proxy`]**: Unwraps `/sys/proxy/json` envelopes. IPsec and SLA-log
//!   replies report device-side failure in different places and are parsed
//!   separately.
//!
//! - **[`convert`]**: Normalizers from raw records to the fixed output
//!   schema. Defaults are applied here and nowhere else.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod executor;
pub mod model;
pub mod proxy;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AuthCredentials, ControllerConfig, TlsVerification};
pub use controller::Controller;
pub use error::CoreError;
pub use executor::{RequestExecutor, RetryPolicy, TRANSIENT_NO_PERMISSION};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AdministrativeDomain, DeviceLookup, IpsecTunnel, ManagedDevice, NetworkInterface,
    Phase2Selector, SdwanHealthCheckResult, TunnelStatus,
};
