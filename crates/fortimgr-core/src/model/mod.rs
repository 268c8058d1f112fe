// ── Domain model ──
//
// Output records for every query operation. Field names and optionality
// are the contract callers depend on; serde names match it exactly.

pub mod device;
pub mod domain;
pub mod health;
pub mod interface;
pub mod tunnel;

pub use device::{DeviceLookup, ManagedDevice};
pub use domain::AdministrativeDomain;
pub use health::{NO_DATA, SdwanHealthCheckResult};
pub use interface::NetworkInterface;
pub use tunnel::{IpsecTunnel, Phase2Selector, TunnelStatus};
