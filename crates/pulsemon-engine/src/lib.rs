//! The monitoring engine facade.
//!
//! [`service::MonitoringService`] wires the collectors, metric store,
//! threshold evaluator, alert ledger, and SLA tracker behind the call
//! surface consumed by the route layer, and drives them from a periodic
//! tick scheduler. The service is constructed once at process startup and
//! passed to consumers explicitly; there is no global instance.

pub mod config;
pub mod notify;
pub mod scheduler;
pub mod service;


pub use config::MonitorConfig;
pub use notify::{LogNotifier, Notifier};
pub use service::MonitoringService;
