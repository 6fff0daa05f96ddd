//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Downstream client + breakers → Service router → Listener
//!
//! Shutdown (shutdown.rs):
//!     trigger() → HTTP server drains → Health monitor loop exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::spawn_signal_listener;
pub use startup::{run_service, ServiceKind, StartupError};
