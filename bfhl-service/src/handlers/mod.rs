pub mod dispatch;
pub mod fallback;
pub mod health;
pub mod metrics;

pub use dispatch::dispatch;
pub use fallback::{not_found, panic_response, PanicEnvelope};
pub use health::health_check;
pub use metrics::metrics;
