mod orchestrator;
mod runtime;
mod shutdown;
mod types;


pub use orchestrator::DoorlockApp;
pub use types::ShutdownReason;
