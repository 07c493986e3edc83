pub mod audio;
pub mod engine;
pub mod error;
pub mod service;

// Public library API - the CLI and tests use these; everything else is
// reachable through the modules.
pub use engine::{SynthesisConfig, SynthesisEngine};
pub use error::TtsError;
pub use service::router::ServiceContext;
pub use service::{run_service, serve};
