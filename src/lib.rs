pub mod analysis;
pub mod engine;
pub mod models;
pub mod types;

pub use engine::{DetectionConfig, DetectionEngine, DetectionResult};
pub use models::{DetectionError, Ledger, Transaction};
