mod config;
mod context;
mod detection_engine;
mod result;
#[cfg(test)]
mod tests;

pub use config::{DetectionConfig, DEFAULT_MOM_THRESHOLD, DEFAULT_YOY_THRESHOLD};
pub use context::{AccountContext, CommentaryInput};
pub use detection_engine::DetectionEngine;
pub use result::{DetectionResult, Step, StepStats, StepStatus};
