pub mod registry;
pub mod state;

// Re-export commonly used types
pub use registry::{
    publish_trained_version, record_training_run, SnapshotSource, TrainingError,
    TrainingOutcome, VersionSnapshot,
};
pub use state::{ServiceState, ServiceStateBuilder};
