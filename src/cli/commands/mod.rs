pub mod registry;
pub mod serve;

pub use registry::{bump, init, record_training, show, update};
pub use serve::serve;
