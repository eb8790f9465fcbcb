pub mod embedding;
pub mod emergency;
pub mod language;
pub mod traits;
pub mod translation;
pub mod types;

// Re-export commonly used types
pub use language::detect_language;
pub use traits::{Embedder, EmergencyScorer, Translator};
pub use types::{GenerationPlan, Language, ModelRole, TranslationFamily};
