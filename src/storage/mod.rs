pub mod document;
pub mod registry;
pub mod version;

pub use document::RegistryDocument;
pub use registry::{EntryUpdate, RegistryError, RegistryStore};
pub use version::{bump_major, bump_minor, bump_patch, validate_version, BumpKind};
