pub mod classify;
pub mod embed;
pub mod health;
pub mod translate;

pub use classify::classify_emergency;
pub use embed::{embed, embed_batch};
pub use health::{health, versions};
pub use translate::translate;
