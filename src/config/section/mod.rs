//! Configuration sections of `folio.toml`.

mod build;
mod content;
mod sync;

pub use build::BuildConfig;
pub use content::ContentConfig;
pub use sync::SyncConfig;
