//! Domain logic - semantic versions, independent of git operations

pub mod identifier;
pub mod updater;
pub mod version;

pub use identifier::{BuildId, PreReleaseId};
pub use updater::{Applier, BuildStep, PreReleaseStep, Updater};
pub use version::{compare, Semver};
