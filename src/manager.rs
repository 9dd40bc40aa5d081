//! Version tag orchestration
//!
//! [TagManager] reads the current version from the tags of a [TagStore],
//! derives the next one with an [Updater] and writes it back as
//! `<prefix><version>`.

use crate::config::Config;
use crate::domain::{compare, BuildId, PreReleaseId, Semver, Updater};
use crate::error::Result;
use crate::store::TagStore;
use std::cmp::Ordering;
use tracing::debug;

/// Tag names before and after an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChange {
    pub previous: String,
    pub next: String,
}

/// Manages version tags in a tag store
pub struct TagManager<S> {
    store: S,
    config: Config,
}

impl<S: TagStore> TagManager<S> {
    pub fn new(store: S, config: Config) -> Self {
        TagManager { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tag name for a version (e.g., "v1.2.3")
    pub fn tag_name(&self, version: &Semver) -> String {
        format!("{}{}", self.config.prefix, version)
    }

    /// Floating tags kept at a release: `<prefix>MAJOR.MINOR` then `<prefix>MAJOR`
    fn ancestor_names(&self, version: &Semver) -> [String; 2] {
        let prefix = &self.config.prefix;
        [
            format!("{}{}.{}", prefix, version.major, version.minor),
            format!("{}{}", prefix, version.major),
        ]
    }

    /// Highest-precedence version among the tags, or `0.0.0` when there is none.
    ///
    /// Tags without the configured prefix or that don't parse as a version are skipped.
    pub fn get_ver(&self) -> Result<Semver> {
        let tags = self.store.list_tags(self.config.fetch)?;

        let mut latest = Semver::default();
        for tag in &tags {
            let Some(version) = tag.strip_prefix(self.config.prefix.as_str()) else {
                debug!("Skipping tag '{}': missing prefix '{}'", tag, self.config.prefix);
                continue;
            };

            match Semver::parse_tolerant(version) {
                Ok(version) => {
                    if compare(&latest, &version) == Ordering::Less {
                        latest = version;
                    }
                }
                Err(e) => debug!("Skipping tag '{}': {}", tag, e),
            }
        }

        debug!("Current version: {}", latest);
        Ok(latest)
    }

    /// Create the tag for `version` at HEAD.
    ///
    /// In ancestors mode the floating ancestor tags of a release are moved to
    /// the same commit, strictly after the version tag itself was created.
    pub fn create_ver(&self, version: &Semver, messages: &[String], file: Option<&str>) -> Result<()> {
        self.create_tag(&self.tag_name(version), messages, file)?;

        if self.config.ancestors && !version.is_pre_release() {
            for ancestor in self.ancestor_names(version) {
                self.remove_ancestor(&ancestor);
                self.create_tag(&ancestor, messages, file)?;
            }
        }
        Ok(())
    }

    /// Delete the tag for `version` and, in ancestors mode, its ancestor tags
    pub fn delete_ver(&self, version: &Semver) -> Result<()> {
        let name = self.tag_name(version);
        self.store.delete_tag(&name)?;
        if let Some(remote) = &self.config.push_to {
            self.store.push_tag(&name, remote, true)?;
        }

        if self.config.ancestors {
            for ancestor in self.ancestor_names(version) {
                self.remove_ancestor(&ancestor);
            }
        }
        Ok(())
    }

    /// Recreate the tag for `version` at HEAD with a new message
    pub fn replace_ver(&self, version: &Semver, messages: &[String], file: Option<&str>) -> Result<()> {
        self.delete_ver(version)?;
        self.create_ver(version, messages, file)
    }

    pub fn update_major(
        &self,
        pre_release: Vec<PreReleaseId>,
        build: Vec<BuildId>,
        messages: &[String],
        file: Option<&str>,
    ) -> Result<TagChange> {
        self.update(messages, file, |updater| {
            updater.major().pre_release(pre_release).build(build).apply()
        })
    }

    pub fn update_minor(
        &self,
        pre_release: Vec<PreReleaseId>,
        build: Vec<BuildId>,
        messages: &[String],
        file: Option<&str>,
    ) -> Result<TagChange> {
        self.update(messages, file, |updater| {
            updater.minor().pre_release(pre_release).build(build).apply()
        })
    }

    pub fn update_patch(
        &self,
        pre_release: Vec<PreReleaseId>,
        build: Vec<BuildId>,
        messages: &[String],
        file: Option<&str>,
    ) -> Result<TagChange> {
        self.update(messages, file, |updater| {
            updater.patch().pre_release(pre_release).build(build).apply()
        })
    }

    /// Replace (or, with no identifiers, increment) the pre-release of the current version
    pub fn update_pre(
        &self,
        pre_release: Vec<PreReleaseId>,
        build: Vec<BuildId>,
        messages: &[String],
        file: Option<&str>,
    ) -> Result<TagChange> {
        self.update(messages, file, |updater| {
            updater.pre_release(pre_release).build(build).apply()
        })
    }

    /// Drop the pre-release of the current version
    pub fn release(&self, build: Vec<BuildId>, messages: &[String], file: Option<&str>) -> Result<TagChange> {
        self.update(messages, file, |updater| updater.release().build(build).apply())
    }

    /// Change only the build metadata of the current version
    pub fn build(&self, build: Vec<BuildId>, messages: &[String], file: Option<&str>) -> Result<TagChange> {
        self.update(messages, file, |updater| updater.build(build).apply())
    }

    fn update<F>(&self, messages: &[String], file: Option<&str>, step: F) -> Result<TagChange>
    where
        F: FnOnce(Updater) -> Result<Semver>,
    {
        let current = self.get_ver()?;
        let next = step(current.update())?;
        debug!("Next version: {} -> {}", current, next);

        self.create_ver(&next, messages, file)?;

        Ok(TagChange {
            previous: self.tag_name(&current),
            next: self.tag_name(&next),
        })
    }

    fn create_tag(&self, name: &str, messages: &[String], file: Option<&str>) -> Result<()> {
        self.store.create_tag(name, messages, file)?;
        if let Some(remote) = &self.config.push_to {
            self.store.push_tag(name, remote, false)?;
        }
        Ok(())
    }

    /// Ancestors are often absent, so failures here are only logged
    fn remove_ancestor(&self, name: &str) {
        if let Err(e) = self.store.delete_tag(name) {
            debug!("Ancestor tag '{}' not deleted: {}", name, e);
        }
        if let Some(remote) = &self.config.push_to {
            if let Err(e) = self.store.push_tag(name, remote, true) {
                debug!("Ancestor tag '{}' not deleted from '{}': {}", name, remote, e);
            }
        }
    }
}
