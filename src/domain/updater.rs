//! Staged derivation of the next version
//!
//! An [`Updater`] walks through optional steps in a fixed order:
//!
//! 1. a level step ([`Updater::major`], [`Updater::minor`], [`Updater::patch`]),
//! 2. a pre-release step ([`PreReleaseStep::pre_release`] or [`PreReleaseStep::release`]),
//! 3. a build step ([`BuildStep::build`]),
//!
//! and ends with `apply()`. Each step returns a narrower type, so steps cannot be
//! repeated or taken out of order. `apply()` refuses results that would sort
//! before the version they replace.
//!
//! ```
//! # use git_vertag::domain::Semver;
//! let current = Semver::parse("1.2.3").unwrap();
//! let next = current.update().minor().apply().unwrap();
//! assert_eq!(next.to_string(), "1.3.0");
//!
//! // Attaching a pre-release to a release without raising a level rewinds history
//! let rc = "rc".parse().unwrap();
//! assert!(current.update().pre_release(vec![rc]).apply().is_err());
//! ```

use crate::domain::identifier::{BuildId, PreReleaseId};
use crate::domain::version::{compare, Semver};
use crate::error::{Result, VertagError};
use std::cmp::Ordering;

/// How far the working version is known to be ahead of the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guarantee {
    /// Current is a plain release and no level was raised
    None,
    /// Current is a pre-release; working may refine it but must not precede it
    PreReleaseRefinement,
    /// A level was raised, any pre-release on top still sorts after current
    LevelRaised,
}

#[derive(Debug, Clone)]
struct Draft {
    current: Semver,
    working: Semver,
    guarantee: Guarantee,
    /// An increment ran past `u64::MAX`; `apply` must fail
    overflow: bool,
}

impl Draft {
    /// `None` when the raised number does not fit
    fn raise(self, next: Option<Semver>) -> Draft {
        match next {
            Some(next) => Draft {
                working: next,
                guarantee: Guarantee::LevelRaised,
                ..self
            },
            None => Draft {
                overflow: true,
                ..self
            },
        }
    }

    fn set_pre_release(mut self, ids: Vec<PreReleaseId>) -> Draft {
        if ids.is_empty() {
            match increment_pre_release(&self.working.pre_release) {
                Some(next) => self.working.pre_release = next,
                None => self.overflow = true,
            }
        } else {
            self.working.pre_release = ids;
        }
        self.working.build.clear();
        self
    }

    fn release(mut self) -> Draft {
        self.working.pre_release.clear();
        self.working.build.clear();
        self
    }

    fn set_build(mut self, ids: Vec<BuildId>) -> Draft {
        self.working.build = ids;
        self
    }

    fn apply(self) -> Result<Semver> {
        let Draft {
            current,
            working,
            guarantee,
            overflow,
        } = self;

        if overflow {
            return Err(VertagError::Overflow {
                current: current.to_string(),
            });
        }

        let rewinds = working.is_pre_release()
            && match guarantee {
                Guarantee::None => true,
                Guarantee::PreReleaseRefinement => compare(&working, &current) == Ordering::Less,
                Guarantee::LevelRaised => false,
            };

        if rewinds {
            return Err(VertagError::OrderRewind {
                current: current.to_string(),
                next: working.to_string(),
            });
        }
        Ok(working)
    }
}

/// Increment the rightmost numeric identifier and drop everything after it.
///
/// Without any numeric identifier a `2` is appended; an empty list stays empty.
/// Returns `None` if the numeric identifier is already `u64::MAX`.
fn increment_pre_release(pre: &[PreReleaseId]) -> Option<Vec<PreReleaseId>> {
    if pre.is_empty() {
        return Some(Vec::new());
    }

    match pre.iter().rposition(PreReleaseId::is_numeric) {
        Some(index) => {
            let mut next = pre[..=index].to_vec();
            if let PreReleaseId::Numeric(n) = next[index] {
                next[index] = PreReleaseId::Numeric(n.checked_add(1)?);
            }
            Some(next)
        }
        None => {
            let mut next = pre.to_vec();
            next.push(PreReleaseId::Numeric(2));
            Some(next)
        }
    }
}

/// Entry point: every step is still available
#[derive(Debug, Clone)]
pub struct Updater {
    draft: Draft,
}

impl Updater {
    pub fn new(current: Semver) -> Self {
        let guarantee = if current.is_pre_release() {
            Guarantee::PreReleaseRefinement
        } else {
            Guarantee::None
        };
        Updater {
            draft: Draft {
                working: current.clone(),
                current,
                guarantee,
                overflow: false,
            },
        }
    }

    /// `X.Y.Z` -> `(X+1).0.0`
    pub fn major(self) -> PreReleaseStep {
        let w = &self.draft.working;
        let next = w.major.checked_add(1).map(|major| Semver::new(major, 0, 0));
        PreReleaseStep {
            draft: self.draft.raise(next),
        }
    }

    /// `X.Y.Z` -> `X.(Y+1).0`
    pub fn minor(self) -> PreReleaseStep {
        let w = &self.draft.working;
        let next = w.minor.checked_add(1).map(|minor| Semver::new(w.major, minor, 0));
        PreReleaseStep {
            draft: self.draft.raise(next),
        }
    }

    /// `X.Y.Z` -> `X.Y.(Z+1)`
    pub fn patch(self) -> PreReleaseStep {
        let w = &self.draft.working;
        let next = w
            .patch
            .checked_add(1)
            .map(|patch| Semver::new(w.major, w.minor, patch));
        PreReleaseStep {
            draft: self.draft.raise(next),
        }
    }

    pub fn pre_release(self, ids: Vec<PreReleaseId>) -> BuildStep {
        self.skip_level().pre_release(ids)
    }

    pub fn release(self) -> BuildStep {
        self.skip_level().release()
    }

    pub fn build(self, ids: Vec<BuildId>) -> Applier {
        self.skip_level().build(ids)
    }

    pub fn apply(self) -> Result<Semver> {
        self.draft.apply()
    }

    fn skip_level(self) -> PreReleaseStep {
        PreReleaseStep { draft: self.draft }
    }
}

/// Level settled; pre-release, build and apply remain
#[derive(Debug, Clone)]
pub struct PreReleaseStep {
    draft: Draft,
}

impl PreReleaseStep {
    /// Replace the pre-release identifiers and clear build metadata.
    ///
    /// With no identifiers, the existing pre-release is incremented instead
    /// (`rc.4.x` -> `rc.5`, `rc` -> `rc.2`). A version without a pre-release is
    /// left unchanged.
    pub fn pre_release(self, ids: Vec<PreReleaseId>) -> BuildStep {
        BuildStep {
            draft: self.draft.set_pre_release(ids),
        }
    }

    /// Drop pre-release and build metadata
    pub fn release(self) -> BuildStep {
        BuildStep {
            draft: self.draft.release(),
        }
    }

    pub fn build(self, ids: Vec<BuildId>) -> Applier {
        BuildStep { draft: self.draft }.build(ids)
    }

    pub fn apply(self) -> Result<Semver> {
        self.draft.apply()
    }
}

/// Only the build step and apply remain
#[derive(Debug, Clone)]
pub struct BuildStep {
    draft: Draft,
}

impl BuildStep {
    /// Replace the build metadata
    pub fn build(self, ids: Vec<BuildId>) -> Applier {
        Applier {
            draft: self.draft.set_build(ids),
        }
    }

    pub fn apply(self) -> Result<Semver> {
        self.draft.apply()
    }
}

/// Terminal step
#[derive(Debug, Clone)]
pub struct Applier {
    draft: Draft,
}

impl Applier {
    pub fn apply(self) -> Result<Semver> {
        self.draft.apply()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Semver {
        Semver::parse(s).unwrap()
    }

    fn pre(ids: &[&str]) -> Vec<PreReleaseId> {
        ids.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn build(ids: &[&str]) -> Vec<BuildId> {
        ids.iter().map(|s| s.parse().unwrap()).collect()
    }

    const SOURCE: &str = "1.2.3-pre-release.4+build-ver.5";

    #[test]
    fn test_level_steps() {
        assert_eq!(v(SOURCE).update().patch().apply().unwrap().to_string(), "1.2.4");
        assert_eq!(v(SOURCE).update().minor().apply().unwrap().to_string(), "1.3.0");
        assert_eq!(v(SOURCE).update().major().apply().unwrap().to_string(), "2.0.0");
    }

    #[test]
    fn test_set_build() {
        let next = v(SOURCE)
            .update()
            .build(build(&["build-ver", "6"]))
            .apply()
            .unwrap();
        assert_eq!(next.to_string(), "1.2.3-pre-release.4+build-ver.6");
    }

    #[test]
    fn test_set_pre_release_and_build() {
        let next = v(SOURCE)
            .update()
            .pre_release(pre(&["pre-release", "6"]))
            .build(build(&["build-ver", "7"]))
            .apply()
            .unwrap();
        assert_eq!(next.to_string(), "1.2.3-pre-release.6+build-ver.7");
    }

    #[test]
    fn test_set_pre_release_clears_build() {
        let next = v(SOURCE)
            .update()
            .pre_release(pre(&["rc", "1"]))
            .apply()
            .unwrap();
        assert_eq!(next.to_string(), "1.2.3-rc.1");
    }

    #[test]
    fn test_increment_pre_release() {
        let next = v(SOURCE).update().pre_release(vec![]).apply().unwrap();
        assert_eq!(next.to_string(), "1.2.3-pre-release.5");
    }

    #[test]
    fn test_increment_pre_release_drops_trailing_words() {
        let next = v("1.2.3-pre-release.4.x.y")
            .update()
            .pre_release(vec![])
            .apply()
            .unwrap();
        assert_eq!(next.to_string(), "1.2.3-pre-release.5");
    }

    #[test]
    fn test_increment_pre_release_without_numeric_suffix() {
        let next = v("1.2.3-pre-release")
            .update()
            .pre_release(vec![])
            .apply()
            .unwrap();
        assert_eq!(next.to_string(), "1.2.3-pre-release.2");
    }

    #[test]
    fn test_increment_pre_release_without_pre_release_never_changes() {
        let next = v("1.2.3").update().pre_release(vec![]).apply().unwrap();
        assert_eq!(next.to_string(), "1.2.3");
    }

    #[test]
    fn test_pre_release_on_release_rewinds() {
        let err = v("1.2.3")
            .update()
            .pre_release(pre(&["alpha"]))
            .apply()
            .unwrap_err();
        assert!(matches!(err, VertagError::OrderRewind { .. }));
    }

    #[test]
    fn test_pre_release_after_level_is_safe() {
        let next = v("1.2.3")
            .update()
            .patch()
            .pre_release(pre(&["alpha"]))
            .apply()
            .unwrap();
        assert_eq!(next.to_string(), "1.2.4-alpha");
    }

    #[test]
    fn test_pre_release_refinement_must_not_precede_current() {
        let err = v("1.2.3-beta.1")
            .update()
            .pre_release(pre(&["alpha", "9"]))
            .apply()
            .unwrap_err();
        assert!(matches!(err, VertagError::OrderRewind { .. }));

        let next = v("1.2.3-beta.1")
            .update()
            .pre_release(pre(&["rc"]))
            .apply()
            .unwrap();
        assert_eq!(next.to_string(), "1.2.3-rc");
    }

    #[test]
    fn test_release_drops_pre_release() {
        let next = v(SOURCE).update().release().apply().unwrap();
        assert_eq!(next.to_string(), "1.2.3");
        let next = v(SOURCE)
            .update()
            .release()
            .build(build(&["b"]))
            .apply()
            .unwrap();
        assert_eq!(next.to_string(), "1.2.3+b");
    }

    #[test]
    fn test_level_then_increment_is_noop_on_pre_release() {
        let next = v(SOURCE)
            .update()
            .minor()
            .pre_release(vec![])
            .build(vec![])
            .apply()
            .unwrap();
        assert_eq!(next.to_string(), "1.3.0");
    }

    #[test]
    fn test_increment_pre_release_helper() {
        assert_eq!(
            increment_pre_release(&pre(&["rc", "1", "2"])),
            Some(pre(&["rc", "1", "3"]))
        );
        assert_eq!(increment_pre_release(&pre(&["1", "rc"])), Some(pre(&["2"])));
        assert_eq!(increment_pre_release(&[]), Some(Vec::new()));
        assert_eq!(
            increment_pre_release(&[PreReleaseId::Numeric(u64::MAX)]),
            None
        );
    }

    fn assert_overflow(result: Result<Semver>) {
        let err = result.unwrap_err();
        assert!(
            matches!(err, VertagError::Overflow { .. }),
            "expected Overflow, got {:?}",
            err
        );
    }

    #[test]
    fn test_level_steps_overflow() {
        let max = u64::MAX;
        assert_overflow(Semver::new(max, 0, 0).update().major().apply());
        assert_overflow(Semver::new(1, max, 0).update().minor().apply());
        assert_overflow(Semver::new(1, 2, max).update().patch().apply());

        // A level below the maxed-out one is still fine
        let next = Semver::new(1, 2, max).update().minor().apply().unwrap();
        assert_eq!(next, Semver::new(1, 3, 0));
    }

    #[test]
    fn test_tolerant_max_major_overflows() {
        let current = Semver::parse_tolerant("v18446744073709551615").unwrap();
        assert_overflow(current.update().major().apply());
    }

    #[test]
    fn test_pre_release_increment_overflow() {
        let current = v("1.0.0-rc.18446744073709551615");
        assert_overflow(current.update().pre_release(vec![]).apply());
        assert_overflow(
            current
                .update()
                .pre_release(vec![])
                .build(build(&["b"]))
                .apply(),
        );
    }
}
