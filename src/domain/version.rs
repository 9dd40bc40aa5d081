use crate::domain::identifier::{BuildId, PreReleaseId};
use crate::domain::updater::Updater;
use crate::error::{Result, VertagError};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

const IDENTIFIERS: &str = r"[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*";

static STRICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)(?:-({ids}))?(?:\+({ids}))?$",
        ids = IDENTIFIERS
    ))
    .expect("strict semver pattern is valid")
});

static TOLERANT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^[vV]?([0-9]+)(?:\.([0-9]+))?(?:\.([0-9]+))?(?:-({ids}))?(?:\+({ids}))?$",
        ids = IDENTIFIERS
    ))
    .expect("tolerant semver pattern is valid")
});

/// Semantic version representation
///
/// Canonical form is `MAJOR.MINOR.PATCH[-PRE][+BUILD]`. Values are never
/// mutated in place; [`Updater`] derives new ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Semver {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Vec<PreReleaseId>,
    pub build: Vec<BuildId>,
}

impl Semver {
    /// Create a new release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Semver {
            major,
            minor,
            patch,
            pre_release: Vec::new(),
            build: Vec::new(),
        }
    }

    pub fn with_pre_release(mut self, pre_release: Vec<PreReleaseId>) -> Self {
        self.pre_release = pre_release;
        self
    }

    pub fn with_build(mut self, build: Vec<BuildId>) -> Self {
        self.build = build;
        self
    }

    /// Parse a strict semantic version (e.g., "1.2.3-rc.1+build.5")
    pub fn parse(s: &str) -> Result<Self> {
        let caps = STRICT
            .captures(s)
            .ok_or_else(|| VertagError::syntax(format!("'{}' is not a semantic version", s)))?;

        Ok(Semver {
            major: parse_number(&caps[1])?,
            minor: parse_number(&caps[2])?,
            patch: parse_number(&caps[3])?,
            pre_release: parse_pre_release(caps.get(4).map(|m| m.as_str()), true)?,
            build: parse_build(caps.get(5).map(|m| m.as_str()))?,
        })
    }

    /// Parse a version that may be partial (e.g., "v1", "v1.2", "1.2-alpha")
    ///
    /// The `v`/`V` prefix is optional, missing minor and patch default to 0 and
    /// leading zeros are accepted.
    pub fn parse_tolerant(s: &str) -> Result<Self> {
        let caps = TOLERANT
            .captures(s)
            .ok_or_else(|| VertagError::syntax(format!("'{}' is not a version", s)))?;

        let component = |i: usize| caps.get(i).map_or(Ok(0), |m| parse_number(m.as_str()));

        Ok(Semver {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            pre_release: parse_pre_release(caps.get(4).map(|m| m.as_str()), false)?,
            build: parse_build(caps.get(5).map(|m| m.as_str()))?,
        })
    }

    pub fn is_pre_release(&self) -> bool {
        !self.pre_release.is_empty()
    }

    /// Compare by semver precedence; build metadata is ignored
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        compare(self, other)
    }

    /// Start deriving the next version from this one
    pub fn update(&self) -> Updater {
        Updater::new(self.clone())
    }
}

fn parse_number(s: &str) -> Result<u64> {
    s.parse::<u64>()
        .map_err(|_| VertagError::syntax(format!("version number out of range: '{}'", s)))
}

fn parse_pre_release(field: Option<&str>, strict: bool) -> Result<Vec<PreReleaseId>> {
    match field {
        None => Ok(Vec::new()),
        Some(field) => field
            .split('.')
            .map(|id| {
                if strict {
                    PreReleaseId::parse(id)
                } else {
                    PreReleaseId::parse_tolerant(id)
                }
            })
            .collect(),
    }
}

fn parse_build(field: Option<&str>) -> Result<Vec<BuildId>> {
    match field {
        None => Ok(Vec::new()),
        Some(field) => field.split('.').map(BuildId::parse).collect(),
    }
}

/// Total order over versions by semver precedence
///
/// Major, minor and patch are compared numerically. A release outranks any
/// pre-release of the same triple. Pre-release identifiers are compared left to
/// right and a longer list wins when one is a prefix of the other. Build
/// metadata never participates.
pub fn compare(a: &Semver, b: &Semver) -> Ordering {
    a.major
        .cmp(&b.major)
        .then(a.minor.cmp(&b.minor))
        .then(a.patch.cmp(&b.patch))
        .then_with(|| match (a.pre_release.is_empty(), b.pre_release.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.pre_release.cmp(&b.pre_release),
        })
}

impl FromStr for Semver {
    type Err = VertagError;

    fn from_str(s: &str) -> Result<Self> {
        Semver::parse(s)
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, ids: &[T]) -> fmt::Result {
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            f.write_str(".")?;
        }
        write!(f, "{}", id)?;
    }
    Ok(())
}

impl fmt::Display for Semver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre_release.is_empty() {
            f.write_str("-")?;
            write_joined(f, &self.pre_release)?;
        }
        if !self.build.is_empty() {
            f.write_str("+")?;
            write_joined(f, &self.build)?;
        }
        Ok(())
    }
}
