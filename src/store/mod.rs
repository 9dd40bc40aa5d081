//! Tag storage abstraction layer
//!
//! The [TagStore] trait is the only thing the version logic knows about the
//! version control system: list tag names, create, delete and push tags.
//! Implementations:
//!
//! - [repository::Git2Store]: a real repository through the `git2` crate
//! - [dry_run::DryRunStore]: reads from an inner store, only reports writes
//! - [mock::MockStore]: in-memory store for testing
//!
//! ```rust
//! # use git_vertag::store::TagStore;
//! # fn example<S: TagStore>(store: &S) -> git_vertag::Result<()> {
//! for tag in store.list_tags(false)? {
//!     println!("{}", tag);
//! }
//! # Ok(())
//! # }
//! ```

pub mod dry_run;
pub mod mock;
pub mod repository;

pub use dry_run::DryRunStore;
pub use mock::MockStore;
pub use repository::Git2Store;

use crate::error::Result;
use std::fmt;

/// Version store contract
///
/// Calls are blocking and not transactional: nothing guards the
/// read-latest / write-next sequence against a concurrent writer.
pub trait TagStore {
    /// List all tag names, optionally fetching tags from the remote first
    fn list_tags(&self, fetch: bool) -> Result<Vec<String>>;

    /// Create a tag at HEAD
    ///
    /// # Arguments
    /// * `name` - Name of the new tag
    /// * `messages` - Message paragraphs; an annotated tag is created when non-empty
    /// * `file` - File to read the message from (`-` for standard input)
    fn create_tag(&self, name: &str, messages: &[String], file: Option<&str>) -> Result<()>;

    /// Delete a local tag
    fn delete_tag(&self, name: &str) -> Result<()>;

    /// Publish a tag creation (or deletion when `delete` is set) to a remote
    fn push_tag(&self, name: &str, remote: &str, delete: bool) -> Result<()>;
}

impl<S: TagStore + ?Sized> TagStore for &S {
    fn list_tags(&self, fetch: bool) -> Result<Vec<String>> {
        (**self).list_tags(fetch)
    }

    fn create_tag(&self, name: &str, messages: &[String], file: Option<&str>) -> Result<()> {
        (**self).create_tag(name, messages, file)
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        (**self).delete_tag(name)
    }

    fn push_tag(&self, name: &str, remote: &str, delete: bool) -> Result<()> {
        (**self).push_tag(name, remote, delete)
    }
}

impl<S: TagStore + ?Sized> TagStore for Box<S> {
    fn list_tags(&self, fetch: bool) -> Result<Vec<String>> {
        (**self).list_tags(fetch)
    }

    fn create_tag(&self, name: &str, messages: &[String], file: Option<&str>) -> Result<()> {
        (**self).create_tag(name, messages, file)
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        (**self).delete_tag(name)
    }

    fn push_tag(&self, name: &str, remote: &str, delete: bool) -> Result<()> {
        (**self).push_tag(name, remote, delete)
    }
}

/// A single store call, displayed as the equivalent git command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    Fetch,
    List,
    Create {
        name: String,
        messages: Vec<String>,
        file: Option<String>,
    },
    Delete {
        name: String,
    },
    Push {
        name: String,
        remote: String,
        delete: bool,
    },
}

impl StoreCommand {
    pub fn create(name: &str, messages: &[String], file: Option<&str>) -> Self {
        StoreCommand::Create {
            name: name.to_string(),
            messages: messages.to_vec(),
            file: file.map(str::to_string),
        }
    }

    pub fn delete(name: &str) -> Self {
        StoreCommand::Delete {
            name: name.to_string(),
        }
    }

    pub fn push(name: &str, remote: &str, delete: bool) -> Self {
        StoreCommand::Push {
            name: name.to_string(),
            remote: remote.to_string(),
            delete,
        }
    }

    /// Arguments of the equivalent `git` invocation
    pub fn args(&self) -> Vec<String> {
        match self {
            StoreCommand::Fetch => vec!["fetch".into(), "--tags".into()],
            StoreCommand::List => vec!["tag".into(), "-l".into()],
            StoreCommand::Create {
                name,
                messages,
                file,
            } => {
                let mut args = vec!["tag".to_string()];
                for message in messages {
                    args.push("--message".into());
                    args.push(message.clone());
                }
                if let Some(file) = file {
                    args.push("--file".into());
                    args.push(file.clone());
                }
                args.push(name.clone());
                args
            }
            StoreCommand::Delete { name } => vec!["tag".into(), "-d".into(), name.clone()],
            StoreCommand::Push {
                name,
                remote,
                delete,
            } => {
                let refspec = if *delete {
                    format!(":{}", name)
                } else {
                    name.clone()
                };
                vec!["push".into(), remote.clone(), refspec]
            }
        }
    }
}

/// Quote an argument the way a shell user would have to type it
fn quote(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'') {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('"', "\"\""))
}

impl fmt::Display for StoreCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("git")?;
        for arg in self.args() {
            write!(f, " {}", quote(&arg))?;
        }
        Ok(())
    }
}
