use crate::error::{Result, VertagError};
use crate::store::{StoreCommand, TagStore};
use git2::{Cred, CredentialType, ErrorCode, FetchOptions, PushOptions, RemoteCallbacks};
use git2::Repository as Git2Repo;
use std::cell::RefCell;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Tag store backed by a git repository through `git2`
pub struct Git2Store {
    repo: Git2Repo,
    fetch_remote: String,
    /// Standard input can only be read once; every `-F -` tag reuses it
    stdin_message: RefCell<Option<String>>,
}

impl Git2Store {
    /// Open the repository containing `path` (searching parent directories)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            VertagError::store(format!(
                "Not in a git repository ({}): {}",
                path.display(),
                e.message()
            ))
        })?;

        Ok(Git2Store::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Store {
            repo,
            fetch_remote: "origin".to_string(),
            stdin_message: RefCell::new(None),
        }
    }

    /// Remote to fetch tags from when listing with `fetch`
    pub fn with_fetch_remote(mut self, remote: impl Into<String>) -> Self {
        self.fetch_remote = remote.into();
        self
    }

    fn fetch_tags(&self) -> Result<()> {
        let mut remote = self.repo.find_remote(&self.fetch_remote).map_err(|e| {
            VertagError::store(format!(
                "Cannot find remote '{}': {}",
                self.fetch_remote,
                e.message()
            ))
        })?;

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks());

        remote
            .fetch(&["+refs/tags/*:refs/tags/*"], Some(&mut fetch_options), None)
            .map_err(|e| {
                VertagError::store(format!(
                    "Failed to fetch tags from '{}': {}",
                    self.fetch_remote,
                    e.message()
                ))
            })
    }

    fn read_stdin(&self) -> Result<String> {
        let mut cached = self.stdin_message.borrow_mut();
        if let Some(message) = cached.as_ref() {
            return Ok(message.clone());
        }

        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        *cached = Some(buf.clone());
        Ok(buf)
    }

    fn tag_message(&self, messages: &[String], file: Option<&str>) -> Result<Option<String>> {
        let mut paragraphs: Vec<String> = messages.to_vec();

        match file {
            Some("-") => paragraphs.push(self.read_stdin()?),
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    VertagError::store(format!("Cannot read message file '{}': {}", path, e))
                })?;
                paragraphs.push(contents);
            }
            None => {}
        }

        if paragraphs.is_empty() {
            return Ok(None);
        }

        // git separates -m values as paragraphs and ends the message with a newline
        let mut message = paragraphs
            .iter()
            .map(|p| p.trim_end())
            .collect::<Vec<_>>()
            .join("\n\n");
        message.push('\n');
        Ok(Some(message))
    }
}

/// Credential lookup: SSH keys under ~/.ssh, then the SSH agent, then defaults
fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        Cred::default()
    });
    callbacks
}

impl TagStore for Git2Store {
    fn list_tags(&self, fetch: bool) -> Result<Vec<String>> {
        if fetch {
            debug!("{}", StoreCommand::Fetch);
            self.fetch_tags()?;
        }

        debug!("{}", StoreCommand::List);
        let tags = self
            .repo
            .tag_names(None)
            .map_err(|e| VertagError::store(format!("Cannot list tags: {}", e.message())))?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn create_tag(&self, name: &str, messages: &[String], file: Option<&str>) -> Result<()> {
        debug!("{}", StoreCommand::create(name, messages, file));

        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| VertagError::store(format!("Cannot resolve HEAD: {}", e.message())))?;

        let result = match self.tag_message(messages, file)? {
            Some(message) => {
                let signature = self.repo.signature().map_err(|e| {
                    VertagError::store(format!("Cannot determine tagger: {}", e.message()))
                })?;
                self.repo
                    .tag(name, head.as_object(), &signature, &message, false)
                    .map(|_| ())
            }
            None => self
                .repo
                .tag_lightweight(name, head.as_object(), false)
                .map(|_| ()),
        };

        result.map_err(|e| match e.code() {
            ErrorCode::Exists => VertagError::store(format!("tag '{}' already exists", name)),
            _ => VertagError::store(format!("Cannot create tag '{}': {}", name, e.message())),
        })
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        debug!("{}", StoreCommand::delete(name));

        self.repo.tag_delete(name).map_err(|e| match e.code() {
            ErrorCode::NotFound => VertagError::store(format!("tag '{}' not found", name)),
            _ => VertagError::store(format!("Cannot delete tag '{}': {}", name, e.message())),
        })
    }

    fn push_tag(&self, name: &str, remote_name: &str, delete: bool) -> Result<()> {
        debug!("{}", StoreCommand::push(name, remote_name, delete));

        let mut remote = self.repo.find_remote(remote_name).map_err(|e| {
            VertagError::store(format!(
                "Cannot find remote '{}': {}",
                remote_name,
                e.message()
            ))
        })?;

        let refspec = if delete {
            format!(":refs/tags/{}", name)
        } else {
            format!("refs/tags/{}:refs/tags/{}", name, name)
        };

        let mut callbacks = remote_callbacks();
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Push rejected for {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| {
                VertagError::store(format!(
                    "Failed to push tag '{}' to '{}': {}",
                    name,
                    remote_name,
                    e.message()
                ))
            })
    }
}
