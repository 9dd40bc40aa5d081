use crate::error::{Result, VertagError};
use crate::store::{StoreCommand, TagStore};
use std::cell::RefCell;
use std::collections::HashSet;

/// In-memory tag store for testing without a repository
///
/// Every call is recorded as a [StoreCommand]. Deleting a missing tag or
/// creating an existing one fails the way git does.
#[derive(Debug, Default)]
pub struct MockStore {
    tags: RefCell<Vec<String>>,
    calls: RefCell<Vec<StoreCommand>>,
    failing: HashSet<String>,
}

impl MockStore {
    /// Create a new empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock store holding the given tags, in listing order
    pub fn with_tags<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        MockStore {
            tags: RefCell::new(tags.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Make every write touching `name` fail
    pub fn fail_on(mut self, name: impl Into<String>) -> Self {
        self.failing.insert(name.into());
        self
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags.borrow().clone()
    }

    pub fn calls(&self) -> Vec<StoreCommand> {
        self.calls.borrow().clone()
    }

    /// Recorded calls rendered as git command lines
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.to_string()).collect()
    }

    fn record(&self, command: StoreCommand) {
        self.calls.borrow_mut().push(command);
    }

    fn check(&self, name: &str) -> Result<()> {
        if self.failing.contains(name) {
            return Err(VertagError::store(format!("injected failure for '{}'", name)));
        }
        Ok(())
    }
}

impl TagStore for MockStore {
    fn list_tags(&self, fetch: bool) -> Result<Vec<String>> {
        if fetch {
            self.record(StoreCommand::Fetch);
        }
        self.record(StoreCommand::List);
        Ok(self.tags())
    }

    fn create_tag(&self, name: &str, messages: &[String], file: Option<&str>) -> Result<()> {
        self.record(StoreCommand::create(name, messages, file));
        self.check(name)?;

        let mut tags = self.tags.borrow_mut();
        if tags.iter().any(|t| t == name) {
            return Err(VertagError::store(format!("tag '{}' already exists", name)));
        }
        tags.push(name.to_string());
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.record(StoreCommand::delete(name));
        self.check(name)?;

        let mut tags = self.tags.borrow_mut();
        let index = tags
            .iter()
            .position(|t| t == name)
            .ok_or_else(|| VertagError::store(format!("tag '{}' not found", name)))?;
        tags.remove(index);
        Ok(())
    }

    fn push_tag(&self, name: &str, remote: &str, delete: bool) -> Result<()> {
        self.record(StoreCommand::push(name, remote, delete));
        Ok(())
    }
}
