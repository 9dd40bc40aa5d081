use crate::error::Result;
use crate::store::{StoreCommand, TagStore};
use crate::ui;
use std::cell::RefCell;

/// Store decorator that reads through and only reports writes
///
/// `list_tags` (including the optional fetch) is delegated to the inner store.
/// Creations, deletions and pushes are displayed as the git command they stand
/// for and never reach the inner store.
pub struct DryRunStore<S> {
    inner: S,
    planned: RefCell<Vec<StoreCommand>>,
}

impl<S: TagStore> DryRunStore<S> {
    pub fn new(inner: S) -> Self {
        DryRunStore {
            inner,
            planned: RefCell::new(Vec::new()),
        }
    }

    /// Commands that would have been run, in order
    pub fn planned(&self) -> Vec<StoreCommand> {
        self.planned.borrow().clone()
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn plan(&self, command: StoreCommand) -> Result<()> {
        ui::display_planned_command(&command);
        self.planned.borrow_mut().push(command);
        Ok(())
    }
}

impl<S: TagStore> TagStore for DryRunStore<S> {
    fn list_tags(&self, fetch: bool) -> Result<Vec<String>> {
        self.inner.list_tags(fetch)
    }

    fn create_tag(&self, name: &str, messages: &[String], file: Option<&str>) -> Result<()> {
        self.plan(StoreCommand::create(name, messages, file))
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.plan(StoreCommand::delete(name))
    }

    fn push_tag(&self, name: &str, remote: &str, delete: bool) -> Result<()> {
        self.plan(StoreCommand::push(name, remote, delete))
    }
}
