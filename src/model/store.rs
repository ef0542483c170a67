//! Layout storage
//!
//! Stores hold every saved layout and keep at most one default per user.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::StoreError;
use super::layout::DashboardLayout;

/// Persistence for dashboard layouts
pub trait LayoutStore {
    /// Layouts owned by `user_id` (or unowned layouts for `None`), in save order
    fn list(&self, user_id: Option<&str>) -> Vec<DashboardLayout>;

    fn get(&self, id: &str) -> Result<DashboardLayout, StoreError>;

    /// Insert or replace a layout by id
    fn save(&mut self, layout: DashboardLayout) -> Result<(), StoreError>;

    fn delete(&mut self, id: &str) -> Result<DashboardLayout, StoreError>;

    /// Mark a layout as default and clear the flag on the owner's other layouts
    fn set_default(&mut self, id: &str) -> Result<(), StoreError>;

    /// The owner's default layout, if any
    fn default_for(&self, user_id: Option<&str>) -> Option<DashboardLayout> {
        self.list(user_id).into_iter().find(|l| l.is_default)
    }
}

/// In-memory store, ordered by first save
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    layouts: Vec<DashboardLayout>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    fn index_of(&self, id: &str) -> Result<usize, StoreError> {
        self.layouts
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| StoreError::LayoutNotFound(id.to_string()))
    }

    /// A saved default layout makes every other layout of its owner non-default
    fn enforce_single_default(&mut self, index: usize) {
        let owner = self.layouts[index].user_id.clone();
        for (i, layout) in self.layouts.iter_mut().enumerate() {
            if i != index && layout.user_id == owner {
                layout.clear_default();
            }
        }
    }
}

impl LayoutStore for MemoryStore {
    fn list(&self, user_id: Option<&str>) -> Vec<DashboardLayout> {
        self.layouts
            .iter()
            .filter(|l| l.user_id.as_deref() == user_id)
            .cloned()
            .collect()
    }

    fn get(&self, id: &str) -> Result<DashboardLayout, StoreError> {
        let index = self.index_of(id)?;
        Ok(self.layouts[index].clone())
    }

    fn save(&mut self, layout: DashboardLayout) -> Result<(), StoreError> {
        let is_default = layout.is_default;
        let index = match self.index_of(&layout.id) {
            Ok(index) => {
                self.layouts[index] = layout;
                index
            }
            Err(_) => {
                self.layouts.push(layout);
                self.layouts.len() - 1
            }
        };
        if is_default {
            self.enforce_single_default(index);
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<DashboardLayout, StoreError> {
        let index = self.index_of(id)?;
        Ok(self.layouts.remove(index))
    }

    fn set_default(&mut self, id: &str) -> Result<(), StoreError> {
        let index = self.index_of(id)?;
        self.layouts[index].set_default();
        self.enforce_single_default(index);
        Ok(())
    }
}

/// Store backed by a JSON file holding an array of layouts.
///
/// The file is read on open and rewritten after every mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    /// Open a store file. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let layouts = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            vec![]
        };
        tracing::debug!(path = %path.display(), "opened layout store");
        Ok(Self {
            path,
            inner: MemoryStore { layouts },
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.inner.layouts)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl LayoutStore for FileStore {
    fn list(&self, user_id: Option<&str>) -> Vec<DashboardLayout> {
        self.inner.list(user_id)
    }

    fn get(&self, id: &str) -> Result<DashboardLayout, StoreError> {
        self.inner.get(id)
    }

    fn save(&mut self, layout: DashboardLayout) -> Result<(), StoreError> {
        self.inner.save(layout)?;
        self.flush()
    }

    fn delete(&mut self, id: &str) -> Result<DashboardLayout, StoreError> {
        let removed = self.inner.delete(id)?;
        self.flush()?;
        Ok(removed)
    }

    fn set_default(&mut self, id: &str) -> Result<(), StoreError> {
        self.inner.set_default(id)?;
        self.flush()
    }
}
