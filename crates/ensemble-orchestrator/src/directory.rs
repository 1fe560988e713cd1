//! Agent directory: the assistants the user is permitted to talk to.
//!
//! The directory is the intersection of the remote catalog and a local
//! allow-list. Order always follows the catalog.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use ensemble_assistants::{Assistant, AssistantsApi};

use crate::error::DirectoryError;

/// One allow-list entry. Fields other than `id` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AllowListEntry {
    pub id: String,
}

/// Set of assistant ids permitted for use.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    ids: HashSet<String>,
}

impl AllowList {
    /// Build from a list of ids.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Load a JSON array of `{"id": ...}` objects.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let data = std::fs::read_to_string(path).map_err(|source| DirectoryError::AllowListRead {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<AllowListEntry> =
            serde_json::from_str(&data).map_err(|source| DirectoryError::AllowListParse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), entries = entries.len(), "Loaded allow-list");
        Ok(Self::new(entries.into_iter().map(|e| e.id)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Keep the catalog entries whose id is allowed, in catalog order.
    pub fn filter(&self, catalog: Vec<Assistant>) -> Vec<Assistant> {
        catalog
            .into_iter()
            .filter(|assistant| self.contains(&assistant.id))
            .collect()
    }
}

/// List the assistants in the remote catalog that the allow-list permits.
pub async fn list_allowed_assistants(
    api: &dyn AssistantsApi,
    allow_list: &AllowList,
) -> Result<Vec<Assistant>, DirectoryError> {
    let catalog = api
        .list_assistants()
        .await
        .map_err(DirectoryError::Catalog)?;
    let catalog_len = catalog.len();

    let allowed = allow_list.filter(catalog);
    info!(
        catalog = catalog_len,
        allowed = allowed.len(),
        "Resolved assistant directory"
    );
    Ok(allowed)
}
