use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::location::resolve_relative;
use crate::property::PropertySet;

/// One named application block inside a manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplicationBlock {
    /// Application name. May be empty if the manifest omitted it; the
    /// validator rejects such applications.
    pub name: String,
    /// Application-scoped overrides. Empty for name-only entries.
    pub properties: PropertySet,
}

impl ApplicationBlock {
    pub fn new(name: impl Into<String>, properties: PropertySet) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    /// A block that only names the application.
    pub fn name_only(name: impl Into<String>) -> Self {
        Self::new(name, PropertySet::new())
    }
}

/// A parsed manifest document.
///
/// Documents are produced by a loader and are read-only from then on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManifestDocument {
    location: PathBuf,
    parent_ref: Option<PathBuf>,
    global: PropertySet,
    applications: Vec<ApplicationBlock>,
}

impl ManifestDocument {
    /// Create an empty document located at `location`.
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            parent_ref: None,
            global: PropertySet::new(),
            applications: Vec::new(),
        }
    }

    /// Where this document was loaded from. Relative references inside the
    /// document (`inherit`, `path`) are resolved against its directory.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// The raw `inherit` reference, as written.
    pub fn parent_ref(&self) -> Option<&Path> {
        self.parent_ref.as_deref()
    }

    /// The parent reference resolved against this document's directory.
    pub fn resolved_parent(&self) -> Option<PathBuf> {
        self.parent_ref
            .as_deref()
            .map(|r| resolve_relative(&self.location, r))
    }

    /// Properties declared outside any application block.
    pub fn global(&self) -> &PropertySet {
        &self.global
    }

    /// Application blocks in declared order.
    pub fn applications(&self) -> &[ApplicationBlock] {
        &self.applications
    }

    /// All blocks declaring `name`, in declared order.
    pub fn application_blocks<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a ApplicationBlock> + 'a {
        self.applications.iter().filter(move |b| b.name == name)
    }

    // ---- Builder helpers ----

    pub fn with_parent(mut self, parent_ref: impl Into<PathBuf>) -> Self {
        self.parent_ref = Some(parent_ref.into());
        self
    }

    pub fn with_global(mut self, global: PropertySet) -> Self {
        self.global = global;
        self
    }

    pub fn with_application(mut self, name: impl Into<String>, properties: PropertySet) -> Self {
        self.applications.push(ApplicationBlock::new(name, properties));
        self
    }

    pub fn with_block(mut self, block: ApplicationBlock) -> Self {
        self.applications.push(block);
        self
    }
}
