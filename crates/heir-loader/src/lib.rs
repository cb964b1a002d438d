//! Manifest loading for heir.
//!
//! The resolution engine never touches storage itself. It asks a
//! [`ManifestLoader`] for already-parsed [`ManifestDocument`]s by path.
//!
//! # Backends
//!
//! - [`InMemoryManifestLoader`] -- `HashMap`-based loader for tests and embedding
//! - [`FsManifestLoader`] -- reads YAML manifests from the local filesystem
//!
//! Both backends share the YAML conversion in [`parse_manifest`], which also
//! expands `${random-word}` placeholders and rejects any other `${...}`
//! property reference.
//!
//! [`ManifestDocument`]: heir_types::ManifestDocument

pub mod error;
pub mod expand;
pub mod fs;
pub mod memory;
pub mod parse;
pub mod traits;
pub mod yaml;

pub use error::{LoaderError, LoaderResult};
pub use expand::{expand_properties, FixedWord, RandomWords, WordSource};
pub use fs::FsManifestLoader;
pub use memory::InMemoryManifestLoader;
pub use parse::parse_manifest;
pub use traits::ManifestLoader;
pub use yaml::Node;
