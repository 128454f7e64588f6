//! Resource providers for the dossier PDF pipeline.
//!
//! This crate provides the concrete implementations of the
//! `ResourceProvider` trait from dossier-traits.
//!
//! ## Available Providers
//!
//! - [`HttpResourceProvider`]: Fetches `http://` and `https://` references
//! - [`FilesystemResourceProvider`]: Loads files below a base directory
//! - [`DataUriProvider`]: Decodes base64 `data:` URIs
//! - [`CompositeResourceProvider`]: Dispatches on the reference scheme
//!
//! ## Re-exports
//!
//! For convenience, we also re-export the in-memory provider from dossier-traits:
//! - [`InMemoryResourceProvider`]: Pre-populated in-memory storage

mod composite;
mod data_uri;
mod filesystem;
mod http;

pub use composite::CompositeResourceProvider;
pub use data_uri::DataUriProvider;
pub use filesystem::FilesystemResourceProvider;
pub use http::HttpResourceProvider;

pub use dossier_traits::{InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData};
