//! The loading pipeline: bytes in, normalized resources out, and back again.

use std::path::Path;
use std::sync::Arc;

use manifold_http::{is_http, Cancellation, Fetcher, ReqwestFetcher, Url};
use manifold_value::GenericResource;
use manifold_vfs::{clean_path, Filesystem, OsFilesystem};

use crate::config::LoaderConfig;
use crate::error::{Error, Result};
use crate::normalize::{normalize, to_generic};
use crate::scheme::{Scheme, TypeRegistry};
use crate::serialize;
use crate::split::{split_documents, DocumentBlock};

/// Source identifier used when converting in-memory bytes.
const INLINE_SOURCE: &str = "<input>";

/// Loads manifests from paths and URLs, and writes them back to paths.
///
/// A loader holds only shared, read-only state, so one instance can serve
/// concurrent calls.
///
/// # Example
///
/// ```rust
/// use manifold_resource::ResourceLoader;
/// use manifold_vfs::MemoryFilesystem;
///
/// let fs = MemoryFilesystem::new()
///     .with_file("app.yaml", "kind: Service\n---\nkind: Deployment\nmetadata:\n  namespace: prod\n");
///
/// let loader = ResourceLoader::new().unwrap();
/// let resources = loader.load("app.yaml", Some(&fs)).unwrap();
///
/// assert_eq!(resources.len(), 2);
/// assert_eq!(resources[0].namespace(), Some("default"));
/// assert_eq!(resources[1].namespace(), Some("prod"));
/// ```
pub struct ResourceLoader {
    registry: Arc<dyn TypeRegistry>,
    fetcher: Arc<dyn Fetcher>,
    config: LoaderConfig,
    cancellation: Cancellation,
}

impl ResourceLoader {
    /// A loader with the built-in policy types and default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ResourceLoaderBuilder {
        ResourceLoaderBuilder::default()
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// The token checked between stages. Cancelling it aborts in-flight and
    /// future calls on this loader.
    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    /// Load every resource from a path or an http(s) URL.
    ///
    /// Paths are read through `fs`, or the real filesystem when `fs` is
    /// `None`. URLs are always fetched over the network. A source without
    /// any documents fails with [`Error::EmptyResult`].
    pub fn load(&self, source: &str, fs: Option<&dyn Filesystem>) -> Result<Vec<GenericResource>> {
        let bytes = self.load_bytes(source, fs)?;
        let resources = self
            .split_and_convert(&bytes)
            .map_err(|e| e.in_source(source))?;

        if resources.is_empty() {
            return Err(Error::EmptyResult {
                source_id: source.to_string(),
            });
        }

        tracing::debug!(source, resources = resources.len(), "loaded resources");
        Ok(resources)
    }

    /// Read the raw bytes of a path or an http(s) URL.
    pub fn load_bytes(&self, source: &str, fs: Option<&dyn Filesystem>) -> Result<Vec<u8>> {
        self.check_cancelled()?;

        if is_http(source) {
            return self.fetch(source);
        }

        let path = clean_path(Path::new(source));
        tracing::debug!(path = %path.display(), "reading source");
        let result = match fs {
            Some(fs) => fs.read(&path),
            None => OsFilesystem::new().read(&path),
        };
        result.map_err(|error| Error::Io {
            operation: "read",
            path: path.display().to_string(),
            error,
        })
    }

    /// Split a multi-document stream and convert every document.
    ///
    /// Documents are returned in order. The first failing document fails the
    /// whole call, and its index is attached to the error. An input with no
    /// documents yields an empty list.
    pub fn split_and_convert(&self, bytes: &[u8]) -> Result<Vec<GenericResource>> {
        let documents = split_documents(bytes)?;
        tracing::debug!(documents = documents.len(), "split input");

        let mut resources = Vec::with_capacity(documents.len());
        for document in &documents {
            self.check_cancelled()?;
            let resource = self
                .convert_document(document)
                .map_err(|e| e.in_document(document))?;
            resources.push(resource);
        }
        Ok(resources)
    }

    /// Convert bytes holding exactly one document.
    ///
    /// Zero documents is [`Error::EmptyResult`]; more than one is a
    /// structural error.
    pub fn convert(&self, bytes: &[u8]) -> Result<GenericResource> {
        self.check_cancelled()?;
        let documents = split_documents(bytes)?;
        match documents.as_slice() {
            [] => Err(Error::EmptyResult {
                source_id: INLINE_SOURCE.to_string(),
            }),
            [document] => self.convert_document(document),
            many => Err(Error::Structural {
                message: format!("expected a single document, found {}", many.len()),
            }),
        }
    }

    /// Decode, convert and normalize a single document.
    pub fn convert_document(&self, document: &DocumentBlock) -> Result<GenericResource> {
        let identity = match self.registry.recognize(document) {
            Ok(identity) => {
                tracing::debug!(index = document.index, %identity, "recognized document type");
                Some(identity)
            }
            Err(e) if e.is_unrecognized() => {
                tracing::debug!(index = document.index, reason = %e, "document type not recognized");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let resource = to_generic(document)?;
        if resource.namespace().map_or(true, str::is_empty) {
            tracing::debug!(
                index = document.index,
                namespace = %self.config.default_namespace,
                "defaulting namespace"
            );
        }
        Ok(normalize(
            resource,
            identity.as_ref(),
            &self.config.default_namespace,
        ))
    }

    /// Serialize a resource as YAML and write it to a local path.
    ///
    /// http(s) destinations are rejected with
    /// [`Error::UnsupportedDestination`] whether or not `fs` is given.
    pub fn write(
        &self,
        resource: &GenericResource,
        destination: &str,
        fs: Option<&dyn Filesystem>,
    ) -> Result<()> {
        reject_http(destination)?;
        let bytes = serialize::to_yaml(resource)?;
        self.write_bytes(&bytes, destination, fs)
    }

    /// Write raw bytes to a local path, replacing any existing file.
    pub fn write_bytes(
        &self,
        bytes: &[u8],
        destination: &str,
        fs: Option<&dyn Filesystem>,
    ) -> Result<()> {
        reject_http(destination)?;
        self.check_cancelled()?;

        let path = clean_path(Path::new(destination));
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "writing resource");
        let result = match fs {
            Some(fs) => fs.write(&path, bytes),
            None => OsFilesystem::new().write(&path, bytes),
        };
        result.map_err(|error| Error::Io {
            operation: "write",
            path: path.display().to_string(),
            error,
        })
    }

    fn fetch(&self, source: &str) -> Result<Vec<u8>> {
        let url = Url::parse(source).map_err(|e| Error::Transport {
            source_id: source.to_string(),
            error: e.into(),
        })?;

        let body = self
            .fetcher
            .fetch(&url, &self.cancellation)
            .map_err(|error| match error {
                manifold_http::Error::Cancelled { .. } => Error::Cancelled,
                error => Error::Transport {
                    source_id: source.to_string(),
                    error,
                },
            })?;
        Ok(body.to_vec())
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancellation.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ResourceLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLoader")
            .field("config", &self.config)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish_non_exhaustive()
    }
}

fn reject_http(destination: &str) -> Result<()> {
    if is_http(destination) {
        return Err(Error::UnsupportedDestination {
            destination: destination.to_string(),
        });
    }
    Ok(())
}

/// Builder for [`ResourceLoader`].
#[derive(Default)]
pub struct ResourceLoaderBuilder {
    registry: Option<Arc<dyn TypeRegistry>>,
    fetcher: Option<Arc<dyn Fetcher>>,
    config: Option<LoaderConfig>,
    cancellation: Option<Cancellation>,
}

impl ResourceLoaderBuilder {
    /// Recognize types with `registry` instead of the built-in policy scheme.
    pub fn registry<R: TypeRegistry + 'static>(mut self, registry: R) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    pub fn shared_registry(mut self, registry: Arc<dyn TypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Fetch URLs with `fetcher` instead of a client built from the config.
    pub fn fetcher<F: Fetcher + 'static>(mut self, fetcher: F) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    pub fn config(mut self, config: LoaderConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    /// Validate the configuration and assemble the loader.
    pub fn build(self) -> Result<ResourceLoader> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => {
                let fetcher = ReqwestFetcher::new(config.fetch_options()).map_err(|e| {
                    Error::Config {
                        message: format!("failed to build HTTP client: {e}"),
                    }
                })?;
                Arc::new(fetcher)
            }
        };

        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(Scheme::with_policy_kinds()));

        Ok(ResourceLoader {
            registry,
            fetcher,
            config,
            cancellation: self.cancellation.unwrap_or_default(),
        })
    }
}
