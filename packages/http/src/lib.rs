//! # manifold-http
//!
//! HTTP(S) manifest sources for Manifold.
//!
//! - [`is_http`] decides whether a source identifier is a URL or a path.
//! - [`Fetcher`] fetches a URL's body; [`ReqwestFetcher`] is the blocking
//!   production implementation with a timeout and a body size limit.
//! - [`Cancellation`] lets a caller abort an in-flight fetch.
//!
//! ```ignore
//! use manifold_http::{Cancellation, Fetcher, ReqwestFetcher};
//!
//! let fetcher = ReqwestFetcher::with_default_options()?;
//! let url = url::Url::parse("https://example.com/policies/require-labels.yaml")?;
//! let bytes = fetcher.fetch(&url, &Cancellation::new())?;
//! ```
//!
//! Enable the `test-utils` feature for `mock::MockFetcher`.

mod cancel;
pub mod error;
mod fetcher;
mod source;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use cancel::Cancellation;
pub use error::{Error, Result};
pub use fetcher::{check_scheme, read_limited, FetchOptions, Fetcher, ReqwestFetcher};
pub use source::is_http;

pub use url::Url;
