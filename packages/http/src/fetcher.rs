//! HTTP fetching behind a trait, so tests can avoid the network.

use std::io::{self, Read};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use reqwest::blocking::Client;
use url::Url;

use crate::cancel::Cancellation;
use crate::error::{Error, Result};

/// Body bytes quoted in a non-success status error.
const ERROR_DETAIL_LIMIT: usize = 512;

const CHUNK_SIZE: usize = 8 * 1024;

/// Fetch the body of an HTTP(S) resource.
///
/// Implementations must fail with [`Error::Status`] on any non-2xx response
/// without handing the body back, and should stop with [`Error::Cancelled`]
/// once `cancel` is set.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &Url, cancel: &Cancellation) -> Result<Bytes>;
}

impl<T: Fetcher + ?Sized> Fetcher for std::sync::Arc<T> {
    fn fetch(&self, url: &Url, cancel: &Cancellation) -> Result<Bytes> {
        (**self).fetch(url, cancel)
    }
}

/// Limits applied to every fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    /// Whole-request timeout, connect through last body byte.
    pub timeout: Duration,
    /// Largest accepted body.
    pub max_body_bytes: u64,
    pub user_agent: String,
}

impl FetchOptions {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

    pub fn default_user_agent() -> String {
        format!("manifold/{}", env!("CARGO_PKG_VERSION"))
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            max_body_bytes: Self::DEFAULT_MAX_BODY_BYTES,
            user_agent: Self::default_user_agent(),
        }
    }
}

/// Production fetcher using a blocking reqwest client.
pub struct ReqwestFetcher {
    client: Client,
    options: FetchOptions,
}

impl ReqwestFetcher {
    /// Create a fetcher whose client enforces `options`.
    pub fn new(options: FetchOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .build()?;

        Ok(Self { client, options })
    }

    /// Create with a 30 second timeout and a 16 MiB body limit.
    pub fn with_default_options() -> Result<Self> {
        Self::new(FetchOptions::default())
    }

    /// Use a preconfigured client. Only `max_body_bytes` is taken from
    /// `options`; the client's own timeout applies.
    pub fn with_client(client: Client, options: FetchOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }
}

impl Fetcher for ReqwestFetcher {
    fn fetch(&self, url: &Url, cancel: &Cancellation) -> Result<Bytes> {
        check_scheme(url)?;
        if cancel.is_cancelled() {
            return Err(Error::Cancelled {
                url: url.to_string(),
            });
        }

        tracing::debug!(url = %url, "fetching");
        let mut response = self.client.get(url.clone()).send()?;

        let status = response.status();
        if !status.is_success() {
            let detail = read_detail(&mut response);
            tracing::debug!(url = %url, status = status.as_u16(), "fetch failed");
            return Err(Error::Status {
                url: url.to_string(),
                status,
                detail,
            });
        }

        let limit = self.options.max_body_bytes;
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(Error::TooLarge {
                url: url.to_string(),
                limit,
            });
        }

        let body = read_limited(&mut response, limit, cancel, url)?;
        tracing::debug!(url = %url, bytes = body.len(), "fetched");
        Ok(body)
    }
}

/// Reject anything but `http` and `https` before touching the network.
pub fn check_scheme(url: &Url) -> Result<()> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::UnsupportedScheme {
            scheme: other.to_string(),
        }),
    }
}

/// Read a whole body, failing past `limit` bytes or once cancelled.
pub fn read_limited<R: Read>(
    reader: &mut R,
    limit: u64,
    cancel: &Cancellation,
    url: &Url,
) -> Result<Bytes> {
    let mut body = BytesMut::new();
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled {
                url: url.to_string(),
            });
        }
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Body(e)),
        };
        if body.len() as u64 + n as u64 > limit {
            return Err(Error::TooLarge {
                url: url.to_string(),
                limit,
            });
        }
        body.extend_from_slice(&chunk[..n]);
    }
    Ok(body.freeze())
}

/// The start of an error body, for diagnostics. Read failures yield nothing.
fn read_detail<R: Read>(reader: &mut R) -> String {
    let mut buf = Vec::with_capacity(ERROR_DETAIL_LIMIT);
    let _ = reader
        .take(ERROR_DETAIL_LIMIT as u64)
        .read_to_end(&mut buf);
    String::from_utf8_lossy(&buf).trim().to_string()
}
