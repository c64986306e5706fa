//! Mock fetcher for tests.
//!
//! Returns predefined responses keyed by URL and records every request, so
//! tests can assert both what came back and whether the network was touched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use url::Url;

use crate::cancel::Cancellation;
use crate::error::{Error, Result};
use crate::fetcher::{check_scheme, Fetcher};

/// A canned response.
#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: http::StatusCode,
    pub body: Bytes,
}

impl MockResponse {
    /// A 200 response with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: http::StatusCode::OK,
            body: body.into(),
        }
    }

    /// A response with the given status and body.
    pub fn with_status(status: http::StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::with_status(http::StatusCode::NOT_FOUND, "404 page not found")
    }
}

/// A fetcher that never touches the network.
///
/// Unmatched URLs get a 404.
#[derive(Clone, Default)]
pub struct MockFetcher {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    recorded: Arc<Mutex<Vec<Url>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `url` with `response`.
    pub fn with_response(self, url: impl Into<String>, response: MockResponse) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), response);
        self
    }

    /// Fail every request as if the network were unreachable.
    pub fn fail_with(self, message: impl Into<String>) -> Self {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
        self
    }

    /// Every URL fetched so far, in order.
    pub fn recorded_requests(&self) -> Vec<Url> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &Url, cancel: &Cancellation) -> Result<Bytes> {
        check_scheme(url)?;
        if cancel.is_cancelled() {
            return Err(Error::Cancelled {
                url: url.to_string(),
            });
        }

        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.clone());

        if let Some(message) = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(Error::Other { message });
        }

        let response = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(MockResponse::not_found);

        if !response.status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: response.status,
                detail: String::from_utf8_lossy(&response.body).trim().to_string(),
            });
        }
        Ok(response.body)
    }
}
