//! HomeworkSource trait for fetching raw API answers.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Source of homework status answers.
///
/// Implemented by [`PracticumClient`](crate::PracticumClient) for the real API.
/// The poll loop only depends on this trait, so tests can feed it canned
/// answers without a network.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Fetch the raw answer for submissions updated since `from_date`.
    ///
    /// # Arguments
    ///
    /// * `from_date` - Unix timestamp in seconds
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not 200 or the
    /// body is not JSON. The shape of the JSON is not checked here.
    async fn get_api_answer(&self, from_date: i64) -> Result<Value>;
}
