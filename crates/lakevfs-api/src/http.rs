//! HTTP backend: the lakeFS REST API over reqwest with basic auth.

use crate::error::{Result, StoreError};
use crate::store::{DELETE_BATCH_MAX, ObjectStore};
use crate::types::{Credentials, ObjectStats, ObjectStatsList, RepositorySummary};
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct PathList<'a> {
    paths: &'a [String],
}

/// `ObjectStore` backend speaking the lakeFS REST API.
///
/// Authentication is HTTP basic auth with the access-key pair from
/// [`Credentials`]. The endpoint may be a bare host (`lakefs.example.com`)
/// or a full URL; bare hosts get `https://`, and the `/api/v1` base path
/// is appended when missing.
#[derive(Debug, Clone)]
pub struct HttpStore {
    http: reqwest::Client,
    base_url: String,
    access_key_id: String,
    secret_access_key: String,
}

impl HttpStore {
    pub fn new(credentials: Credentials) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: Self::api_base(&credentials.endpoint_url),
            access_key_id: credentials.access_key_id,
            secret_access_key: credentials.secret_access_key,
        })
    }

    /// Normalize an endpoint into the API base URL.
    fn api_base(endpoint: &str) -> String {
        let trimmed = endpoint.trim_end_matches('/');
        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };
        if with_scheme.ends_with("/api/v1") {
            with_scheme
        } else {
            format!("{with_scheme}/api/v1")
        }
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .basic_auth(&self.access_key_id, Some(&self.secret_access_key))
    }

    /// Map a non-success response into a `StoreError`, consuming the body
    /// for the message. `what` names the thing that was being addressed.
    async fn error_for(resp: Response, what: &str) -> StoreError {
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return StoreError::NotFound(what.to_string());
        }
        let message = resp.text().await.unwrap_or_default();
        StoreError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl ObjectStore for HttpStore {
    async fn list_objects(
        &self,
        repository: &str,
        reference: &str,
        prefix: &str,
        delimiter: &str,
        after: Option<&str>,
    ) -> Result<ObjectStatsList> {
        let url = format!(
            "{}/repositories/{repository}/refs/{reference}/objects/ls",
            self.base_url
        );
        let mut req = self
            .get(url)
            .query(&[("prefix", prefix), ("delimiter", delimiter)]);
        if let Some(after) = after {
            req = req.query(&[("after", after)]);
        }
        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_for(resp, &format!("{repository}/{reference}/{prefix}")).await);
        }
        debug!(repository, reference, prefix, "listed one page");
        Ok(resp.json().await?)
    }

    async fn get_object(&self, repository: &str, reference: &str, key: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/repositories/{repository}/refs/{reference}/objects",
            self.base_url
        );
        let resp = self.get(url).query(&[("path", key)]).send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_for(resp, &format!("{repository}/{reference}/{key}")).await);
        }
        Ok(resp.bytes().await?.to_vec())
    }

    async fn stat_object(
        &self,
        repository: &str,
        reference: &str,
        key: &str,
    ) -> Result<ObjectStats> {
        let url = format!(
            "{}/repositories/{repository}/refs/{reference}/objects/stat",
            self.base_url
        );
        let resp = self.get(url).query(&[("path", key)]).send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_for(resp, &format!("{repository}/{reference}/{key}")).await);
        }
        Ok(resp.json().await?)
    }

    async fn upload_object(
        &self,
        repository: &str,
        branch: &str,
        key: &str,
        content: &[u8],
    ) -> Result<()> {
        let url = format!(
            "{}/repositories/{repository}/branches/{branch}/objects",
            self.base_url
        );
        let resp = self
            .http
            .post(url)
            .basic_auth(&self.access_key_id, Some(&self.secret_access_key))
            .query(&[("path", key)])
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(content.to_vec())
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::error_for(resp, &format!("{repository}/{branch}/{key}")).await);
        }
        debug!(repository, branch, key, bytes = content.len(), "uploaded object");
        Ok(())
    }

    async fn delete_object(&self, repository: &str, branch: &str, key: &str) -> Result<()> {
        let url = format!(
            "{}/repositories/{repository}/branches/{branch}/objects",
            self.base_url
        );
        let resp = self
            .http
            .delete(url)
            .basic_auth(&self.access_key_id, Some(&self.secret_access_key))
            .query(&[("path", key)])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::error_for(resp, &format!("{repository}/{branch}/{key}")).await);
        }
        Ok(())
    }

    async fn delete_objects(&self, repository: &str, branch: &str, keys: &[String]) -> Result<()> {
        if keys.len() > DELETE_BATCH_MAX {
            return Err(StoreError::InvalidRequest(format!(
                "batch of {} keys exceeds the {DELETE_BATCH_MAX}-key limit",
                keys.len()
            )));
        }
        let url = format!(
            "{}/repositories/{repository}/branches/{branch}/objects/delete",
            self.base_url
        );
        let resp = self
            .http
            .post(url)
            .basic_auth(&self.access_key_id, Some(&self.secret_access_key))
            .json(&PathList { paths: keys })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::error_for(resp, &format!("{repository}/{branch}")).await);
        }
        debug!(repository, branch, count = keys.len(), "deleted object batch");
        Ok(())
    }

    async fn get_repository(&self, repository: &str) -> Result<RepositorySummary> {
        let url = format!("{}/repositories/{repository}", self.base_url);
        let resp = self.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_for(resp, repository).await);
        }
        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("lakefs.example.com", "https://lakefs.example.com/api/v1")]
    #[case("lakefs.example.com/", "https://lakefs.example.com/api/v1")]
    #[case("http://localhost:8000", "http://localhost:8000/api/v1")]
    #[case("https://lakefs.example.com/api/v1", "https://lakefs.example.com/api/v1")]
    fn api_base_normalizes_endpoints(#[case] endpoint: &str, #[case] expected: &str) {
        assert_eq!(HttpStore::api_base(endpoint), expected);
    }
}
