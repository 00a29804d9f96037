//! Credential provisioning.
//!
//! The control plane hands out short-lived store credentials: an
//! authenticated POST keyed by email returns a base64-wrapped JSON
//! document carrying an access-key pair and the endpoint host. This
//! crate decodes that document into [`Credentials`] and can mount a
//! configured filesystem under the `lakefs` scheme.
//!
//! The filesystem adapter itself never sees any of this — it only ever
//! receives the finished credential triple.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use lakevfs::{FsError, LakeFs, Registry};
use lakevfs_api::Credentials;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Default control-plane endpoint for provisioning.
pub const DEFAULT_CONTROL_PLANE_URL: &str = "https://demo.lakefs.io/api/v1/notebook";

/// Scheme the mounted filesystem is registered under.
pub const SCHEME: &str = "lakefs";

#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The control plane answered with a non-success status.
    #[error("control plane returned {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Transport-level failure reaching the control plane.
    #[error("transport error")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid base64.
    #[error("response is not valid base64")]
    Base64(#[from] base64::DecodeError),

    /// The decoded document did not match the expected shape.
    #[error("failed to decode provisioning response")]
    Decode(#[from] serde_json::Error),
}

// Wire shape of the control-plane response. Field names are the
// server's, not ours.
#[derive(Deserialize)]
struct WireCredentials {
    #[serde(rename = "AccessKeyID")]
    access_key_id: String,
    #[serde(rename = "SecretAccessKey")]
    secret_access_key: String,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(rename = "LakeFSCreds")]
    credentials: WireCredentials,
    #[serde(rename = "Host")]
    host: String,
}

/// Request credentials for `email`, creating an environment on first
/// use. Idempotent on the server side: repeat calls return the same
/// environment.
pub async fn get_or_create(
    control_plane_url: &str,
    email: &str,
) -> Result<Credentials, ProvisionError> {
    let client = reqwest::Client::new();
    let resp = client
        .post(control_plane_url)
        .query(&[("email", email)])
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ProvisionError::Rejected {
            status: status.as_u16(),
            body: resp.text().await.unwrap_or_default(),
        });
    }

    let body = resp.bytes().await?;
    let credentials = decode_response(&body)?;
    debug!(endpoint = %credentials.endpoint_url, "provisioned credentials");
    Ok(credentials)
}

/// Decode the base64-wrapped JSON credential document.
fn decode_response(body: &[u8]) -> Result<Credentials, ProvisionError> {
    let decoded = BASE64.decode(body)?;
    let wire: WireResponse = serde_json::from_slice(&decoded)?;
    Ok(Credentials {
        access_key_id: wire.credentials.access_key_id,
        secret_access_key: wire.credentials.secret_access_key,
        endpoint_url: wire.host,
    })
}

/// Build a filesystem from provisioned credentials and register it
/// under the [`SCHEME`] scheme.
pub fn mount(registry: &Registry, credentials: Credentials) -> Result<Arc<LakeFs>, FsError> {
    let fs = Arc::new(LakeFs::new(credentials)?);
    registry.register(SCHEME, fs.clone());
    Ok(fs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_control_plane_response() {
        let json = r#"{
            "LakeFSCreds": {
                "AccessKeyID": "AKIAEXAMPLE",
                "SecretAccessKey": "shhh"
            },
            "Host": "fearless-example.lakefs-demo.io"
        }"#;
        let body = BASE64.encode(json);

        let credentials = decode_response(body.as_bytes()).unwrap();
        assert_eq!(credentials.access_key_id, "AKIAEXAMPLE");
        assert_eq!(credentials.secret_access_key, "shhh");
        assert_eq!(credentials.endpoint_url, "fearless-example.lakefs-demo.io");
    }

    #[test]
    fn garbage_base64_is_a_decode_error() {
        let err = decode_response(b"%%% not base64 %%%").unwrap_err();
        assert!(matches!(err, ProvisionError::Base64(_)));
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let body = BASE64.encode(r#"{"unexpected": true}"#);
        let err = decode_response(body.as_bytes()).unwrap_err();
        assert!(matches!(err, ProvisionError::Decode(_)));
    }

    #[test]
    fn mount_registers_under_the_lakefs_scheme() {
        let registry = Registry::new();
        let fs = mount(
            &registry,
            Credentials {
                access_key_id: "key".into(),
                secret_access_key: "secret".into(),
                endpoint_url: "lakefs.example.com".into(),
            },
        )
        .unwrap();

        let resolved = registry.get(SCHEME).unwrap();
        assert!(Arc::ptr_eq(&resolved, &fs));
    }
}
