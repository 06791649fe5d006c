//! HTTP pinning-service client
//!
//! Talks to a Pinata-style pinning API: multipart file upload under bearer
//! auth, returning the assigned content hash; retrieval goes through a
//! public gateway. Uploads are validated locally (size and media type)
//! before any request is made.

use crate::config::StoreConfig;
use crate::content_store::ContentStore;
use crate::errors::StoreError;
use async_trait::async_trait;
use cursus_core::ContentRef;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

/// Upload size cap, matching the service limit
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Accepted syllabus document types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// `application/pdf`
    Pdf,
    /// `application/msword`
    MsWord,
    /// `application/vnd.openxmlformats-officedocument.wordprocessingml.document`
    MsWordXml,
    /// `text/plain`
    PlainText,
}

impl MediaType {
    /// MIME type string for the upload request
    pub fn mime(self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::MsWord => "application/msword",
            MediaType::MsWordXml => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            MediaType::PlainText => "text/plain",
        }
    }

    /// Look up a MIME type string; `None` for disallowed types
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(MediaType::Pdf),
            "application/msword" => Some(MediaType::MsWord),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(MediaType::MsWordXml)
            }
            "text/plain" => Some(MediaType::PlainText),
            _ => None,
        }
    }
}

/// Validate an upload payload without touching the network
pub fn validate_upload(payload: &[u8]) -> Result<(), StoreError> {
    if payload.is_empty() {
        return Err(StoreError::invalid_payload("no file content provided"));
    }
    if payload.len() > MAX_UPLOAD_BYTES {
        return Err(StoreError::invalid_payload(format!(
            "file is {} bytes; the limit is {} bytes",
            payload.len(),
            MAX_UPLOAD_BYTES
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Client for an HTTP pinning service
#[derive(Debug, Clone)]
pub struct PinningClient {
    http: reqwest::Client,
    config: StoreConfig,
}

impl PinningClient {
    /// Build a client from validated configuration
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self {
            http: reqwest::Client::new(),
            config,
        })
    }

    fn upload_url(&self) -> Result<Url, StoreError> {
        Url::parse(&self.config.api_base)
            .and_then(|base| base.join("/pinning/pinFileToIPFS"))
            .map_err(|err| StoreError::config(format!("api_base: {err}")))
    }
}

#[async_trait]
impl ContentStore for PinningClient {
    async fn store(
        &self,
        payload: &[u8],
        file_name: &str,
        media: MediaType,
    ) -> Result<ContentRef, StoreError> {
        validate_upload(payload)?;

        let part = reqwest::multipart::Part::bytes(payload.to_vec())
            .file_name(file_name.to_string())
            .mime_str(media.mime())
            .map_err(|err| StoreError::invalid_payload(err.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        debug!(file_name, bytes = payload.len(), "uploading to pinning service");
        let response = self
            .http
            .post(self.upload_url()?)
            .bearer_auth(&self.config.token)
            .multipart(form)
            .send()
            .await
            .map_err(|err| StoreError::unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(StoreError::UploadRefused {
                status: status.as_u16(),
                reason,
            });
        }

        let pinned: PinResponse = response
            .json()
            .await
            .map_err(|err| StoreError::unavailable(format!("malformed pin response: {err}")))?;
        let reference = ContentRef::new(pinned.ipfs_hash)
            .map_err(|err| StoreError::unavailable(format!("malformed pin response: {err}")))?;
        info!(%reference, "content pinned");
        Ok(reference)
    }

    fn resolve(&self, reference: &ContentRef) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.config.gateway_base)
            .map_err(|err| StoreError::config(format!("gateway_base: {err}")))?;
        url.path_segments_mut()
            .map_err(|()| StoreError::config("gateway_base cannot carry a path"))?
            .push(reference.as_str());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PinningClient {
        PinningClient::new(StoreConfig {
            api_base: "https://api.pinata.cloud".to_string(),
            gateway_base: "https://gateway.pinata.cloud/ipfs".to_string(),
            token: "jwt".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn upload_validation_rejects_without_network() {
        assert!(validate_upload(b"").is_err());
        assert!(validate_upload(&vec![0u8; MAX_UPLOAD_BYTES + 1]).is_err());
        assert!(validate_upload(b"syllabus text").is_ok());
    }

    #[test]
    fn media_type_round_trip() {
        for media in [
            MediaType::Pdf,
            MediaType::MsWord,
            MediaType::MsWordXml,
            MediaType::PlainText,
        ] {
            assert_eq!(MediaType::from_mime(media.mime()), Some(media));
        }
        assert_eq!(MediaType::from_mime("image/png"), None);
    }

    #[test]
    fn resolve_joins_gateway_and_hash() {
        let reference = ContentRef::new("QmYwAPJzv5CZsnA").unwrap();
        let url = client().resolve(&reference).unwrap();
        assert_eq!(
            url.as_str(),
            "https://gateway.pinata.cloud/ipfs/QmYwAPJzv5CZsnA"
        );
    }
}
