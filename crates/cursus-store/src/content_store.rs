//! The content-store trait

use crate::errors::StoreError;
use crate::pinning::MediaType;
use async_trait::async_trait;
use cursus_core::ContentRef;
use std::sync::Arc;
use url::Url;

/// External content-addressed storage
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store a payload and return its content reference
    async fn store(
        &self,
        payload: &[u8],
        file_name: &str,
        media: MediaType,
    ) -> Result<ContentRef, StoreError>;

    /// Resolve a content reference to a retrieval URL
    fn resolve(&self, reference: &ContentRef) -> Result<Url, StoreError>;
}

#[async_trait]
impl<T: ContentStore + ?Sized> ContentStore for Arc<T> {
    async fn store(
        &self,
        payload: &[u8],
        file_name: &str,
        media: MediaType,
    ) -> Result<ContentRef, StoreError> {
        (**self).store(payload, file_name, media).await
    }

    fn resolve(&self, reference: &ContentRef) -> Result<Url, StoreError> {
        (**self).resolve(reference)
    }
}
