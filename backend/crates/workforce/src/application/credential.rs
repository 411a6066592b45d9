//! Credential rendering shared by decisions, QR regeneration and repair

use std::sync::Arc;

use crate::application::config::WorkforceConfig;
use crate::domain::entity::worker::{IssuedCredential, Worker};
use crate::domain::gateway::MediaStore;
use crate::domain::value_object::worker_identifier::WorkerIdentifier;
use crate::error::WorkforceResult;

/// Credential with its QR image rendered but not yet stored
#[derive(Debug, Clone)]
pub struct PreparedCredential {
    pub credential: IssuedCredential,
    pub png: Vec<u8>,
}

/// Renders and stores the QR code for an identifier
pub struct CredentialIssuer<M: MediaStore> {
    media: Arc<M>,
    config: Arc<WorkforceConfig>,
}

impl<M: MediaStore> CredentialIssuer<M> {
    pub fn new(media: Arc<M>, config: Arc<WorkforceConfig>) -> Self {
        Self { media, config }
    }

    /// Fresh QR image, payload and endpoint under the configured base URL
    pub async fn render(&self, identifier: &WorkerIdentifier) -> WorkforceResult<IssuedCredential> {
        let prepared = self.prepare(identifier)?;
        self.store(&prepared).await?;
        Ok(prepared.credential)
    }

    /// Render the QR image in memory without storing it. The image is only
    /// written by [`store`](Self::store), once the identifier is owned.
    pub fn prepare(&self, identifier: &WorkerIdentifier) -> WorkforceResult<PreparedCredential> {
        let qr_payload = self.config.qr_payload(identifier);
        let png = platform::qr::render_png(&qr_payload)?;

        Ok(PreparedCredential {
            credential: IssuedCredential {
                identifier: identifier.clone(),
                qr_reference: self.media.qr_reference(identifier),
                qr_payload,
                verification_endpoint: self.config.verification_endpoint(identifier),
            },
            png,
        })
    }

    pub async fn store(&self, prepared: &PreparedCredential) -> WorkforceResult<()> {
        let identifier = &prepared.credential.identifier;
        let qr_reference = self.media.save_qr(identifier, &prepared.png).await?;
        tracing::debug!(identifier = %identifier, qr = %qr_reference, "QR code stored");
        Ok(())
    }

    /// The worker's current credential, rendering only what is missing
    pub async fn complete(
        &self,
        worker: &Worker,
        identifier: &WorkerIdentifier,
    ) -> WorkforceResult<IssuedCredential> {
        match &worker.qr_reference {
            Some(qr_reference) if !qr_reference.is_empty() => Ok(IssuedCredential {
                identifier: identifier.clone(),
                qr_reference: qr_reference.clone(),
                qr_payload: worker
                    .qr_payload
                    .clone()
                    .unwrap_or_else(|| self.config.qr_payload(identifier)),
                verification_endpoint: worker
                    .verification_endpoint
                    .clone()
                    .unwrap_or_else(|| self.config.verification_endpoint(identifier)),
            }),
            _ => self.render(identifier).await,
        }
    }
}
