//! Filesystem media store
//!
//! Files live under the upload directory and are referenced as
//! `uploads/{kind}/{file}`, which is also their URL path below `/uploads`.

use std::path::{Component, Path, PathBuf};

use kernel::id::WorkerId;
use uuid::Uuid;

use crate::domain::gateway::MediaStore;
use crate::domain::value_object::worker_identifier::WorkerIdentifier;
use crate::error::{WorkforceError, WorkforceResult};

const REFERENCE_ROOT: &str = "uploads";
const SELFIE_DIR: &str = "selfies";
const QR_DIR: &str = "qrcodes";

#[derive(Debug, Clone)]
pub struct FsMediaStore {
    root: PathBuf,
}

impl FsMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write(&self, dir: &str, file_name: &str, bytes: &[u8]) -> WorkforceResult<String> {
        let dir_path = self.root.join(dir);
        tokio::fs::create_dir_all(&dir_path)
            .await
            .map_err(|e| WorkforceError::Storage(format!("create {}: {e}", dir_path.display())))?;

        let path = dir_path.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| WorkforceError::Storage(format!("write {}: {e}", path.display())))?;

        Ok(format!("{REFERENCE_ROOT}/{dir}/{file_name}"))
    }

    /// Path of a reference, refusing anything that escapes the root
    fn resolve(&self, reference: &str) -> WorkforceResult<PathBuf> {
        let relative = reference
            .trim_start_matches('/')
            .strip_prefix(REFERENCE_ROOT)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(reference);
        let relative = Path::new(relative);

        if relative.as_os_str().is_empty()
            || !relative.components().all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(WorkforceError::Storage(format!(
                "invalid media reference: {reference}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl MediaStore for FsMediaStore {
    async fn save_selfie(&self, worker_id: &WorkerId, image: &[u8]) -> WorkforceResult<String> {
        let suffix = Uuid::new_v4().simple().to_string();
        let file_name = format!("worker_{worker_id}_{}.jpg", &suffix[..8]);
        self.write(SELFIE_DIR, &file_name, image).await
    }

    fn qr_reference(&self, identifier: &WorkerIdentifier) -> String {
        format!("{REFERENCE_ROOT}/{QR_DIR}/{identifier}.png")
    }

    async fn save_qr(&self, identifier: &WorkerIdentifier, png: &[u8]) -> WorkforceResult<String> {
        let file_name = format!("{identifier}.png");
        self.write(QR_DIR, &file_name, png).await
    }

    async fn load(&self, reference: &str) -> WorkforceResult<Vec<u8>> {
        let path = self.resolve(reference)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| WorkforceError::Storage(format!("read {}: {e}", path.display())))
    }
}
