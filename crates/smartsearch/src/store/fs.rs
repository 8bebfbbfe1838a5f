use super::TargetStore;
use crate::error::Result;
use crate::model::{TargetOwner, TargetRef, TargetSpecification};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// File-backed target storage.
///
/// ```text
/// {root}/
/// └── orgs/{org_id}/
///     ├── tasks/{task_id}.json
///     └── campaigns/{campaign_id}.json
/// ```
pub struct FileTargetStore {
    root: PathBuf,
    pretty: bool,
}

impl FileTargetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pretty: true,
        }
    }

    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn target_path(&self, target: &TargetRef) -> PathBuf {
        let owner_dir = match target.owner {
            TargetOwner::Task => "tasks",
            TargetOwner::Campaign => "campaigns",
        };
        self.root
            .join("orgs")
            .join(target.org_id.to_string())
            .join(owner_dir)
            .join(format!("{}.json", target.owner_id))
    }
}

#[async_trait]
impl TargetStore for FileTargetStore {
    async fn load(&self, target: &TargetRef) -> Result<TargetSpecification> {
        let path = self.target_path(target);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(target_ref = %target, path = %path.display(), "no stored target, starting empty");
                return Ok(TargetSpecification::default());
            }
            Err(e) => return Err(e.into()),
        };
        TargetSpecification::from_json(&content)
    }

    async fn save(&self, target: &TargetRef, spec: &TargetSpecification) -> Result<()> {
        let path = self.target_path(target);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = if self.pretty {
            spec.to_json_pretty()?
        } else {
            spec.to_json()?
        };

        // Readers see either the old file or the new one, never a partial write.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &path).await?;
        info!(target_ref = %target, filters = spec.len(), "saved target");
        Ok(())
    }
}
