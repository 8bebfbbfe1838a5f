use super::TargetStore;
use crate::error::Result;
use crate::model::{TargetRef, TargetSpecification};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory target storage for testing and embedding.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryTargetStore {
    targets: RwLock<HashMap<TargetRef, TargetSpecification>>,
}

impl InMemoryTargetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a target, as if the backend already had it stored.
    pub fn with_target(self, target: TargetRef, spec: TargetSpecification) -> Self {
        self.targets.write().insert(target, spec);
        self
    }

    /// Stored specification, if any, without the empty-default of `load`.
    pub fn stored(&self, target: &TargetRef) -> Option<TargetSpecification> {
        self.targets.read().get(target).cloned()
    }
}

#[async_trait]
impl TargetStore for InMemoryTargetStore {
    async fn load(&self, target: &TargetRef) -> Result<TargetSpecification> {
        Ok(self.stored(target).unwrap_or_default())
    }

    async fn save(&self, target: &TargetRef, spec: &TargetSpecification) -> Result<()> {
        self.targets.write().insert(*target, spec.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AllConfig, Filter, Operation};

    #[tokio::test]
    async fn unknown_target_loads_empty() {
        let store = InMemoryTargetStore::new();
        let spec = store.load(&TargetRef::task(1, 1)).await.unwrap();
        assert!(spec.is_empty());
        assert!(store.stored(&TargetRef::task(1, 1)).is_none());
    }

    #[tokio::test]
    async fn save_replaces_per_target() {
        let store = InMemoryTargetStore::new();
        let task = TargetRef::task(1, 7);
        let campaign = TargetRef::campaign(1, 7);
        let spec = TargetSpecification::new(vec![Filter::new(Operation::Add, AllConfig {})]);

        store.save(&task, &spec).await.unwrap();
        assert_eq!(store.load(&task).await.unwrap(), spec);
        assert!(store.load(&campaign).await.unwrap().is_empty());

        store.save(&task, &TargetSpecification::default()).await.unwrap();
        assert!(store.load(&task).await.unwrap().is_empty());
    }
}
