use async_trait::async_trait;
use smartsearch::api::SmartSearchApi;
use smartsearch::error::{ErrorClass, Result, SmartSearchError};
use smartsearch::model::{
    AllConfig, Filter, FilterKind, MostActiveConfig, Operation, TargetRef, TargetSpecification,
};
use smartsearch::session::Selection;
use smartsearch::store::fs::FileTargetStore;
use smartsearch::store::memory::InMemoryTargetStore;
use smartsearch::store::TargetStore;
use std::sync::atomic::{AtomicBool, Ordering};

/// Wraps the in-memory store and rejects saves while `offline` is set.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryTargetStore,
    offline: AtomicBool,
}

#[async_trait]
impl TargetStore for FlakyStore {
    async fn load(&self, target: &TargetRef) -> Result<TargetSpecification> {
        self.inner.load(target).await
    }

    async fn save(&self, target: &TargetRef, spec: &TargetSpecification) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SmartSearchError::Store("backend unreachable".into()));
        }
        self.inner.save(target, spec).await
    }
}

fn all() -> Filter {
    Filter::new(Operation::Add, AllConfig {})
}

fn most_active(days: u32, count: u32) -> Filter {
    Filter::new(Operation::Add, MostActiveConfig { days, count })
}

const TASK: TargetRef = TargetRef {
    org_id: 1,
    owner: smartsearch::model::TargetOwner::Task,
    owner_id: 12,
};

#[tokio::test]
async fn add_most_active_after_all() {
    let store = InMemoryTargetStore::new()
        .with_target(TASK, TargetSpecification::new(vec![all()]));
    let api = SmartSearchApi::new(store);

    let mut session = api.open_session(TASK).await.unwrap();
    session.select_kind(FilterKind::MostActive).unwrap();
    session.submit_editing(most_active(30, 50)).unwrap();
    assert_eq!(session.filters().len(), 2);

    let saved = api.save_session(&mut session).await.unwrap();
    assert_eq!(
        saved.to_json().unwrap(),
        r#"[{"type":"all","op":"add","config":{}},{"type":"most_active","op":"add","config":{"days":30,"count":50}}]"#
    );
    assert_eq!(api.store().stored(&TASK), Some(saved));
}

#[tokio::test]
async fn untouched_session_saves_what_it_loaded() {
    let spec = TargetSpecification::from_json(
        r#"[{"type":"person_tags","op":"add","config":{"condition":"any","tags":[3,4],"min_matching":1}},{"type":"random","op":"limit","config":{"size":100}}]"#,
    )
    .unwrap();
    let api = SmartSearchApi::new(InMemoryTargetStore::new().with_target(TASK, spec.clone()));

    let mut session = api.open_session(TASK).await.unwrap();
    assert!(!session.has_changes());
    assert_eq!(api.save_session(&mut session).await.unwrap(), spec);
}

#[tokio::test]
async fn failed_save_keeps_edits_for_retry() {
    let api = SmartSearchApi::new(FlakyStore::default());
    let mut session = api.open_session(TASK).await.unwrap();
    session.select_kind(FilterKind::All).unwrap();
    session.submit_editing(all()).unwrap();

    api.store().offline.store(true, Ordering::SeqCst);
    let err = api.save_session(&mut session).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Persistence);
    assert!(!session.is_closed());
    assert_eq!(session.filters().len(), 1);
    assert!(api.store().inner.stored(&TASK).is_none());

    api.store().offline.store(false, Ordering::SeqCst);
    let saved = api.save_session(&mut session).await.unwrap();
    assert_eq!(saved, TargetSpecification::new(vec![all()]));
    assert!(session.is_closed());
}

#[tokio::test]
async fn closed_session_rejects_everything() {
    let api = SmartSearchApi::new(InMemoryTargetStore::new());
    let mut session = api.open_session(TASK).await.unwrap();
    api.save_session(&mut session).await.unwrap();

    assert!(matches!(
        session.select_kind(FilterKind::All),
        Err(SmartSearchError::SessionClosed)
    ));
    assert!(matches!(
        api.save_session(&mut session).await,
        Err(SmartSearchError::SessionClosed)
    ));
}

#[tokio::test]
async fn save_is_rejected_while_drafting() {
    let api = SmartSearchApi::new(InMemoryTargetStore::new());
    let mut session = api.open_session(TASK).await.unwrap();
    session.select_kind(FilterKind::Random).unwrap();

    let err = api.save_session(&mut session).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Precondition);
    assert!(api.store().stored(&TASK).is_none());
    assert!(matches!(session.selection(), Selection::Drafting { .. }));
}

#[tokio::test]
async fn discarded_session_stores_nothing() {
    let api = SmartSearchApi::new(
        InMemoryTargetStore::new().with_target(TASK, TargetSpecification::new(vec![all()])),
    );
    let mut session = api.open_session(TASK).await.unwrap();
    let id = session.filters()[0].id();
    session.delete_filter(id).unwrap();
    session.close();

    assert_eq!(api.load(&TASK).await.unwrap().len(), 1);
}

#[tokio::test]
async fn each_session_gets_its_own_list() {
    let api = SmartSearchApi::new(
        InMemoryTargetStore::new().with_target(TASK, TargetSpecification::new(vec![all()])),
    );
    let mut first = api.open_session(TASK).await.unwrap();
    let second = api.open_session(TASK).await.unwrap();

    let id = first.filters()[0].id();
    first.delete_filter(id).unwrap();
    assert_eq!(second.filters().len(), 1);
}

#[tokio::test]
async fn file_store_full_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let api = SmartSearchApi::new(FileTargetStore::new(dir.path()));
    let target = TargetRef::campaign(3, 5);

    let mut session = api.open_session(target).await.unwrap();
    assert!(session.filters().is_empty());
    session.select_kind(FilterKind::All).unwrap();
    session.submit_editing(all()).unwrap();
    session.select_kind(FilterKind::MostActive).unwrap();
    session.submit_editing(most_active(60, 25)).unwrap();
    api.save_session(&mut session).await.unwrap();

    let mut session = api.open_session(target).await.unwrap();
    let first = session.filters()[0].id();
    session.select_existing(first).unwrap();
    session
        .submit_editing(Filter::new(Operation::Sub, AllConfig {}))
        .unwrap();
    api.save_session(&mut session).await.unwrap();

    let stored = api.load(&target).await.unwrap();
    assert_eq!(
        stored,
        TargetSpecification::new(vec![
            Filter::new(Operation::Sub, AllConfig {}),
            most_active(60, 25),
        ])
    );
}
