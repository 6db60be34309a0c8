use std::sync::Arc;

use services::AppServices;
use storage::{InMemoryStore, KeyValueStore, PROGRESS_KEY, Storage};
use study_core::exam::ExamSettings;
use study_core::model::{ContentBundle, ProgressRecord, WeekId};
use study_core::time::fixed_clock;

#[tokio::test]
async fn app_starts_over_an_unreadable_progress_record() {
    let kv = Arc::new(InMemoryStore::new());
    kv.set(PROGRESS_KEY, "{not json").await.unwrap();
    let storage = Storage { kv };

    let app = AppServices::with_storage(
        &storage,
        ContentBundle::default(),
        fixed_clock(),
        ExamSettings::default(),
    )
    .await
    .unwrap();

    assert_eq!(app.progress().load().await.unwrap(), ProgressRecord::for_course());
    let rows = app.progress().overview(&app.content()).await.unwrap();
    assert_eq!(rows.len(), 10);

    let week = WeekId::new(2).unwrap();
    app.progress().record_quiz(week, 50).await.unwrap();
    app.progress().reset().await.unwrap();
    assert!(app.progress().initialize().await.unwrap());
}
