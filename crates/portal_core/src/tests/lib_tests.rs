use super::*;

#[test]
fn default_settings_complete_in_fifteen_ticks() {
    let settings = UploadSettings::default();
    assert_eq!(settings.tick_interval, Duration::from_millis(160));
    assert_eq!(settings.increment, 7);
    assert_eq!(settings.ticks_to_complete(), 15);
}

#[test]
fn settings_clamp_out_of_range_values() {
    let settings = UploadSettings::new(Duration::ZERO, 0);
    assert_eq!(settings.tick_interval, Duration::from_millis(1));
    assert_eq!(settings.increment, 1);
    assert_eq!(settings.ticks_to_complete(), 100);

    let settings = UploadSettings::new(Duration::from_millis(50), 250);
    assert_eq!(settings.increment, 100);
    assert_eq!(settings.ticks_to_complete(), 1);
}

#[test]
fn staged_file_takes_size_from_content() {
    let file = StagedFile::new("hw.zip", vec![1_u8; 42]);
    assert_eq!(file.file_name, "hw.zip");
    assert_eq!(file.size_bytes, 42);
    assert_eq!(file.bytes.len(), 42);
}

#[tokio::test]
async fn store_is_usable_as_assignment_backend() {
    let store = AssignmentStore::seeded().expect("seed");
    let backend: Arc<dyn AssignmentBackend> = Arc::new(store.clone());
    let id = AssignmentId::new("math130-set-proofs-1");

    let record = backend.get_assignment(&id).await.expect("record");
    assert_eq!(record.title, "Set Proofs 1");

    let err = backend
        .get_assignment(&AssignmentId::new("unknown"))
        .await
        .expect_err("missing");
    assert!(matches!(err, StoreError::NotFound { .. }));
}
