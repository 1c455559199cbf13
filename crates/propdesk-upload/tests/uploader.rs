use propdesk_upload::test_helpers::{folder, selected, TestStores};
use propdesk_upload::{BatchReport, UploadAttempt, UploadCompleteCallback, UploadError, UploadRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

fn counting_callback() -> (UploadCompleteCallback, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let callback: UploadCompleteCallback = Arc::new(move |_report: &BatchReport| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (callback, calls)
}

#[tokio::test]
async fn empty_selection_only_notifies() {
    let stores = TestStores::new();
    let (callback, calls) = counting_callback();
    let uploader = stores.uploader().with_on_upload_complete(callback);

    let attempt = uploader.upload_files(&UploadRequest::default()).await;

    assert!(matches!(attempt, UploadAttempt::NothingSelected));
    assert_eq!(
        stores.notifier.errors(),
        vec!["Please select files to upload".to_string()]
    );
    assert_eq!(stores.storage.upload_attempts(), 0);
    assert_eq!(stores.records.insert_attempts(), 0);
    assert_eq!(stores.folders.lookup_count(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!uploader.is_uploading());
}

#[tokio::test]
async fn completed_batch_calls_back_once_and_clears_selection() {
    let stores = TestStores::new();
    let (callback, calls) = counting_callback();
    let uploader = stores.uploader().with_on_upload_complete(callback);
    stores.storage.fail_on("b.txt");

    uploader.select_files(vec![
        selected("a.txt", "text/plain"),
        selected("b.txt", "text/plain"),
    ]);
    let attempt = uploader.upload_files(&UploadRequest::default()).await;

    let UploadAttempt::Completed(report) = attempt else {
        panic!("expected a completed batch");
    };
    assert_eq!(report.succeeded_count(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(uploader.selected().is_empty());
    assert!(!uploader.is_uploading());
}

#[tokio::test]
async fn files_selected_during_a_batch_survive_its_completion() {
    let stores = TestStores::new();
    let uploader = stores.uploader();
    uploader.select_files(vec![selected("a.txt", "text/plain")]);

    let request = UploadRequest::default();
    let (attempt, ()) = tokio::join!(uploader.upload_files(&request), async {
        tokio::task::yield_now().await;
        uploader.select_files(vec![selected("next.txt", "text/plain")]);
    });

    let UploadAttempt::Completed(report) = attempt else {
        panic!("expected a completed batch");
    };
    let uploaded: Vec<_> = report
        .uploaded()
        .map(|record| record.original_filename.as_str())
        .collect();
    assert_eq!(uploaded, vec!["a.txt"]);

    let remaining = uploader.selected();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "next.txt");

    // The kept selection uploads on the next trigger
    let UploadAttempt::Completed(report) = uploader.upload_files(&UploadRequest::default()).await
    else {
        panic!("expected a completed batch");
    };
    assert_eq!(report.uploaded().next().unwrap().original_filename, "next.txt");
    assert!(uploader.selected().is_empty());
}

#[tokio::test]
async fn aborted_batch_does_not_overwrite_a_newer_selection() {
    let stores = TestStores::new();
    let uploader = stores.uploader();
    stores.folders.fail_lookups();
    uploader.select_files(vec![selected("a.txt", "text/plain")]);

    let request = UploadRequest {
        folder_id: Some(Uuid::new_v4()),
        ..UploadRequest::default()
    };
    let (attempt, ()) = tokio::join!(uploader.upload_files(&request), async {
        uploader.select_files(vec![selected("newer.txt", "text/plain")]);
    });

    assert!(matches!(attempt, UploadAttempt::Aborted(_)));
    let remaining = uploader.selected();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "newer.txt");
}

#[tokio::test]
async fn folder_failure_releases_flag_and_keeps_selection() {
    let stores = TestStores::new();
    let (callback, calls) = counting_callback();
    let uploader = stores.uploader().with_on_upload_complete(callback);
    stores.folders.fail_lookups();

    uploader.select_files(vec![selected("a.txt", "text/plain")]);
    let request = UploadRequest {
        folder_id: Some(Uuid::new_v4()),
        ..UploadRequest::default()
    };
    let attempt = uploader.upload_files(&request).await;

    assert!(matches!(
        attempt,
        UploadAttempt::Aborted(UploadError::FolderLookup(_))
    ));
    assert_eq!(stores.notifier.errors().len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(uploader.selected().len(), 1);
    assert!(!uploader.is_uploading());
}

#[tokio::test]
async fn panic_inside_batch_is_reported_and_flag_released() {
    let stores = TestStores::new();
    let uploader = stores.uploader();
    stores.storage.panic_on("boom.txt");

    uploader.select_files(vec![
        selected("ok.txt", "text/plain"),
        selected("boom.txt", "text/plain"),
    ]);
    let attempt = uploader.upload_files(&UploadRequest::default()).await;

    assert!(matches!(
        attempt,
        UploadAttempt::Aborted(UploadError::Unexpected(_))
    ));
    assert!(stores
        .notifier
        .errors()
        .contains(&"Upload failed".to_string()));
    assert_eq!(uploader.selected().len(), 2);
    assert!(!uploader.is_uploading());

    // The trigger is usable again afterwards
    let stores_ok = TestStores::new();
    let uploader = stores_ok.uploader();
    uploader.select_files(vec![selected("ok.txt", "text/plain")]);
    assert!(matches!(
        uploader.upload_files(&UploadRequest::default()).await,
        UploadAttempt::Completed(_)
    ));
}

#[tokio::test]
async fn second_trigger_while_in_flight_is_ignored() {
    let stores = TestStores::new();
    let harbour = folder("properties/harbour-view");
    stores.folders.add_folder(harbour.clone());
    let uploader = stores.uploader();
    uploader.select_files(vec![
        selected("a.txt", "text/plain"),
        selected("b.txt", "text/plain"),
    ]);

    let request = UploadRequest {
        folder_id: Some(harbour.id),
        ..UploadRequest::default()
    };
    let (first, second) = tokio::join!(
        uploader.upload_files(&request),
        uploader.upload_files(&request)
    );

    assert!(matches!(first, UploadAttempt::Completed(_)));
    assert!(matches!(second, UploadAttempt::AlreadyUploading));
    assert_eq!(stores.records.records().len(), 2);
    assert_eq!(stores.folders.lookup_count(), 1);
    assert!(!uploader.is_uploading());
}

#[tokio::test]
async fn flag_is_idle_after_every_kind_of_batch() {
    let stores = TestStores::new();
    let uploader = stores.uploader();
    stores.storage.fail_on("a.txt");
    stores.storage.fail_on("b.txt");

    uploader.select_files(vec![
        selected("a.txt", "text/plain"),
        selected("b.txt", "text/plain"),
    ]);
    let attempt = uploader.upload_files(&UploadRequest::default()).await;

    let UploadAttempt::Completed(report) = attempt else {
        panic!("expected a completed batch");
    };
    assert_eq!(report.failed_count(), 2);
    assert!(stores.records.records().is_empty());
    assert!(!uploader.is_uploading());
}
