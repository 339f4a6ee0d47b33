//! Job pipeline behaviour against mocked services

use serde_json::json;
use shared::{ItemId, OutputLayout};

use producer::{
    ItemOutcome, JobError, JobPipeline, JobStatus, MockArtifactStore, MockJobService, RealArtifactStore,
};

mod common;
use common::{fast_config, ticket, IMAGE_URL, PNG_BYTES};

/// Service that succeeds on every call
fn healthy_service() -> MockJobService {
    let mut service = MockJobService::new();
    service.expect_submit().returning(|_, _| Ok(ticket()));
    service.expect_poll().returning(|_| Ok(JobStatus::Completed));
    service
        .expect_fetch()
        .returning(|_| Ok(json!({"images": [{"url": IMAGE_URL}]})));
    service.expect_download().returning(|_| Ok(PNG_BYTES.to_vec()));
    service
}

#[tokio::test]
async fn test_success_persists_image() {
    let dir = tempfile::tempdir().unwrap();
    let store = RealArtifactStore::new(OutputLayout::new(dir.path()));
    let pipeline = JobPipeline::new(healthy_service(), store, fast_config());

    let outcome = pipeline.process(ItemId::new(1), "Chibi agent", false).await;

    assert_eq!(outcome, ItemOutcome::Completed { attempts: 1 });
    let saved = std::fs::read(dir.path().join("images/0001.png")).unwrap();
    assert_eq!(saved, PNG_BYTES);
}

#[tokio::test]
async fn test_resume_makes_no_service_calls() {
    let dir = tempfile::tempdir().unwrap();

    let first = JobPipeline::new(
        healthy_service(),
        RealArtifactStore::new(OutputLayout::new(dir.path())),
        fast_config(),
    );
    assert!(first.process(ItemId::new(1), "Chibi agent", false).await.is_success());

    // No expectations: any call on this service panics
    let second = JobPipeline::new(
        MockJobService::new(),
        RealArtifactStore::new(OutputLayout::new(dir.path())),
        fast_config(),
    );
    let outcome = second.process(ItemId::new(1), "Chibi agent", false).await;
    assert_eq!(outcome, ItemOutcome::AlreadyComplete);
}

#[tokio::test]
async fn test_force_bypasses_resume_check() {
    let mut store = MockArtifactStore::new();
    store.expect_is_complete().never();
    store.expect_persist().times(1).returning(|_, _| Ok(()));

    let pipeline = JobPipeline::new(healthy_service(), store, fast_config());
    let outcome = pipeline.process(ItemId::new(9), "Chibi agent", true).await;
    assert_eq!(outcome, ItemOutcome::Completed { attempts: 1 });
}

#[tokio::test]
async fn test_always_failed_service_uses_exactly_max_attempts() {
    let mut service = MockJobService::new();
    service.expect_submit().times(3).returning(|_, _| Ok(ticket()));
    service.expect_poll().times(3).returning(|_| {
        Ok(JobStatus::Failed {
            message: "content policy".to_string(),
        })
    });
    service.expect_fetch().never();
    service.expect_download().never();

    let mut store = MockArtifactStore::new();
    store.expect_is_complete().returning(|_| false);
    store.expect_persist().never();

    let pipeline = JobPipeline::new(service, store, fast_config());
    let outcome = pipeline.process(ItemId::new(3), "Chibi agent", false).await;

    match outcome {
        ItemOutcome::Failed { attempts, last_error } => {
            assert_eq!(attempts, 3);
            assert!(last_error.contains("content policy"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_poll_budget_ends_in_timeout() {
    let mut service = MockJobService::new();
    service.expect_submit().times(2).returning(|_, _| Ok(ticket()));
    service.expect_poll().times(8).returning(|_| Ok(JobStatus::InProgress));

    let mut store = MockArtifactStore::new();
    store.expect_is_complete().returning(|_| false);

    let config = fast_config().with_max_polls(4).with_max_attempts(2);
    let pipeline = JobPipeline::new(service, store, config);
    let outcome = pipeline.process(ItemId::new(5), "Chibi agent", false).await;

    assert_eq!(
        outcome,
        ItemOutcome::Failed {
            attempts: 2,
            last_error: JobError::RemoteTimeout { polls: 4 }.to_string(),
        }
    );
}

#[tokio::test]
async fn test_rejected_credential_is_retried_up_to_ceiling() {
    let mut service = MockJobService::new();
    service
        .expect_submit()
        .times(3)
        .returning(|_, _| Err(JobError::Unauthorized { status: 401 }));

    let mut store = MockArtifactStore::new();
    store.expect_is_complete().returning(|_| false);

    let pipeline = JobPipeline::new(service, store, fast_config());
    let outcome = pipeline.process(ItemId::new(2), "Chibi agent", false).await;
    assert_eq!(
        outcome,
        ItemOutcome::Failed {
            attempts: 3,
            last_error: JobError::Unauthorized { status: 401 }.to_string(),
        }
    );
}

#[tokio::test]
async fn test_cancelled_job_is_retried_then_failed() {
    let mut service = MockJobService::new();
    service.expect_submit().times(2).returning(|_, _| Ok(ticket()));
    service.expect_poll().times(2).returning(|_| {
        Ok(JobStatus::Cancelled {
            message: "cancelled by operator".to_string(),
        })
    });
    service.expect_fetch().never();

    let mut store = MockArtifactStore::new();
    store.expect_is_complete().returning(|_| false);
    store.expect_persist().never();

    let pipeline = JobPipeline::new(service, store, fast_config().with_max_attempts(2));
    let outcome = pipeline.process(ItemId::new(6), "Chibi agent", false).await;

    assert_eq!(
        outcome,
        ItemOutcome::Failed {
            attempts: 2,
            last_error: "Remote job CANCELLED: cancelled by operator".to_string(),
        }
    );
}

#[tokio::test]
async fn test_poll_transport_error_resubmits() {
    let mut service = MockJobService::new();
    service.expect_submit().times(2).returning(|_, _| Ok(ticket()));
    let mut polls = 0;
    service.expect_poll().times(2).returning(move |_| {
        polls += 1;
        if polls == 1 {
            Err(JobError::transport("connection reset"))
        } else {
            Ok(JobStatus::Completed)
        }
    });
    service
        .expect_fetch()
        .times(1)
        .returning(|_| Ok(json!({"images": [IMAGE_URL]})));
    service.expect_download().times(1).returning(|_| Ok(PNG_BYTES.to_vec()));

    let dir = tempfile::tempdir().unwrap();
    let store = RealArtifactStore::new(OutputLayout::new(dir.path()));
    let pipeline = JobPipeline::new(service, store, fast_config());

    let outcome = pipeline.process(ItemId::new(8), "Chibi agent", false).await;
    assert_eq!(outcome, ItemOutcome::Completed { attempts: 2 });
    assert_eq!(std::fs::read(dir.path().join("images/0008.png")).unwrap(), PNG_BYTES);
}

#[tokio::test]
async fn test_recovers_after_bad_payload() {
    let mut service = MockJobService::new();
    service.expect_submit().times(2).returning(|_, _| Ok(ticket()));
    service.expect_poll().returning(|_| Ok(JobStatus::Completed));
    let mut fetches = 0;
    service.expect_fetch().times(2).returning(move |_| {
        fetches += 1;
        if fetches == 1 {
            Ok(json!({"status": "ok"}))
        } else {
            Ok(json!({"data": {"images": [IMAGE_URL]}}))
        }
    });
    service.expect_download().times(1).returning(|_| Ok(PNG_BYTES.to_vec()));

    let dir = tempfile::tempdir().unwrap();
    let store = RealArtifactStore::new(OutputLayout::new(dir.path()));
    let pipeline = JobPipeline::new(service, store, fast_config());

    let outcome = pipeline.process(ItemId::new(11), "Chibi agent", false).await;
    assert_eq!(outcome, ItemOutcome::Completed { attempts: 2 });
}

#[tokio::test]
async fn test_failed_download_leaves_no_artifact() {
    let mut service = MockJobService::new();
    service.expect_submit().returning(|_, _| Ok(ticket()));
    service.expect_poll().returning(|_| Ok(JobStatus::Completed));
    service
        .expect_fetch()
        .returning(|_| Ok(json!({"images": [IMAGE_URL]})));
    service
        .expect_download()
        .times(3)
        .returning(|_| Err(JobError::download("empty body")));

    let dir = tempfile::tempdir().unwrap();
    let store = RealArtifactStore::new(OutputLayout::new(dir.path()));
    let pipeline = JobPipeline::new(service, store, fast_config());

    let outcome = pipeline.process(ItemId::new(4), "Chibi agent", false).await;
    assert!(!outcome.is_success());
    assert!(!dir.path().join("images/0004.png").exists());
}
