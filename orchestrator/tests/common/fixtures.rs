//! Test fixtures: collections and canned service behaviour

use std::time::Duration;

use orchestrator::{CollectionEntry, CollectionIndex};
use producer::{JobStatus, MockJobService, PipelineConfig, QueueTicket};
use serde_json::json;
use shared::ItemId;

pub struct TestFixtures;

impl TestFixtures {
    pub const PNG_BYTES: &'static [u8] = b"\x89PNG fixture";

    /// Collection with entries for ids `1..=count`
    pub fn collection(count: u32) -> CollectionIndex {
        CollectionIndex::from_entries((1..=count).map(|id| CollectionEntry {
            token_id: ItemId::new(id),
            prompt: format!("prompt for agent {id}"),
            rarity: Some("Common".to_string()),
        }))
    }

    pub fn fast_config() -> PipelineConfig {
        PipelineConfig::default()
            .with_poll_interval(Duration::ZERO)
            .with_backoff_unit(Duration::ZERO)
            .with_max_polls(3)
    }

    fn ticket() -> QueueTicket {
        QueueTicket {
            request_id: Some("req".to_string()),
            status_url: "https://queue.test/status".to_string(),
            response_url: "https://queue.test/response".to_string(),
        }
    }

    /// Service completing every job; submissions must total `submissions`
    pub fn healthy_service(submissions: usize) -> MockJobService {
        let mut service = MockJobService::new();
        service
            .expect_submit()
            .times(submissions)
            .returning(|_, _| Ok(Self::ticket()));
        service.expect_poll().returning(|_| Ok(JobStatus::Completed));
        service
            .expect_fetch()
            .returning(|_| Ok(json!({"images": [{"url": "https://cdn.test/img.png"}]})));
        service
            .expect_download()
            .returning(|_| Ok(Self::PNG_BYTES.to_vec()));
        service
    }

    /// Service whose jobs fail for the agents listed in `failing`
    pub fn service_failing_for(failing: &'static [u32]) -> MockJobService {
        let mut service = MockJobService::new();
        service.expect_submit().returning(|prompt, _| {
            let mut ticket = Self::ticket();
            ticket.status_url = format!("https://queue.test/status?for={prompt}");
            Ok(ticket)
        });
        service.expect_poll().returning(move |status_url| {
            let failed = failing
                .iter()
                .any(|id| status_url.ends_with(&format!("prompt for agent {id}")));
            if failed {
                Ok(JobStatus::Failed {
                    message: "content policy".to_string(),
                })
            } else {
                Ok(JobStatus::Completed)
            }
        });
        service
            .expect_fetch()
            .returning(|_| Ok(json!({"images": ["https://cdn.test/img.png"]})));
        service
            .expect_download()
            .returning(|_| Ok(Self::PNG_BYTES.to_vec()));
        service
    }
}
