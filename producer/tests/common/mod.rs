//! Shared fixtures for job pipeline tests

use std::time::Duration;

use producer::{PipelineConfig, QueueTicket};

/// Pipeline configuration with every delay shrunk to zero
pub fn fast_config() -> PipelineConfig {
    PipelineConfig::default()
        .with_poll_interval(Duration::ZERO)
        .with_backoff_unit(Duration::ZERO)
        .with_max_polls(5)
}

pub fn ticket() -> QueueTicket {
    QueueTicket {
        request_id: Some("req-1".to_string()),
        status_url: "https://queue.test/requests/req-1/status".to_string(),
        response_url: "https://queue.test/requests/req-1".to_string(),
    }
}

pub const IMAGE_URL: &str = "https://cdn.test/0001.png";
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake";
