//! Builder for run orchestrators over mocked services and a temp directory

use std::time::Duration;

use orchestrator::{CollectionIndex, MockPacer, RunOrchestrator};
use producer::{JobPipeline, MockJobService, RealArtifactStore};
use shared::{ItemId, OutputLayout};
use tempfile::TempDir;

use super::fixtures::TestFixtures;

pub struct RunBuilder {
    dir: TempDir,
    collection: CollectionIndex,
    service: MockJobService,
    pacer: MockPacer,
    delay: Duration,
}

impl RunBuilder {
    pub fn new(service: MockJobService) -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            collection: TestFixtures::collection(5),
            service,
            pacer: MockPacer::new(),
            delay: Duration::from_secs(1),
        }
    }

    pub fn with_collection(mut self, collection: CollectionIndex) -> Self {
        self.collection = collection;
        self
    }

    /// Expect exactly `pauses` inter-item pauses of the configured delay
    pub fn expect_pauses(mut self, pauses: usize) -> Self {
        let delay = self.delay;
        self.pacer
            .expect_pause()
            .withf(move |d| *d == delay)
            .times(pauses)
            .returning(|_| ());
        self
    }

    /// Place an existing image for `id`
    pub fn with_existing_image(self, id: u32) -> Self {
        let layout = OutputLayout::new(self.dir.path());
        std::fs::create_dir_all(layout.images_dir()).unwrap();
        std::fs::write(layout.image_path(ItemId::new(id)), b"old image").unwrap();
        self
    }

    pub fn build(self) -> (RunOrchestrator<MockJobService, RealArtifactStore, MockPacer>, TempDir) {
        let store = RealArtifactStore::new(OutputLayout::new(self.dir.path()));
        let pipeline = JobPipeline::new(self.service, store, TestFixtures::fast_config().with_max_attempts(1));
        (RunOrchestrator::new(pipeline, self.collection, self.pacer, self.delay), self.dir)
    }
}
