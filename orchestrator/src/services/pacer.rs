//! Fixed inter-item delay

use std::time::Duration;

use async_trait::async_trait;

use crate::traits::Pacer;

/// Real [`Pacer`] sleeping on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct RealPacer;

#[async_trait]
impl Pacer for RealPacer {
    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
