use crate::{Result, Transport, TransportError, Tuple};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Older synchronous driver API.
///
/// Implementations block the calling thread until the server replies.
pub trait BlockingDriver: Send + Sync + 'static {
    fn call(&self, function: &str, args: Tuple) -> Result<Tuple>;
}

/// Exposes a [`BlockingDriver`] as an async [`Transport`].
///
/// Each call runs on tokio's blocking pool so the driver never stalls the
/// async executor.
pub struct BlockingAdapter<D: BlockingDriver + ?Sized> {
    driver: Arc<D>,
}

impl<D: BlockingDriver + ?Sized> BlockingAdapter<D> {
    pub fn new(driver: Arc<D>) -> Self {
        BlockingAdapter { driver }
    }

    pub fn driver(&self) -> &Arc<D> {
        &self.driver
    }
}

impl<D: BlockingDriver> From<D> for BlockingAdapter<D> {
    fn from(driver: D) -> Self {
        BlockingAdapter::new(Arc::new(driver))
    }
}

#[async_trait]
impl<D: BlockingDriver + ?Sized> Transport for BlockingAdapter<D> {
    async fn call(&self, method: &str, args: Tuple) -> Result<Tuple> {
        debug!(method, "forwarding call to blocking driver");

        let driver = Arc::clone(&self.driver);
        let method = method.to_owned();

        tokio::task::spawn_blocking(move || driver.call(&method, args))
            .await
            .map_err(|e| TransportError::ConnectionError(format!("Blocking driver call failed: {}", e)))?
    }
}
