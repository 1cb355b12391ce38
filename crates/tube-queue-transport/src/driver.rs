use crate::{BlockingAdapter, BlockingDriver, Transport};
use std::any::Any;
use std::sync::Arc;

/// A client handle chosen at construction time.
///
/// Both variants end up as one [`Transport`] via [`Driver::into_transport`],
/// so code issuing calls never needs to know which kind it was given.
#[derive(Clone)]
pub enum Driver {
    /// Native async transport
    Transport(Arc<dyn Transport>),
    /// Legacy synchronous driver, adapted on the blocking pool
    Blocking(Arc<dyn BlockingDriver>),
}

impl Driver {
    pub fn transport<T: Transport + 'static>(transport: T) -> Self {
        Driver::Transport(Arc::new(transport))
    }

    pub fn blocking<D: BlockingDriver>(driver: D) -> Self {
        Driver::Blocking(Arc::new(driver))
    }

    /// Pick a driver out of a dynamically typed client object.
    ///
    /// Accepts `Arc<dyn Transport>` or `Arc<dyn BlockingDriver>`. Anything
    /// else is handed back unchanged in the `Err` variant.
    pub fn from_any(
        client: Box<dyn Any + Send + Sync>,
    ) -> Result<Self, Box<dyn Any + Send + Sync>> {
        let client = match client.downcast::<Arc<dyn Transport>>() {
            Ok(transport) => return Ok(Driver::Transport(*transport)),
            Err(other) => other,
        };

        match client.downcast::<Arc<dyn BlockingDriver>>() {
            Ok(driver) => Ok(Driver::Blocking(*driver)),
            Err(other) => Err(other),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Driver::Transport(_) => "transport",
            Driver::Blocking(_) => "blocking",
        }
    }

    pub fn into_transport(self) -> Arc<dyn Transport> {
        match self {
            Driver::Transport(transport) => transport,
            Driver::Blocking(driver) => Arc::new(BlockingAdapter::new(driver)),
        }
    }
}

impl From<Arc<dyn Transport>> for Driver {
    fn from(transport: Arc<dyn Transport>) -> Self {
        Driver::Transport(transport)
    }
}

impl From<Arc<dyn BlockingDriver>> for Driver {
    fn from(driver: Arc<dyn BlockingDriver>) -> Self {
        Driver::Blocking(driver)
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Driver").field(&self.kind()).finish()
    }
}
