use crate::{EventName, SyncResult};
use async_trait::async_trait;
use serde_json::Value;
use std::rc::Rc;

/// Handler for a parent-initiated push
pub type PushHandler = Rc<dyn Fn(Value)>;

/// Request/response channel to the parent frame.
///
/// The browser main thread is single-threaded, so neither the gateway nor its
/// futures are `Send`.
#[async_trait(?Send)]
pub trait Gateway {
    /// Send a request and wait for the parent's reply payload.
    ///
    /// May never resolve if the parent goes away.
    async fn send(&self, event: EventName, payload: Value) -> SyncResult<Value>;

    /// Listen for pushes from the parent.
    fn on(&self, event: EventName, handler: PushHandler) -> Registration;
}

/// Handle returned by [`Gateway::on`]
#[must_use = "dropping a Registration leaves the handler installed"]
pub struct Registration {
    unregister: Option<Box<dyn FnOnce()>>,
}

impl Registration {
    pub fn new(unregister: impl FnOnce() + 'static) -> Self {
        Self {
            unregister: Some(Box::new(unregister)),
        }
    }

    /// A registration with nothing to undo
    pub fn noop() -> Self {
        Self { unregister: None }
    }

    pub fn unregister(mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("active", &self.unregister.is_some())
            .finish()
    }
}
