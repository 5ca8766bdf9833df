//! # In-Process Gateway
//!
//! Plays the parent frame: answers requests through registered responders,
//! records every message the builder sends, and can push events back.

use crate::{EventName, Gateway, PushHandler, Registration, SyncError, SyncResult};
use async_trait::async_trait;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

type Responder = Rc<dyn Fn(Value) -> LocalBoxFuture<'static, SyncResult<Value>>>;

/// A message the builder sent to the parent
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub event: EventName,
    pub payload: Value,
}

#[derive(Default)]
struct Bus {
    responders: HashMap<EventName, Responder>,
    listeners: HashMap<EventName, Vec<(u64, PushHandler)>>,
    sent: Vec<SentMessage>,
    next_listener_id: u64,
}

#[derive(Clone, Default)]
pub struct MemoryGateway {
    bus: Rc<RefCell<Bus>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `event` with the future `responder` returns.
    pub fn respond<F, Fut>(&self, event: EventName, responder: F)
    where
        F: Fn(Value) -> Fut + 'static,
        Fut: Future<Output = SyncResult<Value>> + 'static,
    {
        let responder: Responder = Rc::new(move |payload| responder(payload).boxed_local());
        self.bus.borrow_mut().responders.insert(event, responder);
    }

    pub fn respond_with(&self, event: EventName, response: Value) {
        self.respond(event, move |_| future::ready(Ok(response.clone())));
    }

    pub fn fail_with(&self, event: EventName, error: SyncError) {
        self.respond(event, move |_| future::ready(Err(error.clone())));
    }

    /// Deliver a parent-initiated push; returns how many handlers ran.
    pub fn push(&self, event: EventName, payload: Value) -> usize {
        let handlers: Vec<PushHandler> = self
            .bus
            .borrow()
            .listeners
            .get(&event)
            .map(|listeners| listeners.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        for handler in &handlers {
            handler(payload.clone());
        }
        handlers.len()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.bus.borrow().sent.clone()
    }

    /// Payloads sent for one event, oldest first
    pub fn sent_for(&self, event: EventName) -> Vec<Value> {
        self.bus
            .borrow()
            .sent
            .iter()
            .filter(|m| m.event == event)
            .map(|m| m.payload.clone())
            .collect()
    }

    pub fn listener_count(&self, event: EventName) -> usize {
        self.bus
            .borrow()
            .listeners
            .get(&event)
            .map_or(0, Vec::len)
    }
}

#[async_trait(?Send)]
impl Gateway for MemoryGateway {
    async fn send(&self, event: EventName, payload: Value) -> SyncResult<Value> {
        let responder = {
            let mut bus = self.bus.borrow_mut();
            bus.sent.push(SentMessage {
                event,
                payload: payload.clone(),
            });
            bus.responders.get(&event).cloned()
        };

        match responder {
            Some(responder) => responder(payload).await,
            None => Ok(Value::Null),
        }
    }

    fn on(&self, event: EventName, handler: PushHandler) -> Registration {
        let id = {
            let mut bus = self.bus.borrow_mut();
            let id = bus.next_listener_id;
            bus.next_listener_id += 1;
            bus.listeners.entry(event).or_default().push((id, handler));
            id
        };

        let bus = Rc::downgrade(&self.bus);
        Registration::new(move || {
            if let Some(bus) = bus.upgrade() {
                if let Some(listeners) = bus.borrow_mut().listeners.get_mut(&event) {
                    listeners.retain(|(listener_id, _)| *listener_id != id);
                }
            }
        })
    }
}
