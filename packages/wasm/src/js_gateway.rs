//! [`Gateway`] backed by a host-provided JS object.
//!
//! The host passes anything shaped like
//! `{ send(event, payload) -> Promise, on(event, handler) -> { unregister() } }`.
//! Payloads cross the boundary as JSON.

use async_trait::async_trait;
use serde_json::Value;
use visual_builder_sync::{EventName, Gateway, PushHandler, Registration, SyncError, SyncResult};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    pub type JsGateway;

    #[wasm_bindgen(method, catch)]
    fn send(this: &JsGateway, event: &str, payload: JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn on(this: &JsGateway, event: &str, handler: &js_sys::Function) -> Result<JsValue, JsValue>;
}

pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|error| String::from(error.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

pub(crate) fn to_js(value: &Value) -> Result<JsValue, String> {
    let json = serde_json::to_string(value).map_err(|e| e.to_string())?;
    js_sys::JSON::parse(&json).map_err(|e| describe(&e))
}

pub(crate) fn from_js(value: &JsValue) -> Result<Value, String> {
    if value.is_undefined() || value.is_null() {
        return Ok(Value::Null);
    }
    let json = js_sys::JSON::stringify(value).map_err(|e| describe(&e))?;
    let json = json.as_string().ok_or_else(|| "Payload is not JSON".to_string())?;
    serde_json::from_str(&json).map_err(|e| e.to_string())
}

pub struct BrowserGateway {
    host: JsGateway,
}

impl BrowserGateway {
    pub fn new(host: JsGateway) -> Self {
        Self { host }
    }
}

fn unregister(registration: &JsValue) {
    let unregister = js_sys::Reflect::get(registration, &JsValue::from_str("unregister"))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
    match unregister {
        Some(unregister) => {
            if let Err(error) = unregister.call0(registration) {
                tracing::warn!("Host unregister failed: {}", describe(&error));
            }
        }
        None => tracing::warn!("Host registration has no unregister()"),
    }
}

#[async_trait(?Send)]
impl Gateway for BrowserGateway {
    async fn send(&self, event: EventName, payload: Value) -> SyncResult<Value> {
        let payload = to_js(&payload).map_err(|reason| SyncError::Payload { event, reason })?;
        let promise = self
            .host
            .send(event.as_str(), payload)
            .map_err(|e| SyncError::Transport(describe(&e)))?;
        let response = JsFuture::from(promise)
            .await
            .map_err(|e| SyncError::Rejected {
                event,
                reason: describe(&e),
            })?;
        from_js(&response).map_err(|reason| SyncError::Payload { event, reason })
    }

    fn on(&self, event: EventName, handler: PushHandler) -> Registration {
        let closure = Closure::<dyn Fn(JsValue)>::new(move |payload: JsValue| {
            match from_js(&payload) {
                Ok(payload) => handler(payload),
                Err(reason) => tracing::warn!("Dropping malformed {} push: {}", event, reason),
            }
        });

        match self.host.on(event.as_str(), closure.as_ref().unchecked_ref()) {
            Ok(registration) => Registration::new(move || {
                unregister(&registration);
                drop(closure);
            }),
            Err(error) => {
                tracing::warn!("Failed to listen for {}: {}", event, describe(&error));
                Registration::noop()
            }
        }
    }
}
