mod console;
mod js_gateway;
mod styles;
mod web_dom;

pub use js_gateway::{BrowserGateway, JsGateway};
pub use styles::builder_css;
pub use web_dom::WebDom;

use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use js_gateway::{describe, from_js};
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;
use visual_builder_cslp::DATA_CSLP;
use visual_builder_dom::Dom;
use visual_builder_editor::{BuilderConfig, PointerEvent, VisualBuilder};
use visual_builder_sync::InstancePosition;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, MouseEvent};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console::init_tracing();
}

/// Runs builder tasks on the browser microtask queue
struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn Fn(Event)>,
}

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn event_target(event: &Event) -> Option<Element> {
    event.target().and_then(|target| target.dyn_into::<Element>().ok())
}

fn parse_position(value: &str) -> Result<InstancePosition, JsValue> {
    serde_json::from_value(Value::String(value.to_string()))
        .map_err(|_| JsValue::from_str(&format!("Unknown instance position: {}", value)))
}

/// Run the move the throttle dropped once the interval has passed.
fn schedule_flush(builder: &VisualBuilder<WebDom>, scheduled: &Rc<Cell<bool>>) {
    let flush = {
        let builder = builder.clone();
        let scheduled = scheduled.clone();
        Closure::once_into_js(move || {
            scheduled.set(false);
            builder.flush_pending_move();
        })
    };
    let delay = builder.config().hover_interval_ms().ceil() as i32;
    match builder
        .dom()
        .window()
        .set_timeout_with_callback_and_timeout_and_arguments_0(flush.unchecked_ref(), delay)
    {
        Ok(_) => scheduled.set(true),
        Err(error) => tracing::warn!("Failed to schedule hover flush: {}", describe(&error)),
    }
}

#[wasm_bindgen(js_name = VisualBuilder)]
pub struct VisualBuilderHandle {
    builder: VisualBuilder<WebDom>,
    listeners: Vec<Listener>,
    style: Option<Element>,
}

#[wasm_bindgen(js_class = VisualBuilder)]
impl VisualBuilderHandle {
    /// Start the builder on the current document.
    ///
    /// `config` is optional: a JSON string or a plain object such as
    /// `{ masterLocale: "en-us" }`.
    #[wasm_bindgen(constructor)]
    pub fn new(gateway: JsGateway, config: JsValue) -> Result<VisualBuilderHandle, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            BuilderConfig::default()
        } else {
            let json = match config.as_string() {
                Some(json) => json,
                None => js_sys::JSON::stringify(&config)?
                    .as_string()
                    .ok_or_else(|| JsValue::from_str("Config is not JSON"))?,
            };
            BuilderConfig::from_json(&json).map_err(to_js_error)?
        };

        let dom = WebDom::new().ok_or_else(|| JsValue::from_str("No browser document"))?;
        let style = dom.inject_style(&builder_css(&config.class_prefix));
        let builder = VisualBuilder::new(
            dom,
            Rc::new(BrowserGateway::new(gateway)),
            config,
            Rc::new(BrowserSpawner),
        );

        let mut handle = Self {
            builder,
            listeners: Vec::new(),
            style,
        };
        handle.listen()?;
        Ok(handle)
    }

    #[wasm_bindgen(js_name = setAudienceMode)]
    pub fn set_audience_mode(&self, audience_mode: bool) {
        self.builder.set_audience_mode(audience_mode);
    }

    /// Send a new value for the selected field.
    #[wasm_bindgen(js_name = commitEdit)]
    pub fn commit_edit(&self, data: JsValue) -> js_sys::Promise {
        let builder = self.builder.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            let data = from_js(&data).map_err(|reason| JsValue::from_str(&reason))?;
            builder.commit_edit(data).await.map_err(to_js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// `position` is `"previous"` or `"next"`
    #[wasm_bindgen(js_name = addInstance)]
    pub fn add_instance(&self, position: &str) -> Result<js_sys::Promise, JsValue> {
        let position = parse_position(position)?;
        let builder = self.builder.clone();
        Ok(wasm_bindgen_futures::future_to_promise(async move {
            builder.add_instance(position).await.map_err(to_js_error)?;
            Ok(JsValue::UNDEFINED)
        }))
    }

    #[wasm_bindgen(js_name = deleteInstance)]
    pub fn delete_instance(&self) -> js_sys::Promise {
        let builder = self.builder.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            builder.delete_instance().await.map_err(to_js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = moveInstance)]
    pub fn move_instance(&self, direction: &str) -> Result<js_sys::Promise, JsValue> {
        let direction = parse_position(direction)?;
        let builder = self.builder.clone();
        Ok(wasm_bindgen_futures::future_to_promise(async move {
            builder.move_instance(direction).await.map_err(to_js_error)?;
            Ok(JsValue::UNDEFINED)
        }))
    }

    /// Resolves to the selected field's discussion id
    #[wasm_bindgen(js_name = discussionId)]
    pub fn discussion_id(&self) -> js_sys::Promise {
        let builder = self.builder.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            let id = builder.discussion_id().await.map_err(to_js_error)?;
            Ok(JsValue::from_str(&id))
        })
    }

    /// Remove listeners and chrome. The handle is inert afterwards.
    pub fn destroy(&mut self) {
        for listener in self.listeners.drain(..) {
            if let Err(error) = listener.target.remove_event_listener_with_callback(
                listener.event,
                listener.closure.as_ref().unchecked_ref(),
            ) {
                tracing::warn!("Failed to remove {} listener: {}", listener.event, describe(&error));
            }
        }
        if let Some(style) = self.style.take() {
            style.remove();
        }
        self.builder.destroy();
    }
}

impl VisualBuilderHandle {
    fn listen(&mut self) -> Result<(), JsValue> {
        let document: EventTarget = self.builder.dom().document().clone().into();

        let builder = self.builder.clone();
        let flush_scheduled = Rc::new(Cell::new(false));
        self.add_listener(&document, "mousemove", move |event| {
            let (Some(mouse), Some(target)) = (event.dyn_ref::<MouseEvent>(), event_target(&event))
            else {
                return;
            };
            builder.handle_mouse_move(&PointerEvent {
                target,
                client_x: mouse.client_x() as f64,
                client_y: mouse.client_y() as f64,
                timestamp_ms: event.time_stamp(),
            });
            if builder.has_pending_move() && !flush_scheduled.get() {
                schedule_flush(&builder, &flush_scheduled);
            }
        })?;

        let builder = self.builder.clone();
        self.add_listener(&document, "click", move |event| {
            let Some(target) = event_target(&event) else {
                return;
            };
            if builder.dom().closest_with_attribute(&target, DATA_CSLP).is_some() {
                event.prevent_default();
            }
            builder.handle_click(&target);
        })?;

        let builder = self.builder.clone();
        self.add_listener(&document, "focusout", move |event| {
            if let Some(target) = event_target(&event) {
                builder.handle_edit_end(&target);
            }
        })
    }

    fn add_listener(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        handler: impl Fn(Event) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::<dyn Fn(Event)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            target: target.clone(),
            event,
            closure,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("previous").ok(), Some(InstancePosition::Previous));
        assert_eq!(parse_position("next").ok(), Some(InstancePosition::Next));
    }
}
