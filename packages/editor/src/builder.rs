//! # Visual Builder
//!
//! Ties the page, the schema resolver and the parent frame together. Hover
//! and click events come in from the host, the builder updates its chrome and
//! sends the parent what the user focused or changed.
//!
//! Schema and permission lookups run as local tasks. Each task captures the
//! hover or selection [`Generation`] it was started for and drops its result
//! if the user has moved on by the time it resolves.

use crate::chrome::Chrome;
use crate::context::{Generation, InteractionContext, SelectedField};
use crate::edit_stack::{cs_data_of_element, get_dom_edit_stack};
use crate::geometry::{get_children_direction, ChildrenDirection};
use crate::instance_buttons::{create_add_instance_buttons, remove_add_instance_buttons};
use crate::policy::{is_field_disabled, DisableSettings};
use crate::resolver::FieldSchemaResolver;
use crate::throttle::Throttle;
use crate::{BuilderConfig, CursorState, EditorError};
use futures::task::{LocalSpawn, LocalSpawnExt};
use serde_json::Value;
use std::cell::{Ref, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use visual_builder_cslp::{FieldAddress, DATA_CSLP};
use visual_builder_dom::{Dom, Point};
use visual_builder_schema::{FieldSchema, FieldType};
use visual_builder_sync::{
    EventName, Gateway, InstancePosition, Registration, ScrollToFieldRequest, SyncClient,
};

/// Field type marker set on the selected element
pub const DATA_CSLP_FIELD_TYPE: &str = "data-cslp-field-type";

const CONTENT_EDITABLE: &str = "contenteditable";

/// A mouse move as reported by the host
#[derive(Debug, Clone)]
pub struct PointerEvent<N> {
    pub target: N,
    pub client_x: f64,
    pub client_y: f64,
    pub timestamp_ms: f64,
}

struct Inner<D: Dom> {
    dom: D,
    config: BuilderConfig,
    client: SyncClient,
    resolver: FieldSchemaResolver,
    spawner: Rc<dyn LocalSpawn>,
    context: RefCell<InteractionContext<D::Node>>,
    chrome: RefCell<Option<Chrome<D::Node>>>,
    throttle: RefCell<Throttle>,
    pending_move: RefCell<Option<PointerEvent<D::Node>>>,
    registrations: RefCell<Vec<Registration>>,
}

pub struct VisualBuilder<D: Dom> {
    inner: Rc<Inner<D>>,
}

impl<D: Dom> Clone for VisualBuilder<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<D> VisualBuilder<D>
where
    D: Dom + 'static,
    D::Node: 'static,
{
    /// Mount the chrome and start listening to the parent.
    pub fn new(
        dom: D,
        gateway: Rc<dyn Gateway>,
        config: BuilderConfig,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        let client = SyncClient::new(gateway);
        let chrome = Chrome::mount(&dom, &config);
        if chrome.is_none() {
            tracing::warn!("Document has no body, builder chrome not mounted");
        }

        let inner = Inner {
            resolver: FieldSchemaResolver::new(client.clone()),
            context: RefCell::new(InteractionContext::new(config.audience_mode)),
            throttle: RefCell::new(Throttle::new(config.hover_interval_ms())),
            pending_move: RefCell::new(None),
            chrome: RefCell::new(chrome),
            registrations: RefCell::new(Vec::new()),
            dom,
            config,
            client,
            spawner,
        };

        let builder = Self {
            inner: Rc::new(inner),
        };
        builder.register_parent_handlers();
        tracing::info!("Visual builder started");
        builder
    }

    pub fn dom(&self) -> &D {
        &self.inner.dom
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.inner.config
    }

    pub fn resolver(&self) -> &FieldSchemaResolver {
        &self.inner.resolver
    }

    pub fn context(&self) -> Ref<'_, InteractionContext<D::Node>> {
        self.inner.context.borrow()
    }

    pub fn chrome(&self) -> Option<Chrome<D::Node>> {
        self.inner.chrome.borrow().clone()
    }

    pub fn selected_field(&self) -> Option<SelectedField> {
        self.inner.context.borrow().selected_field.clone()
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.chrome.borrow().is_none()
    }

    pub fn set_audience_mode(&self, audience_mode: bool) {
        self.inner.context.borrow_mut().audience_mode = audience_mode;
    }

    fn downgrade(&self) -> Weak<Inner<D>> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(inner: &Weak<Inner<D>>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        if let Err(error) = self.inner.spawner.spawn_local(task) {
            tracing::error!("Failed to spawn builder task: {}", error);
        }
    }

    fn register_parent_handlers(&self) {
        let builder = self.downgrade();
        let registration = self.inner.client.on(
            EventName::ScrollToViewFieldByCslpValue,
            Rc::new(move |payload: Value| {
                if let Some(builder) = Self::upgrade(&builder) {
                    builder.scroll_to_field(payload);
                }
            }),
        );
        self.inner.registrations.borrow_mut().push(registration);
    }

    fn disable_settings<'a>(
        &'a self,
        variant_field_class: &'a str,
        variant_update_allowed: Option<bool>,
    ) -> DisableSettings<'a> {
        DisableSettings {
            master_locale: &self.inner.config.master_locale,
            audience_mode: self.inner.context.borrow().audience_mode,
            variant_field_class,
            variant_update_allowed,
        }
    }

    fn set_cursor(&self, chrome: &Chrome<D::Node>, state: CursorState, pointer: Option<Point>) {
        self.inner.context.borrow_mut().cursor = state;
        chrome.render_cursor(&self.inner.dom, &self.inner.config, state, pointer);
    }

    fn cursor_for(
        &self,
        editable: &D::Node,
        address: &FieldAddress,
        schema: Option<&FieldSchema>,
    ) -> CursorState {
        let Some(schema) = schema else {
            return CursorState::Idle;
        };
        let variant_update_allowed = if address.is_variant() {
            self.inner
                .context
                .borrow()
                .variant_permissions
                .get(&address.cslp_value)
                .copied()
        } else {
            None
        };
        let variant_class = self.inner.config.class("__variant-field");
        let disabled = is_field_disabled(
            &self.inner.dom,
            schema,
            editable,
            address,
            &self.disable_settings(&variant_class, variant_update_allowed),
        );
        if disabled.is_disabled() {
            CursorState::Disabled
        } else {
            FieldType::classify(schema).map_or(CursorState::Idle, CursorState::Field)
        }
    }

    fn is_empty_block(&self, node: &D::Node) -> bool {
        let class = self.inner.config.class("__empty-block");
        self.inner
            .dom
            .closest(node, |n| self.inner.dom.has_class(n, &class))
            .is_some()
    }

    fn forget_hovered(&self) {
        let mut context = self.inner.context.borrow_mut();
        if context.previous_hovered.take().is_some() {
            context.advance_hover();
        }
    }

    /// Hover handling, throttled to the configured interval.
    ///
    /// A move dropped by the throttle is kept as the pending move until
    /// [`flush_pending_move`](Self::flush_pending_move) or the next handled move.
    pub fn handle_mouse_move(&self, event: &PointerEvent<D::Node>) {
        if !self.inner.throttle.borrow_mut().ready(event.timestamp_ms) {
            *self.inner.pending_move.borrow_mut() = Some(event.clone());
            return;
        }
        self.inner.pending_move.borrow_mut().take();
        self.hover(event);
    }

    pub fn has_pending_move(&self) -> bool {
        self.inner.pending_move.borrow().is_some()
    }

    /// Handle the last move the throttle dropped, if any.
    pub fn flush_pending_move(&self) {
        let Some(event) = self.inner.pending_move.borrow_mut().take() else {
            return;
        };
        self.inner.throttle.borrow_mut().mark(event.timestamp_ms);
        self.hover(&event);
    }

    fn hover(&self, event: &PointerEvent<D::Node>) {
        let Some(chrome) = self.chrome() else {
            return;
        };
        let dom = &self.inner.dom;
        let config = &self.inner.config;
        let pointer = Some(Point::new(event.client_x, event.client_y));

        let Some((editable, address)) = cs_data_of_element(dom, &event.target) else {
            if chrome.is_overlay(dom, &event.target) || dom.is_content_editable(&event.target) {
                self.set_cursor(&chrome, CursorState::Hidden, pointer);
                return;
            }
            self.set_cursor(&chrome, CursorState::Idle, pointer);
            chrome.hide_hover_outline(dom, config);
            remove_add_instance_buttons(
                dom,
                config,
                Some(&chrome.container),
                &mut self.inner.context.borrow_mut(),
                Some(&event.target),
                false,
            );
            self.forget_hovered();
            return;
        };

        let is_selected =
            self.inner.context.borrow().previous_selected.as_ref() == Some(&editable);
        if is_selected {
            self.set_cursor(&chrome, CursorState::Hidden, pointer);
            chrome.hide_hover_outline(dom, config);
            self.forget_hovered();
            return;
        }

        let (changed, generation, loading) = {
            let mut context = self.inner.context.borrow_mut();
            let changed = context.previous_hovered.as_ref() != Some(&editable);
            if changed {
                remove_add_instance_buttons(
                    dom,
                    config,
                    Some(&chrome.container),
                    &mut context,
                    Some(&event.target),
                    false,
                );
                context.advance_hover();
            }
            (
                changed,
                context.hover_generation(),
                context.cursor == CursorState::Loading,
            )
        };

        let resolver = &self.inner.resolver;
        if resolver.is_cached(&address.content_type_uid) {
            let schema = resolver.cached_field_schema(&address.content_type_uid, &address.field_path);
            let state = self.cursor_for(&editable, &address, schema.as_deref());
            self.set_cursor(&chrome, state, pointer);
        } else if !changed && loading {
            self.set_cursor(&chrome, CursorState::Loading, pointer);
        } else {
            self.set_cursor(&chrome, CursorState::Loading, pointer);
            let builder = self.downgrade();
            let resolver = resolver.clone();
            let (editable, address) = (editable.clone(), address.clone());
            self.spawn(async move {
                let schema = resolver
                    .get_field_schema(&address.content_type_uid, &address.field_path)
                    .await;
                if let Some(builder) = Self::upgrade(&builder) {
                    builder.finish_hover(generation, &editable, &address, schema);
                }
            });
        }

        if self.is_empty_block(&event.target) {
            chrome.hide_hover_outline(dom, config);
        } else {
            chrome.show_hover_outline(dom, config, &dom.bounding_rect(&editable));
        }
        self.inner.context.borrow_mut().previous_hovered = Some(editable);
    }

    fn finish_hover(
        &self,
        generation: Generation,
        editable: &D::Node,
        address: &FieldAddress,
        schema: Option<Arc<FieldSchema>>,
    ) {
        let Some(chrome) = self.chrome() else {
            return;
        };
        if !self.inner.context.borrow().is_current_hover(generation) {
            tracing::debug!("Dropping stale hover schema for {}", address.cslp_value);
            return;
        }
        let state = self.cursor_for(editable, address, schema.as_deref());
        self.set_cursor(&chrome, state, None);
    }

    /// Select the field under `target`, or clear the selection.
    ///
    /// Clicking the already selected element does nothing.
    pub fn handle_click(&self, target: &D::Node) {
        let Some(chrome) = self.chrome() else {
            return;
        };
        let dom = &self.inner.dom;
        let config = &self.inner.config;

        let button = self
            .inner
            .context
            .borrow()
            .add_instance_buttons
            .as_ref()
            .and_then(|buttons| buttons.position_of(dom, target));
        if let Some(position) = button {
            let builder = self.clone();
            self.spawn(async move {
                if let Err(error) = builder.add_instance(position).await {
                    tracing::warn!("Failed to add instance: {}", error);
                }
            });
            return;
        }

        let Some((editable, address)) = cs_data_of_element(dom, target) else {
            self.clear_selection(&chrome);
            return;
        };
        if self.inner.context.borrow().previous_selected.as_ref() == Some(&editable) {
            return;
        }
        self.clear_selection(&chrome);

        tracing::debug!("Selected {}", address.cslp_value);
        let generation = {
            let mut context = self.inner.context.borrow_mut();
            context.previous_selected = Some(editable.clone());
            context.selected_field = Some(SelectedField::pending(address.clone()));
            context.overlay_visible = true;
            context.previous_hovered = None;
            context.advance_hover();
            context.advance_selection()
        };
        chrome.show_overlay(dom, config, &dom.bounding_rect(&editable));
        chrome.hide_hover_outline(dom, config);
        self.set_cursor(&chrome, CursorState::Hidden, None);
        self.focus_empty_block_parents(&address);

        let client = self.inner.client.clone();
        let dom_edit_stack = get_dom_edit_stack(dom, &editable);
        self.spawn(async move {
            if let Err(error) = client.focus_field(dom_edit_stack).await {
                tracing::warn!("Failed to send focus-field: {}", error);
            }
        });

        let builder = self.downgrade();
        let resolver = self.inner.resolver.clone();
        let client = self.inner.client.clone();
        self.spawn(async move {
            let schema = resolver
                .get_field_schema(&address.content_type_uid, &address.field_path)
                .await;
            let variant_update_allowed = if address.is_variant() {
                match client.get_resolved_variant_permissions(&address).await {
                    Ok(permissions) => {
                        if let Some(builder) = Self::upgrade(&builder) {
                            builder.remember_variant_permission(&address, permissions.update);
                        }
                        Some(permissions.update)
                    }
                    Err(error) => {
                        tracing::warn!(
                            "Failed to resolve variant permissions for {}: {}",
                            address.cslp_value,
                            error
                        );
                        Some(false)
                    }
                }
            } else {
                None
            };
            if let Some(builder) = Self::upgrade(&builder) {
                builder.finish_selection(generation, &editable, &address, schema, variant_update_allowed);
            }
        });
    }

    fn remember_variant_permission(&self, address: &FieldAddress, update: bool) {
        if self.is_destroyed() {
            return;
        }
        self.inner
            .context
            .borrow_mut()
            .variant_permissions
            .insert(address.cslp_value.clone(), update);
    }

    fn finish_selection(
        &self,
        generation: Generation,
        editable: &D::Node,
        address: &FieldAddress,
        schema: Option<Arc<FieldSchema>>,
        variant_update_allowed: Option<bool>,
    ) {
        let Some(chrome) = self.chrome() else {
            return;
        };
        if !self.inner.context.borrow().is_current_selection(generation) {
            tracing::debug!("Dropping stale selection result for {}", address.cslp_value);
            return;
        }
        let dom = &self.inner.dom;
        let config = &self.inner.config;

        let Some(schema) = schema else {
            if let Some(selected) = self.inner.context.borrow_mut().selected_field.as_mut() {
                selected.resolved = true;
            }
            return;
        };

        let variant_class = config.class("__variant-field");
        let disable_state = is_field_disabled(
            dom,
            &schema,
            editable,
            address,
            &self.disable_settings(&variant_class, variant_update_allowed),
        );
        if disable_state.is_disabled() {
            tracing::debug!("{} is disabled: {}", address.cslp_value, disable_state.reason_text());
        }

        let field_type = FieldType::classify(&schema);
        if let Some(field_type) = field_type {
            dom.set_attribute(editable, DATA_CSLP_FIELD_TYPE, field_type.as_str());
        }

        let is_list_wrapper = schema.multiple && address.instance_index().is_none();
        let inline_editing = !disable_state.is_disabled()
            && !is_list_wrapper
            && field_type.is_some_and(|t| t.is_content_editable());
        if inline_editing {
            dom.set_attribute(editable, CONTENT_EDITABLE, "true");
        }

        let mut direction = ChildrenDirection::None;
        if !disable_state.is_disabled() && address.instance_index().is_some() {
            if let Some(parent) = &address.multiple_field_metadata.parent_details {
                direction = get_children_direction(dom, editable, &parent.parent_cslp_value);
            }
        }

        {
            let mut context = self.inner.context.borrow_mut();
            if direction != ChildrenDirection::None {
                create_add_instance_buttons(
                    dom,
                    config,
                    &chrome.container,
                    &mut context,
                    direction,
                    &dom.bounding_rect(editable),
                    &address.cslp_value,
                );
            }
            context.selected_field = Some(SelectedField {
                address: address.clone(),
                schema: Some(schema),
                field_type,
                disable_state,
                direction,
                inline_editing,
                resolved: true,
            });
        }

        if inline_editing {
            self.load_field_data(generation, editable.clone(), address.clone());
        }
    }

    /// Replace the element's rendered text with the stored value.
    fn load_field_data(&self, generation: Generation, editable: D::Node, address: FieldAddress) {
        let builder = self.downgrade();
        let client = self.inner.client.clone();
        self.spawn(async move {
            let data = client.get_field_data(&address).await;
            let Some(builder) = Self::upgrade(&builder) else {
                return;
            };
            if !builder.inner.context.borrow().is_current_selection(generation) {
                return;
            }
            match data {
                Ok(Value::String(text)) => builder.inner.dom.set_text_content(&editable, &text),
                Ok(Value::Number(number)) => {
                    builder.inner.dom.set_text_content(&editable, &number.to_string())
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!("Failed to fetch field data for {}: {}", address.cslp_value, error)
                }
            }
        });
    }

    fn clear_selection(&self, chrome: &Chrome<D::Node>) {
        let dom = &self.inner.dom;
        let config = &self.inner.config;

        let (previous, selected, empty_block_parents) = {
            let mut context = self.inner.context.borrow_mut();
            context.advance_selection();
            context.overlay_visible = false;
            (
                context.previous_selected.take(),
                context.selected_field.take(),
                std::mem::take(&mut context.previous_empty_block_parents),
            )
        };

        if let (Some(previous), Some(selected)) = (&previous, &selected) {
            if selected.inline_editing {
                dom.remove_attribute(previous, CONTENT_EDITABLE);
            }
            if selected.field_type.is_some() {
                dom.remove_attribute(previous, DATA_CSLP_FIELD_TYPE);
            }
        }
        let focused = config.class("__empty-block-parent--focused");
        for parent in &empty_block_parents {
            dom.remove_class(parent, &focused);
        }

        chrome.hide_overlay(dom, config);
        remove_add_instance_buttons(
            dom,
            config,
            Some(&chrome.container),
            &mut self.inner.context.borrow_mut(),
            None,
            true,
        );
    }

    /// Highlight the containers of empty blocks that belong to the selected entry.
    fn focus_empty_block_parents(&self, address: &FieldAddress) {
        let dom = &self.inner.dom;
        let Some(body) = dom.body() else {
            return;
        };
        let empty_block = self.inner.config.class("__empty-block");
        let focused = self.inner.config.class("__empty-block-parent--focused");
        let entry = address.entry_prefix();

        let mut parents: Vec<D::Node> = Vec::new();
        for block in dom.descendants(&body) {
            if !dom.has_class(&block, &empty_block) {
                continue;
            }
            let Some((parent, parent_address)) =
                dom.parent(&block).and_then(|p| cs_data_of_element(dom, &p))
            else {
                continue;
            };
            if parent_address.entry_prefix() == entry && !parents.contains(&parent) {
                dom.add_class(&parent, &focused);
                parents.push(parent);
            }
        }
        self.inner.context.borrow_mut().previous_empty_block_parents = parents;
    }

    /// Commit the selected element's text when it loses focus.
    pub fn handle_edit_end(&self, target: &D::Node) {
        let selected = {
            let context = self.inner.context.borrow();
            match (&context.previous_selected, &context.selected_field) {
                (Some(node), Some(field)) if field.inline_editing => Some(node.clone()),
                _ => None,
            }
        };
        let Some(selected) = selected else {
            return;
        };
        if !self.inner.dom.contains(&selected, target) {
            return;
        }

        let text = self.inner.dom.text_content(&selected);
        let builder = self.clone();
        self.spawn(async move {
            if let Err(error) = builder.commit_edit(Value::String(text)).await {
                tracing::warn!("Failed to commit edit: {}", error);
            }
        });
    }

    fn editable_selection(&self) -> Result<SelectedField, EditorError> {
        if self.is_destroyed() {
            return Err(EditorError::Destroyed);
        }
        let selected = self.selected_field().ok_or(EditorError::NoSelection)?;
        if !selected.resolved {
            return Err(EditorError::Unresolved);
        }
        if selected.schema.is_none() {
            return Err(EditorError::SchemaUnavailable(
                selected.address.cslp_value.clone(),
            ));
        }
        if selected.disable_state.is_disabled() {
            return Err(EditorError::FieldDisabled(
                selected.disable_state.reason_text().to_string(),
            ));
        }
        Ok(selected)
    }

    fn editable_instance(&self) -> Result<(FieldAddress, usize), EditorError> {
        let selected = self.editable_selection()?;
        let index = selected
            .address
            .instance_index()
            .ok_or(EditorError::NotAnInstance)?;
        Ok((selected.address, index))
    }

    /// Send a new value for the selected field.
    pub async fn commit_edit(&self, data: Value) -> Result<(), EditorError> {
        let selected = self.editable_selection()?;
        self.inner.client.update_field(&selected.address, data).await?;
        Ok(())
    }

    /// Insert a new instance before or after the selected one.
    pub async fn add_instance(&self, position: InstancePosition) -> Result<(), EditorError> {
        let (address, index) = self.editable_instance()?;
        let index = match position {
            InstancePosition::Previous => index,
            InstancePosition::Next => index + 1,
        };
        self.inner.client.add_instance(&address, index).await?;
        Ok(())
    }

    pub async fn delete_instance(&self) -> Result<(), EditorError> {
        let (address, index) = self.editable_instance()?;
        self.inner.client.delete_instance(&address, index).await?;
        Ok(())
    }

    pub async fn move_instance(&self, direction: InstancePosition) -> Result<(), EditorError> {
        let (address, index) = self.editable_instance()?;
        self.inner
            .client
            .move_instance(&address, index, direction)
            .await?;
        Ok(())
    }

    /// Discussion thread for the selected field
    pub async fn discussion_id(&self) -> Result<String, EditorError> {
        let selected = self.selected_field().ok_or(EditorError::NoSelection)?;
        Ok(self.inner.client.get_discussion_id(&selected.address).await)
    }

    fn scroll_to_field(&self, payload: Value) {
        let request: ScrollToFieldRequest = match serde_json::from_value(payload) {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!("Ignoring malformed scroll request: {}", error);
                return;
            }
        };
        let cslp_value = request.cslp_data.cslp_value();
        match self.inner.dom.query_by_attribute(DATA_CSLP, &cslp_value) {
            Some(node) => self.inner.dom.scroll_into_view(&node),
            None => tracing::debug!("No element to scroll to for {}", cslp_value),
        }
    }

    /// Unregister parent handlers, remove the chrome and reset all state.
    pub fn destroy(&self) {
        for registration in self.inner.registrations.take() {
            registration.unregister();
        }
        let Some(chrome) = self.inner.chrome.borrow_mut().take() else {
            return;
        };
        self.clear_selection(&chrome);
        chrome.unmount(&self.inner.dom);
        self.inner.context.borrow_mut().reset();
        self.inner.throttle.borrow_mut().reset();
        self.inner.pending_move.borrow_mut().take();
        self.inner.resolver.clear();
        tracing::info!("Visual builder destroyed");
    }
}
