//! # Interaction Context
//!
//! Transient hover/selection state owned by one builder instance. Background
//! tasks capture a [`Generation`] when they start and only apply their result
//! if it is still current.

use crate::geometry::ChildrenDirection;
use crate::instance_buttons::AddInstanceButtons;
use crate::policy::FieldDisableState;
use crate::CursorState;
use std::collections::HashMap;
use std::sync::Arc;
use visual_builder_cslp::FieldAddress;
use visual_builder_schema::{FieldSchema, FieldType};

/// Token identifying one hovered target or one selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// What the builder knows about the selected field
#[derive(Debug, Clone)]
pub struct SelectedField {
    pub address: FieldAddress,
    pub schema: Option<Arc<FieldSchema>>,
    pub field_type: Option<FieldType>,
    pub disable_state: FieldDisableState,
    pub direction: ChildrenDirection,
    /// `contenteditable` was switched on by the builder
    pub inline_editing: bool,
    /// Schema lookup has finished (successfully or not)
    pub resolved: bool,
}

impl SelectedField {
    pub fn pending(address: FieldAddress) -> Self {
        Self {
            address,
            schema: None,
            field_type: None,
            disable_state: FieldDisableState::default(),
            direction: ChildrenDirection::None,
            inline_editing: false,
            resolved: false,
        }
    }
}

#[derive(Debug)]
pub struct InteractionContext<N> {
    pub previous_hovered: Option<N>,
    pub previous_selected: Option<N>,
    pub previous_empty_block_parents: Vec<N>,
    pub audience_mode: bool,
    pub overlay_visible: bool,
    pub cursor: CursorState,
    pub add_instance_buttons: Option<AddInstanceButtons<N>>,
    pub selected_field: Option<SelectedField>,
    /// Variant update permission per CSLP value, filled by selections
    pub variant_permissions: HashMap<String, bool>,
    hover_generation: u64,
    selection_generation: u64,
}

impl<N> InteractionContext<N> {
    pub fn new(audience_mode: bool) -> Self {
        Self {
            previous_hovered: None,
            previous_selected: None,
            previous_empty_block_parents: Vec::new(),
            audience_mode,
            overlay_visible: false,
            cursor: CursorState::Hidden,
            add_instance_buttons: None,
            selected_field: None,
            variant_permissions: HashMap::new(),
            hover_generation: 0,
            selection_generation: 0,
        }
    }

    pub fn hover_generation(&self) -> Generation {
        Generation(self.hover_generation)
    }

    /// Invalidate every task started for the previous hover target.
    pub fn advance_hover(&mut self) -> Generation {
        self.hover_generation += 1;
        self.hover_generation()
    }

    pub fn is_current_hover(&self, generation: Generation) -> bool {
        self.hover_generation == generation.0
    }

    pub fn selection_generation(&self) -> Generation {
        Generation(self.selection_generation)
    }

    pub fn advance_selection(&mut self) -> Generation {
        self.selection_generation += 1;
        self.selection_generation()
    }

    pub fn is_current_selection(&self, generation: Generation) -> bool {
        self.selection_generation == generation.0
    }

    /// Null out all state. Outstanding tasks become stale.
    pub fn reset(&mut self) {
        self.previous_hovered = None;
        self.previous_selected = None;
        self.previous_empty_block_parents.clear();
        self.audience_mode = false;
        self.overlay_visible = false;
        self.cursor = CursorState::Hidden;
        self.add_instance_buttons = None;
        self.selected_field = None;
        self.variant_permissions.clear();
        self.hover_generation += 1;
        self.selection_generation += 1;
    }
}
