//! # Visual Builder Editor
//!
//! Interaction engine for editing CMS-managed pages in place.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host page: mouse/click/focus events         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: VisualBuilder                       │
//! │  - Hover cursor and outline                 │
//! │  - Selection overlay and inline editing     │
//! │  - Field disablement policy                 │
//! │  - Add/move/delete instance controls        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ sync: requests and pushes to the CMS frame  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **`data-cslp` is the source of truth**: every editable element names
//!    its field; the builder keeps nothing it cannot re-derive from the page
//! 2. **Schemas are fetched once per content type** and shared by all lookups
//! 3. **Results never outlive their target**: late responses for an element
//!    the user has left are dropped
//!
//! ## Usage
//!
//! ```rust,ignore
//! use futures::executor::LocalPool;
//! use visual_builder_editor::{BuilderConfig, PointerEvent, VisualBuilder};
//!
//! let mut pool = LocalPool::new();
//! let builder = VisualBuilder::new(dom, gateway, BuilderConfig::default(), Rc::new(pool.spawner()));
//!
//! builder.handle_mouse_move(&PointerEvent { target, client_x: 10.0, client_y: 20.0, timestamp_ms: 0.0 });
//! builder.handle_click(&target);
//! pool.run_until_stalled();
//! ```

mod builder;
mod chrome;
mod config;
mod context;
mod cursor;
mod edit_stack;
mod errors;
mod geometry;
mod instance_buttons;
mod policy;
mod resolver;
mod throttle;

pub use builder::{PointerEvent, VisualBuilder, DATA_CSLP_FIELD_TYPE};
pub use chrome::{Chrome, DATA_CURSOR_STATE};
pub use config::{BuilderConfig, MIN_HOVER_THROTTLE_MS};
pub use context::{Generation, InteractionContext, SelectedField};
pub use cursor::CursorState;
pub use edit_stack::{cs_data_of_element, get_dom_edit_stack};
pub use errors::EditorError;
pub use geometry::{
    add_instance_button_positions, direction_between, get_children_direction, hover_outline_rect,
    AddInstancePositions, ChildrenDirection, OverlayPanels, DATA_ADD_DIRECTION,
};
pub use instance_buttons::{
    create_add_instance_buttons, remove_add_instance_buttons, AddInstanceButtons,
    DATA_INSTANCE_POSITION,
};
pub use policy::{
    evaluate_disablement, is_field_disabled, DisableInputs, DisableReason, DisableSettings,
    FieldDisableState,
};
pub use resolver::FieldSchemaResolver;
pub use throttle::Throttle;
