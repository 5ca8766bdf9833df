use visual_builder_schema::FieldType;

/// Glyph shown by the custom cursor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorState {
    #[default]
    Hidden,
    Idle,
    /// Schema for the hovered field is still being fetched
    Loading,
    Field(FieldType),
    Disabled,
}

impl CursorState {
    /// Value of the cursor's `data-cursor-state` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            CursorState::Hidden => "hidden",
            CursorState::Idle => "idle",
            CursorState::Loading => "loading",
            CursorState::Field(field_type) => field_type.as_str(),
            CursorState::Disabled => "disabled",
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, CursorState::Hidden)
    }
}
