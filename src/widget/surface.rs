//! The widget's encapsulated render tree: one input surface and the action button.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    SingleLine,
    MultiLine,
}

impl SurfaceKind {
    #[must_use]
    pub fn for_multiline(multiline: bool) -> Self {
        if multiline {
            SurfaceKind::MultiLine
        } else {
            SurfaceKind::SingleLine
        }
    }
}

/// The mounted `#inp` control.
#[derive(Debug)]
pub struct InputSurface {
    kind: SurfaceKind,
    value: String,
}

impl InputSurface {
    fn mount(kind: SurfaceKind, value: String) -> Self {
        Self { kind, value }
    }

    #[must_use]
    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn set_value(&mut self, value: &str) {
        value.clone_into(&mut self.value);
    }

    /// A user edit; yields the value to commit.
    pub(crate) fn user_input(&mut self, value: &str) -> &str {
        self.set_value(value);
        &self.value
    }
}

#[derive(Debug, Default)]
pub struct ActionButton {
    disabled: bool,
    processing: bool,
}

impl ActionButton {
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub(crate) fn disable(&mut self) {
        self.disabled = true;
    }

    pub(crate) fn set_processing(&mut self, processing: bool) {
        self.processing = processing;
    }
}

#[derive(Debug)]
pub struct ShadowRoot {
    surface: InputSurface,
    button: ActionButton,
    mounts: u64,
}

impl ShadowRoot {
    #[must_use]
    pub fn new(multiline: bool) -> Self {
        let mut root = Self {
            surface: InputSurface::mount(SurfaceKind::for_multiline(multiline), String::new()),
            button: ActionButton::default(),
            mounts: 0,
        };
        root.render_input_area(multiline);
        root
    }

    /// Replaces the input surface, carrying its text over to the new one.
    pub fn render_input_area(&mut self, multiline: bool) {
        let current_value = std::mem::take(&mut self.surface.value);
        let kind = SurfaceKind::for_multiline(multiline);
        self.surface = InputSurface::mount(kind, current_value);
        self.mounts += 1;
        debug!(?kind, mounts = self.mounts, "Rendered input area");
    }

    #[must_use]
    pub fn surface(&self) -> &InputSurface {
        &self.surface
    }

    pub(crate) fn surface_mut(&mut self) -> &mut InputSurface {
        &mut self.surface
    }

    #[must_use]
    pub fn button(&self) -> &ActionButton {
        &self.button
    }

    pub(crate) fn button_mut(&mut self) -> &mut ActionButton {
        &mut self.button
    }

    /// Number of times an input surface has been mounted.
    #[must_use]
    pub fn mount_count(&self) -> u64 {
        self.mounts
    }

    /// Snapshot of the rendered subtree.
    #[must_use]
    pub fn markup(&self) -> String {
        let value = v_htmlescape::escape(&self.surface.value).to_string();
        let input = match self.surface.kind {
            SurfaceKind::SingleLine => format!(r#"<input type="text" id="inp" value="{value}"/>"#),
            SurfaceKind::MultiLine => format!(r#"<textarea id="inp">{value}</textarea>"#),
        };
        let mut button_attrs = String::from(r#" id="btn""#);
        if self.button.processing {
            button_attrs.push_str(r#" class="processing""#);
        }
        if self.button.disabled {
            button_attrs.push_str(r#" disabled="true""#);
        }
        format!(r#"<div><span id="input-container">{input}</span><button{button_attrs}></button></div>"#)
    }
}
