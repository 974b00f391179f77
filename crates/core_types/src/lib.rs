pub type NodeId = u32;
pub type RequestId = u64;

/// Monotonic counter stamped on every suggestion request.
///
/// Only the response carrying the current generation may be applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(RequestId);

impl Generation {
    pub const INITIAL: Generation = Generation(0);

    pub fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }

    pub fn as_raw(self) -> RequestId {
        self.0
    }
}

/// Keys the widgets react to. Everything else is passed through untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Tab,
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    Other(u32),
}

impl KeyCode {
    /// Map a legacy DOM `keyCode` value.
    pub fn from_key_code(code: u32) -> Self {
        match code {
            9 => KeyCode::Tab,
            13 => KeyCode::Enter,
            27 => KeyCode::Escape,
            38 => KeyCode::ArrowUp,
            40 => KeyCode::ArrowDown,
            other => KeyCode::Other(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(u16),
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value (touch presses report 0).
    pub fn from_button(button: u16) -> Self {
        match button {
            0 => PointerButton::Primary,
            1 => PointerButton::Auxiliary,
            2 => PointerButton::Secondary,
            other => PointerButton::Other(other),
        }
    }

    pub fn is_primary(self) -> bool {
        matches!(self, PointerButton::Primary)
    }
}
