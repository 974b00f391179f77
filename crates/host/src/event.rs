use core_types::{KeyCode, PointerButton};
use dom::Id;

/// A raw input event as the embedding page reports it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// The text of `input` changed.
    Input { input: Id },
    Blur { input: Id },
    KeyDown { input: Id, key: KeyCode },
    /// Press anywhere in the document. Routed to the dropdown containing
    /// `target`, if any.
    PointerDown { target: Id, button: PointerButton },
    TouchStart { target: Id },
    /// Click anywhere in the document. Routed to the chip list containing
    /// `target`, if any.
    Click { target: Id, button: PointerButton },
    /// The chips under `container` were reordered by a drag layer.
    Sorted { container: Id },
    /// The viewport was resized or reoriented.
    WindowChange,
}
