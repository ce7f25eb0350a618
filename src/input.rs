use web_sys::{DomRect, Element, HtmlElement, MouseEvent, TouchEvent};

use zaseki_core::Rect;

/// Identity of the pointer driving a live drag. Touch drags track their
/// touch identifier so concurrent touches steer independent cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DragPointer {
    Mouse,
    Touch { id: i32 },
}

pub(crate) fn is_primary_button(event: &MouseEvent) -> bool {
    event.button() == 0
}

pub(crate) fn mouse_client_position(event: &MouseEvent) -> (f32, f32) {
    (event.client_x() as f32, event.client_y() as f32)
}

/// First touch that changed in this event, with its identifier.
pub(crate) fn first_changed_touch(event: &TouchEvent) -> Option<(i32, f32, f32)> {
    let touch = event.changed_touches().item(0)?;
    Some((
        touch.identifier(),
        touch.client_x() as f32,
        touch.client_y() as f32,
    ))
}

/// Position of the changed touch matching `id`, if it is part of this event.
pub(crate) fn changed_touch_position(event: &TouchEvent, id: i32) -> Option<(f32, f32)> {
    let touches = event.changed_touches();
    for index in 0..touches.length() {
        let Some(touch) = touches.item(index) else {
            continue;
        };
        if touch.identifier() == id {
            return Some((touch.client_x() as f32, touch.client_y() as f32));
        }
    }
    None
}

pub(crate) trait HasClientRect {
    fn client_rect(&self) -> DomRect;
}

impl HasClientRect for Element {
    fn client_rect(&self) -> DomRect {
        self.get_bounding_client_rect()
    }
}

impl HasClientRect for HtmlElement {
    fn client_rect(&self) -> DomRect {
        self.get_bounding_client_rect()
    }
}

pub(crate) fn dom_rect_to_rect(rect: &DomRect) -> Rect {
    Rect::new(
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

pub(crate) fn element_rect(element: &impl HasClientRect) -> Rect {
    dom_rect_to_rect(&element.client_rect())
}
