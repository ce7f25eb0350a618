use std::cell::RefCell;
use std::rc::Rc;

use gloo::console;
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, MouseEvent, TouchEvent};

use crate::commit::{CommitHook, CommitSink, LocalCommitAdapter, RemoteCommitAdapter};
use crate::config;
use crate::input::{self, DragPointer};
use zaseki_core::{
    CardId, CommitOutcome, CommitResolution, DragController, OccupancyTable, PlayRequest,
    ReleaseDecision, SeatKey,
};

const BOARD_ROOT_ID: &str = "board";
const CARD_SELECTOR: &str = ".card";
const SEAT_SELECTOR: &str = ".seat";
const CARD_ID_ATTR: &str = "data-card-id";
const SEAT_OCCUPIED_CLASS: &str = "occupied";
const COMMIT_TRANSITION: &str = "transform 0.2s ease-in";
const REVERT_TRANSITION: &str = "transform 0.3s ease-out";
const PLAYED_OPACITY: &str = "0.5";
const PLAY_FAILED_MESSAGE: &str = "Failed to play the card, please try again.";

struct CardNode {
    id: CardId,
    element: HtmlElement,
}

struct SeatNode {
    key: SeatKey,
    element: Element,
}

#[derive(Clone, Copy)]
struct ActiveDrag {
    card_index: usize,
    pointer: DragPointer,
}

/// DOM-facing half of the board: owns the card/seat elements found at load,
/// feeds pointer events into the drag controller and applies the visual
/// effects it decides on. Lives for the page session.
struct BoardApp {
    cards: Vec<CardNode>,
    seats: Vec<SeatNode>,
    controller: RefCell<DragController>,
    commit: Box<dyn CommitSink>,
    player_id: Option<String>,
    active_drags: RefCell<Vec<ActiveDrag>>,
    listeners: RefCell<Vec<EventListener>>,
}

pub(crate) fn boot() {
    #[cfg(target_arch = "wasm32")]
    {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .expect("document available");
        if document.ready_state() == "loading" {
            let deferred = document.clone();
            EventListener::once(&document, "DOMContentLoaded", move |_event: &Event| {
                run(&deferred);
            })
            .forget();
        } else {
            run(&document);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        eprintln!("zaseki runs on wasm32 targets only");
    }
}

thread_local! {
    static BOARD_APP: RefCell<Option<Rc<BoardApp>>> = RefCell::new(None);
}

#[allow(dead_code)]
fn run(document: &Document) {
    let root = document.get_element_by_id(BOARD_ROOT_ID);
    let config = config::load_board_config(root.as_ref());

    let cards = collect_cards(document);
    let seats = collect_seats(document);
    if cards.is_empty() && seats.is_empty() {
        console::warn!("no card or seat elements found, board stays inert");
        return;
    }

    let table = OccupancyTable::new(seats.iter().map(|seat| seat.key.clone()));
    let commit: Box<dyn CommitSink> = match config.api_base.as_deref() {
        Some(base) => Box::new(RemoteCommitAdapter::new(config::play_endpoint(base))),
        None => {
            console::log!("no endpoint configured, running in local mode");
            Box::new(LocalCommitAdapter)
        }
    };

    let app = Rc::new(BoardApp {
        cards,
        seats,
        controller: RefCell::new(DragController::new(table)),
        commit,
        player_id: config.player_id,
        active_drags: RefCell::new(Vec::new()),
        listeners: RefCell::new(Vec::new()),
    });
    app.install_listeners(document);
    BOARD_APP.with(|slot| {
        *slot.borrow_mut() = Some(app);
    });
}

impl BoardApp {
    fn install_listeners(self: &Rc<Self>, document: &Document) {
        let mut listeners = Vec::new();

        for index in 0..self.cards.len() {
            let app = Rc::clone(self);
            let listener = EventListener::new_with_options(
                &self.cards[index].element,
                "mousedown",
                EventListenerOptions {
                    phase: EventListenerPhase::Bubble,
                    passive: false,
                },
                move |event: &Event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    if !input::is_primary_button(event) {
                        return;
                    }
                    let (x, y) = input::mouse_client_position(event);
                    if app.press(index, DragPointer::Mouse, x, y) {
                        event.prevent_default();
                    }
                },
            );
            listeners.push(listener);

            let app = Rc::clone(self);
            let listener = EventListener::new(
                &self.cards[index].element,
                "touchstart",
                move |event: &Event| {
                    let Some(event) = event.dyn_ref::<TouchEvent>() else {
                        return;
                    };
                    let Some((id, x, y)) = input::first_changed_touch(event) else {
                        return;
                    };
                    app.press(index, DragPointer::Touch { id }, x, y);
                },
            );
            listeners.push(listener);
        }

        // Move/release tracking lives on the document so a fast pointer that
        // escapes the card element keeps driving the drag.
        let app = Rc::clone(self);
        let listener = EventListener::new(document, "mousemove", move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let (x, y) = input::mouse_client_position(event);
            app.pointer_move(DragPointer::Mouse, x, y);
        });
        listeners.push(listener);

        let app = Rc::clone(self);
        let listener = EventListener::new(document, "mouseup", move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let (x, y) = input::mouse_client_position(event);
            app.pointer_release(DragPointer::Mouse, x, y);
        });
        listeners.push(listener);

        let app = Rc::clone(self);
        let listener = EventListener::new(document, "touchmove", move |event: &Event| {
            let Some(event) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            for (pointer, x, y) in app.touch_drag_positions(event) {
                app.pointer_move(pointer, x, y);
            }
        });
        listeners.push(listener);

        let app = Rc::clone(self);
        let listener = EventListener::new(document, "touchend", move |event: &Event| {
            let Some(event) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            for (pointer, x, y) in app.touch_drag_positions(event) {
                app.pointer_release(pointer, x, y);
            }
        });
        listeners.push(listener);

        let app = Rc::clone(self);
        let listener = EventListener::new(document, "touchcancel", move |event: &Event| {
            let Some(event) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            for (pointer, _, _) in app.touch_drag_positions(event) {
                app.pointer_cancel(pointer);
            }
        });
        listeners.push(listener);

        *self.listeners.borrow_mut() = listeners;
    }

    /// Active drags whose touch identifier changed in this event.
    fn touch_drag_positions(&self, event: &TouchEvent) -> Vec<(DragPointer, f32, f32)> {
        let pointers: Vec<DragPointer> = self
            .active_drags
            .borrow()
            .iter()
            .map(|drag| drag.pointer)
            .collect();
        let mut moved = Vec::new();
        for pointer in pointers {
            let DragPointer::Touch { id } = pointer else {
                continue;
            };
            if let Some((x, y)) = input::changed_touch_position(event, id) {
                moved.push((pointer, x, y));
            }
        }
        moved
    }

    fn drag_slot(&self, pointer: DragPointer) -> Option<usize> {
        self.active_drags
            .borrow()
            .iter()
            .position(|drag| drag.pointer == pointer)
    }

    fn press(&self, card_index: usize, pointer: DragPointer, x: f32, y: f32) -> bool {
        if self.drag_slot(pointer).is_some() {
            return false;
        }
        let card = &self.cards[card_index];
        if !self.controller.borrow_mut().begin_drag(&card.id, x, y) {
            return false;
        }
        set_style(&card.element, "transition", "none");
        self.active_drags.borrow_mut().push(ActiveDrag {
            card_index,
            pointer,
        });
        true
    }

    fn pointer_move(&self, pointer: DragPointer, x: f32, y: f32) {
        let Some(slot) = self.drag_slot(pointer) else {
            return;
        };
        let card_index = self.active_drags.borrow()[slot].card_index;
        let card = &self.cards[card_index];
        let Some((dx, dy)) = self.controller.borrow().drag_offset(&card.id, x, y) else {
            return;
        };
        apply_translate(&card.element, dx, dy);
    }

    fn pointer_release(self: &Rc<Self>, pointer: DragPointer, x: f32, y: f32) {
        let Some(slot) = self.drag_slot(pointer) else {
            return;
        };
        let card_index = self.active_drags.borrow_mut().remove(slot).card_index;
        let card = &self.cards[card_index];

        // The bounding box must be sampled before any restyling below;
        // a rect taken after the transform changes gives stale coordinates.
        let card_rect = input::element_rect(&card.element);
        let decision = {
            let mut controller = self.controller.borrow_mut();
            let seats = self
                .seats
                .iter()
                .map(|seat| (&seat.key, input::element_rect(&seat.element)));
            controller.release(&card.id, x, y, &card_rect, seats)
        };

        match decision {
            ReleaseDecision::Commit { seat, translate } => {
                self.start_commit(card_index, seat, translate);
            }
            ReleaseDecision::Revert => snap_back(&card.element),
        }
    }

    fn pointer_cancel(&self, pointer: DragPointer) {
        let Some(slot) = self.drag_slot(pointer) else {
            return;
        };
        let card_index = self.active_drags.borrow_mut().remove(slot).card_index;
        let card = &self.cards[card_index];
        self.controller.borrow_mut().cancel_drag(&card.id);
        snap_back(&card.element);
    }

    fn start_commit(self: &Rc<Self>, card_index: usize, seat: SeatKey, translate: (f32, f32)) {
        let card = &self.cards[card_index];
        set_style(&card.element, "transition", COMMIT_TRANSITION);
        apply_translate(&card.element, translate.0, translate.1);

        let request = PlayRequest::new(card.id.clone(), seat)
            .with_player(self.player_id.clone());
        let app = Rc::clone(self);
        let hook: CommitHook = Rc::new(move |outcome: CommitOutcome| {
            app.finish_commit(card_index, &outcome);
        });
        self.commit.submit(request, hook);
    }

    fn finish_commit(&self, card_index: usize, outcome: &CommitOutcome) {
        let card = &self.cards[card_index];
        let resolution = self.controller.borrow_mut().resolve_commit(&card.id, outcome);
        match resolution {
            CommitResolution::Played { seat } => {
                set_style(&card.element, "opacity", PLAYED_OPACITY);
                set_style(&card.element, "pointer-events", "none");
                if let Some(seat_node) = self.seats.iter().find(|node| node.key == seat) {
                    let _ = seat_node.element.class_list().add_1(SEAT_OCCUPIED_CLASS);
                }
                console::log!("card played", card.id.to_string(), seat.to_string());
            }
            CommitResolution::Reverted => {
                snap_back(&card.element);
                console::warn!("card play reverted", card.id.to_string());
                if matches!(outcome, CommitOutcome::Failed(_)) {
                    alert(PLAY_FAILED_MESSAGE);
                }
            }
        }
    }
}

fn collect_cards(document: &Document) -> Vec<CardNode> {
    let mut cards = Vec::new();
    let Ok(nodes) = document.query_selector_all(CARD_SELECTOR) else {
        return cards;
    };
    for index in 0..nodes.length() {
        let Some(node) = nodes.item(index) else {
            continue;
        };
        let Ok(element) = node.dyn_into::<HtmlElement>() else {
            continue;
        };
        let id = card_id_for(&element, index as usize);
        cards.push(CardNode { id, element });
    }
    cards
}

fn collect_seats(document: &Document) -> Vec<SeatNode> {
    let mut seats = Vec::new();
    let Ok(nodes) = document.query_selector_all(SEAT_SELECTOR) else {
        return seats;
    };
    for index in 0..nodes.length() {
        let Some(node) = nodes.item(index) else {
            continue;
        };
        let Ok(element) = node.dyn_into::<Element>() else {
            continue;
        };
        let Some(key) = seat_key_for(&element) else {
            console::warn!("seat element without id or secondary class, skipping");
            continue;
        };
        seats.push(SeatNode { key, element });
    }
    seats
}

/// Seat key: element id when present, else the second class token
/// (`seat` itself being the first).
fn seat_key_for(element: &Element) -> Option<SeatKey> {
    if let Ok(key) = SeatKey::parse(&element.id()) {
        return Some(key);
    }
    let token = element.class_list().item(1)?;
    SeatKey::parse(&token).ok()
}

/// Reads the card identity off the element, generating and writing one back
/// when absent so the identity stays stable for the session.
fn card_id_for(element: &HtmlElement, index: usize) -> CardId {
    if let Some(raw) = element.get_attribute(CARD_ID_ATTR) {
        if let Ok(id) = CardId::parse(&raw) {
            return id;
        }
    }
    let entropy =
        (js_sys::Math::random() * (1u64 << 53) as f64) as u64 ^ ((index as u64) << 53);
    let id = CardId::from_entropy(entropy);
    let _ = element.set_attribute(CARD_ID_ATTR, id.as_str());
    id
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

fn apply_translate(element: &HtmlElement, dx: f32, dy: f32) {
    set_style(element, "transform", &format!("translate({dx}px, {dy}px)"));
}

fn snap_back(element: &HtmlElement) {
    set_style(element, "transition", REVERT_TRANSITION);
    apply_translate(element, 0.0, 0.0);
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
