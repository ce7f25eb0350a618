use std::collections::HashMap;

use crate::card_id::CardId;
use crate::geometry::{center_displacement, Rect};
use crate::protocol::CommitOutcome;
use crate::table::{OccupancyTable, SeatKey};

/// Per-card drag lifecycle. `Played` is terminal; a played card never
/// re-enters the interaction loop.
#[derive(Clone, Debug, PartialEq)]
pub enum CardPhase {
    Idle,
    Dragging { press_x: f32, press_y: f32 },
    Committing { seat: SeatKey },
    Played { seat: SeatKey },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReleaseDecision {
    /// Animate the card by `translate` (relative to its pre-drag position)
    /// onto the seat center and issue the remote commit.
    Commit {
        seat: SeatKey,
        translate: (f32, f32),
    },
    /// No free seat under the card; snap back to the pre-drag position.
    Revert,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CommitResolution {
    Played { seat: SeatKey },
    Reverted,
}

/// Drag-drop-commit state machine over all cards on the board. Owns the
/// occupancy table; the view layer feeds it pointer coordinates and element
/// rects and applies the visual effects it decides on.
pub struct DragController {
    table: OccupancyTable,
    phases: HashMap<CardId, CardPhase>,
}

impl DragController {
    pub fn new(table: OccupancyTable) -> Self {
        Self {
            table,
            phases: HashMap::new(),
        }
    }

    pub fn table(&self) -> &OccupancyTable {
        &self.table
    }

    pub fn phase(&self, card: &CardId) -> CardPhase {
        self.phases.get(card).cloned().unwrap_or(CardPhase::Idle)
    }

    pub fn can_drag(&self, card: &CardId) -> bool {
        matches!(self.phase(card), CardPhase::Idle)
    }

    /// Starts a drag at the press point. Returns false for cards that are
    /// mid-commit or already played; the press is then ignored entirely.
    pub fn begin_drag(&mut self, card: &CardId, press_x: f32, press_y: f32) -> bool {
        if !self.can_drag(card) {
            return false;
        }
        self.phases
            .insert(card.clone(), CardPhase::Dragging { press_x, press_y });
        true
    }

    /// Offset from the press point for the current pointer position. The view
    /// applies it as a direct translation, no smoothing.
    pub fn drag_offset(&self, card: &CardId, x: f32, y: f32) -> Option<(f32, f32)> {
        match self.phase(card) {
            CardPhase::Dragging { press_x, press_y } => Some((x - press_x, y - press_y)),
            _ => None,
        }
    }

    /// Aborts a drag without a drop attempt (pointer cancel, lost touch).
    pub fn cancel_drag(&mut self, card: &CardId) {
        if matches!(self.phase(card), CardPhase::Dragging { .. }) {
            self.phases.insert(card.clone(), CardPhase::Idle);
        }
    }

    /// Resolves a drop. `card_rect` must be the card's bounding box captured
    /// at release time, before any new transform is applied. Seats are
    /// scanned in document order and the first free overlapping seat wins;
    /// that seat is reserved immediately so a concurrently-committing card
    /// cannot claim it too.
    pub fn release<'a, I>(
        &mut self,
        card: &CardId,
        release_x: f32,
        release_y: f32,
        card_rect: &Rect,
        seats: I,
    ) -> ReleaseDecision
    where
        I: IntoIterator<Item = (&'a SeatKey, Rect)>,
    {
        let Some((drag_dx, drag_dy)) = self.drag_offset(card, release_x, release_y) else {
            return ReleaseDecision::Revert;
        };
        for (key, seat_rect) in seats {
            if !self.table.is_free(key) {
                continue;
            }
            if !card_rect.overlaps(&seat_rect) {
                continue;
            }
            if self.table.reserve(key, card).is_err() {
                continue;
            }
            let (shift_x, shift_y) = center_displacement(card_rect, &seat_rect);
            self.phases
                .insert(card.clone(), CardPhase::Committing { seat: key.clone() });
            return ReleaseDecision::Commit {
                seat: key.clone(),
                translate: (drag_dx + shift_x, drag_dy + shift_y),
            };
        }
        self.phases.insert(card.clone(), CardPhase::Idle);
        ReleaseDecision::Revert
    }

    /// Applies the remote answer for a card that is mid-commit. Success makes
    /// the seat permanently occupied and retires the card; any failure frees
    /// the reservation and restores the card to full interactivity.
    pub fn resolve_commit(&mut self, card: &CardId, outcome: &CommitOutcome) -> CommitResolution {
        let CardPhase::Committing { seat } = self.phase(card) else {
            return CommitResolution::Reverted;
        };
        match outcome {
            CommitOutcome::Acknowledged => {
                if self.table.commit(&seat, card).is_err() {
                    self.phases.insert(card.clone(), CardPhase::Idle);
                    return CommitResolution::Reverted;
                }
                self.phases
                    .insert(card.clone(), CardPhase::Played { seat: seat.clone() });
                CommitResolution::Played { seat }
            }
            CommitOutcome::Failed(_) => {
                let _ = self.table.release(&seat, card);
                self.phases.insert(card.clone(), CardPhase::Idle);
                CommitResolution::Reverted
            }
        }
    }
}
