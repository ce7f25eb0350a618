use zaseki_core::{
    CardId, CardPhase, CommitError, CommitOutcome, CommitResolution, DragController,
    OccupancyTable, Rect, ReleaseDecision, SeatKey,
};

fn seat(key: &str) -> SeatKey {
    SeatKey::parse(key).unwrap()
}

fn card(id: &str) -> CardId {
    CardId::parse(id).unwrap()
}

fn controller(seats: &[&str]) -> DragController {
    DragController::new(OccupancyTable::new(seats.iter().map(|key| seat(key))))
}

const CARD_AT_ORIGIN: Rect = Rect {
    left: 0.0,
    top: 0.0,
    width: 40.0,
    height: 60.0,
};

fn seat_rects(rects: &[(&str, Rect)]) -> Vec<(SeatKey, Rect)> {
    rects
        .iter()
        .map(|(key, rect)| (seat(key), *rect))
        .collect()
}

fn release(
    controller: &mut DragController,
    card_id: &CardId,
    at: (f32, f32),
    card_rect: &Rect,
    seats: &[(SeatKey, Rect)],
) -> ReleaseDecision {
    controller.release(
        card_id,
        at.0,
        at.1,
        card_rect,
        seats.iter().map(|(key, rect)| (key, *rect)),
    )
}

#[test]
fn successful_commit_occupies_seat_and_retires_card() {
    let mut controller = controller(&["seat-1"]);
    let c = card("alpha");
    let seats = seat_rects(&[("seat-1", Rect::new(100.0, 100.0, 80.0, 80.0))]);

    assert!(controller.begin_drag(&c, 20.0, 30.0));
    assert_eq!(
        controller.drag_offset(&c, 130.0, 140.0),
        Some((110.0, 110.0))
    );

    // Bounding box captured at release, already translated by the drag.
    let card_rect = CARD_AT_ORIGIN.translated(110.0, 110.0);
    let decision = release(&mut controller, &c, (130.0, 140.0), &card_rect, &seats);
    let ReleaseDecision::Commit { seat: target, translate } = decision else {
        panic!("expected commit decision, got {decision:?}");
    };
    assert_eq!(target, seat("seat-1"));
    // Drag offset plus center-to-center shift lands the card on the seat center.
    let final_rect = CARD_AT_ORIGIN.translated(translate.0, translate.1);
    assert_eq!(final_rect.center(), seats[0].1.center());

    let resolution = controller.resolve_commit(&c, &CommitOutcome::Acknowledged);
    assert_eq!(
        resolution,
        CommitResolution::Played { seat: seat("seat-1") }
    );
    assert_eq!(controller.table().occupant(&seat("seat-1")), Some(&c));
    assert!(!controller.can_drag(&c));
    assert!(!controller.begin_drag(&c, 0.0, 0.0));
    assert_eq!(controller.phase(&c), CardPhase::Played { seat: seat("seat-1") });
}

#[test]
fn release_without_overlap_reverts_and_touches_nothing() {
    let mut controller = controller(&["seat-1"]);
    let c = card("alpha");
    let seats = seat_rects(&[("seat-1", Rect::new(500.0, 500.0, 80.0, 80.0))]);

    assert!(controller.begin_drag(&c, 10.0, 10.0));
    let card_rect = CARD_AT_ORIGIN.translated(5.0, 5.0);
    let decision = release(&mut controller, &c, (15.0, 15.0), &card_rect, &seats);
    assert_eq!(decision, ReleaseDecision::Revert);
    assert_eq!(controller.phase(&c), CardPhase::Idle);
    assert!(controller.table().is_free(&seat("seat-1")));
    assert!(controller.can_drag(&c));
}

#[test]
fn occupied_seat_is_skipped_even_when_rectangles_overlap() {
    let mut controller = controller(&["seat-1"]);
    let first = card("alpha");
    let second = card("beta");
    let rect = Rect::new(10.0, 10.0, 80.0, 80.0);
    let seats = seat_rects(&[("seat-1", rect)]);

    assert!(controller.begin_drag(&first, 0.0, 0.0));
    let decision = release(&mut controller, &first, (0.0, 0.0), &CARD_AT_ORIGIN, &seats);
    assert!(matches!(decision, ReleaseDecision::Commit { .. }));
    controller.resolve_commit(&first, &CommitOutcome::Acknowledged);

    assert!(controller.begin_drag(&second, 0.0, 0.0));
    let decision = release(&mut controller, &second, (0.0, 0.0), &CARD_AT_ORIGIN, &seats);
    assert_eq!(decision, ReleaseDecision::Revert);
    assert_eq!(controller.table().occupant(&seat("seat-1")), Some(&first));
}

#[test]
fn server_error_reverts_and_leaves_card_retryable() {
    let mut controller = controller(&["seat-1"]);
    let c = card("alpha");
    let seats = seat_rects(&[("seat-1", Rect::new(10.0, 10.0, 80.0, 80.0))]);

    assert!(controller.begin_drag(&c, 0.0, 0.0));
    let decision = release(&mut controller, &c, (0.0, 0.0), &CARD_AT_ORIGIN, &seats);
    assert!(matches!(decision, ReleaseDecision::Commit { .. }));

    let resolution =
        controller.resolve_commit(&c, &CommitOutcome::Failed(CommitError::Status(503)));
    assert_eq!(resolution, CommitResolution::Reverted);
    assert!(controller.table().is_free(&seat("seat-1")));
    assert!(controller.can_drag(&c));

    // A later attempt on the same seat still goes through.
    assert!(controller.begin_drag(&c, 0.0, 0.0));
    let decision = release(&mut controller, &c, (0.0, 0.0), &CARD_AT_ORIGIN, &seats);
    assert!(matches!(decision, ReleaseDecision::Commit { .. }));
    let resolution = controller.resolve_commit(&c, &CommitOutcome::Acknowledged);
    assert_eq!(
        resolution,
        CommitResolution::Played { seat: seat("seat-1") }
    );
}

#[test]
fn all_failure_kinds_take_the_same_revert_path() {
    let failures = [
        CommitError::Transport("connection refused".to_string()),
        CommitError::Status(500),
        // Covers the 200-with-garbage-body case: parse failure, not status.
        CommitError::InvalidBody("EOF while parsing a value".to_string()),
        CommitError::TimedOut,
    ];
    for failure in failures {
        let mut controller = controller(&["seat-1"]);
        let c = card("alpha");
        let seats = seat_rects(&[("seat-1", Rect::new(10.0, 10.0, 80.0, 80.0))]);
        assert!(controller.begin_drag(&c, 0.0, 0.0));
        release(&mut controller, &c, (0.0, 0.0), &CARD_AT_ORIGIN, &seats);
        let resolution =
            controller.resolve_commit(&c, &CommitOutcome::Failed(failure.clone()));
        assert_eq!(resolution, CommitResolution::Reverted, "failure: {failure}");
        assert!(controller.table().is_free(&seat("seat-1")));
    }
}

#[test]
fn two_cards_racing_for_one_seat_yield_exactly_one_play() {
    let mut controller = controller(&["seat-1"]);
    let first = card("alpha");
    let second = card("beta");
    let seats = seat_rects(&[("seat-1", Rect::new(10.0, 10.0, 80.0, 80.0))]);

    assert!(controller.begin_drag(&first, 0.0, 0.0));
    assert!(controller.begin_drag(&second, 0.0, 0.0));

    // First release reserves the seat while its commit is still in flight.
    let decision = release(&mut controller, &first, (0.0, 0.0), &CARD_AT_ORIGIN, &seats);
    assert!(matches!(decision, ReleaseDecision::Commit { .. }));

    // Second release finds the seat reserved and must revert immediately.
    let decision = release(&mut controller, &second, (0.0, 0.0), &CARD_AT_ORIGIN, &seats);
    assert_eq!(decision, ReleaseDecision::Revert);

    let resolution = controller.resolve_commit(&first, &CommitOutcome::Acknowledged);
    assert_eq!(
        resolution,
        CommitResolution::Played { seat: seat("seat-1") }
    );
    assert_eq!(controller.table().occupant(&seat("seat-1")), Some(&first));
    assert_eq!(controller.phase(&second), CardPhase::Idle);
}

#[test]
fn reservation_frees_up_for_the_loser_after_a_failed_commit() {
    let mut controller = controller(&["seat-1"]);
    let first = card("alpha");
    let second = card("beta");
    let seats = seat_rects(&[("seat-1", Rect::new(10.0, 10.0, 80.0, 80.0))]);

    controller.begin_drag(&first, 0.0, 0.0);
    release(&mut controller, &first, (0.0, 0.0), &CARD_AT_ORIGIN, &seats);
    controller.resolve_commit(&first, &CommitOutcome::Failed(CommitError::TimedOut));

    controller.begin_drag(&second, 0.0, 0.0);
    let decision = release(&mut controller, &second, (0.0, 0.0), &CARD_AT_ORIGIN, &seats);
    assert!(matches!(decision, ReleaseDecision::Commit { .. }));
}

#[test]
fn first_free_overlapping_seat_in_document_order_wins() {
    let mut controller = controller(&["seat-1", "seat-2"]);
    let c = card("alpha");
    // Both seats overlap the card; document order decides.
    let seats = seat_rects(&[
        ("seat-1", Rect::new(10.0, 10.0, 80.0, 80.0)),
        ("seat-2", Rect::new(20.0, 20.0, 80.0, 80.0)),
    ]);

    controller.begin_drag(&c, 0.0, 0.0);
    let decision = release(&mut controller, &c, (0.0, 0.0), &CARD_AT_ORIGIN, &seats);
    let ReleaseDecision::Commit { seat: target, .. } = decision else {
        panic!("expected commit decision");
    };
    assert_eq!(target, seat("seat-1"));
}

#[test]
fn occupied_first_seat_falls_through_to_the_next_in_order() {
    let mut controller = controller(&["seat-1", "seat-2"]);
    let first = card("alpha");
    let second = card("beta");
    let seats = seat_rects(&[
        ("seat-1", Rect::new(10.0, 10.0, 80.0, 80.0)),
        ("seat-2", Rect::new(20.0, 20.0, 80.0, 80.0)),
    ]);

    controller.begin_drag(&first, 0.0, 0.0);
    release(&mut controller, &first, (0.0, 0.0), &CARD_AT_ORIGIN, &seats);
    controller.resolve_commit(&first, &CommitOutcome::Acknowledged);

    controller.begin_drag(&second, 0.0, 0.0);
    let decision = release(&mut controller, &second, (0.0, 0.0), &CARD_AT_ORIGIN, &seats);
    let ReleaseDecision::Commit { seat: target, .. } = decision else {
        panic!("expected commit decision");
    };
    assert_eq!(target, seat("seat-2"));
}

#[test]
fn played_card_stays_played_whatever_arrives_later() {
    let mut controller = controller(&["seat-1"]);
    let c = card("alpha");
    let seats = seat_rects(&[("seat-1", Rect::new(10.0, 10.0, 80.0, 80.0))]);

    controller.begin_drag(&c, 0.0, 0.0);
    release(&mut controller, &c, (0.0, 0.0), &CARD_AT_ORIGIN, &seats);
    controller.resolve_commit(&c, &CommitOutcome::Acknowledged);

    // Stray resolutions and drags after the terminal state are all no-ops.
    let resolution =
        controller.resolve_commit(&c, &CommitOutcome::Failed(CommitError::TimedOut));
    assert_eq!(resolution, CommitResolution::Reverted);
    assert_eq!(controller.table().occupant(&seat("seat-1")), Some(&c));
    assert!(!controller.begin_drag(&c, 0.0, 0.0));
    assert_eq!(controller.drag_offset(&c, 5.0, 5.0), None);
}

#[test]
fn cancel_drag_returns_card_to_idle_without_a_drop_attempt() {
    let mut controller = controller(&["seat-1"]);
    let c = card("alpha");

    controller.begin_drag(&c, 10.0, 10.0);
    controller.cancel_drag(&c);
    assert_eq!(controller.phase(&c), CardPhase::Idle);
    assert!(controller.table().is_free(&seat("seat-1")));
}

#[test]
fn release_without_a_live_drag_reverts() {
    let mut controller = controller(&["seat-1"]);
    let c = card("alpha");
    let seats = seat_rects(&[("seat-1", Rect::new(10.0, 10.0, 80.0, 80.0))]);

    let decision = release(&mut controller, &c, (0.0, 0.0), &CARD_AT_ORIGIN, &seats);
    assert_eq!(decision, ReleaseDecision::Revert);
    assert!(controller.table().is_free(&seat("seat-1")));
}

#[test]
fn independent_cards_drag_concurrently() {
    let mut controller = controller(&["seat-1", "seat-2"]);
    let first = card("alpha");
    let second = card("beta");

    assert!(controller.begin_drag(&first, 0.0, 0.0));
    assert!(controller.begin_drag(&second, 100.0, 100.0));
    assert_eq!(controller.drag_offset(&first, 10.0, 0.0), Some((10.0, 0.0)));
    assert_eq!(
        controller.drag_offset(&second, 100.0, 110.0),
        Some((0.0, 10.0))
    );
}
