use proptest::prelude::*;

use courtboard::{
    core::{bounds::clamp, history::PositionHistory},
    types::{CourtSize, GameMode, MarkerId, Position},
};

const COURT: CourtSize = CourtSize {
    width: 400.0,
    height: 800.0,
};

#[derive(Debug, Clone)]
enum Action {
    Gesture { marker: u8, moves: Vec<(i16, i16)> },
    Undo,
    Redo,
    UndoThenRedo,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => (0u8..5, prop::collection::vec((-100i16..500, -100i16..900), 1..12))
            .prop_map(|(marker, moves)| Action::Gesture { marker, moves }),
        2 => Just(Action::Undo),
        1 => Just(Action::Redo),
        1 => Just(Action::UndoThenRedo),
    ]
}

fn pos((x, y): (i16, i16)) -> Position {
    Position::new(f64::from(x), f64::from(y))
}

fn assert_invariants(h: &PositionHistory) -> Result<(), TestCaseError> {
    prop_assert!(h.len() >= 1);
    prop_assert!(h.cursor() < h.len());
    prop_assert_eq!(h.can_undo(), h.cursor() != 0);
    prop_assert_eq!(h.can_redo(), h.cursor() != h.len() - 1);
    match h.ghost_positions() {
        None => prop_assert_eq!(h.cursor(), 0),
        Some(ghost) => prop_assert_eq!(ghost, &h.entries()[h.cursor() - 1]),
    }
    Ok(())
}

proptest! {
    #[test]
    fn gestures_append_one_entry_and_undo_redo_round_trips(
        is_doubles in any::<bool>(),
        actions in prop::collection::vec(action_strategy(), 1..120),
    ) {
        let mut history = PositionHistory::new(GameMode::from_is_doubles(is_doubles), COURT);

        for action in actions {
            match action {
                Action::Gesture { marker, moves } => {
                    let marker = MarkerId::ALL[usize::from(marker)];
                    let cursor_before = history.cursor();
                    let last = *moves.last().expect("non-empty");

                    history = history.begin_drag(marker, pos(moves[0]));
                    for m in &moves[1..] {
                        history = history.update_drag(marker, pos(*m));
                    }
                    prop_assert!(history.is_dragging());
                    history = history.end_drag();

                    prop_assert_eq!(history.len(), cursor_before + 2);
                    prop_assert_eq!(history.cursor(), history.len() - 1);
                    prop_assert!(!history.can_redo());
                    prop_assert_eq!(history.current().position(marker), clamp(pos(last), COURT));
                }
                Action::Undo => {
                    history = history.undo();
                }
                Action::Redo => {
                    history = history.redo();
                }
                Action::UndoThenRedo => {
                    let before = *history.current();
                    let could_undo = history.can_undo();
                    history = history.undo().redo();
                    if could_undo {
                        prop_assert_eq!(*history.current(), before);
                    }
                }
            }

            assert_invariants(&history)?;
        }
    }

    #[test]
    fn clamp_always_lands_inside_court(x in -1e6f64..1e6, y in -1e6f64..1e6) {
        let p = clamp(Position::new(x, y), COURT);
        prop_assert!((0.0..=COURT.width).contains(&p.x));
        prop_assert!((0.0..=COURT.height).contains(&p.y));
    }
}
