use std::time::Duration;

use courtboard::{
    customization::CustomizationPatch,
    persist::{BackendConfig, open_formation_store},
    runtime::{
        events::{CourtEvent, LibraryEvent},
        handle::{FormationLibraryHandle, LibraryConfig, RuntimeError, spawn_library},
        session::{CourtSession, SessionError},
    },
    types::{CourtSize, GameMode, MarkerId, Position},
};
use tempfile::TempDir;
use tokio::sync::broadcast;

fn in_memory_library() -> FormationLibraryHandle {
    let store = open_formation_store(&BackendConfig::InMemory).expect("open store");
    spawn_library(store, LibraryConfig::default())
}

fn drain<T: Clone>(rx: &mut broadcast::Receiver<T>) -> Vec<T> {
    let mut out = Vec::new();
    while let Ok(evt) = rx.try_recv() {
        out.push(evt);
    }
    out
}

async fn next_event(rx: &mut broadcast::Receiver<LibraryEvent>) -> LibraryEvent {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("event")
        .expect("recv")
}

fn drag(session: &mut CourtSession, marker: MarkerId, to: Position) {
    session.on_position_start(marker, to);
    session.on_position_change(marker, to);
    session.on_position_change_complete();
}

#[tokio::test]
async fn library_save_rename_remove_emit_events_in_order() {
    let library = in_memory_library();
    let mut sub = library.subscribe();
    let session =
        CourtSession::new(library.clone(), GameMode::Singles, CourtSize::new(100.0, 100.0));

    let draft = courtboard::formation::FormationDraft {
        name: "A".to_string(),
        is_doubles: false,
        position_history: session.history().entries().to_vec(),
        customizations: session.customizations().clone(),
    };
    let a = library.save(draft.clone()).await.expect("save A");
    let b = library
        .save(courtboard::formation::FormationDraft {
            name: "B".to_string(),
            ..draft
        })
        .await
        .expect("save B");

    let listed: Vec<String> = library
        .list()
        .await
        .expect("list")
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(listed, vec!["B", "A"]);

    assert!(library.rename(a.id.clone(), "A2").await.expect("rename"));
    assert!(!library.rename("unknown", "X").await.expect("rename unknown"));
    assert!(library.remove(b.id.clone()).await.expect("remove"));
    assert!(!library.remove(b.id.clone()).await.expect("remove again"));
    assert!(library.load(b.id.clone()).await.expect("load").is_none());

    assert_eq!(next_event(&mut sub).await, LibraryEvent::Saved { id: a.id.clone() });
    assert_eq!(next_event(&mut sub).await, LibraryEvent::Saved { id: b.id.clone() });
    assert_eq!(next_event(&mut sub).await, LibraryEvent::Renamed { id: a.id.clone() });
    assert_eq!(next_event(&mut sub).await, LibraryEvent::Removed { id: b.id.clone() });

    library.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn session_callbacks_drive_history_and_events() {
    let library = in_memory_library();
    let mut session =
        CourtSession::new(library.clone(), GameMode::Singles, CourtSize::new(100.0, 100.0));
    let mut events = session.subscribe();

    session.on_position_start(MarkerId::Shuttle, Position::new(60.0, 60.0));
    session.on_position_change(MarkerId::Shuttle, Position::new(70.0, 70.0));
    session.on_position_change(MarkerId::Shuttle, Position::new(80.0, 80.0));
    assert_eq!(session.history().len(), 1);
    session.on_position_change_complete();

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history.cursor(), 1);
    assert!(history.can_undo());
    assert!(!history.can_redo());

    let seen = drain(&mut events);
    let moves = seen
        .iter()
        .filter(|e| matches!(e, CourtEvent::PositionsChanged { .. }))
        .count();
    assert_eq!(moves, 3);
    assert_eq!(
        seen.last(),
        Some(&CourtEvent::HistoryChanged {
            cursor: 1,
            len: 2,
            can_undo: true,
            can_redo: false,
        })
    );

    let trails = session.trails();
    assert_eq!(trails.len(), 3);
    let shuttle = trails
        .iter()
        .find(|t| t.marker == MarkerId::Shuttle)
        .expect("shuttle trail");
    assert_eq!(shuttle.from, Position::new(50.0, 50.0));
    assert_eq!(shuttle.to, Position::new(80.0, 80.0));

    session.toggle_player_trails();
    assert_eq!(session.trails().len(), 1);

    session.undo();
    assert!(session.trails().is_empty());
    assert!(session.history().can_redo());

    session.toggle_mode(true);
    assert_eq!(session.history().mode(), GameMode::Doubles);
    assert!(drain(&mut events).contains(&CourtEvent::ModeChanged { mode: GameMode::Doubles }));

    library.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn save_then_load_round_trips_court_and_tracks_unsaved_changes() {
    let tmp = TempDir::new().expect("tmp");
    let store = open_formation_store(&BackendConfig::Directory {
        root: tmp.path().to_path_buf(),
    })
    .expect("open store");
    let library = spawn_library(store, LibraryConfig::default());
    let court = CourtSize::new(390.0, 700.0);

    let mut session = CourtSession::new(library.clone(), GameMode::Doubles, court);
    assert!(!session.has_unsaved_changes());

    drag(&mut session, MarkerId::P2, Position::new(300.0, 600.0));
    drag(&mut session, MarkerId::Shuttle, Position::new(100.0, 100.0));
    session.update_marker_customization(
        MarkerId::Shuttle,
        &CustomizationPatch {
            color: Some("#FFEB3B".to_string()),
            ..CustomizationPatch::default()
        },
    );
    assert!(session.has_unsaved_changes());

    let saved = session
        .on_save_formation("  Clear to the back  ")
        .await
        .expect("save");
    assert_eq!(saved.name, "Clear to the back");
    assert_eq!(saved.step_count(), 3);
    assert!(!session.has_unsaved_changes());

    let mut other = CourtSession::new(library.clone(), GameMode::Singles, court);
    assert!(other.load_formation_by_id(&saved.id).await.expect("load"));
    assert_eq!(other.history().entries(), session.history().entries());
    assert_eq!(other.history().cursor(), 2);
    assert_eq!(other.history().mode(), GameMode::Doubles);
    assert_eq!(other.customizations().get(MarkerId::Shuttle).color, "#FFEB3B");
    assert!(!other.has_unsaved_changes());

    assert!(!other
        .load_formation_by_id(&"missing".to_string())
        .await
        .expect("load missing"));

    drag(&mut other, MarkerId::P1, Position::new(10.0, 10.0));
    assert!(other.has_unsaved_changes());

    library.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn save_and_load_report_distinct_failures() {
    let library = in_memory_library();
    let mut session = CourtSession::new(library.clone(), GameMode::Singles, CourtSize::default());

    let err = session.on_save_formation("   ").await.expect_err("blank name");
    assert!(matches!(err, SessionError::EmptyName));

    library.shutdown().await.expect("shutdown");
    let err = session.on_save_formation("After shutdown").await.expect_err("closed");
    assert!(matches!(err, SessionError::Save(RuntimeError::ChannelClosed)));
    assert_eq!(err.user_message(), "Failed to save formation.");

    let err = session
        .load_formation_by_id(&"abc123".to_string())
        .await
        .expect_err("closed");
    assert!(matches!(err, SessionError::Load(RuntimeError::ChannelClosed)));
    assert_eq!(err.user_message(), "Failed to load formation.");
}
