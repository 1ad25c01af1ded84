use criterion::{Criterion, criterion_group, criterion_main};

use courtboard::{
    core::history::PositionHistory,
    customization::Customizations,
    formation::FormationDraft,
    persist::{FormationStore, collection::CollectionFormationStore, memory::MemoryStorage},
    types::{CourtSize, GameMode, MarkerId, Position},
};

const COURT: CourtSize = CourtSize {
    width: 390.0,
    height: 700.0,
};

fn gesture(history: PositionHistory, marker: MarkerId, step: u32) -> PositionHistory {
    let mut h = history.begin_drag(marker, Position::new(0.0, 0.0));
    for i in 0..60u32 {
        let t = f64::from(i + step);
        h = h.update_drag(marker, Position::new(t * 3.0, t * 5.0));
    }
    h.end_drag()
}

fn bench_drag_gestures(c: &mut Criterion) {
    c.bench_function("history_gestures_1k", |b| {
        b.iter(|| {
            let mut history = PositionHistory::new(GameMode::Doubles, COURT);
            for i in 0..1_000u32 {
                let marker = MarkerId::ALL[(i % 5) as usize];
                history = gesture(history, marker, i);
            }
            history
        });
    });
}

fn bench_undo_redo(c: &mut Criterion) {
    let mut seeded = PositionHistory::new(GameMode::Doubles, COURT);
    for i in 0..400u32 {
        seeded = gesture(seeded, MarkerId::Shuttle, i);
    }

    c.bench_function("history_undo_redo_sweep", |b| {
        b.iter(|| {
            let mut h = seeded.clone();
            while h.can_undo() {
                h = h.undo();
            }
            while h.can_redo() {
                h = h.redo();
            }
            h
        });
    });
}

fn bench_collection_save(c: &mut Criterion) {
    let mut history = PositionHistory::new(GameMode::Doubles, COURT);
    for i in 0..50u32 {
        history = gesture(history, MarkerId::P1, i);
    }
    let draft = FormationDraft {
        name: "Bench".to_string(),
        is_doubles: true,
        position_history: history.entries().to_vec(),
        customizations: Customizations::default(),
    };

    c.bench_function("collection_save_100", |b| {
        b.iter(|| {
            let mut store = CollectionFormationStore::new(MemoryStorage::new());
            for _ in 0..100 {
                let _ = store.save(draft.clone()).expect("save");
            }
        });
    });
}

criterion_group!(benches, bench_drag_gestures, bench_undo_redo, bench_collection_save);
criterion_main!(benches);
