mod common;

use cena_core::bookmark::{self, has_save, request_continue, BootPath};
use cena_core::decision::DecisionStore;
use cena_core::storager::types::{keys, Bookmark, JumpTicket};
use cena_core::storager::{FileStore, SharedStore, StateStore};
use cena_core::{storager, Ctx};
use common::{config, manager, memory, shown, Harness};
use serde_json::Value;

const A: &str = "NARRADOR,a0,\nNARRADOR,a1,\nNARRADOR,a2,\n";
const B: &str = "NARRADOR,b0,\nNARRADOR,b1,\n";

fn boot(store: &SharedStore) -> (cena_core::Executor, BootPath, Vec<String>) {
    let mut ctx = Ctx::default();
    let cfg = config(&[("main", &["a", "b"])]);
    let (exe, path) = bookmark::boot(&mut ctx, manager(&[("a", A), ("b", B)]), store.clone(), &cfg);
    (exe, path, shown(&ctx.drain()))
}

#[test]
fn fresh_boot_resets_decisions() {
    let store = memory();
    DecisionStore::new(store.clone()).add_affinity(5);

    let (exe, path, lines) = boot(&store);
    assert_eq!(path, BootPath::Fresh);
    assert_eq!(lines, vec!["a0"]);
    assert_eq!(exe.decisions().affinity(), 0);
}

#[test]
fn continue_resumes_the_saved_line() {
    let store = memory();
    let mut h = Harness::with_store(&[("a", A), ("b", B)], config(&[("main", &["a", "b"])]), store.clone());
    h.start();
    h.advance();
    h.advance();
    h.advance();
    h.exe.decisions().add_affinity(3);
    h.exe.save_bookmark().unwrap();
    assert!(has_save(&*store.borrow()));

    request_continue(&mut *store.borrow_mut()).unwrap();
    let (exe, path, lines) = boot(&store);
    assert_eq!(path, BootPath::Continue);
    assert_eq!(lines, vec!["b0"]);
    assert_eq!(exe.script_index(), 1);
    assert_eq!(exe.decisions().affinity(), 3);
}

#[test]
fn continue_flag_is_consumed() {
    let store = memory();
    Bookmark { scene: "main".into(), script_index: 0, line: 2 }.save(&mut *store.borrow_mut()).unwrap();
    request_continue(&mut *store.borrow_mut()).unwrap();

    assert_eq!(boot(&store).1, BootPath::Continue);
    assert_eq!(boot(&store).1, BootPath::Fresh);
}

#[test]
fn continue_without_a_save_starts_fresh() {
    let store = memory();
    request_continue(&mut *store.borrow_mut()).unwrap();
    let (_, path, lines) = boot(&store);
    assert_eq!(path, BootPath::Fresh);
    assert_eq!(lines, vec!["a0"]);
}

#[test]
fn unusable_bookmarks_start_fresh() {
    let bad = [
        Bookmark { scene: "main".into(), script_index: 9, line: 0 },
        Bookmark { scene: "attic".into(), script_index: 0, line: 0 },
    ];
    for bookmark in bad {
        let store = memory();
        bookmark.save(&mut *store.borrow_mut()).unwrap();
        request_continue(&mut *store.borrow_mut()).unwrap();
        assert_eq!(boot(&store).1, BootPath::Fresh, "{:?}", bookmark);
    }
}

#[test]
fn corrupt_bookmark_key_starts_fresh() {
    let store = memory();
    Bookmark { scene: "main".into(), script_index: 0, line: 1 }.save(&mut *store.borrow_mut()).unwrap();
    store.borrow_mut().set(keys::BOOKMARK_LINE, Value::from("not a number")).unwrap();
    assert!(Bookmark::load(&*store.borrow()).is_err());

    request_continue(&mut *store.borrow_mut()).unwrap();
    assert_eq!(boot(&store).1, BootPath::Fresh);
}

#[test]
fn pending_jump_wins_over_continue() {
    let store = memory();
    Bookmark { scene: "main".into(), script_index: 0, line: 0 }.save(&mut *store.borrow_mut()).unwrap();
    request_continue(&mut *store.borrow_mut()).unwrap();
    JumpTicket { scene: "main".into(), script: "b".into(), line: "1".into(), fade_in: false, carry_audio: false }
        .save(&mut *store.borrow_mut())
        .unwrap();

    let (_, path, lines) = boot(&store);
    assert_eq!(path, BootPath::JumpResume);
    assert_eq!(lines, vec!["b1"]);
}

#[test]
fn bookmark_survives_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = storager::shared(FileStore::in_dir(dir.path().join("saves"), "state.json"));
        let mut h = Harness::with_store(&[("a", A), ("b", B)], config(&[("main", &["a", "b"])]), store.clone());
        h.start();
        h.advance();
        h.exe.save_bookmark().unwrap();
        request_continue(&mut *store.borrow_mut()).unwrap();
    }

    let store = storager::shared(FileStore::in_dir(dir.path().join("saves"), "state.json"));
    let (_, path, lines) = boot(&store);
    assert_eq!(path, BootPath::Continue);
    assert_eq!(lines, vec!["a1"]);
}
