use leafnote_core::editor::{
    ApplyMode, BlockView, EditorConfig, EditorError, EditorSession, KeyCommand, KeyOutcome,
    ManualClock,
};
use leafnote_core::markdown::LinkResolver;
use leafnote_core::repo::page_repo::{KvPageRepository, PageRepository};
use leafnote_core::service::link_service::LinkService;
use leafnote_core::{MemoryKvStore, Page, PageId, Settings};
use std::time::Duration;
use uuid::Uuid;

struct NoLinks;

impl LinkResolver for NoLinks {
    fn resolve(&self, _title: &str) -> Option<PageId> {
        None
    }
}

fn seed<R: PageRepository>(repo: &R, title: &str, content: &str) -> PageId {
    let mut page = Page::new(title);
    page.content = content.to_string();
    repo.save_page(&page).unwrap();
    page.id
}

fn stored<R: PageRepository>(repo: &R, id: PageId) -> String {
    repo.get_page(id).unwrap().unwrap().content
}

fn blocks<R, L, C>(session: &EditorSession<R, L, C>) -> Vec<String>
where
    R: PageRepository,
    L: LinkResolver,
    C: leafnote_core::editor::Clock,
{
    session
        .document()
        .contents()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[test]
fn typing_bursts_coalesce_into_one_write_after_the_quiet_period() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "");
    let clock = ManualClock::new();
    let mut session =
        EditorSession::open_with(&repo, NoLinks, id, &clock, EditorConfig::default()).unwrap();
    session.edit_block(0);

    for (step, text) in ["h", "he", "hel", "hell", "hello"].into_iter().enumerate() {
        if step > 0 {
            clock.advance(Duration::from_millis(100));
        }
        assert!(session.update_content(0, text));
        assert!(!session.tick());
    }
    assert_eq!(session.write_count(), 0);

    clock.advance(Duration::from_millis(499));
    assert!(!session.tick());
    clock.advance(Duration::from_millis(1));
    assert!(session.tick());

    assert_eq!(session.write_count(), 1);
    assert_eq!(stored(&repo, id), "hello");
    assert!(!session.tick());
}

#[test]
fn finish_edit_writes_immediately_and_cancels_the_pending_write() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "old");
    let clock = ManualClock::new();
    let mut session =
        EditorSession::open_with(&repo, NoLinks, id, &clock, EditorConfig::default()).unwrap();

    session.edit_block(0);
    session.update_content(0, "new");
    assert!(session.has_pending_write());
    assert_eq!(session.finish_edit(), Some(0));

    assert!(!session.has_pending_write());
    assert_eq!(session.write_count(), 1);
    assert_eq!(stored(&repo, id), "new");

    clock.advance(Duration::from_secs(1));
    assert!(!session.tick());
    assert_eq!(session.finish_edit(), None);
    assert_eq!(session.write_count(), 1);
}

#[test]
fn close_flushes_a_pending_write() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "a\n\nb");
    let clock = ManualClock::new();
    let mut session =
        EditorSession::open_with(&repo, NoLinks, id, &clock, EditorConfig::default()).unwrap();

    session.update_content(1, "b changed");
    let repo = session.close();
    assert_eq!(stored(repo, id), "a\n\nb changed");
}

#[test]
fn enter_mid_text_splits_the_block_and_persists() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "hello world");
    let mut session = EditorSession::open(&repo, NoLinks, id).unwrap();

    session.edit_block(0);
    let outcome = session.handle_key(KeyCommand::Enter { shift: false }, 0, 5);

    assert_eq!(
        outcome,
        KeyOutcome::Split {
            index: 0,
            new_index: 1
        }
    );
    assert_eq!(blocks(&session), vec!["hello", " world"]);
    assert_eq!(session.document().edit_index(), Some(1));
    assert_eq!(stored(&repo, id), "hello\n\n world");
    assert!(!session.has_pending_write());
}

#[test]
fn enter_at_end_adds_an_empty_block_in_edit_mode() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "abc");
    let mut session = EditorSession::open(&repo, NoLinks, id).unwrap();

    session.edit_block(0);
    session.handle_key(KeyCommand::Enter { shift: false }, 0, 3);

    assert_eq!(blocks(&session), vec!["abc", ""]);
    assert_eq!(session.document().edit_index(), Some(1));
    assert_eq!(stored(&repo, id), "abc\n\n");
}

#[test]
fn shift_enter_is_left_to_the_text_input() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "abc");
    let mut session = EditorSession::open(&repo, NoLinks, id).unwrap();

    session.edit_block(0);
    let outcome = session.handle_key(KeyCommand::Enter { shift: true }, 0, 1);
    assert_eq!(outcome, KeyOutcome::Ignored);
    assert_eq!(blocks(&session), vec!["abc"]);
    assert_eq!(session.write_count(), 0);
}

#[test]
fn backspace_in_empty_block_removes_it_and_focuses_the_previous_one() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "abc\n\n");
    let mut session = EditorSession::open(&repo, NoLinks, id).unwrap();
    assert_eq!(blocks(&session), vec!["abc", ""]);

    session.edit_block(1);
    let outcome = session.handle_key(KeyCommand::Backspace, 1, 0);

    assert_eq!(
        outcome,
        KeyOutcome::RemovedEmpty {
            removed: 1,
            focus: 0
        }
    );
    assert_eq!(blocks(&session), vec!["abc"]);
    assert_eq!(session.document().edit_index(), Some(0));
    assert_eq!(stored(&repo, id), "abc");
}

#[test]
fn arrows_move_focus_only_from_text_edges() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "one\n\ntwo");
    let mut session = EditorSession::open(&repo, NoLinks, id).unwrap();

    session.edit_block(0);
    assert_eq!(
        session.handle_key(KeyCommand::ArrowDown, 0, 1),
        KeyOutcome::Ignored
    );
    assert_eq!(
        session.handle_key(KeyCommand::ArrowDown, 0, 3),
        KeyOutcome::FocusMoved { from: 0, to: 1 }
    );
    assert_eq!(session.document().edit_index(), Some(1));
    assert_eq!(
        session.handle_key(KeyCommand::ArrowDown, 1, 3),
        KeyOutcome::Ignored
    );
    assert_eq!(
        session.handle_key(KeyCommand::ArrowUp, 1, 0),
        KeyOutcome::FocusMoved { from: 1, to: 0 }
    );
    assert_eq!(
        session.handle_key(KeyCommand::Escape, 0, 0),
        KeyOutcome::Exited { index: 0 }
    );
    assert_eq!(session.document().edit_index(), None);
}

#[test]
fn keys_for_blocks_not_in_edit_mode_do_nothing() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "a\n\nb");
    let mut session = EditorSession::open(&repo, NoLinks, id).unwrap();

    assert_eq!(
        session.handle_key(KeyCommand::Escape, 0, 0),
        KeyOutcome::Ignored
    );
    session.edit_block(1);
    assert_eq!(
        session.handle_key(KeyCommand::Backspace, 0, 0),
        KeyOutcome::Ignored
    );
    assert_eq!(session.write_count(), 0);
}

#[test]
fn out_of_range_edit_keeps_the_current_focus() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "a");
    let mut session = EditorSession::open(&repo, NoLinks, id).unwrap();

    assert!(session.edit_block(0));
    assert!(!session.edit_block(9));
    assert_eq!(session.document().edit_index(), Some(0));
    assert_eq!(session.write_count(), 0);
}

#[test]
fn selection_changes_do_not_write_but_bulk_delete_does() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "a\n\nb\n\nc\n\nd");
    let mut session = EditorSession::open(&repo, NoLinks, id).unwrap();

    session.toggle_selection(1, true);
    session.toggle_selection(3, true);
    session.toggle_selection(2, true);
    session.toggle_selection(2, false);
    assert_eq!(session.write_count(), 0);

    assert_eq!(session.delete_selected(), 2);
    assert_eq!(session.write_count(), 1);
    assert_eq!(stored(&repo, id), "a\n\nc");

    assert_eq!(session.delete_selected(), 0);
    assert_eq!(session.write_count(), 1);
}

#[test]
fn insert_and_delete_blocks_write_immediately() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "only");
    let mut session = EditorSession::open(&repo, NoLinks, id).unwrap();

    assert_eq!(session.insert_block(1, "second"), 1);
    assert_eq!(stored(&repo, id), "only\n\nsecond");
    assert!(session.delete_block(0));
    assert!(session.delete_block(0));
    assert_eq!(blocks(&session), vec![""]);
    assert_eq!(stored(&repo, id), "");
    assert_eq!(session.write_count(), 3);
}

#[test]
fn insert_at_cursor_appends_to_the_edited_block_and_keeps_editing() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "first\n\nsecond");
    let mut session = EditorSession::open(&repo, NoLinks, id).unwrap();

    session.edit_block(0);
    session.insert_page_link("Reading List");

    assert_eq!(blocks(&session), vec!["first[[Reading List]]", "second"]);
    assert_eq!(session.document().edit_index(), Some(0));
    assert_eq!(session.write_count(), 1);
}

#[test]
fn insert_at_cursor_without_focus_appends_to_the_last_block() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "first\n\nsecond");
    let clock = ManualClock::new();
    let mut session =
        EditorSession::open_with(&repo, NoLinks, id, &clock, EditorConfig::default()).unwrap();

    session.insert_at_cursor(" note");
    assert_eq!(blocks(&session), vec!["first", "second note"]);
    assert!(session.has_pending_write());
    assert_eq!(session.write_count(), 0);

    clock.advance(Duration::from_millis(500));
    assert!(session.tick());
    assert_eq!(stored(&repo, id), "first\n\nsecond note");
}

#[test]
fn rendering_shows_raw_text_only_for_the_edited_block() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let target = seed(&repo, "Reading List", "");
    let id = seed(&repo, "Draft", "see [[reading list]]\n\n**bold**\n\n[[Nowhere]]");
    let links = LinkService::new(&repo);
    let mut session = EditorSession::open(&repo, links, id).unwrap();

    session.edit_block(1);
    let views = session.render_all();
    assert_eq!(views.len(), 3);

    match &views[0] {
        BlockView::Rendered { html } => {
            assert!(html.contains(&format!("href=\"#/page/{target}\"")));
            assert!(html.contains(">reading list</a>"));
        }
        other => panic!("expected rendered block, got {other:?}"),
    }
    assert_eq!(
        views[1],
        BlockView::Editing {
            raw: "**bold**".to_string()
        }
    );
    match &views[2] {
        BlockView::Rendered { html } => assert!(html.contains("href=\"#/new-page/Nowhere\"")),
        other => panic!("expected rendered block, got {other:?}"),
    }
    assert!(session.render_block(3).is_none());
}

#[test]
fn failed_writes_are_dropped_without_retry() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "before");
    let clock = ManualClock::new();
    let mut session =
        EditorSession::open_with(&repo, NoLinks, id, &clock, EditorConfig::default()).unwrap();

    session.edit_block(0);
    session.update_content(0, "after");
    store.set_offline(true);
    session.finish_edit();
    assert_eq!(session.write_count(), 0);
    assert!(!session.has_pending_write());

    store.set_offline(false);
    clock.advance(Duration::from_secs(5));
    assert!(!session.tick());
    assert_eq!(stored(&repo, id), "before");
}

#[test]
fn transform_source_and_apply_text_follow_the_selection() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "a\n\nb\n\nc");
    let mut session = EditorSession::open(&repo, NoLinks, id).unwrap();

    assert_eq!(session.transform_source(), "a\n\nb\n\nc");
    session.toggle_selection(1, true);
    assert_eq!(session.transform_source(), "b");

    session.apply_text("B", ApplyMode::Replace);
    assert_eq!(blocks(&session), vec!["a", "B", "c"]);
    assert_eq!(stored(&repo, id), "a\n\nB\n\nc");

    session.apply_text("tail", ApplyMode::InsertBelow);
    assert_eq!(blocks(&session), vec!["a", "B", "c", "tail"]);
}

#[test]
fn multi_paragraph_results_land_as_separate_blocks() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "a\n\nb");
    let mut session = EditorSession::open(&repo, NoLinks, id).unwrap();

    session.toggle_selection(1, true);
    session.apply_text("p1\n\np2", ApplyMode::Replace);
    assert_eq!(blocks(&session), vec!["a", "p1", "p2"]);

    session.toggle_selection(0, true);
    session.apply_text("q1\n\nq2", ApplyMode::InsertBelow);
    assert_eq!(blocks(&session), vec!["a", "q1", "q2", "p1", "p2"]);

    let reopened = EditorSession::open(&repo, NoLinks, id).unwrap();
    assert_eq!(blocks(&reopened), blocks(&session));
}

#[test]
fn replacing_a_selection_keeps_unselected_empty_blocks() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "");
    let mut session = EditorSession::open(&repo, NoLinks, id).unwrap();
    session.insert_block(1, "x");
    assert_eq!(blocks(&session), vec!["", "x"]);

    session.toggle_selection(1, true);
    session.apply_text("T", ApplyMode::Replace);
    assert_eq!(blocks(&session), vec!["", "T"]);
}

#[test]
fn replacing_every_selected_block_replaces_the_page() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let id = seed(&repo, "Draft", "a\n\nb");
    let mut session = EditorSession::open(&repo, NoLinks, id).unwrap();
    session.toggle_selection(0, true);
    session.toggle_selection(1, true);

    session.apply_text("only", ApplyMode::Replace);
    assert_eq!(blocks(&session), vec!["only"]);
    assert_eq!(stored(&repo, id), "only");
}

#[test]
fn opening_a_missing_page_fails() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let missing = Uuid::new_v4();
    match EditorSession::open(&repo, NoLinks, missing) {
        Err(EditorError::PageNotFound(id)) => assert_eq!(id, missing),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("missing page should not open"),
    }
}

#[test]
fn config_uses_the_autosave_delay_from_settings() {
    let settings = Settings {
        autosave_delay_ms: 1200,
        ..Settings::default()
    };
    assert_eq!(
        EditorConfig::from_settings(&settings).debounce,
        Duration::from_millis(1200)
    );
}
