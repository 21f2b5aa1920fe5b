use leafnote_core::editor::EditorSession;
use leafnote_core::markdown::LinkResolver;
use leafnote_core::repo::page_repo::{KvPageRepository, PageRepository};
use leafnote_core::speech::{dictate_into, SpeechEvent, TranscriptBuffer};
use leafnote_core::{MemoryKvStore, Page, PageId};

struct NoLinks;

impl LinkResolver for NoLinks {
    fn resolve(&self, _title: &str) -> Option<PageId> {
        None
    }
}

fn buffer_with(events: &[SpeechEvent]) -> TranscriptBuffer {
    let mut buffer = TranscriptBuffer::new();
    for event in events {
        buffer.push(event.clone());
    }
    buffer
}

#[test]
fn transcript_goes_into_the_edited_block() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let mut page = Page::new("Shopping");
    page.content = "List: \n\nother".to_string();
    repo.save_page(&page).unwrap();
    let mut session = EditorSession::open(&repo, NoLinks, page.id).unwrap();
    session.edit_block(0);

    let mut buffer = buffer_with(&[
        SpeechEvent::Interim("bread".to_string()),
        SpeechEvent::Final("bread".to_string()),
        SpeechEvent::Final("and butter".to_string()),
        SpeechEvent::Interim("and ja".to_string()),
    ]);

    let inserted = dictate_into(&mut session, &mut buffer);

    assert_eq!(inserted.as_deref(), Some("bread and butter"));
    assert_eq!(session.document().content(0), Some("List:bread and butter"));
    assert_eq!(session.document().edit_index(), Some(0));
    assert_eq!(
        repo.get_page(page.id).unwrap().unwrap().content,
        "List:bread and butter\n\nother"
    );
    assert!(buffer.is_empty());
}

#[test]
fn empty_transcript_changes_nothing() {
    let store = MemoryKvStore::new();
    let repo = KvPageRepository::new(&store);
    let page = Page::new("Quiet");
    repo.save_page(&page).unwrap();
    let mut session = EditorSession::open(&repo, NoLinks, page.id).unwrap();

    let mut buffer = buffer_with(&[SpeechEvent::Interim("um".to_string())]);
    assert_eq!(dictate_into(&mut session, &mut buffer), None);
    assert_eq!(session.serialized(), "");
    assert!(!session.has_pending_write());
}
