use std::sync::Arc;

use tankobon_application::{EntryPoint, InputEvent, InputQueue, Key, KeyInput, SessionOutcome};
use tankobon_core::{ChapterId, FetchError, ReadingMode, SeriesId, navigator};
use tankobon_test::{SERIES, make_chapter, make_chapters, memory_backend, session_over};

fn navigate_target(outcome: &SessionOutcome) -> Option<(String, EntryPoint)> {
    match outcome {
        SessionOutcome::Navigate(request) => {
            Some((request.chapter_id.as_str().to_string(), request.entry))
        }
        _ => None,
    }
}

#[test]
fn unsorted_list_navigates_by_number() {
    let backend = memory_backend();
    let list = vec![
        make_chapter("c3", 3.0, 2),
        make_chapter("c1", 1.0, 2),
        make_chapter("c2", 2.0, 2),
    ];
    let mut session = session_over(&backend, list);
    session.on_chapter_loaded(Arc::new(make_chapter("c2", 2.0, 2)));

    let current = ChapterId::new("c2");
    let chapters = session.chapters();
    assert_eq!(navigator::next(chapters, &current).map(|c| c.id.as_str()), Some("c3"));
    assert_eq!(navigator::previous(chapters, &current).map(|c| c.id.as_str()), Some("c1"));

    let next = session.handle(InputEvent::NextChapter);
    assert_eq!(navigate_target(&next), Some(("c3".to_string(), EntryPoint::Start)));
}

#[test]
fn last_page_restores_and_stays_put_without_auto_advance() {
    let backend = memory_backend();
    let series = SeriesId::new(SERIES);
    {
        let mut session = session_over(&backend, make_chapters(2, 5));
        session.handle(InputEvent::ToggleAutoAdvance);
        session.on_chapter_loaded(Arc::new(make_chapter("c1", 1.0, 5)));
        assert_eq!(session.handle(InputEvent::JumpToEnd), SessionOutcome::PageChanged(4));
    }

    // A new session over the same storage, as after a reload.
    let mut session = session_over(&backend, make_chapters(2, 5));
    assert!(!session.preferences().auto_advance_chapter);
    assert_eq!(
        session.on_chapter_loaded(Arc::new(make_chapter("c1", 1.0, 5))),
        SessionOutcome::PageChanged(4)
    );
    assert_eq!(session.on_advance_requested(), SessionOutcome::Idle);
    assert_eq!(session.cursor().map(|c| c.page()), Some(4));
    assert_eq!(
        session.progress().get_latest(&series).map(|e| e.page),
        Some(4)
    );
}

#[test]
fn advance_walks_to_last_page_and_never_beyond() {
    let backend = memory_backend();
    let mut session = session_over(&backend, make_chapters(1, 7));
    session.handle(InputEvent::ToggleAutoAdvance);
    session.on_chapter_loaded(Arc::new(make_chapter("c1", 1.0, 7)));
    for _ in 0..6 {
        session.on_advance_requested();
    }
    assert_eq!(session.cursor().map(|c| c.page()), Some(6));
    for _ in 0..3 {
        assert_eq!(session.on_advance_requested(), SessionOutcome::Idle);
    }
    assert_eq!(session.cursor().map(|c| c.page()), Some(6));
}

#[test]
fn boundary_crossing_is_asymmetric() {
    let backend = memory_backend();
    let mut session = session_over(&backend, make_chapters(3, 4));
    session.on_chapter_loaded(Arc::new(make_chapter("c2", 2.0, 4)));
    session.handle(InputEvent::JumpToEnd);

    let forward = session.on_advance_requested();
    assert_eq!(navigate_target(&forward), Some(("c3".to_string(), EntryPoint::Start)));
    session.on_chapter_loaded(Arc::new(make_chapter("c3", 3.0, 4)));
    assert_eq!(session.cursor().map(|c| c.page()), Some(0));

    let back = session.on_retreat_requested();
    assert_eq!(navigate_target(&back), Some(("c2".to_string(), EntryPoint::End)));
    session.on_chapter_loaded(Arc::new(make_chapter("c2", 2.0, 4)));
    assert_eq!(session.cursor().map(|c| c.page()), Some(3));
}

#[test]
fn empty_chapter_does_not_break_navigation() {
    let backend = memory_backend();
    let list = vec![make_chapter("c1", 1.0, 3), make_chapter("c2", 2.0, 0)];
    let mut session = session_over(&backend, list);
    session.on_chapter_loaded(Arc::new(make_chapter("c2", 2.0, 0)));

    assert_eq!(session.on_advance_requested(), SessionOutcome::Idle);
    assert_eq!(session.on_retreat_requested(), SessionOutcome::Idle);
    assert!(session.cursor().is_some_and(|c| c.is_empty()));

    let back = session.handle(InputEvent::PreviousChapter);
    assert_eq!(navigate_target(&back), Some(("c1".to_string(), EntryPoint::Start)));
}

#[test]
fn failed_next_chapter_leaves_state_alone() {
    let backend = memory_backend();
    let series = SeriesId::new(SERIES);
    let mut session = session_over(&backend, make_chapters(2, 2));
    session.on_chapter_loaded(Arc::new(make_chapter("c1", 1.0, 2)));
    session.handle(InputEvent::NextPage);
    let before = session.progress().entries().to_vec();

    let outcome = session.handle(InputEvent::NextPage);
    assert_eq!(navigate_target(&outcome), Some(("c2".to_string(), EntryPoint::Start)));
    session.on_chapter_failed(&ChapterId::new("c2"), FetchError::Network("reset".into()));

    assert_eq!(session.cursor().map(|c| c.chapter_id().as_str()), Some("c1"));
    assert_eq!(session.cursor().map(|c| c.page()), Some(1));
    assert_eq!(session.progress().entries(), before.as_slice());
    assert!(session.progress().get(&series, &ChapterId::new("c2")).is_none());
    assert!(session.failure().is_some());
}

#[test]
fn keyboard_flow_through_the_queue() {
    let backend = memory_backend();
    let mut session = session_over(&backend, make_chapters(2, 3));
    session.on_chapter_loaded(Arc::new(make_chapter("c1", 1.0, 3)));

    let mut queue = InputQueue::new();
    queue.push_key(session.mode(), KeyInput::plain(Key::Right));
    queue.push_key(session.mode(), KeyInput::plain(Key::Right));
    queue.push_key(session.mode(), KeyInput::plain(Key::Left));
    let outcomes = session.process(&mut queue);
    assert_eq!(
        outcomes,
        vec![
            SessionOutcome::PageChanged(1),
            SessionOutcome::PageChanged(2),
            SessionOutcome::PageChanged(1),
        ]
    );

    queue.push_key(session.mode(), KeyInput::plain(Key::Char('m')));
    let outcomes = session.process(&mut queue);
    assert_eq!(outcomes, vec![SessionOutcome::ModeChanged(ReadingMode::Continuous)]);

    // Page keys are dropped before they reach the queue in continuous mode.
    assert!(!queue.push_key(session.mode(), KeyInput::plain(Key::Right)));
    assert!(queue.push_key(session.mode(), KeyInput::modified(Key::Right)));
    let outcomes = session.process(&mut queue);
    assert_eq!(outcomes.len(), 1);
    assert_eq!(
        navigate_target(&outcomes[0]),
        Some(("c2".to_string(), EntryPoint::Start))
    );
}

#[test]
fn mode_preference_survives_restart() {
    let backend = memory_backend();
    {
        let mut session = session_over(&backend, make_chapters(1, 1));
        session.on_mode_toggled();
    }
    let session = session_over(&backend, make_chapters(1, 1));
    assert_eq!(session.mode(), ReadingMode::Continuous);
}
