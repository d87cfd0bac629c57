use std::time::Duration;

use tankobon_application::SessionOutcome;
use tankobon_core::{ChapterId, FetchError};
use tankobon_test::{Applied, Harness, ScriptedSource, make_chapters, memory_backend, session_over};

#[tokio::test]
async fn only_the_latest_chapter_request_is_applied() -> anyhow::Result<()> {
    let source = ScriptedSource::with_series(make_chapters(3, 4));
    // A resolves well after B.
    source.delay("c1", Duration::from_millis(150));
    source.delay("c2", Duration::from_millis(10));
    let mut harness = Harness::new(source);
    let backend = memory_backend();
    let mut session = session_over(&backend, make_chapters(3, 4));

    harness.loader.load_chapter(&ChapterId::new("c1"));
    harness.loader.load_chapter(&ChapterId::new("c2"));

    let mut applied = Vec::new();
    for _ in 0..2 {
        let outcome = harness
            .pump(&mut session)
            .await
            .ok_or_else(|| anyhow::anyhow!("event channel closed"))?;
        applied.push(outcome);
    }

    let chapters: Vec<_> = applied
        .iter()
        .filter_map(|a| match a {
            Applied::Chapter(id) => Some(id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(chapters, vec!["c2"]);
    assert!(applied.iter().any(|a| matches!(a, Applied::Stale(_))));
    assert_eq!(
        session.cursor().map(|c| c.chapter_id().as_str()),
        Some("c2")
    );
    assert!(session.failure().is_none());
    Ok(())
}

#[tokio::test]
async fn stale_response_never_overwrites_newer_state() -> anyhow::Result<()> {
    let source = ScriptedSource::with_series(make_chapters(2, 2));
    let mut harness = Harness::new(source);
    let backend = memory_backend();
    let mut session = session_over(&backend, make_chapters(2, 2));

    // B answers first and is applied; A's late answer must be rejected.
    harness.source.delay("c1", Duration::from_millis(100));
    harness.loader.load_chapter(&ChapterId::new("c1"));
    harness.loader.load_chapter(&ChapterId::new("c2"));

    let first = harness.pump(&mut session).await;
    let second = harness.pump(&mut session).await;
    let results = [first, second];
    assert!(results.contains(&Some(Applied::Chapter(ChapterId::new("c2")))));
    assert!(!results.contains(&Some(Applied::Chapter(ChapterId::new("c1")))));
    assert_eq!(
        session.cursor().map(|c| c.chapter_id().as_str()),
        Some("c2")
    );
    Ok(())
}

#[tokio::test]
async fn next_chapter_flow_prefetches_and_serves_from_cache() -> anyhow::Result<()> {
    let mut harness = Harness::new(ScriptedSource::with_series(make_chapters(3, 2)));
    let backend = memory_backend();
    let mut session = session_over(&backend, Vec::new());

    let series = session.series_id().clone();
    harness.loader.load_chapter_list(&series);
    assert_eq!(harness.pump(&mut session).await, Some(Applied::ChapterList(3)));

    let target = session
        .resume_target()
        .ok_or_else(|| anyhow::anyhow!("no resume target"))?;
    assert_eq!(target.chapter_id.as_str(), "c1");
    session.open_chapter(&target.chapter_id);
    harness.loader.load_chapter(&target.chapter_id);
    assert_eq!(
        harness.pump(&mut session).await,
        Some(Applied::Chapter(ChapterId::new("c1")))
    );

    // Prefetch of c2 was kicked off by the load; wait for it to land.
    for _ in 0..50 {
        if harness.cache.get_fresh(&ChapterId::new("c2")).is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(harness.cache.get_fresh(&ChapterId::new("c2")).is_some());

    session.on_advance_requested();
    let outcome = session.on_advance_requested();
    let SessionOutcome::Navigate(request) = &outcome else {
        anyhow::bail!("expected navigation, got {outcome:?}");
    };
    harness.loader.load_chapter(&request.chapter_id);
    assert_eq!(
        harness.pump(&mut session).await,
        Some(Applied::Chapter(ChapterId::new("c2")))
    );
    assert_eq!(harness.source.call_count("c2"), 1);
    assert_eq!(session.cursor().map(|c| c.page()), Some(0));
    Ok(())
}

#[tokio::test]
async fn failure_then_retry_recovers() -> anyhow::Result<()> {
    let source = ScriptedSource::with_series(make_chapters(2, 3));
    source.fail("c1", FetchError::Timeout);
    let mut harness = Harness::new(source);
    let backend = memory_backend();
    let mut session = session_over(&backend, make_chapters(2, 3));

    session.open_chapter(&ChapterId::new("c1"));
    harness.loader.load_chapter(&ChapterId::new("c1"));
    assert_eq!(
        harness.pump(&mut session).await,
        Some(Applied::Failed(ChapterId::new("c1"), FetchError::Timeout))
    );
    assert!(session.cursor().is_none());
    assert!(session.progress().is_empty());

    harness.source.heal("c1");
    let SessionOutcome::Navigate(request) = session.retry() else {
        anyhow::bail!("retry should navigate");
    };
    harness.loader.load_chapter(&request.chapter_id);
    assert_eq!(
        harness.pump(&mut session).await,
        Some(Applied::Chapter(ChapterId::new("c1")))
    );
    assert!(session.failure().is_none());
    assert_eq!(session.progress().len(), 1);
    Ok(())
}

#[tokio::test]
async fn prefetch_and_primary_fetch_do_not_cancel_each_other() -> anyhow::Result<()> {
    let source = ScriptedSource::with_series(make_chapters(3, 1));
    source.delay("c2", Duration::from_millis(50));
    let mut harness = Harness::new(source);
    let chapters = make_chapters(3, 1);

    let prefetch = harness
        .prefetcher
        .prefetch_next(&ChapterId::new("c1"), &chapters)
        .ok_or_else(|| anyhow::anyhow!("expected a prefetch"))?;
    harness.loader.load_chapter(&ChapterId::new("c3"));

    prefetch.join().await;
    assert!(harness.cache.get_fresh(&ChapterId::new("c2")).is_some());

    let backend = memory_backend();
    let mut session = session_over(&backend, chapters);
    assert_eq!(
        harness.pump(&mut session).await,
        Some(Applied::Chapter(ChapterId::new("c3")))
    );
    Ok(())
}

#[tokio::test]
async fn reopening_a_chapter_prefetches_again() -> anyhow::Result<()> {
    let source = ScriptedSource::with_series(make_chapters(2, 2));
    source.fail("c2", FetchError::Network("reset".into()));
    let mut harness = Harness::new(source);
    let backend = memory_backend();
    let mut session = session_over(&backend, make_chapters(2, 2));

    harness.loader.load_chapter(&ChapterId::new("c1"));
    assert_eq!(
        harness.pump(&mut session).await,
        Some(Applied::Chapter(ChapterId::new("c1")))
    );
    for _ in 0..50 {
        if harness.source.call_count("c2") == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(harness.source.call_count("c2"), 1);
    assert!(harness.cache.get_fresh(&ChapterId::new("c2")).is_none());

    harness.source.heal("c2");
    harness.loader.load_chapter(&ChapterId::new("c1"));
    assert_eq!(
        harness.pump(&mut session).await,
        Some(Applied::Chapter(ChapterId::new("c1")))
    );
    for _ in 0..50 {
        if harness.cache.get_fresh(&ChapterId::new("c2")).is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(harness.cache.get_fresh(&ChapterId::new("c2")).is_some());
    assert_eq!(harness.source.call_count("c2"), 2);
    Ok(())
}
