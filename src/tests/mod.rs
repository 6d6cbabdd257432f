use crate::client::{FetchError, Paper, SearchPage};
use crate::engine::{
    FeedEngine, FeedStatus, FetchKind, QueryState, SortMode, Trigger, PAGE_LIMIT,
};

fn paper(title: &str, published_at: &str, source: &str, categories: &[&str]) -> Paper {
    Paper {
        title: title.to_string(),
        published_at: published_at.to_string(),
        source: source.to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    }
}

fn page(items: Vec<Paper>) -> SearchPage {
    SearchPage {
        count: items.len(),
        items,
        ..Default::default()
    }
}

fn pairs_contain(plan: &crate::engine::FetchPlan, key: &str, value: &str) -> bool {
    plan.params
        .pairs()
        .iter()
        .any(|(k, v)| k == key && v == value)
}

fn failed() -> FetchError {
    FetchError::Status {
        status: 503,
        url: "http://localhost:8000/search".to_string(),
    }
}

fn loaded_engine() -> FeedEngine {
    let mut engine = FeedEngine::new(QueryState::default());
    let plan = engine.apply(Trigger::Refresh).unwrap();
    assert_eq!(plan.offset, 0);
    engine.finish(
        FetchKind::Initial,
        Ok(page(vec![
            paper("Zeta", "2024-05-02", "arxiv", &["cs.LG", "cs.AI"]),
            paper("Alpha", "2024-05-03", "openalex", &["cs.CV"]),
        ])),
    );
    engine
}

#[test]
fn first_page_resets_collection_and_advances_offset() {
    let engine = loaded_engine();
    let snapshot = engine.snapshot();

    assert_eq!(engine.offset(), PAGE_LIMIT);
    assert!(!engine.end_of_results());
    assert_eq!(snapshot.papers.len(), 2);
    // default sort: newest first
    assert_eq!(snapshot.papers[0].title, "Alpha");
    assert_eq!(snapshot.papers[1].title, "Zeta");
}

#[test]
fn trailing_empty_page_latches_without_rolling_back_offset() {
    let mut engine = loaded_engine();
    engine.apply(Trigger::ScrollNearEnd).unwrap();
    engine.finish(FetchKind::More, Ok(page(Vec::new())));

    assert_eq!(engine.snapshot().papers.len(), 2);
    assert!(engine.end_of_results());
    assert_eq!(engine.offset(), 2 * PAGE_LIMIT);
    assert!(engine.apply(Trigger::ScrollNearEnd).is_none());
}

#[test]
fn category_filter_narrows_display_but_not_options() {
    let mut engine = loaded_engine();
    engine.set_category("cs.LG");
    let snapshot = engine.snapshot();

    assert_eq!(snapshot.papers.len(), 1);
    assert_eq!(snapshot.papers[0].title, "Zeta");
    // options span the whole accumulated collection
    assert_eq!(
        snapshot.categories,
        vec![
            "cs.AI".to_string(),
            "cs.CV".to_string(),
            "cs.LG".to_string()
        ]
    );
    assert_eq!(snapshot.source_counts, vec![("arxiv".to_string(), 1)]);
}

#[test]
fn title_sort_orders_lexicographically_regardless_of_dates() {
    let mut engine = loaded_engine();
    // sort change while idle plans a refetch; the server echoes the same items
    let plan = engine.apply(Trigger::SetSort(SortMode::TitleAsc)).unwrap();
    assert_eq!(plan.offset, 0);
    engine.finish(
        FetchKind::Initial,
        Ok(page(vec![
            paper("Zeta", "2024-05-02", "arxiv", &[]),
            paper("Alpha", "2020-01-01", "openalex", &[]),
        ])),
    );

    let titles: Vec<String> = engine
        .snapshot()
        .papers
        .iter()
        .map(|p| p.title.clone())
        .collect();
    assert_eq!(titles, vec!["Alpha".to_string(), "Zeta".to_string()]);
}

#[test]
fn proximity_trigger_is_dropped_while_initial_load_is_in_flight() {
    let mut engine = FeedEngine::new(QueryState::default());
    engine.apply(Trigger::Refresh).unwrap();

    assert!(engine.apply(Trigger::ScrollNearEnd).is_none());
    assert!(engine.apply(Trigger::Refresh).is_none());
}

#[test]
fn single_flight_holds_across_a_whole_session() {
    let mut engine = loaded_engine();

    let plan = engine.apply(Trigger::ScrollNearEnd).unwrap();
    // every trigger kind is a no-op while the append is in flight
    assert!(engine.apply(Trigger::ScrollNearEnd).is_none());
    assert!(engine
        .apply(Trigger::SubmitQuery("quantum".to_string()))
        .is_none());
    assert!(engine.apply(Trigger::SetTopTier(true)).is_none());
    engine.finish(
        plan.kind,
        Ok(page(vec![paper("Gamma", "2024-05-01", "arxiv", &[])])),
    );

    assert_eq!(engine.snapshot().papers.len(), 3);
    // the edits made mid-flight surface in the next plan
    let plan = engine.apply(Trigger::Refresh).unwrap();
    assert!(pairs_contain(&plan, "query", "quantum"));
    assert!(pairs_contain(&plan, "top_tier", "true"));
}

#[test]
fn offset_counts_pages_requested_not_items_received() {
    let mut engine = loaded_engine();
    assert_eq!(engine.offset(), PAGE_LIMIT);

    // short page (2 of 50 possible items) still advances by the full limit
    engine.apply(Trigger::ScrollNearEnd).unwrap();
    engine.finish(
        FetchKind::More,
        Ok(page(vec![paper("Gamma", "2024-05-01", "arxiv", &[])])),
    );
    assert_eq!(engine.offset(), 2 * PAGE_LIMIT);

    engine.apply(Trigger::ScrollNearEnd).unwrap();
    engine.finish(
        FetchKind::More,
        Ok(page(vec![paper("Delta", "2024-04-30", "arxiv", &[])])),
    );
    assert_eq!(engine.offset(), 3 * PAGE_LIMIT);
    assert_eq!(engine.snapshot().papers.len(), 4);
}

#[test]
fn repeated_initial_failures_never_show_stale_results() {
    let mut engine = loaded_engine();

    engine.apply(Trigger::Refresh).unwrap();
    engine.finish(FetchKind::Initial, Err(failed()));
    let snapshot = engine.snapshot();
    assert!(snapshot.papers.is_empty());
    assert!(matches!(snapshot.status, FeedStatus::Failed(_)));

    engine.apply(Trigger::Refresh).unwrap();
    engine.finish(FetchKind::Initial, Err(failed()));
    let snapshot = engine.snapshot();
    assert!(snapshot.papers.is_empty());
    assert!(matches!(snapshot.status, FeedStatus::Failed(_)));
}

#[test]
fn snapshot_derivation_is_repeatable() {
    let mut engine = loaded_engine();
    engine.set_category("cs");

    let first = engine.snapshot();
    let second = engine.snapshot();
    let titles = |papers: &[Paper]| papers.iter().map(|p| p.title.clone()).collect::<Vec<_>>();
    assert_eq!(titles(&first.papers), titles(&second.papers));
    assert_eq!(first.categories, second.categories);
    assert_eq!(first.source_counts, second.source_counts);
}
