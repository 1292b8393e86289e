//! End-to-end pipeline tests against an in-memory SQLite warehouse.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use warehouse_core::{
  model::Difficulty,
  store::WarehouseStore,
  table::{SurrogateKey, Table},
};
use warehouse_store_sqlite::SqliteWarehouse;

use crate::{
  Error, Orchestrator,
  catalog::{Catalog, QuestionSpec, TopicSpec},
  config::{CalendarRange, SeedConfig},
  hierarchy::HierarchyBuilder,
  resolver::KeyResolver,
  stage::Stage,
};

async fn store() -> SqliteWarehouse {
  SqliteWarehouse::open_in_memory()
    .await
    .expect("in-memory store")
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// January 2024, every date eligible, reproducible sampling.
fn config() -> SeedConfig {
  let mut config = SeedConfig::default();
  config.calendar = CalendarRange { start: ymd(2024, 1, 1), end: ymd(2024, 1, 31) };
  config.facts.recent_days = None;
  config.facts.seed = Some(7);
  config
}

async fn counts(s: &SqliteWarehouse) -> Vec<(Table, u64)> {
  let mut out = vec![];
  for table in Table::ALL {
    out.push((table, s.count_rows(table).await.unwrap()));
  }
  out
}

async fn count(s: &SqliteWarehouse, table: Table) -> u64 {
  s.count_rows(table).await.unwrap()
}

// ─── Full run ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn full_run_populates_every_table() {
  let s = store().await;
  let catalog = Catalog::interview_seed();

  let report = Orchestrator::new(&s, &catalog, &config()).run().await.unwrap();

  assert_eq!(counts(&s).await, vec![
    (Table::Calendar, 31),
    (Table::Organization, 10),
    (Table::Topic, 18),
    (Table::RoundType, 6),
    (Table::Question, 12),
    (Table::InterviewEvent, 50),
  ]);
  let stages: Vec<_> = report.stages.iter().map(|(stage, _)| *stage).collect();
  assert_eq!(stages, Stage::PLAN);
  assert_eq!(report.stage(Stage::TopicChildren).unwrap().inserted, 12);
  assert_eq!(report.total().skipped, 0);
}

#[tokio::test]
async fn second_run_is_all_skips() {
  let s = store().await;
  let catalog = Catalog::interview_seed();
  let mut cfg = config();

  Orchestrator::new(&s, &catalog, &cfg).run().await.unwrap();
  let after_first = counts(&s).await;

  // A different seed draws different facts for the same round slots.
  cfg.facts.seed = Some(8);
  let second = Orchestrator::new(&s, &catalog, &cfg).run().await.unwrap();

  assert_eq!(counts(&s).await, after_first);
  assert_eq!(second.total().inserted, 0);
  assert_eq!(second.stage(Stage::Calendar).unwrap().skipped, 31);
  assert_eq!(second.stage(Stage::InterviewEvents).unwrap().skipped, 50);
}

#[tokio::test]
async fn two_day_range_loads_two_calendar_rows() {
  let s = store().await;
  let catalog = Catalog::interview_seed();
  let mut cfg = config();
  cfg.calendar = CalendarRange { start: ymd(2024, 1, 6), end: ymd(2024, 1, 7) };

  Orchestrator::new(&s, &catalog, &cfg)
    .run_plan(&[Stage::Calendar])
    .await
    .unwrap();

  let keys = KeyResolver::new(&s)
    .pool(Table::Calendar, Default::default())
    .await
    .unwrap();
  assert_eq!(keys, vec![SurrogateKey(20240106), SurrogateKey(20240107)]);
}

#[tokio::test]
async fn reversed_calendar_range_loads_nothing_and_facts_fail() {
  let s = store().await;
  let catalog = Catalog::interview_seed();
  let mut cfg = config();
  cfg.calendar = CalendarRange { start: ymd(2024, 2, 1), end: ymd(2024, 1, 1) };

  let err = Orchestrator::new(&s, &catalog, &cfg).run().await.unwrap_err();
  assert!(matches!(
    err,
    Error::Stage { stage: Stage::InterviewEvents, ref source }
      if matches!(**source, Error::Core(warehouse_core::Error::EmptyPool(Table::Calendar)))
  ), "{err:?}");
  assert_eq!(count(&s, Table::Calendar).await, 0);
  assert_eq!(count(&s, Table::InterviewEvent).await, 0);
}

// ─── Hierarchy ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn one_root_three_children_share_parent() {
  let s = store().await;
  let roots = vec![TopicSpec::new("NET", "Computer Networks")];
  let children = BTreeMap::from([("NET".to_owned(), vec![
    TopicSpec::new("NET-TCP", "TCP"),
    TopicSpec::new("NET-DNS", "DNS"),
    TopicSpec::new("NET-HTTP", "HTTP"),
  ])]);

  let report = HierarchyBuilder::new(&s).build(&roots, &children).await.unwrap();
  assert_eq!(report.inserted, 4);

  let topics = s.list_topics().await.unwrap();
  let root: Vec<_> = topics.iter().filter(|t| t.level == 1).collect();
  let leaves: Vec<_> = topics.iter().filter(|t| t.level == 2).collect();
  assert_eq!(root.len(), 1);
  assert_eq!(leaves.len(), 3);
  assert!(leaves.iter().all(|t| t.parent == Some(root[0].key)));
}

#[tokio::test]
async fn children_of_undeclared_root_are_rejected() {
  let s = store().await;
  let roots = vec![TopicSpec::new("DSA", "Data Structures & Algorithms")];
  let children = BTreeMap::from([("OS".to_owned(), vec![
    TopicSpec::new("OS-SCHED", "Scheduling"),
  ])]);

  let err = HierarchyBuilder::new(&s)
    .build(&roots, &children)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(warehouse_core::Error::NotFound { table: Table::Topic, ref natural_key })
      if natural_key == "OS"
  ));
  assert_eq!(count(&s, Table::Topic).await, 1);
}

#[tokio::test]
async fn child_cannot_reuse_parent_code() {
  let s = store().await;
  let roots = vec![TopicSpec::new("SYS", "System Design")];
  let children = BTreeMap::from([("SYS".to_owned(), vec![TopicSpec::new("SYS", "Again")])]);

  let err = HierarchyBuilder::new(&s)
    .build(&roots, &children)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Cycle(ref code) if code == "SYS"));
}

#[tokio::test]
async fn seeded_hierarchy_links_only_to_roots() {
  let s = store().await;
  let catalog = Catalog::interview_seed();
  Orchestrator::new(&s, &catalog, &config())
    .run_plan(&[Stage::TopicRoots, Stage::TopicChildren])
    .await
    .unwrap();

  let topics = s.list_topics().await.unwrap();
  let roots: BTreeMap<SurrogateKey, &str> = topics
    .iter()
    .filter(|t| t.level == 1)
    .map(|t| (t.key, t.code.as_str()))
    .collect();
  assert_eq!(roots.len(), 6);

  for child in topics.iter().filter(|t| t.level == 2) {
    let parent = child.parent.expect("level-2 topic has a parent");
    let parent_code = roots[&parent];
    assert!(child.code.starts_with(&format!("{parent_code}-")), "{child:?}");
  }
}

// ─── Failure handling ────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_organization_pool_fails_without_facts() {
  let s = store().await;
  let mut catalog = Catalog::interview_seed();
  catalog.organizations.clear();

  let err = Orchestrator::new(&s, &catalog, &config()).run().await.unwrap_err();
  assert!(matches!(
    err,
    Error::Stage { stage: Stage::InterviewEvents, ref source }
      if matches!(**source, Error::Core(warehouse_core::Error::EmptyPool(Table::Organization)))
  ), "{err:?}");

  assert_eq!(count(&s, Table::InterviewEvent).await, 0);
  // Earlier stages committed independently.
  assert_eq!(count(&s, Table::Question).await, 12);
}

#[tokio::test]
async fn failed_stage_leaves_none_of_its_rows() {
  let s = store().await;
  let mut catalog = Catalog::interview_seed();
  catalog.questions.truncate(2);
  catalog.questions.push(QuestionSpec {
    code:       "Q999".into(),
    text:       "Explain paging".into(),
    topic_code: "OS-PAGING".into(),
    difficulty: Difficulty::Easy,
    source:     "Manual".into(),
  });

  let err = Orchestrator::new(&s, &catalog, &config()).run().await.unwrap_err();
  assert!(matches!(err, Error::Stage { stage: Stage::Questions, .. }), "{err:?}");

  // The two valid questions were written before the failure, then rolled
  // back with it.
  assert_eq!(count(&s, Table::Question).await, 0);
  assert_eq!(count(&s, Table::Topic).await, 18);
  assert_eq!(count(&s, Table::InterviewEvent).await, 0);

  // Fixing the catalog and re-running completes from committed state.
  catalog.questions.pop();
  Orchestrator::new(&s, &catalog, &config()).run().await.unwrap();
  assert_eq!(count(&s, Table::Question).await, 2);
}

#[tokio::test]
async fn closed_store_fails_first_stage() {
  let s = store().await;
  let handle = s.clone();
  s.close().await.unwrap();
  let catalog = Catalog::interview_seed();

  let err = Orchestrator::new(&handle, &catalog, &config())
    .run()
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Stage { stage: Stage::Calendar, ref source } if matches!(**source, Error::Store(_))
  ), "{err:?}");
}

#[tokio::test]
async fn invalid_plan_writes_nothing() {
  let s = store().await;
  let catalog = Catalog::interview_seed();

  let err = Orchestrator::new(&s, &catalog, &config())
    .run_plan(&[Stage::Organizations, Stage::InterviewEvents])
    .await
    .unwrap_err();
  assert!(matches!(err, Error::StagePlan(_)));
  assert_eq!(count(&s, Table::Organization).await, 0);
}

// ─── Fact pools ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn fact_pools_honour_window_and_limit() {
  let s = store().await;
  let catalog = Catalog::interview_seed();
  let mut cfg = config();
  cfg.calendar = CalendarRange { start: ymd(2024, 1, 1), end: ymd(2024, 3, 31) };
  cfg.facts.recent_days = Some(10);
  cfg.facts.organization_limit = Some(5);

  let orchestrator = Orchestrator::new(&s, &catalog, &cfg);
  orchestrator
    .run_plan(&Stage::PLAN[..Stage::PLAN.len() - 1])
    .await
    .unwrap();
  let pools = orchestrator.fact_pools().await.unwrap();

  assert_eq!(pools.dates.len(), 11);
  assert_eq!(pools.dates.first(), Some(&SurrogateKey(20240321)));
  assert_eq!(pools.dates.last(), Some(&SurrogateKey(20240331)));

  let all_orgs = KeyResolver::new(&s)
    .pool(Table::Organization, Default::default())
    .await
    .unwrap();
  assert_eq!(pools.organizations, all_orgs[..5]);
  assert_eq!(pools.round_types.len(), 6);
  assert_eq!(pools.questions.len(), 12);
}

#[tokio::test]
async fn zero_limits_leave_pools_unrestricted() {
  let s = store().await;
  let catalog = Catalog::interview_seed();
  let mut cfg = config();
  cfg.facts.recent_days = Some(0);
  cfg.facts.organization_limit = Some(0);

  let orchestrator = Orchestrator::new(&s, &catalog, &cfg);
  orchestrator
    .run_plan(&Stage::PLAN[..Stage::PLAN.len() - 1])
    .await
    .unwrap();
  let pools = orchestrator.fact_pools().await.unwrap();

  assert_eq!(pools.dates.len(), 31);
  assert_eq!(pools.organizations.len(), 10);
}

#[tokio::test]
async fn partial_last_round_is_kept() {
  let s = store().await;
  let catalog = Catalog::interview_seed();
  let mut cfg = config();
  cfg.facts.count = 7;
  cfg.facts.group_size = 3;

  let report = Orchestrator::new(&s, &catalog, &cfg).run().await.unwrap();
  assert_eq!(report.stage(Stage::InterviewEvents).unwrap().inserted, 7);
  assert_eq!(count(&s, Table::InterviewEvent).await, 7);
}
