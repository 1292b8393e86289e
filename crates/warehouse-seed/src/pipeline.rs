//! [`Orchestrator`] — runs the stage plan against a store.
//!
//! Each stage is its own unit of work: `begin`, load, `commit`. A failing
//! stage is rolled back and the run stops there, so earlier stages stay
//! committed and nothing of the failing stage survives.

use chrono::Days;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{info, warn};
use warehouse_core::{
  calendar,
  model::Question,
  sampler::{FactSampler, KeyPools},
  store::WarehouseStore,
  table::{KeyFilter, LoadReport, Table},
};

use crate::{
  Error, Result,
  catalog::Catalog,
  config::{CalendarRange, FactSettings, SeedConfig},
  hierarchy::HierarchyBuilder,
  loader::UpsertLoader,
  resolver::KeyResolver,
  stage::{Stage, validate_plan},
};

// ─── Report ──────────────────────────────────────────────────────────────────

/// Per-stage outcome of a completed run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
  pub stages: Vec<(Stage, LoadReport)>,
}

impl RunReport {
  pub fn stage(&self, stage: Stage) -> Option<LoadReport> {
    self
      .stages
      .iter()
      .find(|(s, _)| *s == stage)
      .map(|(_, report)| *report)
  }

  pub fn total(&self) -> LoadReport {
    let mut total = LoadReport::default();
    for (_, report) in &self.stages {
      total.merge(*report);
    }
    total
  }
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

pub struct Orchestrator<'a, S> {
  store:    &'a S,
  catalog:  &'a Catalog,
  calendar: CalendarRange,
  facts:    FactSettings,
}

impl<'a, S: WarehouseStore> Orchestrator<'a, S> {
  pub fn new(store: &'a S, catalog: &'a Catalog, config: &SeedConfig) -> Self {
    Self {
      store,
      catalog,
      calendar: config.calendar,
      facts: config.facts.clone(),
    }
  }

  /// Run the full seed plan.
  pub async fn run(&self) -> Result<RunReport> { self.run_plan(&Stage::PLAN).await }

  /// Run `plan` after checking its ordering.
  pub async fn run_plan(&self, plan: &[Stage]) -> Result<RunReport> {
    validate_plan(plan)?;

    let mut report = RunReport::default();
    for &stage in plan {
      let loaded = self.run_stage(stage).await.map_err(|source| {
        warn!(%stage, "stage failed; rolled back");
        Error::Stage { stage, source: Box::new(source) }
      })?;
      info!(
        %stage,
        inserted = loaded.inserted,
        skipped = loaded.skipped,
        "stage committed"
      );
      report.stages.push((stage, loaded));
    }
    Ok(report)
  }

  async fn run_stage(&self, stage: Stage) -> Result<LoadReport> {
    self.store.begin().await.map_err(Error::store)?;

    let result = match self.load(stage).await {
      Ok(report) => self
        .store
        .commit()
        .await
        .map(|()| report)
        .map_err(Error::store),
      Err(err) => Err(err),
    };

    if result.is_err()
      && let Err(rollback) = self.store.rollback().await
    {
      warn!(%stage, error = %rollback, "rollback failed");
    }
    result
  }

  async fn load(&self, stage: Stage) -> Result<LoadReport> {
    let loader = UpsertLoader::new(self.store);
    let topics = HierarchyBuilder::new(self.store);

    match stage {
      Stage::Calendar => {
        let days = calendar::expand(self.calendar.start, self.calendar.end);
        loader.load_all(&days).await
      }
      Stage::Organizations => loader.load_all(&self.catalog.organizations).await,
      Stage::RoundTypes => loader.load_all(&self.catalog.round_types).await,
      Stage::TopicRoots => topics.load_roots(&self.catalog.topic_roots).await,
      Stage::TopicChildren => topics.load_children(&self.catalog.topic_children).await,
      Stage::Questions => self.load_questions().await,
      Stage::InterviewEvents => self.load_interview_events().await,
    }
  }

  async fn load_questions(&self) -> Result<LoadReport> {
    let topics = KeyResolver::new(self.store)
      .resolve_many(Table::Topic, KeyFilter::topic_level(2))
      .await?;
    let loader = UpsertLoader::new(self.store);

    let mut report = LoadReport::default();
    for spec in &self.catalog.questions {
      let question = Question {
        code:       spec.code.clone(),
        text:       spec.text.clone(),
        topic:      topics.get(&spec.topic_code)?,
        difficulty: spec.difficulty,
        source:     spec.source.clone(),
      };
      report.record(loader.upsert(&question).await?);
    }
    Ok(report)
  }

  /// Resolve every pool a fact row draws from.
  pub async fn fact_pools(&self) -> Result<KeyPools> {
    let resolver = KeyResolver::new(self.store);

    let dates = KeyFilter {
      date_from: self.facts.recent_days.filter(|&days| days > 0).map(|days| {
        self
          .calendar
          .end
          .checked_sub_days(Days::new(days.into()))
          .unwrap_or(self.calendar.start)
      }),
      date_to: Some(self.calendar.end),
      ..KeyFilter::default()
    };
    let organizations = KeyFilter {
      limit: self.facts.organization_limit.filter(|&limit| limit > 0),
      ..KeyFilter::default()
    };

    Ok(KeyPools {
      organizations: resolver.pool(Table::Organization, organizations).await?,
      dates:         resolver.pool(Table::Calendar, dates).await?,
      round_types:   resolver.pool(Table::RoundType, KeyFilter::all()).await?,
      questions:     resolver.pool(Table::Question, KeyFilter::all()).await?,
    })
  }

  async fn load_interview_events(&self) -> Result<LoadReport> {
    let pools = self.fact_pools().await?;
    let sampler = FactSampler {
      group_size: self.facts.group_size,
      rules:      self.facts.rules.clone(),
    };
    let mut rng = match self.facts.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };

    let events = sampler.generate(self.facts.count, &pools, &mut rng)?;
    self.store.insert_events(events).await.map_err(Error::store)
  }
}
