//! Two-level topic hierarchy loading.
//!
//! Topic surrogate keys are assigned by the store, so a child cannot be
//! written until its parent exists and its key has been read back:
//!
//! 1. upsert every root (no parent, level 1);
//! 2. resolve the roots' surrogate keys;
//! 3. upsert each root's children carrying that key (level 2).
//!
//! The orchestrator commits between steps 1 and 2.

use std::collections::BTreeMap;

use tracing::debug;
use warehouse_core::{
  model::Topic,
  store::WarehouseStore,
  table::{KeyFilter, LoadReport, Table},
};

use crate::{
  Error, Result,
  catalog::TopicSpec,
  loader::UpsertLoader,
  resolver::KeyResolver,
};

const ROOT_LEVEL: u8 = 1;

pub struct HierarchyBuilder<'a, S> {
  store: &'a S,
}

impl<'a, S: WarehouseStore> HierarchyBuilder<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Load roots, then children, in one call.
  pub async fn build(
    &self,
    roots: &[TopicSpec],
    children: &BTreeMap<String, Vec<TopicSpec>>,
  ) -> Result<LoadReport> {
    let mut report = self.load_roots(roots).await?;
    report.merge(self.load_children(children).await?);
    Ok(report)
  }

  pub async fn load_roots(&self, roots: &[TopicSpec]) -> Result<LoadReport> {
    let topics: Vec<Topic> = roots
      .iter()
      .map(|spec| Topic::root(&spec.code, &spec.name))
      .collect();
    UpsertLoader::new(self.store).load_all(&topics).await
  }

  /// Load every child group under its parent's resolved key.
  ///
  /// A parent code that does not name an existing root is fatal: no child is
  /// ever written without a parent.
  pub async fn load_children(
    &self,
    children: &BTreeMap<String, Vec<TopicSpec>>,
  ) -> Result<LoadReport> {
    let roots = KeyResolver::new(self.store)
      .resolve_many(Table::Topic, KeyFilter::topic_level(ROOT_LEVEL))
      .await?;
    let loader = UpsertLoader::new(self.store);

    let mut report = LoadReport::default();
    for (parent_code, specs) in children {
      let parent = roots.get(parent_code)?;
      debug!(parent = %parent_code, key = %parent, children = specs.len(), "loading subtopics");

      for spec in specs {
        if spec.code == *parent_code {
          return Err(Error::Cycle(spec.code.clone()));
        }
        let topic = Topic::child_of(parent, ROOT_LEVEL, &spec.code, &spec.name);
        report.record(loader.upsert(&topic).await?);
      }
    }
    Ok(report)
  }
}
