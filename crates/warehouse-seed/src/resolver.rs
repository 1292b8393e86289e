//! Natural-key to surrogate-key translation.
//!
//! Every dependent load goes through [`KeyResolver`] instead of issuing its
//! own lookups, so a missing key always surfaces as the same
//! [`NotFound`](warehouse_core::Error::NotFound) error.

use std::collections::BTreeMap;

use warehouse_core::{
  store::WarehouseStore,
  table::{KeyFilter, SurrogateKey, Table},
};

use crate::{Error, Result};

/// Surrogate keys of one table, indexed by natural key.
#[derive(Debug, Clone)]
pub struct KeyMap {
  table: Table,
  keys:  BTreeMap<String, SurrogateKey>,
}

impl KeyMap {
  pub fn table(&self) -> Table { self.table }

  pub fn len(&self) -> usize { self.keys.len() }

  pub fn is_empty(&self) -> bool { self.keys.is_empty() }

  /// Key for `natural_key`, or `NotFound` if the map does not hold it.
  pub fn get(&self, natural_key: &str) -> Result<SurrogateKey> {
    self.keys.get(natural_key).copied().ok_or_else(|| {
      Error::Core(warehouse_core::Error::NotFound {
        table:       self.table,
        natural_key: natural_key.to_owned(),
      })
    })
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, SurrogateKey)> {
    self.keys.iter().map(|(k, v)| (k.as_str(), *v))
  }
}

pub struct KeyResolver<'a, S> {
  store: &'a S,
}

impl<'a, S: WarehouseStore> KeyResolver<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Surrogate key for a single natural key. Absence is an error.
  pub async fn resolve(&self, table: Table, natural_key: &str) -> Result<SurrogateKey> {
    self
      .store
      .surrogate_key(table, natural_key.to_owned())
      .await
      .map_err(Error::store)?
      .ok_or_else(|| {
        Error::Core(warehouse_core::Error::NotFound {
          table,
          natural_key: natural_key.to_owned(),
        })
      })
  }

  /// Natural key → surrogate key for every row matching `filter`.
  pub async fn resolve_many(&self, table: Table, filter: KeyFilter) -> Result<KeyMap> {
    let rows = self
      .store
      .surrogate_keys(table, filter)
      .await
      .map_err(Error::store)?;
    Ok(KeyMap { table, keys: rows.into_iter().collect() })
  }

  /// Surrogate keys matching `filter`, ascending. Used as a sampling pool.
  pub async fn pool(&self, table: Table, filter: KeyFilter) -> Result<Vec<SurrogateKey>> {
    let rows = self
      .store
      .surrogate_keys(table, filter)
      .await
      .map_err(Error::store)?;
    Ok(rows.into_iter().map(|(_, key)| key).collect())
  }
}
