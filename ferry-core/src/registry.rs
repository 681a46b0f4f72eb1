use crate::{Entity, Result, TableDef};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

/// Cache of resolved table descriptions, one per entity type.
///
/// Usually shared as `Arc<Registry>` between the command builder, the mapper
/// and the [`crate::DataMapper`].
#[derive(Default, Debug)]
pub struct Registry {
    tables: RwLock<HashMap<TypeId, Arc<TableDef>>>,
}

impl Registry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Description of `E`, computed on first use.
    ///
    /// Concurrent first callers may all compute it, the last one is kept.
    pub fn resolve<E: Entity>(&self) -> Result<Arc<TableDef>> {
        let key = TypeId::of::<E>();
        if let Some(table) = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(table.clone());
        }
        let table = Arc::new(E::table_def()?);
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, table.clone());
        Ok(table)
    }

    /// Replaces the description of `E`.
    pub fn register<E: Entity>(&self, table: TableDef) -> Arc<TableDef> {
        let table = Arc::new(table);
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<E>(), table.clone());
        table
    }

    pub fn contains<E: Entity>(&self) -> bool {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<E>())
    }

    pub fn len(&self) -> usize {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
