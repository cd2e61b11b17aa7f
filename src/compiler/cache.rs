use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use crate::ast::SelectQuery;
use crate::compiler::{Pipeline, compile};
use crate::error::Error;
use crate::schema::{Source, SourceId};

/// Identity of a compiled pipeline: the source and the canonical text of the
/// normalized query.
///
/// Scripts that differ only in spacing, keyword case, optional `;` or the
/// alias form of their atoms share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub source: SourceId,
    pub query: String,
}

impl PipelineKey {
    pub fn new(source: &Source, query: &SelectQuery) -> Self {
        PipelineKey {
            source: source.id,
            query: query.normalized().to_string(),
        }
    }
}

type Slot = Arc<OnceCell<Arc<Pipeline>>>;

/// Compiled pipelines of a context, compiled at most once per key.
///
/// Lookups take a shard lock only long enough to fetch the key's slot.
/// Concurrent callers of one key then wait on that slot alone, so unrelated
/// keys compile in parallel and populated keys never wait. A failed
/// compilation drops its slot so failing queries do not accumulate.
#[derive(Debug, Default)]
pub struct PipelineCache {
    slots: DashMap<PipelineKey, Slot>,
    compilations: AtomicUsize,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile(&self, source: &Source, query: &SelectQuery) -> Result<Arc<Pipeline>, Error> {
        let key = PipelineKey::new(source, query);
        let slot: Slot = self
            .slots
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .value()
            .clone();

        if let Some(pipeline) = slot.get() {
            trace!(source = source.name(), query = %key.query, "pipeline cache hit");
            return Ok(pipeline.clone());
        }

        let compiled = slot
            .get_or_try_init(|| {
                self.compilations.fetch_add(1, Ordering::Relaxed);
                debug!(source = source.name(), query = %key.query, "compiling pipeline");
                compile(source, query).map(Arc::new)
            })
            .cloned();

        if compiled.is_err() {
            self.slots.remove_if(&key, |_, slot| slot.get().is_none());
        }
        compiled
    }

    /// Number of compiled pipelines held.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// Number of keys with a slot, including ones still compiling.
    pub fn slots(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of compilations started, successful or not.
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }
}
