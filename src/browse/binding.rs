use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::stream::BoxStream;

use crate::browse::section::{SectionId, SectionKind, SectionRegistry};
use crate::catalog::types::MediaGroup;
use crate::catalog::{CatalogError, MediaService};

/// A restartable source of catalog data.
///
/// Each call to [`Producer::subscribe`] returns a fresh stream, so
/// re-subscribing re-issues the fetch.
pub struct Producer<T> {
    factory: Arc<dyn Fn() -> BoxStream<'static, Result<T, CatalogError>> + Send + Sync>,
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Producer<T> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> BoxStream<'static, Result<T, CatalogError>> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }

    pub fn subscribe(&self) -> BoxStream<'static, Result<T, CatalogError>> {
        (self.factory)()
    }
}

/// The producer bound to one section, shaped by its display kind.
#[derive(Debug, Clone)]
pub enum Binding {
    Grid(Producer<MediaGroup>),
    Row(Producer<Vec<MediaGroup>>),
}

/// Section id to producer mapping.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: HashMap<SectionId, Binding>,
}

impl BindingTable {
    /// Bind every registered section to its catalog feed.
    ///
    /// Producers are lazy; nothing is fetched here.
    pub fn bind(registry: &SectionRegistry, service: &Arc<dyn MediaService>) -> Self {
        let mut table = Self::default();
        for section in registry.iter() {
            let kind = section.catalog;
            let service = Arc::clone(service);
            let binding = match section.kind {
                SectionKind::Grid => Binding::Grid(Producer::new(move || service.group(kind))),
                SectionKind::Row => Binding::Row(Producer::new(move || service.group_rows(kind))),
            };
            table.insert(section.id, binding);
        }
        table
    }

    pub fn insert(&mut self, id: SectionId, binding: Binding) {
        self.bindings.insert(id, binding);
    }

    pub fn get(&self, id: SectionId) -> Option<&Binding> {
        self.bindings.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::stream::{self, StreamExt};

    use super::*;
    use crate::browse::testing::FakeService;
    use crate::catalog::types::CatalogKind;

    #[tokio::test]
    async fn producer_resubscribes_on_each_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let producer: Producer<u32> = Producer::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) as u32;
            stream::iter([Ok(n)]).boxed()
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let first: Vec<_> = producer.subscribe().collect().await;
        let second: Vec<_> = producer.subscribe().collect().await;
        assert!(matches!(first.as_slice(), [Ok(0)]));
        assert!(matches!(second.as_slice(), [Ok(1)]));
    }

    #[test]
    fn bind_matches_display_kind_without_fetching() {
        let fake = Arc::new(FakeService::default());
        let service: Arc<dyn MediaService> = fake.clone();
        let registry = SectionRegistry::initialize();
        let table = BindingTable::bind(&registry, &service);

        assert!(registry.iter().all(|s| table.get(s.id).is_some()));
        assert!(matches!(
            table.get(SectionId(CatalogKind::Home.id())),
            Some(Binding::Row(_))
        ));
        assert!(matches!(
            table.get(SectionId(CatalogKind::History.id())),
            Some(Binding::Grid(_))
        ));
        assert_eq!(fake.fetch_count(), 0);
    }
}
