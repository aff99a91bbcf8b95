use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::browse::binding::Producer;
use crate::catalog::MediaService;

/// Hide `producer` behind the sign-in check when `requires_auth` is set.
///
/// A gated producer first reads the sign-in status. Signed in, it forwards to
/// the wrapped producer; signed out, it completes with no items and no error.
/// A failing status check surfaces as that error.
pub fn gate<T: Send + 'static>(
    producer: Producer<T>,
    requires_auth: bool,
    service: &Arc<dyn MediaService>,
) -> Producer<T> {
    if !requires_auth {
        return producer;
    }

    let service = Arc::clone(service);
    Producer::new(move || {
        let inner = producer.clone();
        service
            .is_signed()
            .map(move |signed| match signed {
                Ok(true) => inner.subscribe(),
                Ok(false) => {
                    tracing::debug!("not signed in; gated fetch skipped");
                    stream::empty().boxed()
                }
                Err(e) => stream::iter([Err(e)]).boxed(),
            })
            .flatten()
            .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::testing::FakeService;
    use crate::catalog::types::{CatalogKind, MediaGroup};

    fn history_producer(service: &Arc<dyn MediaService>) -> Producer<MediaGroup> {
        let service = Arc::clone(service);
        Producer::new(move || service.group(CatalogKind::History))
    }

    #[tokio::test]
    async fn ungated_producer_is_unchanged() {
        let fake = Arc::new(FakeService::default().signed_in(false).with_group(
            CatalogKind::History,
            MediaGroup::new(CatalogKind::History, "History", vec![]),
        ));
        let service: Arc<dyn MediaService> = fake.clone();

        let results: Vec<_> = gate(history_producer(&service), false, &service)
            .subscribe()
            .collect()
            .await;
        assert_eq!(results.len(), 1);
        assert_eq!(fake.sign_in_checks(), 0);
    }

    #[tokio::test]
    async fn signed_out_yields_nothing_and_skips_fetch() {
        let fake = Arc::new(FakeService::default().signed_in(false).with_group(
            CatalogKind::History,
            MediaGroup::new(CatalogKind::History, "History", vec![]),
        ));
        let service: Arc<dyn MediaService> = fake.clone();

        let results: Vec<_> = gate(history_producer(&service), true, &service)
            .subscribe()
            .collect()
            .await;
        assert!(results.is_empty());
        assert_eq!(fake.sign_in_checks(), 1);
        assert_eq!(fake.fetch_count(), 0);
    }

    #[tokio::test]
    async fn signed_in_forwards_to_wrapped_producer() {
        let fake = Arc::new(FakeService::default().signed_in(true).with_group(
            CatalogKind::History,
            MediaGroup::new(CatalogKind::History, "History", vec![]),
        ));
        let service: Arc<dyn MediaService> = fake.clone();

        let gated = gate(history_producer(&service), true, &service);
        let first: Vec<_> = gated.subscribe().collect().await;
        let second: Vec<_> = gated.subscribe().collect().await;
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(fake.sign_in_checks(), 2);
        assert_eq!(fake.fetch_count(), 2);
    }
}
