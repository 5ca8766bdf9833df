//! # Field Schema Resolver
//!
//! Per-content-type cache of [`SchemaFieldMap`]s fetched from the parent frame.
//!
//! - One fetch per content type: concurrent lookups while a fetch is in flight
//!   all await the same shared future.
//! - A failed fetch is not cached; the next lookup retries.
//! - [`FieldSchemaResolver::has_field_schema`] only reads the cache.
//! - A fetch that completes after [`FieldSchemaResolver::clear`] leaves the
//!   cache untouched.

use futures::future::{LocalBoxFuture, Shared};
use futures::FutureExt;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use visual_builder_schema::{FieldSchema, SchemaFieldMap};
use visual_builder_sync::{SyncClient, SyncResult};

type PendingFetch = Shared<LocalBoxFuture<'static, SyncResult<Arc<SchemaFieldMap>>>>;

#[derive(Default)]
struct ResolverState {
    cache: HashMap<String, Arc<SchemaFieldMap>>,
    in_flight: HashMap<String, PendingFetch>,
    /// Bumped by `clear`
    epoch: u64,
}

#[derive(Clone)]
pub struct FieldSchemaResolver {
    client: SyncClient,
    state: Rc<RefCell<ResolverState>>,
}

impl FieldSchemaResolver {
    pub fn new(client: SyncClient) -> Self {
        Self {
            client,
            state: Rc::new(RefCell::new(ResolverState::default())),
        }
    }

    /// Cache-only existence check; never fetches.
    pub fn has_field_schema(&self, content_type_uid: &str, field_path: &str) -> bool {
        self.state
            .borrow()
            .cache
            .get(content_type_uid)
            .is_some_and(|map| map.contains(field_path))
    }

    /// The content type's map has been fetched
    pub fn is_cached(&self, content_type_uid: &str) -> bool {
        self.state.borrow().cache.contains_key(content_type_uid)
    }

    pub fn cached_field_schema(
        &self,
        content_type_uid: &str,
        field_path: &str,
    ) -> Option<Arc<FieldSchema>> {
        self.state
            .borrow()
            .cache
            .get(content_type_uid)
            .and_then(|map| map.get(field_path))
    }

    /// Field schema for a path, fetching the content type if needed.
    ///
    /// Fetch failures are logged and reported as absent.
    pub async fn get_field_schema(
        &self,
        content_type_uid: &str,
        field_path: &str,
    ) -> Option<Arc<FieldSchema>> {
        match self.schema_map(content_type_uid).await {
            Ok(map) => map.get(field_path),
            Err(error) => {
                tracing::warn!(
                    "Failed to fetch field schema for content type {}: {}",
                    content_type_uid,
                    error
                );
                None
            }
        }
    }

    pub async fn schema_map(&self, content_type_uid: &str) -> SyncResult<Arc<SchemaFieldMap>> {
        let pending = {
            let mut state = self.state.borrow_mut();
            if let Some(map) = state.cache.get(content_type_uid) {
                return Ok(map.clone());
            }
            match state.in_flight.get(content_type_uid) {
                Some(pending) => pending.clone(),
                None => {
                    let pending = fetch(
                        self.client.clone(),
                        content_type_uid.to_string(),
                        Rc::downgrade(&self.state),
                        state.epoch,
                    )
                    .boxed_local()
                    .shared();
                    state
                        .in_flight
                        .insert(content_type_uid.to_string(), pending.clone());
                    pending
                }
            }
        };
        pending.await
    }

    /// Drop every cached map and forget in-flight fetches.
    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.cache.clear();
        state.in_flight.clear();
        state.epoch += 1;
    }
}

async fn fetch(
    client: SyncClient,
    content_type_uid: String,
    state: Weak<RefCell<ResolverState>>,
    epoch: u64,
) -> SyncResult<Arc<SchemaFieldMap>> {
    tracing::debug!("Fetching field schema for {}", content_type_uid);
    let result = client
        .get_field_schema(&content_type_uid)
        .await
        .map(|schema| Arc::new(SchemaFieldMap::build(&schema)));

    if let Some(state) = state.upgrade() {
        let mut state = state.borrow_mut();
        if state.epoch != epoch {
            tracing::debug!("Discarding field schema for {} fetched before clear", content_type_uid);
            return result;
        }
        state.in_flight.remove(&content_type_uid);
        if let Ok(map) = &result {
            state.cache.insert(content_type_uid, map.clone());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use serde_json::json;
    use visual_builder_sync::{EventName, MemoryGateway, SyncError};

    fn resolver(gateway: &MemoryGateway) -> FieldSchemaResolver {
        FieldSchemaResolver::new(SyncClient::new(Rc::new(gateway.clone())))
    }

    #[test]
    fn test_cache_hit_skips_fetch() {
        let gateway = MemoryGateway::new();
        gateway.respond_with(
            EventName::GetFieldSchema,
            json!({ "fieldSchemaMap": [{ "uid": "title", "data_type": "text" }] }),
        );
        let resolver = resolver(&gateway);

        assert!(!resolver.has_field_schema("page", "title"));
        assert!(block_on(resolver.get_field_schema("page", "title")).is_some());
        assert!(resolver.has_field_schema("page", "title"));
        assert!(block_on(resolver.get_field_schema("page", "missing")).is_none());

        assert_eq!(gateway.sent_for(EventName::GetFieldSchema).len(), 1);
    }

    #[test]
    fn test_failed_fetch_is_retried() {
        let gateway = MemoryGateway::new();
        gateway.fail_with(
            EventName::GetFieldSchema,
            SyncError::Transport("parent unavailable".to_string()),
        );
        let resolver = resolver(&gateway);

        assert!(block_on(resolver.get_field_schema("page", "title")).is_none());
        assert!(!resolver.has_field_schema("page", "title"));

        gateway.respond_with(
            EventName::GetFieldSchema,
            json!({ "fieldSchemaMap": [{ "uid": "title", "data_type": "text" }] }),
        );
        assert!(block_on(resolver.get_field_schema("page", "title")).is_some());
        assert_eq!(gateway.sent_for(EventName::GetFieldSchema).len(), 2);
    }

    #[test]
    fn test_fetch_finishing_after_clear_is_not_cached() {
        let gateway = MemoryGateway::new();
        let (sender, receiver) = oneshot::channel::<serde_json::Value>();
        let receiver = Rc::new(RefCell::new(Some(receiver)));
        gateway.respond(EventName::GetFieldSchema, move |_| {
            let receiver = receiver.borrow_mut().take();
            async move {
                match receiver {
                    Some(receiver) => receiver.await.map_err(|_| SyncError::Closed),
                    None => Err(SyncError::Closed),
                }
            }
        });
        let resolver = resolver(&gateway);
        let mut pool = LocalPool::new();

        let lookup = resolver.clone();
        pool.spawner()
            .spawn_local(async move {
                assert!(lookup.get_field_schema("page", "title").await.is_some());
            })
            .unwrap();
        pool.run_until_stalled();

        resolver.clear();
        sender
            .send(json!({ "fieldSchemaMap": [{ "uid": "title", "data_type": "text" }] }))
            .unwrap();
        pool.run_until_stalled();

        assert!(!resolver.is_cached("page"));
        assert!(!resolver.has_field_schema("page", "title"));
    }
}
