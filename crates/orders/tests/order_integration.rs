//! Integration tests for order creation.
//!
//! These tests verify the user-existence check, the all-or-nothing write and
//! the error mapping of remote lookup failures.

use async_trait::async_trait;
use item_store::{InMemoryItemStore, ItemStore, StoreError, Update};
use orders::{
    InMemoryUserDirectory, OrderError, OrderLine, OrderRecord, OrderService, UserLookupError,
};

type TestService = OrderService<InMemoryItemStore<OrderRecord>, InMemoryUserDirectory>;

struct TestHarness {
    service: TestService,
    store: InMemoryItemStore<OrderRecord>,
    users: InMemoryUserDirectory,
}

impl TestHarness {
    fn new() -> Self {
        let store = InMemoryItemStore::<OrderRecord>::new();
        let users = InMemoryUserDirectory::new();
        let service = OrderService::new(store.clone(), users.clone());
        Self {
            service,
            store,
            users,
        }
    }

    fn with_user(user_id: &str) -> Self {
        let harness = Self::new();
        harness.users.add_user(user_id);
        harness
    }
}

/// An order table in which every key is already taken.
struct CollidingStore;

#[async_trait]
impl ItemStore for CollidingStore {
    type Item = OrderRecord;

    async fn get_by_key(&self, key: &str) -> item_store::Result<OrderRecord> {
        Err(StoreError::NotFound {
            key: key.to_string(),
        })
    }

    async fn create_if_absent(&self, item: OrderRecord) -> item_store::Result<OrderRecord> {
        Err(StoreError::AlreadyExists { key: item.order_id })
    }

    async fn update_if_present(
        &self,
        key: &str,
        _update: Update,
    ) -> item_store::Result<OrderRecord> {
        Err(StoreError::NotFound {
            key: key.to_string(),
        })
    }

    async fn delete_if_present(&self, key: &str) -> item_store::Result<()> {
        Err(StoreError::NotFound {
            key: key.to_string(),
        })
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn empty_user_id_does_no_io() {
        let h = TestHarness::with_user("u1");

        let result = h
            .service
            .create_order("", vec![OrderLine::new("p1", 1)])
            .await;

        assert!(matches!(result, Err(OrderError::InvalidInput(_))));
        assert_eq!(h.users.lookup_count(), 0);
        assert_eq!(h.store.backend_calls(), 0);
    }

    #[tokio::test]
    async fn any_bad_line_rejects_the_whole_order() {
        let h = TestHarness::with_user("u1");

        let bad_requests = vec![
            vec![OrderLine::new("p1", 2), OrderLine::new("p2", 0)],
            vec![OrderLine::new("p1", 2), OrderLine::new("p2", -1)],
            vec![OrderLine::new("", 1), OrderLine::new("p2", 3)],
        ];

        for items in bad_requests {
            let result = h.service.create_order("u1", items).await;
            assert!(matches!(result, Err(OrderError::InvalidInput(_))));
        }

        assert_eq!(h.users.lookup_count(), 0);
        assert!(h.store.is_empty().await);
    }
}

mod user_check {
    use super::*;

    #[tokio::test]
    async fn unknown_user_is_invalid_input_and_writes_nothing() {
        let h = TestHarness::new();

        let result = h
            .service
            .create_order("ghost", vec![OrderLine::new("p1", 1)])
            .await;

        match result {
            Err(OrderError::InvalidInput(message)) => {
                assert!(message.contains("user does not exist"));
            }
            other => panic!("expected invalid input, got {other:?}"),
        }
        assert_eq!(h.users.lookup_count(), 1);
        assert_eq!(h.store.backend_calls(), 0);
    }

    #[tokio::test]
    async fn remote_invalid_argument_is_invalid_input() {
        let h = TestHarness::with_user("u1");
        h.users
            .set_failure(Some(UserLookupError::InvalidArgument("bad id".to_string())));

        let result = h
            .service
            .create_order("u1", vec![OrderLine::new("p1", 1)])
            .await;

        assert!(matches!(result, Err(OrderError::InvalidInput(_))));
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn remote_outage_is_opaque_and_writes_nothing() {
        let h = TestHarness::with_user("u1");
        h.users.set_failure(Some(UserLookupError::Unavailable(
            "connection refused".to_string(),
        )));

        let result = h
            .service
            .create_order("u1", vec![OrderLine::new("p1", 1)])
            .await;

        assert!(matches!(result, Err(OrderError::UserService(_))));
        assert_eq!(h.store.backend_calls(), 0);
    }

    #[tokio::test]
    async fn every_order_rechecks_the_user() {
        let h = TestHarness::with_user("u1");

        for _ in 0..3 {
            h.service
                .create_order("u1", vec![OrderLine::new("p1", 1)])
                .await
                .unwrap();
        }
        assert_eq!(h.users.lookup_count(), 3);

        h.users.remove_user("u1");
        let result = h
            .service
            .create_order("u1", vec![OrderLine::new("p1", 1)])
            .await;
        assert!(matches!(result, Err(OrderError::InvalidInput(_))));
        assert_eq!(h.store.len().await, 3);
    }
}

mod persistence {
    use super::*;

    #[tokio::test]
    async fn created_order_reads_back_identically() {
        let h = TestHarness::with_user("u1");

        let order = h
            .service
            .create_order("u1", vec![OrderLine::new("p1", 2)])
            .await
            .unwrap();

        assert_eq!(order.status, "pending");
        assert_eq!(order.items, vec![OrderLine::new("p1", 2)]);
        assert!(order.created_at.timestamp() > 0);

        let fetched = h.service.get_order(&order.order_id).await.unwrap();
        assert_eq!(fetched, order);
    }

    #[tokio::test]
    async fn line_order_is_preserved() {
        let h = TestHarness::with_user("u1");
        let items = vec![
            OrderLine::new("p3", 1),
            OrderLine::new("p1", 5),
            OrderLine::new("p2", 2),
        ];

        let order = h.service.create_order("u1", items.clone()).await.unwrap();
        let fetched = h.service.get_order(&order.order_id).await.unwrap();
        assert_eq!(fetched.items, items);
    }

    #[tokio::test]
    async fn order_ids_are_unique() {
        let h = TestHarness::with_user("u1");
        let mut ids = std::collections::HashSet::new();

        for _ in 0..50 {
            let order = h
                .service
                .create_order("u1", vec![OrderLine::new("p1", 1)])
                .await
                .unwrap();
            assert!(!order.order_id.is_empty());
            ids.insert(order.order_id);
        }
        assert_eq!(ids.len(), 50);
    }

    #[tokio::test]
    async fn concurrent_orders_each_check_and_land() {
        let h = TestHarness::with_user("u1");

        let calls = (0..20).map(|i| {
            h.service
                .create_order("u1", vec![OrderLine::new(format!("p{i}"), 1)])
        });
        let results = futures_util::future::join_all(calls).await;

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(h.store.len().await, 20);
        assert_eq!(h.users.lookup_count(), 20);
    }

    #[tokio::test]
    async fn key_collision_is_reported_after_successful_check() {
        let users = InMemoryUserDirectory::new();
        users.add_user("u1");
        let service = OrderService::new(CollidingStore, users.clone());

        let result = service
            .create_order("u1", vec![OrderLine::new("p1", 1)])
            .await;

        match result {
            Err(OrderError::KeyCollision { order_id }) => {
                assert!(order_id.starts_with("order-"));
            }
            other => panic!("expected key collision, got {other:?}"),
        }
        assert_eq!(users.lookup_count(), 1);
    }

    #[tokio::test]
    async fn store_outage_is_reported_after_successful_check() {
        let h = TestHarness::with_user("u1");
        h.store.set_unavailable(true);

        let result = h
            .service
            .create_order("u1", vec![OrderLine::new("p1", 1)])
            .await;

        assert!(matches!(
            result,
            Err(OrderError::Store(StoreError::Unavailable(_)))
        ));
        assert_eq!(h.users.lookup_count(), 1);
    }

    #[tokio::test]
    async fn order_outlives_user_removed_after_the_check() {
        let h = TestHarness::with_user("u1");

        let order = h
            .service
            .create_order("u1", vec![OrderLine::new("p1", 1)])
            .await
            .unwrap();
        h.users.remove_user("u1");

        // No compensation: the order keeps referencing the departed user.
        let fetched = h.service.get_order(&order.order_id).await.unwrap();
        assert_eq!(fetched.user_id, "u1");
    }
}
