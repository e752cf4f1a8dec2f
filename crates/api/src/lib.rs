//! RPC servers for the user and order services.
//!
//! Each service is a unary JSON RPC surface over HTTP with structured logging
//! (tracing) and Prometheus metrics. The order service reaches the user
//! service through [`client::UserServiceClient`].

pub mod client;
pub mod config;
pub mod convert;
pub mod deadline;
pub mod error;
pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use common::rpc::{order_service, user_service};
use item_store::ItemStore;
use metrics_exporter_prometheus::PrometheusHandle;
use orders::{OrderRecord, OrderService, UserDirectory};
use tower_http::trace::TraceLayer;
use users::{UserRecord, UserService};

use routes::orders::OrderAppState;
use routes::users::UserAppState;

fn operational_routes(metrics_handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/healthz", get(routes::health::check))
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle)
}

/// Builds the user service router.
pub fn create_user_app<S>(state: Arc<UserAppState<S>>, metrics_handle: PrometheusHandle) -> Router
where
    S: ItemStore<Item = UserRecord> + 'static,
{
    Router::new()
        .route(user_service::CREATE_USER, post(routes::users::create::<S>))
        .route(user_service::GET_USER, post(routes::users::get::<S>))
        .route(user_service::UPDATE_USER, post(routes::users::update::<S>))
        .route(user_service::DELETE_USER, post(routes::users::delete::<S>))
        .with_state(state)
        .merge(operational_routes(metrics_handle))
        .layer(TraceLayer::new_for_http())
}

/// Builds the order service router.
pub fn create_order_app<S, U>(
    state: Arc<OrderAppState<S, U>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    S: ItemStore<Item = OrderRecord> + 'static,
    U: UserDirectory + 'static,
{
    Router::new()
        .route(order_service::CREATE_ORDER, post(routes::orders::create::<S, U>))
        .route(order_service::GET_ORDER, post(routes::orders::get::<S, U>))
        .with_state(state)
        .merge(operational_routes(metrics_handle))
        .layer(TraceLayer::new_for_http())
}

/// Creates user service state over `store`.
pub fn create_user_state<S>(store: S) -> Arc<UserAppState<S>>
where
    S: ItemStore<Item = UserRecord>,
{
    Arc::new(UserAppState {
        user_service: UserService::new(store),
    })
}

/// Creates order service state over `store`, checking users through `users`.
pub fn create_order_state<S, U>(store: S, users: U) -> Arc<OrderAppState<S, U>>
where
    S: ItemStore<Item = OrderRecord>,
    U: UserDirectory,
{
    Arc::new(OrderAppState {
        order_service: OrderService::new(store, users),
    })
}
