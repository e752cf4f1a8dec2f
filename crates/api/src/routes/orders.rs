//! Order service RPC handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use common::wire::{CreateOrderRequest, CreateOrderResponse, GetOrderRequest, GetOrderResponse};
use item_store::ItemStore;
use orders::{OrderRecord, OrderService, UserDirectory};

use crate::convert::{order_lines_from_messages, order_to_message};
use crate::deadline;
use crate::error::RpcError;

/// Shared state of the order service.
pub struct OrderAppState<S, U>
where
    S: ItemStore<Item = OrderRecord>,
    U: UserDirectory,
{
    pub order_service: OrderService<S, U>,
}

/// POST /order.v1.OrderService/CreateOrder
///
/// Dropping the handler future on deadline also cancels the user lookup.
#[tracing::instrument(skip_all)]
pub async fn create<S, U>(
    State(state): State<Arc<OrderAppState<S, U>>>,
    headers: HeaderMap,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, RpcError>
where
    S: ItemStore<Item = OrderRecord> + 'static,
    U: UserDirectory + 'static,
{
    let Json(req) = body?;
    let items = order_lines_from_messages(req.items);

    let order = deadline::within(&headers, async {
        state
            .order_service
            .create_order(&req.user_id, items)
            .await
            .map_err(RpcError::from)
    })
    .await?;

    Ok(Json(CreateOrderResponse {
        order: order_to_message(&order),
    }))
}

/// POST /order.v1.OrderService/GetOrder
#[tracing::instrument(skip_all)]
pub async fn get<S, U>(
    State(state): State<Arc<OrderAppState<S, U>>>,
    headers: HeaderMap,
    body: Result<Json<GetOrderRequest>, JsonRejection>,
) -> Result<Json<GetOrderResponse>, RpcError>
where
    S: ItemStore<Item = OrderRecord> + 'static,
    U: UserDirectory + 'static,
{
    let Json(req) = body?;

    let order = deadline::within(&headers, async {
        state
            .order_service
            .get_order(&req.order_id)
            .await
            .map_err(RpcError::from)
    })
    .await?;

    Ok(Json(GetOrderResponse {
        order: order_to_message(&order),
    }))
}
