//! User service RPC handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use common::wire::{
    CreateUserRequest, CreateUserResponse, DeleteUserRequest, DeleteUserResponse, GetUserRequest,
    GetUserResponse, UpdateUserRequest, UpdateUserResponse,
};
use item_store::ItemStore;
use users::{UserRecord, UserService, UserUpdate};

use crate::convert::user_to_message;
use crate::deadline;
use crate::error::RpcError;

/// Shared state of the user service.
pub struct UserAppState<S: ItemStore<Item = UserRecord>> {
    pub user_service: UserService<S>,
}

/// POST /user.v1.UserService/CreateUser
#[tracing::instrument(skip_all)]
pub async fn create<S: ItemStore<Item = UserRecord> + 'static>(
    State(state): State<Arc<UserAppState<S>>>,
    headers: HeaderMap,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<CreateUserResponse>, RpcError> {
    let Json(req) = body?;

    let user = deadline::within(&headers, async {
        state
            .user_service
            .create_user(&req.email, &req.name)
            .await
            .map_err(RpcError::from)
    })
    .await?;

    Ok(Json(CreateUserResponse {
        user: user_to_message(&user),
    }))
}

/// POST /user.v1.UserService/GetUser
#[tracing::instrument(skip_all)]
pub async fn get<S: ItemStore<Item = UserRecord> + 'static>(
    State(state): State<Arc<UserAppState<S>>>,
    headers: HeaderMap,
    body: Result<Json<GetUserRequest>, JsonRejection>,
) -> Result<Json<GetUserResponse>, RpcError> {
    let Json(req) = body?;

    let user = deadline::within(&headers, async {
        state
            .user_service
            .get_user(&req.user_id)
            .await
            .map_err(RpcError::from)
    })
    .await?;

    Ok(Json(GetUserResponse {
        user: user_to_message(&user),
    }))
}

/// POST /user.v1.UserService/UpdateUser
#[tracing::instrument(skip_all)]
pub async fn update<S: ItemStore<Item = UserRecord> + 'static>(
    State(state): State<Arc<UserAppState<S>>>,
    headers: HeaderMap,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UpdateUserResponse>, RpcError> {
    let Json(req) = body?;
    let changes = UserUpdate {
        email: req.email,
        name: req.name,
    };

    let user = deadline::within(&headers, async {
        state
            .user_service
            .update_user(&req.user_id, changes)
            .await
            .map_err(RpcError::from)
    })
    .await?;

    Ok(Json(UpdateUserResponse {
        user: user_to_message(&user),
    }))
}

/// POST /user.v1.UserService/DeleteUser
#[tracing::instrument(skip_all)]
pub async fn delete<S: ItemStore<Item = UserRecord> + 'static>(
    State(state): State<Arc<UserAppState<S>>>,
    headers: HeaderMap,
    body: Result<Json<DeleteUserRequest>, JsonRejection>,
) -> Result<Json<DeleteUserResponse>, RpcError> {
    let Json(req) = body?;

    deadline::within(&headers, async {
        state
            .user_service
            .delete_user(&req.user_id)
            .await
            .map_err(RpcError::from)
    })
    .await?;

    Ok(Json(DeleteUserResponse {}))
}
