use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::CountryQuery;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use types::gift::GiftTransaction;
use types::ids::UserId;
use types::user::{NewPhoto, NewUser, Photo, User, UserSearch, UserUpdate};

pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CountryQuery>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = state
        .run_store(move |store| store.list_users(query.country.as_deref()))
        .await?;
    Ok(Json(users))
}

pub async fn search_users(
    State(state): State<AppState>,
    ApiQuery(search): ApiQuery<UserSearch>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = state.run_store(move |store| store.search_users(search)).await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<User>, AppError> {
    state
        .run_store(move |store| store.get_user(user_id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user {user_id}")))
}

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state.run_store(move |store| store.create_user(payload)).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(user_id): ApiPath<UserId>,
    ApiJson(update): ApiJson<UserUpdate>,
) -> Result<Json<User>, AppError> {
    user.require_self(user_id, "update a profile")?;
    let updated = state
        .run_store(move |store| store.update_user(user_id, update))
        .await?;
    Ok(Json(updated))
}

pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<StatusCode, AppError> {
    user.require_self(user_id, "delete a profile")?;
    let deleted = state.run_store(move |store| store.delete_user(user_id)).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("user {user_id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_photos(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<Vec<Photo>>, AppError> {
    let photos = state.run_store(move |store| store.list_photos(user_id)).await?;
    Ok(Json(photos))
}

pub async fn add_photo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(user_id): ApiPath<UserId>,
    ApiJson(photo): ApiJson<NewPhoto>,
) -> Result<(StatusCode, Json<Photo>), AppError> {
    user.require_self(user_id, "add a photo")?;
    let photo = state
        .run_store(move |store| store.add_photo(user_id, photo))
        .await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

pub async fn list_user_gifts(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<Vec<GiftTransaction>>, AppError> {
    user.require_self(user_id, "view gifts")?;
    let sent = state
        .run_store(move |store| store.list_gift_transactions(user_id))
        .await?;
    Ok(Json(sent))
}
