use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use validator::Validate;

use application::dto::{
    AuthUserDto, AuthenticateUserRequest, MessageResponse, PostDetailsDto, PostDto,
    RegisterUserRequest,
};
use domain::{PostId, User, UserId, UserProfile};

use crate::{
    auth::{AuthUser, LoginResponse},
    error::ApiError,
    state::AppState,
    websocket::websocket_upgrade,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RegisterPayload {
    #[validate(email(message = "El email debe ser válido"))]
    email: String,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    password: String,
    #[validate(length(min = 1, message = "El nombre es obligatorio"))]
    first_name: String,
    #[validate(length(min = 1, message = "El apellido es obligatorio"))]
    last_name: String,
    #[validate(length(min = 1, max = 50, message = "El alias es obligatorio"))]
    alias: String,
    #[validate(length(min = 1, message = "La fecha de nacimiento es obligatoria"))]
    birth_date: String,
}

#[derive(Debug, Deserialize, Validate)]
struct LoginPayload {
    #[validate(email(message = "El email debe ser válido"))]
    email: String,
    #[validate(length(min = 1, message = "La contraseña es obligatoria"))]
    password: String,
}

#[derive(Debug, Deserialize, Validate)]
struct CreatePostPayload {
    #[validate(length(
        min = 1,
        max = 500,
        message = "El contenido no puede estar vacío ni exceder 500 caracteres"
    ))]
    content: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ws", get(websocket_upgrade))
        .nest("/auth", auth_routes())
        .nest("/posts", post_routes())
        .nest("/users", user_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_post).get(list_posts))
        .route("/my-posts", get(list_my_posts))
        .route("/{id}", get(get_post))
        .route("/{id}/like", post(like_post).delete(unlike_post))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/alias/{alias}", get(get_user_by_alias))
        .route("/{id}", get(get_user))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request("El id debe ser un número entero"))
}

fn login_response(state: &AppState, user: &User) -> Result<LoginResponse, ApiError> {
    let access_token = state
        .jwt_service
        .generate_token(user.id, user.email.as_str())?;
    Ok(LoginResponse {
        access_token,
        user: AuthUserDto::from(user),
    })
}

async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    payload.validate()?;
    let user = state
        .user_service
        .register(RegisterUserRequest {
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
            alias: payload.alias,
            birth_date: payload.birth_date,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(login_response(&state, &user)?)))
}

async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.validate()?;
    let user = state
        .user_service
        .authenticate(AuthenticateUserRequest {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok(Json(login_response(&state, &user)?))
}

async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePostPayload>,
) -> Result<(StatusCode, Json<PostDto>), ApiError> {
    payload.validate()?;
    let post = state.post_service.create(payload.content, user.id).await?;
    Ok((StatusCode::CREATED, Json(PostDto::from(&post))))
}

async fn list_posts(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<PostDetailsDto>>, ApiError> {
    let posts = state.post_service.find_all().await?;
    Ok(Json(posts.iter().map(PostDetailsDto::from).collect()))
}

async fn list_my_posts(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<PostDetailsDto>>, ApiError> {
    let posts = state.post_service.find_my_posts(user.id).await?;
    Ok(Json(posts.iter().map(PostDetailsDto::from).collect()))
}

async fn get_post(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PostDetailsDto>, ApiError> {
    let post_id = PostId::new(parse_id(&id)?);
    let post = state.post_service.find_one(post_id).await?;
    Ok(Json(PostDetailsDto::from(&post)))
}

async fn like_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let post_id = PostId::new(parse_id(&id)?);
    let response = state.post_service.like_post(post_id, user.id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn unlike_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let post_id = PostId::new(parse_id(&id)?);
    let response = state.post_service.unlike_post(post_id, user.id).await?;
    Ok(Json(response))
}

async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(state.user_service.get_profile(user.id).await?))
}

async fn get_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    let user_id = UserId::new(parse_id(&id)?);
    Ok(Json(state.user_service.find_by_id(user_id).await?))
}

async fn get_user_by_alias(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(alias): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(state.user_service.find_by_alias(&alias).await?))
}
