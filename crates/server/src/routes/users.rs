use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use models::{path_id::PathId, user::User};
use serde::Serialize;
use tracing::error;

use crate::errors::{ApiError, MessageBody};
use crate::extract::Payload;
use crate::startup::AppState;

pub const NO_USERS: &str = "No users found.";
pub const UPDATED: &str = "Successfully updated!";
pub const DELETED: &str = "User successfully deleted.";
pub const CREATED: &str = "success";
pub const HTML_INTERNAL_ERROR: &str = "Internal server error.";

/// Attached to every response of the JSON listing.
pub const SERVICE_HEADER: (&str, &str) = ("X-MyName", "Paul Simon");

#[derive(Serialize)]
pub struct UsersBody {
    pub users: Vec<User>,
}

#[derive(Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct CreatedBody {
    pub status: &'static str,
    pub id: i64,
}

/// `GET /users`: first names as an HTML list.
pub async fn list_users_html(State(state): State<AppState>) -> Result<Html<String>, (StatusCode, &'static str)> {
    match state.users.list().await {
        Ok(users) => Ok(Html(render_user_list(&users))),
        Err(e) => {
            error!(error = %e, "rendering user list failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, HTML_INTERNAL_ERROR))
        }
    }
}

/// `GET /api/users`: 404 instead of an empty array.
pub async fn list_users(State(state): State<AppState>) -> Response {
    let body = match state.users.list().await {
        Ok(users) if users.is_empty() => ApiError::new(StatusCode::NOT_FOUND, NO_USERS).into_response(),
        Ok(users) => Json(UsersBody { users }).into_response(),
        Err(e) => ApiError::during("fetching users")(e).into_response(),
    };
    ([SERVICE_HEADER], body).into_response()
}

/// `GET /api/users/:id`
pub async fn get_user(State(state): State<AppState>, Path(raw): Path<String>) -> Result<Json<User>, ApiError> {
    let user = state.users.get(PathId::parse(&raw)).await.map_err(ApiError::during("fetching user"))?;
    Ok(Json(user))
}

/// `PUT /api/users/:id`
pub async fn update_user(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Payload(body): Payload,
) -> Result<Json<StatusBody>, ApiError> {
    state
        .users
        .update(PathId::parse(&raw), body)
        .await
        .map_err(ApiError::during("updating user"))?;
    Ok(Json(StatusBody { status: UPDATED }))
}

/// `DELETE /api/users/:id`
pub async fn delete_user(State(state): State<AppState>, Path(raw): Path<String>) -> Result<Json<MessageBody>, ApiError> {
    state.users.delete(PathId::parse(&raw)).await.map_err(ApiError::during("deleting user"))?;
    Ok(Json(MessageBody { message: DELETED.into() }))
}

/// `POST /api/users`
pub async fn create_user(
    State(state): State<AppState>,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<CreatedBody>), ApiError> {
    let user = state.users.create(body).await.map_err(ApiError::during("creating user"))?;
    Ok((StatusCode::CREATED, Json(CreatedBody { status: CREATED, id: user.id })))
}

fn render_user_list(users: &[User]) -> String {
    let items: String = users
        .iter()
        .map(|u| format!("<li>{}</li>", escape_html(&u.first_name_text())))
        .collect();
    format!("<ul>{items}</ul>")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
