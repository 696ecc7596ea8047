use std::sync::Arc;

use ag_core::{Article, ArticleRequest, GeneratedArticle, SeoMetadata};
use ag_scrapers::ArticlePipeline;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::{ApiForm, ApiJson};
use crate::AppState;

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub article: Article,
}

#[derive(Debug, Serialize)]
pub struct SeoResponse {
    pub seo: SeoMetadata,
}

#[derive(Debug, Deserialize)]
pub struct HtmlRequest {
    pub article: Article,
    pub seo: SeoMetadata,
}

#[derive(Debug, Serialize)]
pub struct HtmlResponse {
    pub html: String,
}

fn issue_token(state: &AppState, login: &LoginRequest) -> ApiResult<TokenResponse> {
    if !state.auth.authenticate(&login.username, &login.password) {
        return Err(ApiError::Unauthorized("Incorrect username or password".to_string()));
    }
    let access_token = state.auth.issue_token(&login.username)?;
    info!("🔑 Issued token for {}", login.username);
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

fn validate(request: &ArticleRequest) -> Result<(), ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }
    Ok(())
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Article Generator API" }))
}

/// OAuth2 password-flow login (form encoded).
pub async fn token(
    State(state): State<Arc<AppState>>,
    ApiForm(login): ApiForm<LoginRequest>,
) -> ApiResult<TokenResponse> {
    issue_token(&state, &login)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(login): ApiJson<LoginRequest>,
) -> ApiResult<TokenResponse> {
    issue_token(&state, &login)
}

pub async fn me(CurrentUser(username): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse { username })
}

pub async fn generate_article(
    State(state): State<Arc<AppState>>,
    CurrentUser(username): CurrentUser,
    ApiJson(request): ApiJson<ArticleRequest>,
) -> ApiResult<ArticleResponse> {
    validate(&request)?;
    info!("📰 {} requested an article about \"{}\"", username, request.query);
    let article = state
        .pipeline
        .generate_article(&request.query, request.url.as_deref())
        .await?;
    Ok(Json(ArticleResponse { article }))
}

pub async fn generate_seo(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    ApiJson(article): ApiJson<Article>,
) -> ApiResult<SeoResponse> {
    let seo = state.pipeline.generate_seo(&article).await?;
    Ok(Json(SeoResponse { seo }))
}

pub async fn generate_full_article(
    State(state): State<Arc<AppState>>,
    CurrentUser(username): CurrentUser,
    ApiJson(request): ApiJson<ArticleRequest>,
) -> ApiResult<GeneratedArticle> {
    validate(&request)?;
    info!("📰 {} requested a full article about \"{}\"", username, request.query);
    let generated = state.pipeline.generate_full_article(&request).await?;
    Ok(Json(generated))
}

pub async fn generate_html(
    _user: CurrentUser,
    ApiJson(request): ApiJson<HtmlRequest>,
) -> Json<HtmlResponse> {
    Json(HtmlResponse {
        html: ArticlePipeline::render_html(&request.article, &request.seo),
    })
}
