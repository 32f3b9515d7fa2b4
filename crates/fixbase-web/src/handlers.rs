use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use fixbase_core::models::{
    AnswerDraft, CommentDraft, IssueDraft, ListQuery, MetaResponse, ProblemDraft,
};
use fixbase_core::{FixbaseError, KnowledgeBase};

use crate::WebState;
use crate::auth::require_caller;
use crate::dto::{CommentsQuery, HealthResponse, UpvoteRequest};
use crate::error::{fixbase_error_response, malformed_request_response};

/// Storage calls block, so they run on the blocking pool with their own handle.
async fn run_blocking<T, F>(kb: &KnowledgeBase, op: F) -> fixbase_core::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&KnowledgeBase) -> fixbase_core::Result<T> + Send + 'static,
{
    let kb = kb.clone();
    tokio::task::spawn_blocking(move || op(&kb))
        .await
        .unwrap_or_else(|err| Err(FixbaseError::Internal(format!("storage task failed: {err}"))))
}

fn respond<T: Serialize>(
    result: fixbase_core::Result<T>,
    status: StatusCode,
    operation: &str,
) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(err) => fixbase_error_response(err, operation),
    }
}

pub async fn list_issues(
    State(state): State<WebState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return malformed_request_response(&rejection.body_text(), "issues.list"),
    };
    let result = run_blocking(&state.kb, move |kb| kb.list_issues(&query)).await;
    respond(result, StatusCode::OK, "issues.list")
}

pub async fn top_issues(
    State(state): State<WebState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return malformed_request_response(&rejection.body_text(), "issues.top"),
    };
    let result = run_blocking(&state.kb, move |kb| kb.top_issues(&query)).await;
    respond(result, StatusCode::OK, "issues.top")
}

pub async fn get_issue(State(state): State<WebState>, Path(id): Path<String>) -> Response {
    let result = run_blocking(&state.kb, move |kb| kb.get_issue(&id)).await;
    respond(result, StatusCode::OK, "issues.get")
}

pub async fn submit_issue(
    State(state): State<WebState>,
    payload: Result<Json<IssueDraft>, JsonRejection>,
) -> Response {
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_request_response(&rejection.body_text(), "issues.submit"),
    };
    let result = run_blocking(&state.kb, move |kb| kb.submit_issue(draft)).await;
    respond(result, StatusCode::CREATED, "issues.submit")
}

pub async fn set_issue_upvotes(
    State(state): State<WebState>,
    Path(id): Path<String>,
    payload: Result<Json<UpvoteRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_request_response(&rejection.body_text(), "issues.upvote"),
    };
    let result = run_blocking(&state.kb, move |kb| {
        kb.set_issue_upvotes(&id, request.upvotes)
    })
    .await;
    respond(result, StatusCode::OK, "issues.upvote")
}

pub async fn list_comments(
    State(state): State<WebState>,
    query: Result<Query<CommentsQuery>, QueryRejection>,
) -> Response {
    let issue_id = match query {
        Ok(Query(CommentsQuery {
            issue_id: Some(issue_id),
        })) if !issue_id.trim().is_empty() => issue_id,
        Ok(_) => return malformed_request_response("issueId is required", "comments.list"),
        Err(rejection) => return malformed_request_response(&rejection.body_text(), "comments.list"),
    };
    let result = run_blocking(&state.kb, move |kb| kb.list_comments(issue_id.trim())).await;
    respond(result, StatusCode::OK, "comments.list")
}

pub async fn add_comment(
    State(state): State<WebState>,
    payload: Result<Json<CommentDraft>, JsonRejection>,
) -> Response {
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_request_response(&rejection.body_text(), "comments.add"),
    };
    let result = run_blocking(&state.kb, move |kb| kb.add_comment(draft)).await;
    respond(result, StatusCode::CREATED, "comments.add")
}

pub async fn list_problems(
    State(state): State<WebState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return malformed_request_response(&rejection.body_text(), "problems.list"),
    };
    let result = run_blocking(&state.kb, move |kb| kb.list_problems(&query)).await;
    respond(result, StatusCode::OK, "problems.list")
}

pub async fn get_problem(State(state): State<WebState>, Path(id): Path<String>) -> Response {
    let result = run_blocking(&state.kb, move |kb| kb.get_problem(&id)).await;
    respond(result, StatusCode::OK, "problems.get")
}

pub async fn ask_problem(
    State(state): State<WebState>,
    headers: HeaderMap,
    payload: Result<Json<ProblemDraft>, JsonRejection>,
) -> Response {
    let caller = match require_caller(&headers, "problems.ask") {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_request_response(&rejection.body_text(), "problems.ask"),
    };
    let result = run_blocking(&state.kb, move |kb| kb.ask_problem(Some(&caller), draft)).await;
    respond(result, StatusCode::CREATED, "problems.ask")
}

pub async fn upvote_problem(State(state): State<WebState>, Path(id): Path<String>) -> Response {
    let result = run_blocking(&state.kb, move |kb| kb.upvote_problem(&id)).await;
    respond(result, StatusCode::OK, "problems.upvote")
}

pub async fn list_answers(State(state): State<WebState>, Path(id): Path<String>) -> Response {
    let result = run_blocking(&state.kb, move |kb| kb.list_answers(&id)).await;
    respond(result, StatusCode::OK, "answers.list")
}

pub async fn add_answer(
    State(state): State<WebState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<AnswerDraft>, JsonRejection>,
) -> Response {
    let caller = match require_caller(&headers, "answers.add") {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_request_response(&rejection.body_text(), "answers.add"),
    };
    let result = run_blocking(&state.kb, move |kb| {
        kb.add_answer(Some(&caller), &id, draft)
    })
    .await;
    respond(result, StatusCode::CREATED, "answers.add")
}

pub async fn meta() -> Json<MetaResponse> {
    Json(MetaResponse::current())
}

pub async fn health(State(state): State<WebState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        storage: state.kb.storage_kind(),
    })
}

pub async fn not_found() -> Response {
    fixbase_error_response(FixbaseError::NotFound("route".to_string()), "route")
}
