use super::{
    components,
    components::Component,
    config::RELOAD_EVENT,
    errors::{ServerError, StoreError},
    htmx,
    models::{AppState, Importance, NoteDraft, NoteId, Status},
    query::{self, QueryState, SortDirection, SortKey},
};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;

/// Raw values of the list controls, as sent by the controls form.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    search: String,
    sort_by: Option<SortKey>,
    sort_direction: Option<SortDirection>,
    /// `0` is the "all importances" choice.
    importance: Option<u8>,
    status_active: Option<String>,
    status_completed: Option<String>,
    status_cancelled: Option<String>,
}

impl ListParams {
    fn into_query_state(self) -> Result<QueryState> {
        let importance = match self.importance {
            None | Some(0) => None,
            Some(rank) => {
                Some(Importance::try_from(rank).map_err(anyhow::Error::msg)?)
            }
        };
        let statuses = [
            (Status::Active, self.status_active),
            (Status::Completed, self.status_completed),
            (Status::Cancelled, self.status_cancelled),
        ]
        .into_iter()
        .filter_map(|(status, checkbox)| checkbox.map(|_| status))
        .collect();

        Ok(QueryState {
            search: self.search,
            importance,
            statuses,
            sort_key: self.sort_by.unwrap_or_default(),
            sort_direction: self.sort_direction.unwrap_or_default(),
        })
    }
}

pub async fn root(
    State(AppState { store }): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ServerError> {
    // A failed load still renders the page; the list shows what we have.
    if let Err(e) = store.refresh().await {
        log::error!("could not load notes: {e}");
    }
    let query = params.into_query_state()?;

    let page = components::Page {
        title: "Notes",
        children: Box::new(components::NotesHome { query: &query }),
    }
    .render();

    Ok(page)
}

pub async fn pong() -> impl IntoResponse {
    "pong"
}

pub async fn list_notes(
    State(AppState { store }): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ServerError> {
    let query = params.into_query_state()?;
    let notes = store.list().await?;
    let shown = query::derive(&notes, &query);

    Ok(components::NoteList { notes: &shown }.render())
}

pub async fn new_note_form() -> impl IntoResponse {
    components::NoteEditor {
        id: None,
        draft: &NoteDraft::default(),
    }
    .render()
}

pub async fn edit_note_form(
    State(AppState { store }): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let note = store.get(&NoteId::new(id)).await?;

    Ok(components::NoteEditor {
        id: Some(&note.id),
        draft: &NoteDraft::from(&note),
    }
    .render())
}

#[derive(Debug, Deserialize)]
pub struct NoteForm {
    id: Option<String>,
    text: String,
    importance: Importance,
    status: Status,
}

pub async fn save_note(
    State(AppState { store }): State<AppState>,
    Form(NoteForm {
        id,
        text,
        importance,
        status,
    }): Form<NoteForm>,
) -> Result<Response, ServerError> {
    let draft = NoteDraft {
        text,
        importance,
        status,
    };
    if draft.is_blank() {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            StoreError::Validation.to_string(),
        )
            .into_response());
    }
    let editing = id.filter(|i| !i.trim().is_empty()).map(NoteId::new);
    match editing {
        Some(id) => store.update(&id, draft).await?,
        None => store.create(draft).await?,
    };

    // empty body closes the modal
    Ok((htmx::trigger(RELOAD_EVENT), "").into_response())
}

pub async fn confirm_delete_form(
    State(AppState { store }): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let note = store.get(&NoteId::new(id)).await?;

    Ok(components::ConfirmDelete { note: &note }.render())
}

pub async fn delete_note(
    State(AppState { store }): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    store.delete(&NoteId::new(id)).await?;

    Ok((htmx::trigger(RELOAD_EVENT), ""))
}

pub async fn close_modal() -> impl IntoResponse {
    ""
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        routes,
        store::{MemoryStore, Store},
    };
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Method, Request},
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let state = AppState {
            store: store.clone(),
        };
        (routes::app(state), store)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        form: Option<&str>,
    ) -> (StatusCode, Option<String>, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match form {
            Some(f) => {
                builder = builder
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(f.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let trigger = response
            .headers()
            .get("hx-trigger")
            .map(|v| v.to_str().expect("ascii").to_string());
        let bytes = hyper::body::to_bytes(response.into_body())
            .await
            .expect("body");

        (status, trigger, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[test]
    fn test_params_map_to_query_state() {
        let params = ListParams {
            search: "milk".into(),
            sort_by: Some(SortKey::Time),
            sort_direction: Some(SortDirection::Desc),
            importance: Some(3),
            status_active: Some("on".into()),
            status_completed: None,
            status_cancelled: Some("on".into()),
        };
        let query = params.into_query_state().expect("valid");
        assert_eq!(query.search, "milk");
        assert_eq!(query.importance, Some(Importance::High));
        assert_eq!(query.sort_key, SortKey::Time);
        assert_eq!(query.sort_direction, SortDirection::Desc);
        assert!(query.statuses.contains(&Status::Active));
        assert!(query.statuses.contains(&Status::Cancelled));
        assert!(!query.statuses.contains(&Status::Completed));
    }

    #[test]
    fn test_empty_params_are_default_state() {
        let query = ListParams::default().into_query_state().expect("valid");
        assert_eq!(query, QueryState::default());

        let query = ListParams {
            importance: Some(0),
            ..ListParams::default()
        }
        .into_query_state()
        .expect("valid");
        assert_eq!(query.importance, None);
    }

    #[test]
    fn test_bad_importance_is_rejected() {
        let res = ListParams {
            importance: Some(7),
            ..ListParams::default()
        }
        .into_query_state();
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn test_root_renders_controls_and_list_container() {
        let (app, _) = app();
        let (status, _, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"id="notes-list""#));
        assert!(body.contains(r#"id="controls""#));
        assert!(body.contains(r#"id="add-note""#));
    }

    #[tokio::test]
    async fn test_create_filter_delete_end_to_end() {
        let (app, store) = app();

        let (status, trigger, body) = send(
            &app,
            Method::POST,
            "/notes",
            Some("text=Alpha&importance=3&status=3"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(trigger.as_deref(), Some(RELOAD_EVENT));
        assert!(body.is_empty());
        send(
            &app,
            Method::POST,
            "/notes",
            Some("id=&text=Bravo&importance=1&status=2"),
        )
        .await;

        let (_, _, body) = send(
            &app,
            Method::GET,
            "/notes?status_active=on&sort_by=importance&sort_direction=asc",
            None,
        )
        .await;
        assert!(body.contains("Alpha"));
        assert!(!body.contains("Bravo"));

        let alpha = store
            .list()
            .await
            .expect("list")
            .into_iter()
            .find(|n| n.text == "Alpha")
            .expect("alpha exists");
        let (status, trigger, _) = send(
            &app,
            Method::DELETE,
            &format!("/notes/{}", alpha.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(trigger.as_deref(), Some(RELOAD_EVENT));

        let (_, _, body) = send(&app, Method::GET, "/notes", None).await;
        assert!(!body.contains("Alpha"));
        assert!(body.contains("Bravo"));
    }

    #[tokio::test]
    async fn test_save_updates_when_id_is_present() {
        let (app, store) = app();
        let note = store
            .create(NoteDraft {
                text: "Draft".into(),
                ..NoteDraft::default()
            })
            .await
            .expect("created");

        let (status, _, _) = send(
            &app,
            Method::POST,
            "/notes",
            Some(&format!("id={}&text=Final&importance=2&status=1", note.id)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let notes = store.list().await.expect("list");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, note.id);
        assert_eq!(notes[0].text, "Final");
        assert_eq!(notes[0].importance, Importance::Medium);
        assert_eq!(notes[0].status, Status::Cancelled);
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected_before_the_store() {
        let (app, store) = app();
        let (status, trigger, body) = send(
            &app,
            Method::POST,
            "/notes",
            Some("text=+++&importance=3&status=3"),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(trigger, None);
        assert_eq!(body, "Note cannot be empty");
        assert!(store.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_missing_note_fails_without_side_effects() {
        let (app, store) = app();
        store
            .create(NoteDraft {
                text: "Stays".into(),
                ..NoteDraft::default()
            })
            .await
            .expect("created");

        let (status, trigger, _) =
            send(&app, Method::DELETE, "/notes/missing", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(trigger, None);
        let (status, _, _) =
            send(&app, Method::GET, "/notes/missing/edit", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let (status, _, _) = send(
            &app,
            Method::POST,
            "/notes",
            Some("id=missing&text=New&importance=3&status=3"),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(store.list().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_editor_and_confirm_forms() {
        let (app, store) = app();
        let note = store
            .create(NoteDraft {
                text: "Editable".into(),
                importance: Importance::Low,
                status: Status::Completed,
            })
            .await
            .expect("created");

        let (_, _, body) = send(&app, Method::GET, "/notes/new", None).await;
        assert!(body.contains("New note"));

        let uri = format!("/notes/{}/edit", note.id);
        let (status, _, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Edit note"));
        assert!(body.contains("Editable"));

        let uri = format!("/notes/{}/delete", note.id);
        let (status, _, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(&format!(r#"hx-delete="/notes/{}""#, note.id)));

        let (_, _, body) =
            send(&app, Method::GET, "/modal/close", None).await;
        assert!(body.is_empty());
    }
}
