use axum::{
    extract::Path,
    middleware,
    routing::{delete, get, put},
    Router,
};

use crate::{
    ctx::{authenticate, BaseParams},
    extract::Json,
    state::AppState,
    Error, Result,
};

use super::{handlers, CreateNote, DeleteNoteResponse, Note, NoteId, UpdateNote, UpdateNoteResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/fetchallnotes", get(fetch_all_notes))
        .route("/addnote", put(add_note))
        .route("/updatenote/{id}", put(update_note))
        .route("/deletenote/{id}", delete(delete_note))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
}

/// Ids that are not UUIDs cannot name a stored note.
fn parse_note_id(id: &str) -> Result<NoteId> {
    NoteId::parse_str(id).map_err(|_| Error::NotFound("Note not found".into()))
}

async fn fetch_all_notes(base: BaseParams) -> Result<Json<Vec<Note>>> {
    handlers::list_notes(base).await.map(Json)
}

async fn add_note(base: BaseParams, Json(args): Json<CreateNote>) -> Result<Json<Note>> {
    handlers::create_note(args, base).await.map(Json)
}

async fn update_note(
    Path(id): Path<String>,
    base: BaseParams,
    args: Option<Json<UpdateNote>>,
) -> Result<Json<UpdateNoteResponse>> {
    let note_id = parse_note_id(&id)?;
    let args = args.map(|Json(args)| args).unwrap_or_default();
    handlers::update_note(note_id, args.into(), base)
        .await
        .map(|note| Json(UpdateNoteResponse { note }))
}

async fn delete_note(Path(id): Path<String>, base: BaseParams) -> Result<Json<DeleteNoteResponse>> {
    let note_id = parse_note_id(&id)?;
    handlers::delete_note(note_id, base)
        .await
        .map(|note| Json(DeleteNoteResponse::new(note)))
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderName, HeaderValue};
    use axum_test::{TestRequest, TestServer};
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::{
        db::init_test_db,
        errors::Result,
        notes::{DeleteNoteResponse, Note, UpdateNoteResponse},
        tests::{test_app, TestApp},
    };

    trait AuthExt {
        fn as_user(self, app: &TestApp, user: Uuid) -> Self;
    }

    impl AuthExt for TestRequest {
        fn as_user(self, app: &TestApp, user: Uuid) -> Self {
            let token = app.state.tokens.issue(user).unwrap();
            self.add_header(
                HeaderName::from_static("auth-token"),
                HeaderValue::from_str(&token).unwrap(),
            )
        }
    }

    async fn app() -> Result<TestApp> {
        test_app(init_test_db().await?).await
    }

    #[tokio::test]
    async fn requests_without_token_are_unauthenticated() -> Result<()> {
        let app = app().await?;

        let response = app.server.get("/api/notes/fetchallnotes").await;

        assert_eq!(response.status_code(), 401);
        assert_eq!(response.json::<Value>()["error"], "unauthenticated");
        Ok(())
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_before_validation() -> Result<()> {
        let app = app().await?;

        let response = app
            .server
            .put("/api/notes/addnote")
            .add_header(HeaderName::from_static("auth-token"), HeaderValue::from_static("garbage"))
            .json(&json!({ "title": "a" }))
            .await;

        assert_eq!(response.status_code(), 401);
        assert_eq!(response.json::<Value>()["error"], "invalid_credential");
        Ok(())
    }

    #[tokio::test]
    async fn bearer_prefix_is_accepted() -> Result<()> {
        let app = app().await?;
        let token = app.state.tokens.issue(Uuid::new_v4()).unwrap();

        let response = app
            .server
            .get("/api/notes/fetchallnotes")
            .add_header(
                HeaderName::from_static("auth-token"),
                HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
            )
            .await;

        assert_eq!(response.status_code(), 200);
        Ok(())
    }

    #[tokio::test]
    async fn add_note_reports_every_violation() -> Result<()> {
        let app = app().await?;

        let response = app
            .server
            .put("/api/notes/addnote")
            .as_user(&app, Uuid::new_v4())
            .json(&json!({ "title": "ab" }))
            .await;

        assert_eq!(response.status_code(), 400);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "validation");
        let errors = body["details"]["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "title");
        assert_eq!(errors[1]["field"], "description");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() -> Result<()> {
        let app = app().await?;

        let response = app
            .server
            .put("/api/notes/addnote")
            .as_user(&app, Uuid::new_v4())
            .content_type("application/json")
            .bytes("{not json".into())
            .await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<Value>()["error"], "json_validation");
        Ok(())
    }

    #[tokio::test]
    async fn update_without_body_leaves_note_unchanged() -> Result<()> {
        let app = app().await?;
        let user = Uuid::new_v4();

        let created = app
            .server
            .put("/api/notes/addnote")
            .as_user(&app, user)
            .json(&json!({ "title": "Groceries", "description": "Buy milk and eggs" }))
            .await
            .json::<Note>();

        let response = app
            .server
            .put(&format!("/api/notes/updatenote/{}", created.id))
            .as_user(&app, user)
            .await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<UpdateNoteResponse>().note, created);
        Ok(())
    }

    #[tokio::test]
    async fn update_without_body_on_missing_note_is_not_found() -> Result<()> {
        let app = app().await?;

        let response = app
            .server
            .put(&format!("/api/notes/updatenote/{}", Uuid::now_v7()))
            .as_user(&app, Uuid::new_v4())
            .await;

        assert_eq!(response.status_code(), 404);
        assert_eq!(response.json::<Value>()["error"], "not_found");
        Ok(())
    }

    #[tokio::test]
    async fn null_fields_are_reported_as_violations() -> Result<()> {
        let app = app().await?;

        let response = app
            .server
            .put("/api/notes/addnote")
            .as_user(&app, Uuid::new_v4())
            .json(&json!({ "title": null, "description": null }))
            .await;

        assert_eq!(response.status_code(), 400);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "validation");
        assert_eq!(body["details"]["errors"].as_array().unwrap().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn non_uuid_id_is_not_found() -> Result<()> {
        let app = app().await?;

        let response = app
            .server
            .delete("/api/notes/deletenote/507f1f77bcf86cd799439011")
            .as_user(&app, Uuid::new_v4())
            .await;

        assert_eq!(response.status_code(), 404);
        Ok(())
    }

    #[tokio::test]
    async fn store_failure_is_opaque_internal_error() -> Result<()> {
        let db = init_test_db().await?;
        db.call(|conn| conn.execute_batch("DROP TABLE notes").map_err(|e| e.into()))
            .await?;
        let app = test_app(db).await?;

        let response = app
            .server
            .get("/api/notes/fetchallnotes")
            .as_user(&app, Uuid::new_v4())
            .await;

        assert_eq!(response.status_code(), 500);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "unexpected");
        assert_eq!(body["message"], "Internal Server Error");
        Ok(())
    }

    #[tokio::test]
    async fn groceries_scenario() -> Result<()> {
        let app = app().await?;
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let response = app
            .server
            .put("/api/notes/addnote")
            .as_user(&app, a)
            .json(&json!({
                "title": "Groceries",
                "description": "Buy milk and eggs",
                "tag": "personal"
            }))
            .await;
        assert_eq!(response.status_code(), 200);
        let created = response.json::<Note>();
        assert_eq!(created.user, a);
        assert_eq!(created.tag, "personal");

        let response = app.server.get("/api/notes/fetchallnotes").as_user(&app, b).await;
        assert_eq!(response.status_code(), 200);
        assert!(response.json::<Vec<Note>>().is_empty());

        let response = app
            .server
            .put(&format!("/api/notes/updatenote/{}", created.id))
            .as_user(&app, a)
            .json(&json!({ "tag": "home" }))
            .await;
        assert_eq!(response.status_code(), 200);
        let updated = response.json::<UpdateNoteResponse>().note;
        assert_eq!(updated.tag, "home");
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.description, created.description);

        let response = app
            .server
            .delete(&format!("/api/notes/deletenote/{}", created.id))
            .as_user(&app, b)
            .await;
        assert_eq!(response.status_code(), 401);
        assert_eq!(response.json::<Value>()["error"], "forbidden");

        let response = app.server.get("/api/notes/fetchallnotes").as_user(&app, a).await;
        assert_eq!(response.json::<Vec<Note>>(), vec![updated.clone()]);

        let response = app
            .server
            .delete(&format!("/api/notes/deletenote/{}", created.id))
            .as_user(&app, a)
            .await;
        assert_eq!(response.status_code(), 200);
        let body = response.json::<Value>();
        assert_eq!(body["Success"], "note deleted!");
        assert_eq!(response.json::<DeleteNoteResponse>().note, updated);

        let response = app.server.get("/api/notes/fetchallnotes").as_user(&app, a).await;
        assert!(response.json::<Vec<Note>>().is_empty());

        let response = app
            .server
            .delete(&format!("/api/notes/deletenote/{}", created.id))
            .as_user(&app, b)
            .await;
        assert_eq!(response.status_code(), 404);
        Ok(())
    }
}
