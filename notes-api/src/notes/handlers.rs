use crate::{
    ctx::{BaseParams, Ctx},
    db::DB,
    Error, Result,
};

use super::{repository, validate, CreateNote, Note, NoteId, NotePatch};

pub async fn list_notes(BaseParams { db, ctx }: BaseParams) -> Result<Vec<Note>> {
    Ok(repository::find_by_owner(&db, ctx.user_id).await?)
}

pub async fn create_note(args: CreateNote, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let violations = validate(&args);
    if !violations.is_empty() {
        return Err(Error::Validation(violations));
    }

    let CreateNote { title, description, tag } = args;
    let note = repository::insert(&db, ctx.user_id, title, description, tag).await?;

    tracing::info!(note_id = %note.id, user_id = %ctx.user_id, "note created");
    Ok(note)
}

/// Fetches a note the caller owns. A missing note is reported before a foreign one.
async fn owned_note(db: &DB, note_id: NoteId, ctx: &Ctx) -> Result<Note> {
    let note = repository::find_by_id(db, note_id).await?;
    if note.user != ctx.user_id {
        tracing::warn!(%note_id, user_id = %ctx.user_id, "note owned by another user");
        return Err(Error::Forbidden);
    }
    Ok(note)
}

pub async fn update_note(note_id: NoteId, patch: NotePatch, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let note = owned_note(&db, note_id, &ctx).await?;
    if patch.is_empty() {
        return Ok(note);
    }

    let note = repository::update_by_id(&db, note_id, patch).await?;

    tracing::info!(%note_id, user_id = %ctx.user_id, "note updated");
    Ok(note)
}

pub async fn delete_note(note_id: NoteId, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    owned_note(&db, note_id, &ctx).await?;

    let note = repository::delete_by_id(&db, note_id).await?;

    tracing::info!(%note_id, user_id = %ctx.user_id, "note deleted");
    Ok(note)
}
