use rusqlite::{params, Row};
use sea_query::{Expr, Iden, Query, SqliteQueryBuilder};
use sea_query_rusqlite::RusqliteBinder;

use crate::db::{self, DB};

use super::{Note, NoteId, NotePatch, UserId, DEFAULT_TAG};

#[derive(Iden)]
pub enum Notes {
    Table,
    Id,
    User,
    Title,
    Description,
    Tag,
    Date,
}

const COLUMNS: [Notes; 6] = [
    Notes::Id,
    Notes::User,
    Notes::Title,
    Notes::Description,
    Notes::Tag,
    Notes::Date,
];

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            user: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            tag: row.get(4)?,
            date: row.get(5)?,
        })
    }
}

/// Notes owned by `user`, oldest first.
pub async fn find_by_owner(db: &DB, user: UserId) -> db::Result<Vec<Note>> {
    db.call(move |conn| {
        let notes = conn
            .prepare("SELECT id, user, title, description, tag, date FROM notes WHERE user = ? ORDER BY rowid")?
            .query_map(params![user], |row| Note::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    })
    .await
    .map_err(db::Error::from)
}

pub async fn insert(
    db: &DB,
    user: UserId,
    title: String,
    description: String,
    tag: Option<String>,
) -> db::Result<Note> {
    let tag = tag.unwrap_or_else(|| DEFAULT_TAG.into());

    db.call(move |conn| {
        conn.query_row(
            r#"INSERT INTO notes (user, title, description, tag) VALUES (?, ?, ?, ?)
            RETURNING id, user, title, description, tag, date"#,
            params![user, title, description, tag],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
}

pub async fn find_by_id(db: &DB, note_id: NoteId) -> db::Result<Note> {
    db.call(move |conn| {
        let note = conn.query_row(
            "SELECT id, user, title, description, tag, date FROM notes WHERE id = ?",
            params![note_id],
            |row| Note::try_from(row),
        )?;
        Ok(note)
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}

/// Replaces the fields present in `patch`. The patch must not be empty.
pub async fn update_by_id(db: &DB, note_id: NoteId, patch: NotePatch) -> db::Result<Note> {
    let NotePatch { title, description, tag } = patch;

    db.call(move |conn| {
        let mut query = Query::update();
        query.table(Notes::Table);
        if let Some(title) = title {
            query.value(Notes::Title, title);
        }
        if let Some(description) = description {
            query.value(Notes::Description, description);
        }
        if let Some(tag) = tag {
            query.value(Notes::Tag, tag);
        }
        query
            .and_where(Expr::col(Notes::Id).eq(note_id))
            .returning(Query::returning().columns(COLUMNS));

        let (sql, values) = query.build_rusqlite(SqliteQueryBuilder);

        conn.query_row(&sql, &*values.as_params(), |row| Note::try_from(row))
            .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}

pub async fn delete_by_id(db: &DB, note_id: NoteId) -> db::Result<Note> {
    db.call(move |conn| {
        conn.query_row(
            r#"DELETE FROM notes
            WHERE id = ?
            RETURNING id, user, title, description, tag, date"#,
            params![note_id],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}
