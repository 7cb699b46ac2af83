use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;
pub type NoteId = Uuid;

pub const DEFAULT_TAG: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub user: UserId,
    pub title: String,
    pub description: String,
    pub tag: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateNote {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub tag: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tag: Option<String>,
}

/// Fields to replace on an existing note. Absent and empty fields are left out.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tag: Option<String>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.tag.is_none()
    }
}

impl From<UpdateNote> for NotePatch {
    fn from(UpdateNote { title, description, tag }: UpdateNote) -> Self {
        let present = |value: Option<String>| value.filter(|v| !v.is_empty());
        Self {
            title: present(title),
            description: present(description),
            tag: present(tag),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateNoteResponse {
    pub note: Note,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteNoteResponse {
    #[serde(rename = "Success")]
    pub success: String,
    pub note: Note,
}

impl DeleteNoteResponse {
    pub fn new(note: Note) -> Self {
        Self {
            success: "note deleted!".into(),
            note,
        }
    }
}
