use lazy_static::lazy_static;
use rusqlite_migration::{Migrations, M};

lazy_static! {
    pub static ref MIGRATIONS: Migrations<'static> = Migrations::new(vec![
        M::up(
            r#"
            CREATE TABLE notes (
                id BLOB PRIMARY KEY CHECK(length(id) = 16) NOT NULL UNIQUE DEFAULT (uuid7_now()),
                user BLOB CHECK(length(user) = 16) NOT NULL,

                title TEXT NOT NULL,
                description TEXT NOT NULL,
                tag TEXT NOT NULL DEFAULT 'General',

                date DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#
        ),
        M::up("CREATE INDEX notes_user_idx ON notes (user);"),
    ]);
}
