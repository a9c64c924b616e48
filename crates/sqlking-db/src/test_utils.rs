use std::{cell::RefCell, sync::Arc};

use rusqlite::types::Value;

use crate::{
    define_entity,
    materialize::ResultRow,
    provider::{SqlProvider, SqliteProvider},
    query::{Insert, Statement},
    schema::create_table,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub timestamp: i64,
    pub is_registered: bool,
}

define_entity!(
    User => users {
        table: "User",
        columns: {
            id: i64 => "id" [primary_key],
            username: String => "username" [index],
            timestamp: i64 => "timestamp",
            is_registered: bool => "isRegistered"
        }
    }
);

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub timestamp: i64,
    pub user_id: i64,
}

define_entity!(
    Post => posts {
        table: "Post",
        columns: {
            id: i64 => "id" [primary_key],
            title: String => "title",
            body: String => "body",
            timestamp: i64 => "timestamp",
            user_id: i64 => "userId" [index]
        }
    }
);

/// Fresh user rows for a test.
pub struct UserFixture {
    users: Vec<User>,
}

impl UserFixture {
    /// clyde, angie, gill and josh; clyde and gill are registered.
    pub fn four_users() -> Self {
        let users = [
            ("clyde", 1000, true),
            ("angie", 4000, false),
            ("gill", 2000, true),
            ("josh", 3000, false),
        ]
        .into_iter()
        .enumerate()
        .map(|(idx, (name, timestamp, is_registered))| User {
            id: idx as i64 + 1,
            username: name.to_string(),
            timestamp,
            is_registered,
        })
        .collect();

        Self { users }
    }

    /// One user per timestamp, named `user0`, `user1`, ...
    pub fn with_timestamps(timestamps: &[i64]) -> Self {
        let users = timestamps
            .iter()
            .enumerate()
            .map(|(idx, timestamp)| User {
                id: idx as i64 + 1,
                username: format!("user{idx}"),
                timestamp: *timestamp,
                is_registered: false,
            })
            .collect();

        Self { users }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// In-memory database holding the fixture rows.
    pub fn seed(&self) -> SqliteProvider {
        let provider = SqliteProvider::open_in_memory().unwrap();
        create_table::<User>(&provider).unwrap();
        Insert::builder()
            .values(&self.users)
            .execute(&provider)
            .unwrap();
        provider
    }

    /// Like [`UserFixture::seed`], plus two posts by clyde and one by josh.
    pub fn seed_with_posts(&self) -> SqliteProvider {
        let provider = self.seed();
        let posts = [
            (1, "hello", 1500, 1),
            (2, "rust tips", 2500, 1),
            (3, "first post", 3500, 4),
        ]
        .into_iter()
        .map(|(id, title, timestamp, user_id)| Post {
            id,
            title: title.to_string(),
            body: format!("{title} body"),
            timestamp,
            user_id,
        })
        .collect::<Vec<_>>();

        create_table::<Post>(&provider).unwrap();
        Insert::builder().values(&posts).execute(&provider).unwrap();
        provider
    }
}

/// Records every statement and answers with canned rows.
#[derive(Default)]
pub struct RecordingProvider {
    rows: Vec<ResultRow>,
    fail: bool,
    statements: RefCell<Vec<Statement>>,
}

impl RecordingProvider {
    pub fn with_rows(rows: Vec<ResultRow>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn user_row(id: i64, username: &str) -> ResultRow {
        let columns: Arc<[String]> = ["id", "username", "timestamp", "isRegistered"]
            .into_iter()
            .map(String::from)
            .collect();
        ResultRow::new(
            columns,
            vec![
                Value::Integer(id),
                Value::Text(username.to_string()),
                Value::Integer(0),
                Value::Integer(0),
            ],
        )
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.statements.borrow().clone()
    }

    fn record(&self, sql: &str, params: &[Value]) -> rusqlite::Result<()> {
        self.statements.borrow_mut().push(Statement {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        if self.fail {
            return Err(rusqlite::Error::InvalidQuery);
        }
        Ok(())
    }
}

impl SqlProvider for RecordingProvider {
    fn query(&self, sql: &str, params: &[Value]) -> rusqlite::Result<Vec<ResultRow>> {
        self.record(sql, params)?;
        Ok(self.rows.clone())
    }

    fn execute(&self, sql: &str, params: &[Value]) -> rusqlite::Result<usize> {
        self.record(sql, params)?;
        Ok(self.rows.len())
    }
}
