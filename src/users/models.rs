use serde::{Deserialize, Serialize};

/// The body accepted by `POST /api/users` and `PUT /api/users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
}

impl User {
    fn new(id: u32, name: &str, email: &str) -> Self {
        Self { id, name: name.to_owned(), email: email.to_owned() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPage {
    pub page: u32,
    pub limit: u32,
    pub sort: String,
    pub users: Vec<User>,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetail {
    pub id: String,
    pub name: String,
    pub email: String,
    pub include_posts: bool,
    pub include_comments: bool,
}

impl UserDetail {
    pub fn synthesize(id: &str, include_posts: bool, include_comments: bool) -> Self {
        Self {
            id: id.to_owned(),
            name: format!("User {id}"),
            email: format!("user{id}@example.com"),
            include_posts,
            include_comments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    pub id: u32,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub total_users: u32,
    pub active_sessions: u32,
    pub requests_today: u32,
}

pub(crate) const TOTAL_USERS: u32 = 100;

/// Fixed listing served by `GET /api/users`, ordered by `sort`. Unknown sort
/// keys keep id order.
pub(crate) fn sample_users(sort: &str) -> Vec<User> {
    let mut users = vec![
        User::new(1, "Carol", "carol@example.com"),
        User::new(2, "Alice", "alice@example.com"),
        User::new(3, "Bob", "bob@example.com"),
    ];
    match sort {
        "name" => users.sort_by(|a, b| a.name.cmp(&b.name)),
        "email" => users.sort_by(|a, b| a.email.cmp(&b.email)),
        _ => users.sort_by_key(|u| u.id),
    }
    users
}
