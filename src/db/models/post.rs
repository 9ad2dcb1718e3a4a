use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A post with its embedded likes and comments. `name` is the author's name,
/// denormalized at creation time. `likes` holds one entry per distinct liker.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub text: String,
    pub likes: Vec<Uuid>,
    pub comments: Json<Vec<Comment>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(user_id: Uuid, name: Option<String>, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            text,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_serialize_camel_case() {
        let comment = Comment::new(Uuid::new_v4(), Some("Ann".to_string()), "hi".to_string());
        let value = serde_json::to_value(&comment).unwrap();
        assert!(value.get("userId").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("user_id").is_none());
    }
}
