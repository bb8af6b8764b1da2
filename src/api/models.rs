/// Wire types for the FlowrSpot API.
///
/// Every struct mirrors the JSON the server actually sends; list
/// responses arrive wrapped in an envelope object (`{"flowers": [...]}`),
/// so each resource has both an item type and its envelope. Fields the
/// server sometimes omits on list endpoints are defaulted rather than
/// optional so view code can render them uniformly.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Flower {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub latin_name: String,
    /// Number of sightings reported for this flower.
    #[serde(default)]
    pub sightings: u32,
    /// Sometimes sent without a scheme; normalize before fetching.
    #[serde(default)]
    pub profile_picture: String,
    /// Favorite flag as reported by the API. The client derives the
    /// displayed state from its own favorites collection instead.
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlowerList {
    pub flowers: Vec<Flower>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlowerEnvelope {
    pub flower: Flower,
}

/// One favorite record: the record's own id (required for deletion) plus
/// the flower it references.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FavoriteRecord {
    pub id: i64,
    pub flower: Flower,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FavoritesList {
    pub fav_flowers: Vec<FavoriteRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FavoriteCreated {
    pub fav_flower: FavoriteRecord,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SightingUser {
    pub id: i64,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sighting {
    pub id: i64,
    #[serde(default)]
    pub flower_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub comments_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub flower: Option<Flower>,
    #[serde(default)]
    pub user: Option<SightingUser>,
}

impl Sighting {
    /// Whether the given user created this sighting.
    pub fn created_by(&self, user_id: i64) -> bool {
        self.user.as_ref().is_some_and(|user| user.id == user_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SightingsList {
    pub sightings: Vec<Sighting>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SightingEnvelope {
    pub sighting: Sighting,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Like {
    #[serde(default)]
    pub id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LikesList {
    pub likes: Vec<Like>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub sighting_id: i64,
    pub user_id: i64,
    /// Display name the server denormalizes onto each comment.
    #[serde(default)]
    pub user_full_name: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentsList {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentEnvelope {
    pub comment: Comment,
}

/// Login and registration both answer with a bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub auth_token: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

/// Registration payload for `POST /users/register`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    /// `YYYY-MM-DD`, validated by the form before submission.
    pub date_of_birth: String,
    pub email: String,
    pub password: String,
}

/// Login payload for `POST /users/login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flower_list_parses_with_missing_detail_fields() {
        let json = r#"{
            "flowers": [
                {
                    "id": 42,
                    "name": "Cypripedium calceolus",
                    "latin_name": "Lady's-slipper orchid",
                    "sightings": 13,
                    "profile_picture": "pics/flower_42.png",
                    "favorite": false
                }
            ]
        }"#;

        let list: FlowerList = serde_json::from_str(json).unwrap();
        let flower = &list.flowers[0];
        assert_eq!(flower.id, 42);
        assert_eq!(flower.sightings, 13);
        assert!(flower.description.is_empty());
        assert!(flower.features.is_empty());
    }

    #[test]
    fn favorites_pair_record_id_with_flower_id() {
        let json = r#"{
            "fav_flowers": [
                { "id": 7, "flower": { "id": 42, "name": "Rose" } }
            ]
        }"#;

        let list: FavoritesList = serde_json::from_str(json).unwrap();
        let record = &list.fav_flowers[0];
        assert_eq!(record.id, 7);
        assert_eq!(record.flower.id, 42);
    }

    #[test]
    fn likes_carry_the_liking_user() {
        let json = r#"{ "likes": [ { "id": 1, "user_id": 9 }, { "user_id": 12 } ] }"#;
        let list: LikesList = serde_json::from_str(json).unwrap();
        assert_eq!(list.likes.len(), 2);
        assert_eq!(list.likes[1].user_id, 12);
        assert_eq!(list.likes[1].id, 0);
    }

    #[test]
    fn sighting_parses_with_nested_flower_and_user() {
        let json = r#"{
            "sighting": {
                "id": 5,
                "flower_id": 42,
                "name": "By the creek",
                "description": "Half hidden in the reeds.",
                "latitude": 43.3438,
                "longitude": 17.8078,
                "picture": "pics/sighting_5.jpg",
                "likes_count": 3,
                "comments_count": 2,
                "created_at": "2024-05-14T08:30:00.000Z",
                "flower": { "id": 42, "name": "Rose" },
                "user": { "id": 9, "full_name": "Mara K." }
            }
        }"#;

        let envelope: SightingEnvelope = serde_json::from_str(json).unwrap();
        let sighting = envelope.sighting;
        assert_eq!(sighting.likes_count, 3);
        assert!(sighting.created_by(9));
        assert!(!sighting.created_by(12));
        assert!(sighting.created_at.is_some());
        assert_eq!(sighting.flower.unwrap().name, "Rose");
    }
}
