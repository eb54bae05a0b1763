//! Types for the movie/actor catalog.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Storage format of calendar dates (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A movie with the actors linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub rating: i64,
    /// Linked actors, in the order the join returned them.
    #[serde(default)]
    pub actors: Vec<ActorRef>,
}

/// Actor as it appears inside a movie listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRef {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// An actor with the titles of the movies it is linked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub movies: Vec<String>,
}

/// Fields required to insert a movie.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub rating: i64,
}

/// Fields required to insert an actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActor {
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

/// Raw field changes keyed by field name, as received from a caller.
pub type FieldChanges = HashMap<String, Value>;

/// Resolved movie update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub rating: Option<i64>,
}

impl MovieChanges {
    /// Resolve caller-supplied keys against the updatable movie fields.
    ///
    /// Only `title`, `description`, `releaseDate` and `rating` are accepted;
    /// any other key is rejected before a statement is built.
    pub fn from_fields(fields: &FieldChanges) -> Result<Self, CatalogError> {
        let mut changes = Self::default();
        for (key, value) in fields {
            match key.as_str() {
                "title" => changes.title = Some(string_field(key, value)?),
                "description" => changes.description = Some(string_field(key, value)?),
                "releaseDate" => changes.release_date = Some(date_field(key, value)?),
                "rating" => changes.rating = Some(int_field(key, value)?),
                other => {
                    return Err(CatalogError::InvalidArgument(format!(
                        "movie field '{}' cannot be updated",
                        other
                    )))
                }
            }
        }
        Ok(changes)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.release_date.is_none()
            && self.rating.is_none()
    }
}

/// Resolved actor update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorChanges {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl ActorChanges {
    /// Resolve caller-supplied keys against `name`, `gender` and `birthDate`.
    pub fn from_fields(fields: &FieldChanges) -> Result<Self, CatalogError> {
        let mut changes = Self::default();
        for (key, value) in fields {
            match key.as_str() {
                "name" => changes.name = Some(string_field(key, value)?),
                "gender" => changes.gender = Some(string_field(key, value)?),
                "birthDate" => changes.birth_date = Some(date_field(key, value)?),
                other => {
                    return Err(CatalogError::InvalidArgument(format!(
                        "actor field '{}' cannot be updated",
                        other
                    )))
                }
            }
        }
        Ok(changes)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.gender.is_none() && self.birth_date.is_none()
    }
}

fn string_field(key: &str, value: &Value) -> Result<String, CatalogError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CatalogError::InvalidArgument(format!("field '{}' must be a string", key)))
}

fn date_field(key: &str, value: &Value) -> Result<NaiveDate, CatalogError> {
    let raw = string_field(key, value)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| {
        CatalogError::InvalidArgument(format!("field '{}' must be YYYY-MM-DD: {}", key, e))
    })
}

fn int_field(key: &str, value: &Value) -> Result<i64, CatalogError> {
    value
        .as_i64()
        .ok_or_else(|| CatalogError::InvalidArgument(format!("field '{}' must be an integer", key)))
}

/// Ordering for movie listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Title ascending.
    Title,
    /// Release date ascending.
    Date,
    /// Rating descending.
    #[default]
    Rating,
}

impl From<&str> for SortKey {
    /// Unknown selectors fall back to rating order.
    fn from(value: &str) -> Self {
        match value {
            "title" => SortKey::Title,
            "date" => SortKey::Date,
            _ => SortKey::Rating,
        }
    }
}

/// What a fragment search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentType {
    Title,
    Actor,
}

impl FromStr for FragmentType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(FragmentType::Title),
            "actor" => Ok(FragmentType::Actor),
            other => Err(CatalogError::InvalidArgument(format!(
                "unknown fragment type '{}', expected 'title' or 'actor'",
                other
            ))),
        }
    }
}

impl fmt::Display for FragmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentType::Title => write!(f, "title"),
            FragmentType::Actor => write!(f, "actor"),
        }
    }
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Data corruption: {0}")]
    DataCorruption(String),

    #[error("Storage error in {op}: {message}")]
    Storage { op: &'static str, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> FieldChanges {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!(SortKey::from("title"), SortKey::Title);
        assert_eq!(SortKey::from("date"), SortKey::Date);
        assert_eq!(SortKey::from("rating"), SortKey::Rating);
        assert_eq!(SortKey::from(""), SortKey::Rating);
        assert_eq!(SortKey::from("whatever"), SortKey::Rating);
    }

    #[test]
    fn test_fragment_type_parse() {
        assert_eq!("title".parse::<FragmentType>().unwrap(), FragmentType::Title);
        assert_eq!("actor".parse::<FragmentType>().unwrap(), FragmentType::Actor);
        assert!(matches!(
            "genre".parse::<FragmentType>(),
            Err(CatalogError::InvalidArgument(_))
        ));
        // Selectors are matched exactly.
        assert!("Title".parse::<FragmentType>().is_err());
    }

    #[test]
    fn test_movie_changes_from_fields() {
        let changes = MovieChanges::from_fields(&fields(json!({
            "title": "Heat",
            "releaseDate": "1995-12-15",
            "rating": 8
        })))
        .unwrap();

        assert_eq!(changes.title.as_deref(), Some("Heat"));
        assert_eq!(changes.description, None);
        assert_eq!(
            changes.release_date,
            Some(NaiveDate::from_ymd_opt(1995, 12, 15).unwrap())
        );
        assert_eq!(changes.rating, Some(8));
    }

    #[test]
    fn test_movie_changes_rejects_unknown_column() {
        let result = MovieChanges::from_fields(&fields(json!({
            "title = 'x'; DROP TABLE movies; --": "boom"
        })));
        assert!(matches!(result, Err(CatalogError::InvalidArgument(_))));

        // The storage column name is not an accepted key either.
        let result = MovieChanges::from_fields(&fields(json!({ "date": "2001-05-03" })));
        assert!(matches!(result, Err(CatalogError::InvalidArgument(_))));
    }

    #[test]
    fn test_movie_changes_rejects_bad_values() {
        let bad_rating = MovieChanges::from_fields(&fields(json!({ "rating": "ten" })));
        assert!(matches!(bad_rating, Err(CatalogError::InvalidArgument(_))));

        let bad_date = MovieChanges::from_fields(&fields(json!({ "releaseDate": "03/05/2001" })));
        assert!(matches!(bad_date, Err(CatalogError::InvalidArgument(_))));

        let fractional = MovieChanges::from_fields(&fields(json!({ "rating": 7.5 })));
        assert!(matches!(fractional, Err(CatalogError::InvalidArgument(_))));

        let wide = MovieChanges::from_fields(&fields(json!({ "rating": 1_i64 << 40 }))).unwrap();
        assert_eq!(wide.rating, Some(1_i64 << 40));
    }

    #[test]
    fn test_actor_changes_from_fields() {
        let changes = ActorChanges::from_fields(&fields(json!({
            "gender": "female",
            "birthDate": "1970-01-02"
        })))
        .unwrap();
        assert_eq!(changes.name, None);
        assert_eq!(changes.gender.as_deref(), Some("female"));
        assert!(!changes.is_empty());

        let result = ActorChanges::from_fields(&fields(json!({ "id": 4 })));
        assert!(matches!(result, Err(CatalogError::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_changes() {
        assert!(MovieChanges::from_fields(&FieldChanges::new()).unwrap().is_empty());
        assert!(ActorChanges::from_fields(&FieldChanges::new()).unwrap().is_empty());
    }

    #[test]
    fn test_movie_serialization_uses_calendar_date() {
        let movie = Movie {
            id: 1,
            title: "Memento".to_string(),
            description: "Backwards".to_string(),
            release_date: NaiveDate::from_ymd_opt(2001, 5, 3).unwrap(),
            rating: 9,
            actors: vec![ActorRef {
                id: 2,
                name: "Guy Pearce".to_string(),
                gender: None,
            }],
        };

        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["releaseDate"], "2001-05-03");
        assert_eq!(json["actors"][0]["name"], "Guy Pearce");
        assert!(json["actors"][0].get("gender").is_none());
    }

    #[test]
    fn test_new_actor_optional_fields_default() {
        let actor: NewActor = serde_json::from_str(r#"{"name": "Keanu Reeves"}"#).unwrap();
        assert_eq!(actor.name, "Keanu Reeves");
        assert!(actor.gender.is_none());
        assert!(actor.birth_date.is_none());
    }
}
