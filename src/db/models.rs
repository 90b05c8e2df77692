//! Database models. Serde renames preserve the wire casing the site's
//! client code consumes (`Name`, `CourseNum`, `profName`, ...).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub fname: String,
    pub lname: String,
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

/// One review record, keyed by professor name. Fields beyond the key are
/// free-form and returned verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    #[serde(rename = "profName")]
    pub prof_name: String,
    pub course: Option<String>,
    pub term: Option<String>,
    pub rating: Option<String>,
    pub review: Option<String>,
    pub created_at: String,
}

/// One precomputed evaluation summary per (professor, subject, course,
/// term). Numeric fields stay string-typed end to end; the profile view
/// parses them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct RatingRow {
    pub name: String,
    pub subject_name: String,
    pub term: String,
    pub course_num: String,
    pub entries: String,
    pub avg_response1: String,
    pub avg_response2: String,
    pub avg_response3: String,
    pub overall_rating: String,
}

/// Distinct professor name as the directory route returns it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfessorName {
    #[serde(rename = "Name")]
    pub name: String,
}
