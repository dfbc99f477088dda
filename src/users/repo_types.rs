use serde::Serialize;
use sqlx::FromRow;

pub const DEFAULT_POINTS: i64 = 0;
pub const DEFAULT_LEVEL: i64 = 1;
pub const DEFAULT_MISSIONS_COMPLETED: i64 = 0;
pub const DEFAULT_ECO_ACTIONS: i64 = 0;

/// User record as exposed over the API. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String, // stored and returned as given
    pub points: i64,
    pub level: i64,
    pub missions_completed: i64,
    pub eco_actions: i64,
}

/// Raw `users` row. Counters are nullable in the table definition.
#[derive(Debug, FromRow)]
#[sqlx(rename_all = "camelCase")]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub points: Option<i64>,
    pub level: Option<i64>,
    pub missions_completed: Option<i64>,
    pub eco_actions: Option<i64>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            password: r.password,
            points: r.points.unwrap_or(DEFAULT_POINTS),
            level: r.level.unwrap_or(DEFAULT_LEVEL),
            missions_completed: r.missions_completed.unwrap_or(DEFAULT_MISSIONS_COMPLETED),
            eco_actions: r.eco_actions.unwrap_or(DEFAULT_ECO_ACTIONS),
        }
    }
}
