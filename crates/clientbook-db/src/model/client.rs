use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};

use crate::db::schema;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Serialize, Deserialize,
)]
#[diesel(table_name = schema::client)]
#[diesel(check_for_backend(Pg))]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub client_code: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::client)]
pub struct NewClient<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub client_code: &'a str,
}

/// A client together with the number of contacts linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientWithLinkCount {
    pub client: Client,
    pub link_count: i64,
}
