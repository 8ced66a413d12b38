use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};

use crate::db::schema;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Serialize, Deserialize,
)]
#[diesel(table_name = schema::contact)]
#[diesel(check_for_backend(Pg))]
pub struct Contact {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::contact)]
pub struct NewContact<'a> {
    pub name: &'a str,
    pub surname: &'a str,
    pub email: &'a str,
}

/// Editable contact fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::contact)]
pub struct ContactChanges<'a> {
    pub name: &'a str,
    pub surname: &'a str,
    pub email: &'a str,
}

/// A contact together with the number of clients linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactWithLinkCount {
    pub contact: Contact,
    pub link_count: i64,
}
