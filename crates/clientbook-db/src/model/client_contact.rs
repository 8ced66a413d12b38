use crate::{db::schema, model};
use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Associations, Serialize,
)]
#[diesel(table_name = schema::client_contact)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(model::client::Client, foreign_key = client_id))]
#[diesel(belongs_to(model::contact::Contact, foreign_key = contact_id))]
pub struct ClientContact {
    pub id: i32,
    pub client_id: i32,
    pub contact_id: i32,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Insertable)]
#[diesel(table_name = schema::client_contact)]
pub struct NewClientContact {
    pub client_id: i32,
    pub contact_id: i32,
}
