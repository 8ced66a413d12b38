//! Queries over the `client_contact` link table.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use clientbook_core::types::EntityKind;

use crate::db::connection::DbConnection;
use crate::db::schema::{client, client_contact, contact};
use crate::model::client::Client;
use crate::model::client_contact::{ClientContact, NewClientContact};
use crate::model::contact::Contact;

/// ## Summary
/// Returns a query to find the link row for a client/contact pair.
#[must_use]
pub fn by_pair(
    client_id: i32,
    contact_id: i32,
) -> client_contact::BoxedQuery<'static, diesel::pg::Pg> {
    client_contact::table
        .filter(client_contact::client_id.eq(client_id))
        .filter(client_contact::contact_id.eq(contact_id))
        .into_boxed()
}

/// ## Summary
/// Checks whether the pair is linked.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn exists(
    conn: &mut DbConnection<'_>,
    client_id: i32,
    contact_id: i32,
) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(by_pair(client_id, contact_id)))
        .get_result(conn)
        .await
}

/// ## Summary
/// Inserts a link row.
///
/// ## Errors
/// Returns a database error if the insert fails, including a unique violation
/// of `client_contact_pair_key` or a foreign key violation.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    new_link: &NewClientContact,
) -> QueryResult<ClientContact> {
    diesel::insert_into(client_contact::table)
        .values(new_link)
        .returning(ClientContact::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Deletes the link row for the pair. Returns whether a row was removed.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_pair(
    conn: &mut DbConnection<'_>,
    client_id: i32,
    contact_id: i32,
) -> QueryResult<bool> {
    let rows = diesel::delete(
        client_contact::table
            .filter(client_contact::client_id.eq(client_id))
            .filter(client_contact::contact_id.eq(contact_id)),
    )
    .execute(conn)
    .await?;
    Ok(rows > 0)
}

/// ## Summary
/// Counts the link rows referencing an entity.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_for(
    conn: &mut DbConnection<'_>,
    kind: EntityKind,
    id: i32,
) -> QueryResult<i64> {
    let query = client_contact::table.into_boxed();
    let query = match kind {
        EntityKind::Client => query.filter(client_contact::client_id.eq(id)),
        EntityKind::Contact => query.filter(client_contact::contact_id.eq(id)),
    };
    query.count().get_result(conn).await
}

/// ## Summary
/// Lists the contacts linked to a client, ordered by surname then name.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn contacts_for_client(
    conn: &mut DbConnection<'_>,
    client_id: i32,
) -> QueryResult<Vec<Contact>> {
    client_contact::table
        .inner_join(contact::table)
        .filter(client_contact::client_id.eq(client_id))
        .order((contact::surname.asc(), contact::name.asc(), contact::id.asc()))
        .select(Contact::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Lists the clients linked to a contact, ordered by name.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn clients_for_contact(
    conn: &mut DbConnection<'_>,
    contact_id: i32,
) -> QueryResult<Vec<Client>> {
    client_contact::table
        .inner_join(client::table)
        .filter(client_contact::contact_id.eq(contact_id))
        .order((client::name.asc(), client::id.asc()))
        .select(Client::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Lists the clients not yet linked to a contact, ordered by name.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn clients_not_linked_to(
    conn: &mut DbConnection<'_>,
    contact_id: i32,
) -> QueryResult<Vec<Client>> {
    let linked = client_contact::table
        .filter(client_contact::contact_id.eq(contact_id))
        .select(client_contact::client_id);

    client::table
        .filter(diesel::dsl::not(client::id.eq_any(linked)))
        .order((client::name.asc(), client::id.asc()))
        .select(Client::as_select())
        .load(conn)
        .await
}
