//! Queries over the `client` table.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::{client, client_contact};
use crate::model::client::{Client, ClientWithLinkCount, NewClient};

use super::starts_with_pattern;

/// ## Summary
/// Returns a query selecting all clients in display order.
#[must_use]
pub fn all() -> client::BoxedQuery<'static, diesel::pg::Pg> {
    client::table
        .order((client::name.asc(), client::id.asc()))
        .into_boxed()
}

/// ## Summary
/// Finds a client by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn by_id(conn: &mut DbConnection<'_>, id: i32) -> QueryResult<Option<Client>> {
    client::table
        .find(id)
        .select(Client::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists all clients ordered by name, each with its number of linked contacts.
///
/// ## Errors
/// Returns a database error if either query fails.
pub async fn list_with_link_counts(
    conn: &mut DbConnection<'_>,
) -> QueryResult<Vec<ClientWithLinkCount>> {
    let clients: Vec<Client> = all().select(Client::as_select()).load(conn).await?;

    let counts: HashMap<i32, i64> = client_contact::table
        .group_by(client_contact::client_id)
        .select((
            client_contact::client_id,
            diesel::dsl::count(client_contact::id),
        ))
        .load::<(i32, i64)>(conn)
        .await?
        .into_iter()
        .collect();

    Ok(clients
        .into_iter()
        .map(|client| {
            let link_count = counts.get(&client.id).copied().unwrap_or(0);
            ClientWithLinkCount { client, link_count }
        })
        .collect())
}

/// ## Summary
/// Returns the lexicographically greatest client code starting with `prefix`.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn greatest_code_with_prefix(
    conn: &mut DbConnection<'_>,
    prefix: &str,
) -> QueryResult<Option<String>> {
    client::table
        .filter(client::client_code.like(starts_with_pattern(prefix)))
        .order(client::client_code.desc())
        .select(client::client_code)
        .first::<String>(conn)
        .await
        .optional()
}

/// ## Summary
/// Checks whether a client with exactly this code exists.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn code_exists(conn: &mut DbConnection<'_>, code: &str) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(
        client::table.filter(client::client_code.eq(code)),
    ))
    .get_result(conn)
    .await
}

/// ## Summary
/// Inserts a client and returns the stored row.
///
/// ## Errors
/// Returns a database error if the insert fails, including a unique violation
/// of `client_client_code_key`.
pub async fn insert(conn: &mut DbConnection<'_>, new_client: &NewClient<'_>) -> QueryResult<Client> {
    diesel::insert_into(client::table)
        .values(new_client)
        .returning(Client::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Renames a client. Returns `None` when no such client exists.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn rename(
    conn: &mut DbConnection<'_>,
    id: i32,
    name: &str,
) -> QueryResult<Option<Client>> {
    diesel::update(client::table.find(id))
        .set(client::name.eq(name))
        .returning(Client::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes a client. Returns whether a row was removed.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: i32) -> QueryResult<bool> {
    let rows = diesel::delete(client::table.find(id)).execute(conn).await?;
    Ok(rows > 0)
}
