//! Queries over the `contact` table.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::{client_contact, contact};
use crate::model::contact::{Contact, ContactChanges, ContactWithLinkCount, NewContact};

use super::lower;

/// ## Summary
/// Returns a query selecting all contacts in display order.
#[must_use]
pub fn all() -> contact::BoxedQuery<'static, diesel::pg::Pg> {
    contact::table
        .order((contact::surname.asc(), contact::name.asc(), contact::id.asc()))
        .into_boxed()
}

/// ## Summary
/// Finds a contact by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn by_id(conn: &mut DbConnection<'_>, id: i32) -> QueryResult<Option<Contact>> {
    contact::table
        .find(id)
        .select(Contact::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists all contacts ordered by surname then name, each with its number of
/// linked clients.
///
/// ## Errors
/// Returns a database error if either query fails.
pub async fn list_with_link_counts(
    conn: &mut DbConnection<'_>,
) -> QueryResult<Vec<ContactWithLinkCount>> {
    let contacts: Vec<Contact> = all().select(Contact::as_select()).load(conn).await?;

    let counts: HashMap<i32, i64> = client_contact::table
        .group_by(client_contact::contact_id)
        .select((
            client_contact::contact_id,
            diesel::dsl::count(client_contact::id),
        ))
        .load::<(i32, i64)>(conn)
        .await?
        .into_iter()
        .collect();

    Ok(contacts
        .into_iter()
        .map(|contact| {
            let link_count = counts.get(&contact.id).copied().unwrap_or(0);
            ContactWithLinkCount {
                contact,
                link_count,
            }
        })
        .collect())
}

/// ## Summary
/// Checks whether any contact other than `exclude` uses `email`, compared
/// case-insensitively.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn email_taken(
    conn: &mut DbConnection<'_>,
    email: &str,
    exclude: Option<i32>,
) -> QueryResult<bool> {
    let mut query = contact::table
        .filter(lower(contact::email).eq(email.to_lowercase()))
        .into_boxed();

    if let Some(id) = exclude {
        query = query.filter(contact::id.ne(id));
    }

    diesel::select(diesel::dsl::exists(query))
        .get_result(conn)
        .await
}

/// ## Summary
/// Inserts a contact and returns the stored row.
///
/// ## Errors
/// Returns a database error if the insert fails, including a unique violation
/// of `contact_email_lower_key`.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    new_contact: &NewContact<'_>,
) -> QueryResult<Contact> {
    diesel::insert_into(contact::table)
        .values(new_contact)
        .returning(Contact::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Updates a contact's editable fields. Returns `None` when no such contact exists.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: i32,
    changes: &ContactChanges<'_>,
) -> QueryResult<Option<Contact>> {
    diesel::update(contact::table.find(id))
        .set(changes)
        .returning(Contact::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes a contact. Returns whether a row was removed.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: i32) -> QueryResult<bool> {
    let rows = diesel::delete(contact::table.find(id)).execute(conn).await?;
    Ok(rows > 0)
}
