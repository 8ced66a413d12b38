use clientbook_db::store::Store;

use crate::error::ServiceResult;

use super::code::{ClientCode, trailing_sequence};
use super::prefix::{Prefix, derive_prefix};

/// ## Summary
/// Sequence number following the greatest existing code for a prefix.
///
/// Starts at 1 when there is no existing code or its tail is not numeric.
#[must_use]
pub fn next_sequence(greatest_existing: Option<&str>) -> u16 {
    greatest_existing
        .and_then(trailing_sequence)
        .map_or(1, |n| n.saturating_add(1))
}

/// ## Summary
/// Allocates an unused client code for a client named `name`.
///
/// The candidate follows the greatest code already stored under the name's
/// prefix and is then advanced past any code found to exist.
///
/// The returned code is unused at the time of the check only; the caller's insert
/// must still handle a concurrent claim.
///
/// ## Errors
/// Returns `ServiceError::AllocationExhausted` when no sequence up to 999 is
/// free, or a database error if a store query fails.
#[tracing::instrument(skip(store))]
pub async fn allocate_code(store: &dyn Store, name: &str) -> ServiceResult<ClientCode> {
    let prefix = derive_prefix(name);
    let greatest = store.greatest_code_with_prefix(prefix.as_str()).await?;
    let start = next_sequence(greatest.as_deref());

    tracing::debug!(%prefix, ?greatest, start, "Allocating client code");

    first_free_code(store, &prefix, start).await
}

/// ## Summary
/// Returns the first code at or after `sequence` under `prefix` that no client
/// holds.
///
/// ## Errors
/// Returns `ServiceError::AllocationExhausted` when the search runs past 999, or
/// a database error if a store query fails.
pub async fn first_free_code(
    store: &dyn Store,
    prefix: &Prefix,
    mut sequence: u16,
) -> ServiceResult<ClientCode> {
    loop {
        let candidate = ClientCode::new(prefix, sequence)?;
        if !store.client_code_exists(candidate.as_str()).await? {
            return Ok(candidate);
        }
        tracing::debug!(code = %candidate, "Client code taken, advancing");
        sequence += 1;
    }
}
