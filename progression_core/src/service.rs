//! Store-backed helpers for the command layer

use crate::error::ServiceError;
use crate::ProgressionError;
use sheet_core::{Character, CharacterStore};

/// Load a user's character, apply `f` to a copy, and persist it on success
///
/// No locking happens here: callers must ensure at most one mutation per
/// character is in flight, otherwise two calls can both pass a budget check
/// against the same stale balance.
pub fn mutate_character<S, F, T>(store: &S, user_id: u64, f: F) -> Result<T, ServiceError>
where
    S: CharacterStore + ?Sized,
    F: FnOnce(&mut Character) -> Result<T, ProgressionError>,
{
    let mut character = store.load(user_id)?;
    let output = f(&mut character)?;
    store.save(&character)?;
    Ok(output)
}
