//! Validation and ownership rules for places.

use crate::error::CoreError;
use crate::types::DbId;

/// Minimum number of characters in a place description.
pub const MIN_DESCRIPTION_LEN: usize = 5;

/// Validate the fields submitted when creating a place.
pub fn validate_new_place(title: &str, description: &str, address: &str) -> Result<(), CoreError> {
    validate_place_update(title, description)?;
    if address.trim().is_empty() {
        return Err(CoreError::invalid("Address must not be empty"));
    }
    Ok(())
}

/// Validate the editable fields of an existing place.
pub fn validate_place_update(title: &str, description: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::invalid("Title must not be empty"));
    }
    if description.trim().chars().count() < MIN_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Description must be at least {MIN_DESCRIPTION_LEN} characters long"
        )));
    }
    Ok(())
}

/// Reject any caller other than the place's creator.
pub fn ensure_creator(creator_id: DbId, caller_id: DbId, action: &str) -> Result<(), CoreError> {
    if creator_id != caller_id {
        return Err(CoreError::Forbidden(format!(
            "You are not allowed to {action} this place"
        )));
    }
    Ok(())
}
