//! Builds the change-set request from local state.

use settings_sync_core::SettingKey;
use settings_sync_store::SettingStore;

use crate::error::Result;
use crate::messages::{ChangeSetRequest, RequestEntry};

/// Snapshot every registered setting into a change-set request.
///
/// Every key is present, including ones never modified locally; those carry
/// no `modifiedAt`. Reads only, no side effects.
pub fn build_request<S: SettingStore + ?Sized>(store: &S) -> Result<ChangeSetRequest> {
    let mut entries = Vec::new();

    for key in SettingKey::all() {
        let descriptor = key.descriptor();
        let stored = store.get(key)?;
        let value = descriptor.encode(&stored.value)?;

        entries.push((
            descriptor.name.to_string(),
            RequestEntry {
                value,
                modified_at: stored.modified_at,
            },
        ));
    }

    Ok(ChangeSetRequest::from_entries(entries))
}
