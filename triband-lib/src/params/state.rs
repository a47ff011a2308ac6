//! Opaque save/restore of the parameter store.
//!
//! The blob is a flat JSON object keyed by host parameter name. Callers should
//! treat it as opaque bytes; only this module reads or writes its layout.

use std::collections::BTreeMap;

use log::{debug, warn};

use super::layout::ParameterId;
use super::shared::SharedParameters;
use crate::error::StateError;

/// Serialize every parameter value.
pub fn save_state(params: &SharedParameters) -> Result<Vec<u8>, StateError> {
    let tree: BTreeMap<&'static str, f32> = ParameterId::ALL
        .iter()
        .map(|id| (id.name(), params.get(*id)))
        .collect();
    serde_json::to_vec(&tree).map_err(StateError::Encode)
}

/// Restore parameter values from a blob produced by [`save_state`].
///
/// The whole blob is decoded before anything is stored, so a malformed blob
/// leaves the store untouched. Unknown names are skipped and missing names keep
/// their current value. A successful restore flags a change for both the audio
/// and UI consumers.
pub fn load_state(params: &SharedParameters, data: &[u8]) -> Result<(), StateError> {
    let tree: BTreeMap<String, f32> = serde_json::from_slice(data).map_err(StateError::Decode)?;

    let mut restored = 0;
    for (name, value) in &tree {
        match ParameterId::from_name(name) {
            Some(id) => {
                if params.store(id, *value) {
                    restored += 1;
                }
            }
            None => warn!("ignoring unknown parameter in saved state: {}", name),
        }
    }

    debug!("restored {} of {} parameters from state", restored, ParameterId::COUNT);
    params.notify_changed();
    Ok(())
}
