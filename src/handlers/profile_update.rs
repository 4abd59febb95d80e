//! Update the profile's preferences and bump its change-detection metadata.
//!
//! A successful update invalidates every previously issued validator token for
//! the record: the store bumps version and timestamp in the same step as the
//! payload swap, so the next read computes a different token.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::record::PayloadPatch;
use crate::service::{Context, HandlerError, Reply};
use crate::store::RecordStore;

pub const COMMAND: &str = "profile.update";

#[derive(Deserialize)]
struct UpdateProfile {
    id: String,
    preferences: Value,
}

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_fields(&["id", "preferences"])
}

pub fn handle<S: RecordStore>(ctx: &Context<S>) -> Result<Reply, HandlerError> {
    let input: UpdateProfile = ctx.input()?;

    let new_version = ctx.store().apply_update(
        &input.id,
        PayloadPatch {
            preferences: input.preferences,
        },
    )?;

    Ok(Reply::Json(
        json!({ "status": "success", "new_version": new_version }),
    ))
}
