//! Conditional read of a profile record.
//!
//! Compares the client's cached validator against one computed from current
//! metadata. The payload is only fetched when the tokens differ, so the
//! not-modified path costs the same no matter how large the record is.

use serde::Deserialize;

use crate::service::{Context, HandlerError, Reply};
use crate::store::RecordStore;
use crate::validator::validator_for;

pub const COMMAND: &str = "profile.read";

#[derive(Deserialize)]
struct ReadProfile {
    id: String,
}

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_field("id")
}

pub fn handle<S: RecordStore>(ctx: &Context<S>) -> Result<Reply, HandlerError> {
    let input: ReadProfile = ctx.input()?;

    let meta = ctx.store().meta(&input.id)?;
    let current = validator_for(&input.id, meta);

    if ctx.if_none_match() == Some(current.as_str()) {
        tracing::debug!(id = %input.id, "validator matched, not modified");
        return Ok(Reply::NotModified);
    }

    // Tokens differ (or the client sent none): fetch the payload. The token is
    // recomputed from the fetched snapshot so it always matches the payload it
    // accompanies, even if an update landed between the two store calls.
    let record = ctx.store().get(&input.id)?;
    let token = validator_for(record.id(), record.meta());
    Ok(Reply::FullContent {
        payload: record.into_payload(),
        token,
    })
}
