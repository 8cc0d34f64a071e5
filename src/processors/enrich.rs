//! Request enrichment from the serving context.

use crate::envelope::{Envelope, ProcessorContext};
use tracing::trace;

/// Copy the caller's `user-agent` header to `properties.user_agent`.
pub fn user_agent_on_request(envelope: &mut Envelope, context: Option<&ProcessorContext>) -> bool {
    if !envelope.is_request() {
        return true;
    }

    let user_agent = context
        .and_then(|ctx| ctx.request.as_ref())
        .and_then(|request| request.header("user-agent"))
        .filter(|value| !value.is_empty());

    if let Some(user_agent) = user_agent {
        trace!(%user_agent, "tagging request with user agent");
        envelope.set_property("user_agent", user_agent);
    }
    true
}

/// Copy the authenticated API client's name to `properties.api_key_name`.
pub fn api_key_name_on_request(
    envelope: &mut Envelope,
    context: Option<&ProcessorContext>,
) -> bool {
    if !envelope.is_request() {
        return true;
    }

    let key_name = context
        .and_then(|ctx| ctx.request.as_ref())
        .and_then(|request| request.api_client.as_ref())
        .and_then(|client| client.name.as_deref())
        .filter(|name| !name.is_empty());

    if let Some(key_name) = key_name {
        trace!(%key_name, "tagging request with api key name");
        envelope.set_property("api_key_name", key_name);
    }
    true
}
