use crate::{context::SecurityContext, errors::AuthError, types::SecRequirement};

/// Check that `ctx` holds a capability satisfying `requirement`.
///
/// Call this first in every gated operation, before any storage access.
///
/// # Errors
/// Returns [`AuthError::Forbidden`] when no granted capability matches.
pub fn authorize(ctx: &SecurityContext, requirement: &SecRequirement) -> Result<(), AuthError> {
    if ctx
        .capabilities()
        .iter()
        .any(|cap| cap.grants(requirement))
    {
        Ok(())
    } else {
        tracing::debug!(
            subject = ctx.subject(),
            required = %requirement,
            "capability check failed"
        );
        Err(AuthError::Forbidden)
    }
}
