use crate::capability::Capability;

/// Subject used when no identity was presented.
pub const ANONYMOUS_SUBJECT: &str = "anonymous";

/// Subject used when authentication is disabled.
pub const ROOT_SUBJECT: &str = "root";

/// `SecurityContext` carries the caller's identity and granted capabilities for one request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SecurityContext {
    subject: String,
    capabilities: Vec<Capability>,
}

impl SecurityContext {
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// No subject, no capabilities. Every gated operation rejects it.
    #[must_use]
    pub fn anonymous() -> Self {
        SecurityContextBuilder::default().build()
    }

    /// Holds `*.*`. Used only when authentication is switched off.
    #[must_use]
    pub fn root() -> Self {
        Self::builder()
            .subject(ROOT_SUBJECT)
            .capability(Capability::all())
            .build()
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }
}

#[derive(Default)]
pub struct SecurityContextBuilder {
    subject: Option<String>,
    capabilities: Vec<Capability>,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[must_use]
    pub fn capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    #[must_use]
    pub fn capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.capabilities.extend(capabilities);
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            subject: self
                .subject
                .unwrap_or_else(|| ANONYMOUS_SUBJECT.to_owned()),
            capabilities: self.capabilities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_has_nothing() {
        let ctx = SecurityContext::anonymous();
        assert_eq!(ctx.subject(), ANONYMOUS_SUBJECT);
        assert!(ctx.capabilities().is_empty());
    }

    #[test]
    fn builder_collects_capabilities() {
        let ctx = SecurityContext::builder()
            .subject("app-1")
            .capability(Capability::new("Books", "Read"))
            .capabilities([Capability::new("Books", "Write")])
            .build();
        assert_eq!(ctx.subject(), "app-1");
        assert_eq!(ctx.capabilities().len(), 2);
    }
}
