/// Security requirement: the resource and action an operation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecRequirement {
    pub resource: String,
    pub action: String,
}

impl SecRequirement {
    #[must_use]
    pub fn new(resource: impl AsRef<str>, action: impl AsRef<str>) -> Self {
        Self {
            resource: resource.as_ref().to_owned(),
            action: action.as_ref().to_owned(),
        }
    }
}

impl std::fmt::Display for SecRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.resource, self.action)
    }
}
