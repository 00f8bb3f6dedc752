//! Stack - an ordered collection of named custom resources

use crate::resource::{BoxedResource, CustomResource};
use crate::{Error, Result};

/// A named custom resource inside a stack
#[derive(Debug)]
pub struct Construct {
    /// Construct ID, unique within the stack
    pub id: String,
    pub resource: BoxedResource,
}

/// Resources that are synthesized together into one template
#[derive(Debug)]
pub struct Stack {
    pub name: String,
    pub description: Option<String>,
    constructs: Vec<Construct>,
}

impl Stack {
    /// Create a new empty stack
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            constructs: Vec::new(),
        }
    }

    /// Set the template description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a resource under a construct ID
    ///
    /// Fails if the ID is already taken or another construct declares the
    /// same literal physical ID.
    pub fn add(&mut self, id: impl Into<String>, resource: BoxedResource) -> Result<()> {
        let id = id.into();
        if self.get(&id).is_some() {
            return Err(Error::DuplicateConstruct(id));
        }
        if let Some(physical_id) = resource.physical_id()
            && let Some(existing) = self
                .constructs
                .iter()
                .find(|c| c.resource.physical_id().as_deref() == Some(physical_id.as_str()))
        {
            return Err(Error::DuplicatePhysicalId {
                id,
                physical_id,
                existing: existing.id.clone(),
            });
        }
        log::debug!("Adding {} to stack {}", id, self.name);
        self.constructs.push(Construct { id, resource });
        Ok(())
    }

    /// Look up a resource by construct ID
    pub fn get(&self, id: &str) -> Option<&dyn CustomResource> {
        self.constructs
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.resource.as_ref())
    }

    /// Constructs in insertion order
    pub fn constructs(&self) -> &[Construct] {
        &self.constructs
    }

    /// Construct path used for logical ID derivation
    pub fn path_of(&self, id: &str) -> String {
        format!("{}/{}", self.name, id)
    }

    /// Filter the stack to constructs matching a predicate
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&Construct) -> bool,
    {
        Self {
            name: self.name,
            description: self.description,
            constructs: self.constructs.into_iter().filter(|c| predicate(c)).collect(),
        }
    }

    /// Filter the stack to constructs matching a target pattern
    ///
    /// Target format: "type", "type.name" or a bare name. A target equal
    /// to a construct ID is always a name, even if it spells a type.
    pub fn filter_by_target(self, target: Option<&str>) -> Self {
        match target {
            None => self,
            Some(t) => {
                let (resource_type, name) = if self.get(t).is_some() {
                    (None, Some(t.to_string()))
                } else {
                    parse_target(t)
                };
                self.filter(|c| matches_filter(c, resource_type.as_deref(), name.as_deref()))
            }
        }
    }

    /// Number of constructs in the stack
    pub fn len(&self) -> usize {
        self.constructs.len()
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.constructs.is_empty()
    }
}

/// Parse a target string like "type.name" into (type, name)
///
/// Only the first dot separates; service principals contain dots.
fn parse_target(target: &str) -> (Option<String>, Option<String>) {
    match target.split_once('.') {
        Some((t, n)) if is_type_alias(t) => (Some(t.to_string()), Some(n.to_string())),
        Some(_) => (None, Some(target.to_string())),
        None if is_type_alias(target) => (Some(target.to_string()), None),
        None => (None, Some(target.to_string())),
    }
}

fn is_type_alias(s: &str) -> bool {
    matches!(s, "delegation" | "delegations" | "custom")
}

/// Check if a construct matches the filter criteria
fn matches_filter(construct: &Construct, resource_type: Option<&str>, name: Option<&str>) -> bool {
    if let Some(rt) = resource_type {
        let matches_type = match rt {
            "delegations" => construct.resource.resource_type() == "delegation",
            _ => construct.resource.resource_type() == rt,
        };
        if !matches_type {
            return false;
        }
    }

    if let Some(n) = name
        && !construct.id.contains(n)
        && !construct.resource.id().contains(n)
    {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PhysicalResourceId, SdkCall};

    #[derive(Debug)]
    struct Fake(&'static str);

    impl CustomResource for Fake {
        fn id(&self) -> String {
            self.0.to_string()
        }

        fn description(&self) -> String {
            format!("Fake {}", self.0)
        }

        fn resource_type(&self) -> &'static str {
            "delegation"
        }

        fn on_create(&self) -> Option<SdkCall> {
            Some(
                SdkCall::new("Test", "create")
                    .with_physical_resource_id(PhysicalResourceId::of(self.0)),
            )
        }

        fn on_delete(&self) -> Option<SdkCall> {
            None
        }
    }

    fn stack() -> Stack {
        let mut stack = Stack::new("Org");
        stack.add("GuardDuty", Box::new(Fake("1:guardduty.amazonaws.com"))).unwrap();
        stack.add("Macie", Box::new(Fake("1:macie.amazonaws.com"))).unwrap();
        stack
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("delegation"), (Some("delegation".to_string()), None));
        assert_eq!(
            parse_target("delegation.GuardDuty"),
            (Some("delegation".to_string()), Some("GuardDuty".to_string()))
        );
        assert_eq!(
            parse_target("guardduty.amazonaws.com"),
            (None, Some("guardduty.amazonaws.com".to_string()))
        );
    }

    #[test]
    fn test_duplicate_construct_rejected() {
        let mut stack = stack();
        let err = stack.add("Macie", Box::new(Fake("2:macie.amazonaws.com"))).unwrap_err();
        assert!(matches!(err, Error::DuplicateConstruct(id) if id == "Macie"));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_duplicate_physical_id_rejected() {
        let mut stack = stack();
        let err = stack
            .add("GuardDutyAgain", Box::new(Fake("1:guardduty.amazonaws.com")))
            .unwrap_err();

        assert!(matches!(
            &err,
            Error::DuplicatePhysicalId { id, physical_id, existing }
                if id == "GuardDutyAgain"
                    && physical_id == "1:guardduty.amazonaws.com"
                    && existing == "GuardDuty"
        ));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_filter_by_target() {
        assert_eq!(stack().filter_by_target(None).len(), 2);
        assert_eq!(stack().filter_by_target(Some("delegations")).len(), 2);
        assert_eq!(stack().filter_by_target(Some("custom")).len(), 0);

        let filtered = stack().filter_by_target(Some("macie.amazonaws.com"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.constructs()[0].id, "Macie");

        assert_eq!(stack().filter_by_target(Some("delegation.GuardDuty")).len(), 1);
    }

    #[test]
    fn test_construct_id_wins_over_type_alias() {
        let mut stack = stack();
        stack.add("custom", Box::new(Fake("1:config.amazonaws.com"))).unwrap();

        let filtered = stack.filter_by_target(Some("custom"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.constructs()[0].id, "custom");
    }

    #[test]
    fn test_path_of() {
        assert_eq!(stack().path_of("Macie"), "Org/Macie");
    }
}
