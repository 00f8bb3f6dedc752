//! Template synthesis
//!
//! Renders a [`Stack`] into a CloudFormation-style JSON template. Each
//! resource becomes a `Custom::AWS` resource whose lifecycle properties
//! carry the JSON-encoded SDK calls, plus an `AWS::IAM::Policy` granting
//! the provider role what those calls need.
//!
//! The provider itself is external: it is referenced through the
//! [`PROVIDER_ARN_PARAMETER`] and [`PROVIDER_ROLE_PARAMETER`] template
//! parameters.

use crate::stack::Stack;
use crate::types::{LifecycleEvent, SdkCall};
use crate::{Error, Result};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Resource type of rendered custom resources
pub const RESOURCE_TYPE: &str = "Custom::AWS";

/// Template parameter holding the provider's service token
pub const PROVIDER_ARN_PARAMETER: &str = "CustomResourceProviderArn";

/// Template parameter holding the provider's execution role name
pub const PROVIDER_ROLE_PARAMETER: &str = "CustomResourceProviderRole";

const FORMAT_VERSION: &str = "2010-09-09";
const POLICY_SUFFIX: &str = "CustomResourcePolicy";

/// A synthesized template
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    document: Value,
}

/// Lifecycle calls recorded for one custom resource in a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredResource {
    pub create: Option<SdkCall>,
    pub update: Option<SdkCall>,
    pub delete: Option<SdkCall>,
}

impl DeclaredResource {
    /// Literal physical ID declared by the create call
    pub fn physical_id(&self) -> Option<&str> {
        self.create.as_ref().and_then(SdkCall::physical_id)
    }
}

/// Derive a logical ID from a construct path
///
/// Alphanumeric characters of the last path component, followed by the
/// first 8 upper-case hex digits of the path's hash.
pub fn logical_id(path: &str) -> String {
    let human: String = path
        .rsplit('/')
        .next()
        .unwrap_or(path)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    let hash = blake3::hash(path.as_bytes()).to_hex();
    format!("{}{}", human, hash.as_str()[..8].to_uppercase())
}

/// Synthesize a template for every construct in the stack
pub fn synthesize(stack: &Stack) -> Result<Template> {
    let mut resources = Map::new();

    for construct in stack.constructs() {
        let path = stack.path_of(&construct.id);
        let resource_id = logical_id(&path);
        let policy_id = logical_id(&format!("{path}/{POLICY_SUFFIX}"));

        if resources.contains_key(&resource_id) || resources.contains_key(&policy_id) {
            return Err(Error::LogicalIdCollision(path));
        }

        log::debug!("Synthesizing {} as {}", path, resource_id);

        let resource = construct.resource.as_ref();
        let policy = json!({
            "Type": "AWS::IAM::Policy",
            "Properties": {
                "PolicyDocument": resource.policy().to_document(),
                "PolicyName": policy_id,
                "Roles": [{ "Ref": PROVIDER_ROLE_PARAMETER }],
            },
        });

        let mut properties = Map::new();
        properties.insert(
            "ServiceToken".into(),
            json!({ "Ref": PROVIDER_ARN_PARAMETER }),
        );
        for (event, call) in resource.calls() {
            properties.insert(event.property_name().into(), Value::String(call.to_json()?));
        }
        properties.insert("InstallLatestAwsSdk".into(), Value::Bool(false));

        let custom = json!({
            "Type": RESOURCE_TYPE,
            "Properties": properties,
            "DependsOn": [policy_id],
            "UpdateReplacePolicy": "Delete",
            "DeletionPolicy": "Delete",
            "Metadata": { "Path": path },
        });

        resources.insert(policy_id, policy);
        resources.insert(resource_id, custom);
    }

    let mut document = json!({
        "AWSTemplateFormatVersion": FORMAT_VERSION,
        "Parameters": {
            PROVIDER_ARN_PARAMETER: {
                "Type": "String",
                "Description": "Service token of the custom resource provider",
            },
            PROVIDER_ROLE_PARAMETER: {
                "Type": "String",
                "Description": "Execution role name of the custom resource provider",
            },
        },
        "Resources": resources,
    });
    if let Some(description) = &stack.description {
        document["Description"] = Value::String(description.clone());
    }

    Ok(Template { document })
}

impl Template {
    /// Parse a previously synthesized template
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        if !document.get("Resources").is_some_and(Value::is_object) {
            return Err(Error::InvalidTemplate("missing Resources object".into()));
        }
        Ok(Self { document })
    }

    /// Render the template
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let rendered = if pretty {
            serde_json::to_string_pretty(&self.document)?
        } else {
            serde_json::to_string(&self.document)?
        };
        Ok(rendered)
    }

    /// The underlying JSON document
    pub fn as_value(&self) -> &Value {
        &self.document
    }

    /// Custom resources keyed by logical ID
    pub fn declared_resources(&self) -> Result<BTreeMap<String, DeclaredResource>> {
        let mut declared = BTreeMap::new();
        let Some(resources) = self.document.get("Resources").and_then(Value::as_object) else {
            return Ok(declared);
        };

        for (logical_id, resource) in resources {
            if resource.get("Type").and_then(Value::as_str) != Some(RESOURCE_TYPE) {
                continue;
            }
            let properties = resource.get("Properties").ok_or_else(|| {
                Error::InvalidTemplate(format!("{logical_id} has no Properties"))
            })?;

            let read = |event: LifecycleEvent| -> Result<Option<SdkCall>> {
                match properties.get(event.property_name()) {
                    None => Ok(None),
                    Some(Value::String(json)) => Ok(Some(SdkCall::from_json(json)?)),
                    Some(_) => Err(Error::InvalidTemplate(format!(
                        "{logical_id}.{} is not a JSON string",
                        event.property_name()
                    ))),
                }
            };

            declared.insert(
                logical_id.clone(),
                DeclaredResource {
                    create: read(LifecycleEvent::Create)?,
                    update: read(LifecycleEvent::Update)?,
                    delete: read(LifecycleEvent::Delete)?,
                },
            );
        }

        Ok(declared)
    }

    /// Physical IDs of the custom resources, keyed by logical ID
    ///
    /// Resources whose physical ID comes from a call response are omitted.
    pub fn physical_ids(&self) -> Result<BTreeMap<String, String>> {
        Ok(self
            .declared_resources()?
            .into_iter()
            .filter_map(|(id, r)| r.physical_id().map(|p| (id, p.to_string())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::CustomResource;
    use crate::types::PhysicalResourceId;

    #[derive(Debug)]
    struct Access(&'static str);

    impl CustomResource for Access {
        fn id(&self) -> String {
            self.0.to_string()
        }

        fn description(&self) -> String {
            format!("Access {}", self.0)
        }

        fn on_create(&self) -> Option<SdkCall> {
            Some(
                SdkCall::new("Organizations", "enableAWSServiceAccess")
                    .with_region("us-east-1")
                    .with_physical_resource_id(PhysicalResourceId::of(self.0))
                    .with_parameter("ServicePrincipal", self.0),
            )
        }

        fn on_delete(&self) -> Option<SdkCall> {
            Some(
                SdkCall::new("Organizations", "disableAWSServiceAccess")
                    .with_region("us-east-1")
                    .with_parameter("ServicePrincipal", self.0),
            )
        }
    }

    fn stack() -> Stack {
        let mut stack = Stack::new("Org").with_description("test stack");
        stack.add("Config", Box::new(Access("config.amazonaws.com"))).unwrap();
        stack
    }

    #[test]
    fn test_logical_id_is_stable_and_alphanumeric() {
        let id = logical_id("Org/Guard-Duty_Admin");
        assert_eq!(id, logical_id("Org/Guard-Duty_Admin"));
        assert!(id.starts_with("GuardDutyAdmin"));
        assert_eq!(id.len(), "GuardDutyAdmin".len() + 8);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, logical_id("Other/Guard-Duty_Admin"));
    }

    #[test]
    fn test_synthesize_shape() {
        let template = synthesize(&stack()).unwrap();
        let doc = template.as_value();
        let resource_id = logical_id("Org/Config");
        let policy_id = logical_id("Org/Config/CustomResourcePolicy");

        assert_eq!(doc["Description"], "test stack");
        assert_eq!(doc["Resources"][&resource_id]["Type"], RESOURCE_TYPE);
        assert_eq!(doc["Resources"][&resource_id]["DependsOn"][0], policy_id.as_str());
        assert_eq!(
            doc["Resources"][&resource_id]["Properties"]["ServiceToken"]["Ref"],
            PROVIDER_ARN_PARAMETER
        );
        assert!(doc["Resources"][&resource_id]["Properties"].get("Update").is_none());
        assert_eq!(doc["Resources"][&policy_id]["Type"], "AWS::IAM::Policy");
        assert_eq!(
            doc["Resources"][&policy_id]["Properties"]["PolicyDocument"]["Statement"][0]["Action"][0],
            "organizations:EnableAWSServiceAccess"
        );
    }

    #[test]
    fn test_synthesize_is_deterministic() {
        let a = synthesize(&stack()).unwrap().to_json(true).unwrap();
        let b = synthesize(&stack()).unwrap().to_json(true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_physical_ids_round_trip_through_json() {
        let rendered = synthesize(&stack()).unwrap().to_json(false).unwrap();
        let parsed = Template::from_json(&rendered).unwrap();

        let ids = parsed.physical_ids().unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[&logical_id("Org/Config")], "config.amazonaws.com");

        let declared = parsed.declared_resources().unwrap();
        let access = Access("config.amazonaws.com");
        let expected = DeclaredResource {
            create: access.on_create(),
            update: access.on_update(),
            delete: access.on_delete(),
        };
        assert_eq!(declared[&logical_id("Org/Config")], expected);
    }

    #[test]
    fn test_from_json_rejects_non_templates() {
        assert!(matches!(
            Template::from_json(r#"{"foo": 1}"#),
            Err(Error::InvalidTemplate(_))
        ));
        assert!(matches!(Template::from_json("not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_declared_resources_rejects_non_string_calls() {
        let template = Template::from_json(
            r#"{"Resources": {"X": {"Type": "Custom::AWS", "Properties": {"Create": {}}}}}"#,
        )
        .unwrap();
        assert!(matches!(
            template.declared_resources(),
            Err(Error::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_template_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.json");
        std::fs::write(&path, synthesize(&stack()).unwrap().to_json(true).unwrap()).unwrap();

        let parsed = Template::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, synthesize(&stack()).unwrap());
    }
}
