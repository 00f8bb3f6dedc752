//! Core types for declarative custom resources

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Parameters passed to an SDK call
///
/// Ordered so that rendered calls are byte-stable.
pub type Parameters = BTreeMap<String, Value>;

/// Lifecycle event delivered by the execution engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Create,
    Update,
    Delete,
}

impl LifecycleEvent {
    /// Template property name carrying the call for this event
    pub fn property_name(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Physical identifier the engine records for a realized resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicalResourceId {
    /// A literal identifier
    #[serde(rename = "id")]
    Id(String),
    /// Taken from the SDK call response at the given path
    #[serde(rename = "responsePath")]
    FromResponse(String),
}

impl PhysicalResourceId {
    /// Literal physical ID
    pub fn of(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Physical ID read from the call response
    pub fn from_response(path: impl Into<String>) -> Self {
        Self::FromResponse(path.into())
    }

    /// The literal ID, if this is not response-derived
    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::FromResponse(_) => None,
        }
    }
}

/// A single SDK call the execution engine performs for a lifecycle event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkCall {
    /// Service name as known to the SDK (e.g. "Organizations")
    pub service: String,
    /// Operation name in lower camel case (e.g. "registerDelegatedAdministrator")
    pub action: String,
    /// Fixed region to run the call in; engine default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<PhysicalResourceId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: Parameters,
}

impl SdkCall {
    /// Create a call with no region, physical ID or parameters
    pub fn new(service: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            action: action.into(),
            region: None,
            physical_resource_id: None,
            parameters: Parameters::new(),
        }
    }

    /// Pin the call to a region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the physical resource ID recorded on success
    pub fn with_physical_resource_id(mut self, id: PhysicalResourceId) -> Self {
        self.physical_resource_id = Some(id);
        self
    }

    /// Add a string parameter
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Literal physical ID, if one is declared
    pub fn physical_id(&self) -> Option<&str> {
        self.physical_resource_id
            .as_ref()
            .and_then(PhysicalResourceId::literal)
    }

    /// Render the call as the JSON string the engine expects
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a call from its JSON string form
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for SdkCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.service, self.action)?;
        if let Some(region) = &self.region {
            write!(f, " @ {region}")?;
        }
        Ok(())
    }
}
