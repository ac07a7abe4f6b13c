use std::collections::BTreeMap;

use serde::Serialize;

/// Variables passed to the network module, serialized into the var file.
///
/// Unset optional blocks are left out so the module applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleInputs {
    pub project_id: String,
    pub name: String,
    pub regions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_logs: Option<FlowLogInputs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ModuleOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat: Option<NatInputs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psc: Option<PscInputs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_labels: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLogInputs {
    pub aggregation_interval: String,
    pub flow_sampling: f64,
    pub metadata: String,
    pub metadata_fields: Vec<String>,
    pub filter_expr: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_ula: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_restricted_apis_access: Option<bool>,
}

/// `nat = {}` enables Cloud NAT in every region with module defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NatInputs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PscInputs {
    pub address: String,
}

impl ModuleInputs {
    pub fn new(project_id: impl Into<String>, name: impl Into<String>, regions: &[&str]) -> Self {
        Self {
            project_id: project_id.into(),
            name: name.into(),
            regions: regions.iter().map(|r| r.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn ipv6_ula(&self) -> bool {
        self.options
            .as_ref()
            .and_then(|o| o.ipv6_ula)
            .unwrap_or(false)
    }

    /// The module routes the restricted API range unless told otherwise.
    pub fn restricted_apis_access(&self) -> bool {
        self.options
            .as_ref()
            .and_then(|o| o.enable_restricted_apis_access)
            .unwrap_or(true)
    }

    pub fn nat_tags(&self) -> &[String] {
        self.nat
            .as_ref()
            .and_then(|n| n.tags.as_deref())
            .unwrap_or_default()
    }

    /// Labels every labelled resource should carry; explicit labels win.
    pub fn effective_labels(&self) -> BTreeMap<String, String> {
        let mut labels = self.default_labels.clone().unwrap_or_default();
        if let Some(explicit) = &self.labels {
            labels.extend(explicit.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        labels
    }
}
