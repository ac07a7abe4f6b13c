use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::ToolError;

#[derive(Debug, Deserialize)]
struct OutputWrapper {
    value: Value,
}

/// Flat view of `output -json`: each `{"value": ...}` wrapper replaced by its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outputs(Map<String, Value>);

impl Outputs {
    pub fn parse(raw: &[u8]) -> Result<Self, ToolError> {
        let wrapped: BTreeMap<String, OutputWrapper> = serde_json::from_slice(raw)?;
        Ok(Self(
            wrapped
                .into_iter()
                .map(|(name, wrapper)| (name, wrapper.value))
                .collect(),
        ))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Typed view of the outputs. A shape mismatch is not a parse failure.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ToolError> {
        serde_json::from_value(self.to_value()).map_err(ToolError::UnexpectedOutputShape)
    }
}

impl From<Map<String, Value>> for Outputs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Typed view over the network module's outputs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NetworkOutputs {
    pub self_link: String,
    pub id: String,
    #[serde(default)]
    pub subnets_by_name: BTreeMap<String, SubnetByName>,
    #[serde(default)]
    pub subnets_by_region: BTreeMap<String, SubnetByRegion>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubnetByName {
    pub region: String,
    pub self_link: String,
    pub id: String,
    pub primary_ipv4_cidr: String,
    #[serde(default)]
    pub primary_ipv6_cidr: String,
    #[serde(default)]
    pub secondary_ipv4_cidrs: BTreeMap<String, Value>,
    pub gateway_address: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubnetByRegion {
    pub name: String,
    pub self_link: String,
    pub id: String,
    pub primary_ipv4_cidr: String,
    #[serde(default)]
    pub primary_ipv6_cidr: String,
    #[serde(default)]
    pub secondary_ipv4_cidrs: BTreeMap<String, Value>,
    pub gateway_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RAW: &str = r#"{
        "id": {"sensitive": false, "type": "string", "value": "projects/p/global/networks/n"},
        "self_link": {"sensitive": false, "type": "string", "value": "https://www.googleapis.com/compute/v1/projects/p/global/networks/n"},
        "subnets_by_name": {
            "sensitive": false,
            "type": ["map", ["object", {}]],
            "value": {
                "n-us-we1": {
                    "region": "us-west1",
                    "self_link": "https://www.googleapis.com/compute/v1/projects/p/regions/us-west1/subnetworks/n-us-we1",
                    "id": "projects/p/regions/us-west1/subnetworks/n-us-we1",
                    "primary_ipv4_cidr": "172.16.0.0/24",
                    "primary_ipv6_cidr": "",
                    "secondary_ipv4_cidrs": {},
                    "gateway_address": "172.16.0.1"
                }
            }
        },
        "subnets_by_region": {
            "value": {
                "us-west1": {
                    "name": "n-us-we1",
                    "self_link": "https://www.googleapis.com/compute/v1/projects/p/regions/us-west1/subnetworks/n-us-we1",
                    "id": "projects/p/regions/us-west1/subnetworks/n-us-we1",
                    "primary_ipv4_cidr": "172.16.0.0/24",
                    "primary_ipv6_cidr": "",
                    "secondary_ipv4_cidrs": {},
                    "gateway_address": "172.16.0.1"
                }
            }
        }
    }"#;

    #[test]
    fn test_parse_unwraps_values() {
        let outputs = Outputs::parse(RAW.as_bytes()).unwrap();
        assert_eq!(outputs.len(), 4);
        assert_eq!(
            outputs.get("id"),
            Some(&json!("projects/p/global/networks/n"))
        );
        assert_eq!(
            outputs.get("subnets_by_name").unwrap()["n-us-we1"]["region"],
            "us-west1"
        );
    }

    #[test]
    fn test_parse_empty_object() {
        let outputs = Outputs::parse(b"{}").unwrap();
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_parse_null_value_is_kept() {
        let outputs = Outputs::parse(br#"{"nat": {"value": null}}"#).unwrap();
        assert_eq!(outputs.get("nat"), Some(&Value::Null));
    }

    #[test]
    fn test_parse_malformed_json() {
        let result = Outputs::parse(b"{\"id\": ");
        assert!(matches!(result, Err(ToolError::MalformedOutput(_))));
    }

    #[test]
    fn test_parse_missing_value_field() {
        let result = Outputs::parse(br#"{"id": {"type": "string"}}"#);
        match result {
            Err(ToolError::MalformedOutput(e)) => assert!(e.to_string().contains("value")),
            other => panic!("expected MalformedOutput, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_non_object_root() {
        assert!(Outputs::parse(b"[]").is_err());
    }

    #[test]
    fn test_typed_network_outputs() {
        let outputs = Outputs::parse(RAW.as_bytes()).unwrap();
        let network: NetworkOutputs = outputs.deserialize().unwrap();

        assert_eq!(network.id, "projects/p/global/networks/n");
        let subnet = &network.subnets_by_name["n-us-we1"];
        assert_eq!(subnet.region, "us-west1");
        assert_eq!(subnet.gateway_address, "172.16.0.1");
        assert!(subnet.primary_ipv6_cidr.is_empty());
        assert_eq!(network.subnets_by_region["us-west1"].name, "n-us-we1");
    }

    #[test]
    fn test_typed_view_shape_mismatch() {
        let outputs = Outputs::parse(br#"{"id": {"value": 42}}"#).unwrap();
        let result = outputs.deserialize::<NetworkOutputs>();
        match result {
            Err(err @ ToolError::UnexpectedOutputShape(_)) => {
                assert!(err.to_string().starts_with("unexpected output shape"));
            }
            other => panic!("expected UnexpectedOutputShape, got {:?}", other),
        }
    }
}
