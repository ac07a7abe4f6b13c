//! Deterministic names, ids and self links of the resources the network module creates.

pub const COMPUTE_V1_URL: &str = "https://www.googleapis.com/compute/v1";

/// First two letters of every dash-separated segment, keeping the trailing
/// digits of the last one: `us-west1` → `us-we1`.
pub fn region_abbreviation(region: &str) -> String {
    let segments: Vec<&str> = region.split('-').collect();
    let last = segments.len().saturating_sub(1);

    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            let letters: String = segment
                .chars()
                .filter(|c| c.is_ascii_alphabetic())
                .take(2)
                .collect();
            if index == last {
                let digits: String = segment
                    .chars()
                    .skip_while(|c| !c.is_ascii_digit())
                    .collect();
                format!("{}{}", letters, digits)
            } else {
                letters
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

pub fn subnet_name(name: &str, region: &str) -> String {
    format!("{}-{}", name, region_abbreviation(region))
}

pub fn network_id(project: &str, name: &str) -> String {
    format!("projects/{}/global/networks/{}", project, name)
}

pub fn network_self_link(project: &str, name: &str) -> String {
    format!("{}/{}", COMPUTE_V1_URL, network_id(project, name))
}

pub fn subnetwork_id(project: &str, region: &str, name: &str) -> String {
    format!("projects/{}/regions/{}/subnetworks/{}", project, region, name)
}

pub fn subnetwork_self_link(project: &str, region: &str, name: &str) -> String {
    format!("{}/{}", COMPUTE_V1_URL, subnetwork_id(project, region, name))
}

pub fn region_self_link(project: &str, region: &str) -> String {
    format!("{}/projects/{}/regions/{}", COMPUTE_V1_URL, project, region)
}

pub fn default_internet_gateway(project: &str) -> String {
    format!(
        "{}/projects/{}/global/gateways/default-internet-gateway",
        COMPUTE_V1_URL, project
    )
}

/// Module default primary range for the region at `index` in the region list.
pub fn primary_ipv4_cidr(index: usize) -> String {
    format!("172.16.{}.0/24", index)
}

pub fn gateway_address(index: usize) -> String {
    format!("172.16.{}.1", index)
}

/// PSC forwarding rules only allow `[a-z0-9]{1,20}`.
pub fn psc_forwarding_rule_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .take(20)
        .collect()
}

/// List filter selecting resources attached to the named network.
pub fn network_filter(name: &str) -> String {
    format!("network eq .*/{}$", name)
}
