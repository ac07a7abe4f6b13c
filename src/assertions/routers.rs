use super::CheckReport;
use crate::compute::Router;

pub const DEFAULT_NAT_LOG_FILTER: &str = "ALL";

/// Router and Cloud NAT expectations for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterExpectation {
    pub region: String,
    pub nat: Option<NatExpectation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NatExpectation {
    /// Router and NAT share the regional subnet name.
    pub name: String,
    pub logging_enabled: bool,
    pub log_filter: String,
}

impl NatExpectation {
    /// Logging is on only when a filter was requested.
    pub fn new(name: impl Into<String>, logging_filter: Option<&str>) -> Self {
        let filter = logging_filter.filter(|f| !f.is_empty());
        Self {
            name: name.into(),
            logging_enabled: filter.is_some(),
            log_filter: filter.unwrap_or(DEFAULT_NAT_LOG_FILTER).to_string(),
        }
    }
}

impl RouterExpectation {
    pub fn check(&self, routers: &[Router], report: &mut CheckReport) {
        let path = format!("routers[{}]", self.region);
        let Some(nat) = &self.nat else {
            report.expect_empty(path, routers);
            return;
        };

        report.expect_count(path.as_str(), 1, routers);
        for router in routers {
            report.expect_eq(format!("{}.name", path), nat.name.as_str(), router.name.as_str());
            report.expect_count(format!("{}.nats", path), 1, &router.nats);
            for router_nat in &router.nats {
                let nat_path = format!("{}.nats[{}]", path, router_nat.name);
                report.expect_eq(
                    format!("{}.name", nat_path),
                    nat.name.as_str(),
                    router_nat.name.as_str(),
                );
                report.expect_eq(
                    format!("{}.log_config.enable", nat_path),
                    nat.logging_enabled,
                    router_nat.log_config.enable,
                );
                report.expect_eq(
                    format!("{}.log_config.filter", nat_path),
                    nat.log_filter.as_str(),
                    router_nat.log_config.filter.as_str(),
                );
            }
        }
    }
}
