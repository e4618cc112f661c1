use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::resource::Category;

/// One point-in-time capture of an account's network resources.
///
/// Each collection is a list of flat JSON records as returned by the
/// corresponding `Describe*` call. Any collection may be absent or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Snapshot {
    #[serde(default, alias = "vpcs", deserialize_with = "nullable")]
    pub vpcs: Vec<Value>,
    #[serde(default, alias = "subnets", deserialize_with = "nullable")]
    pub subnets: Vec<Value>,
    #[serde(default, alias = "route_tables", deserialize_with = "nullable")]
    pub route_tables: Vec<Value>,
    #[serde(default, alias = "network_acls", deserialize_with = "nullable")]
    pub network_acls: Vec<Value>,
    #[serde(default, alias = "network_interfaces", deserialize_with = "nullable")]
    pub network_interfaces: Vec<Value>,
    #[serde(default, alias = "vpc_endpoints", deserialize_with = "nullable")]
    pub vpc_endpoints: Vec<Value>,
}

impl Snapshot {
    pub fn from_json(input: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                Error::Io(e.into())
            } else {
                Error::Json(e)
            }
        })
    }

    pub fn records(&self, category: Category) -> &[Value] {
        match category {
            Category::VirtualNetwork => &self.vpcs,
            Category::Subnet => &self.subnets,
            Category::RouteTable => &self.route_tables,
            Category::Acl => &self.network_acls,
            Category::Interface => &self.network_interfaces,
            Category::Endpoint => &self.vpc_endpoints,
        }
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|&c| self.records(c).is_empty())
    }
}

fn nullable<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Value>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
