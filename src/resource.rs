use std::fmt;

use serde::Serialize;

use crate::reference::{RouteDestination, RouteTarget};

/// Tag key whose value names a resource.
pub const NAME_TAG: &str = "Name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    #[serde(rename = "vpc")]
    VirtualNetwork,
    #[serde(rename = "subnet")]
    Subnet,
    #[serde(rename = "route_table")]
    RouteTable,
    #[serde(rename = "nacl")]
    Acl,
    #[serde(rename = "eni")]
    Interface,
    #[serde(rename = "endpoint")]
    Endpoint,
}

impl Category {
    /// Traversal order used by the graph builder.
    pub const ALL: [Category; 6] = [
        Category::VirtualNetwork,
        Category::Subnet,
        Category::RouteTable,
        Category::Acl,
        Category::Interface,
        Category::Endpoint,
    ];

    /// Short group name, stable across output formats.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::VirtualNetwork => "vpc",
            Category::Subnet => "subnet",
            Category::RouteTable => "route_table",
            Category::Acl => "nacl",
            Category::Interface => "eni",
            Category::Endpoint => "endpoint",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::VirtualNetwork => "VPC",
            Category::Subnet => "Subnet",
            Category::RouteTable => "Route Table",
            Category::Acl => "Network ACL",
            Category::Interface => "ENI",
            Category::Endpoint => "VPC Endpoint",
        }
    }

    /// Fill colour renderers use for this category.
    pub fn color(self) -> &'static str {
        match self {
            Category::VirtualNetwork => "#FF9900",
            Category::Subnet => "#1EC9E8",
            Category::RouteTable => "#FF5252",
            Category::Acl => "#7B35BA",
            Category::Interface => "#9CCC65",
            Category::Endpoint => "#FB8C00",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Value of the first `Name` tag, or `fallback` when there is none.
///
/// Keys are not unique, so later `Name` tags are ignored. A blank first
/// `Name` value counts as no name.
pub fn resolve_label(tags: &[Tag], fallback: &str) -> String {
    match tags.iter().find(|t| t.key == NAME_TAG) {
        Some(tag) if !tag.value.trim().is_empty() => tag.value.clone(),
        _ => fallback.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Association {
    /// The table is its network's default, not bound to any subnet.
    Main,
    Subnet(String),
}

impl Association {
    pub fn subnet_id(&self) -> Option<&str> {
        match self {
            Association::Subnet(id) => Some(id),
            Association::Main => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub destination: RouteDestination,
    pub target: RouteTarget,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualNetwork {
    pub id: String,
    pub tags: Vec<Tag>,
    pub cidr_block: Option<String>,
    pub state: Option<String>,
    pub dhcp_options_id: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    pub id: String,
    pub vpc_id: String,
    pub tags: Vec<Tag>,
    pub cidr_block: Option<String>,
    pub availability_zone: Option<String>,
    pub state: Option<String>,
    pub map_public_ip_on_launch: bool,
    pub available_ip_address_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    pub id: String,
    pub vpc_id: String,
    pub tags: Vec<Tag>,
    pub routes: Vec<RouteEntry>,
    pub associations: Vec<Association>,
}

impl RouteTable {
    pub fn is_main(&self) -> bool {
        self.associations.contains(&Association::Main)
    }

    pub fn has_internet_route(&self) -> bool {
        self.routes.iter().any(|r| r.target.is_internet_gateway())
    }

    pub fn associated_subnets(&self) -> impl Iterator<Item = &str> + '_ {
        self.associations.iter().filter_map(Association::subnet_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acl {
    pub id: String,
    pub vpc_id: String,
    pub tags: Vec<Tag>,
    pub is_default: bool,
    pub associations: Vec<Association>,
    pub entry_count: usize,
}

impl Acl {
    pub fn associated_subnets(&self) -> impl Iterator<Item = &str> + '_ {
        self.associations.iter().filter_map(Association::subnet_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub id: String,
    pub subnet_id: String,
    pub vpc_id: Option<String>,
    pub tags: Vec<Tag>,
    pub private_ips: Vec<String>,
    pub public_ip: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub interface_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub id: String,
    pub vpc_id: String,
    pub tags: Vec<Tag>,
    pub endpoint_type: Option<String>,
    pub service_name: Option<String>,
    pub state: Option<String>,
    pub subnet_ids: Vec<String>,
    pub route_table_ids: Vec<String>,
}

/// Common view over the six typed record shapes.
pub trait Record {
    const CATEGORY: Category;

    fn id(&self) -> &str;

    fn tags(&self) -> &[Tag];

    fn label(&self) -> String {
        resolve_label(self.tags(), self.id())
    }
}

macro_rules! impl_record {
    ($ty:ty, $category:expr) => {
        impl Record for $ty {
            const CATEGORY: Category = $category;

            fn id(&self) -> &str {
                &self.id
            }

            fn tags(&self) -> &[Tag] {
                &self.tags
            }
        }
    };
}

impl_record!(VirtualNetwork, Category::VirtualNetwork);
impl_record!(Subnet, Category::Subnet);
impl_record!(RouteTable, Category::RouteTable);
impl_record!(Acl, Category::Acl);
impl_record!(Interface, Category::Interface);
impl_record!(Endpoint, Category::Endpoint);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRecord {
    VirtualNetwork(VirtualNetwork),
    Subnet(Subnet),
    RouteTable(RouteTable),
    Acl(Acl),
    Interface(Interface),
    Endpoint(Endpoint),
}

impl ResourceRecord {
    pub fn category(&self) -> Category {
        match self {
            ResourceRecord::VirtualNetwork(_) => Category::VirtualNetwork,
            ResourceRecord::Subnet(_) => Category::Subnet,
            ResourceRecord::RouteTable(_) => Category::RouteTable,
            ResourceRecord::Acl(_) => Category::Acl,
            ResourceRecord::Interface(_) => Category::Interface,
            ResourceRecord::Endpoint(_) => Category::Endpoint,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ResourceRecord::VirtualNetwork(r) => r.id(),
            ResourceRecord::Subnet(r) => r.id(),
            ResourceRecord::RouteTable(r) => r.id(),
            ResourceRecord::Acl(r) => r.id(),
            ResourceRecord::Interface(r) => r.id(),
            ResourceRecord::Endpoint(r) => r.id(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            ResourceRecord::VirtualNetwork(r) => r.label(),
            ResourceRecord::Subnet(r) => r.label(),
            ResourceRecord::RouteTable(r) => r.label(),
            ResourceRecord::Acl(r) => r.label(),
            ResourceRecord::Interface(r) => r.label(),
            ResourceRecord::Endpoint(r) => r.label(),
        }
    }
}
