use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::index::ResourceIndex;
use crate::resource::{RouteTable, Subnet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reachability {
    Public,
    Private,
}

impl Reachability {
    pub fn as_str(self) -> &'static str {
        match self {
            Reachability::Public => "public",
            Reachability::Private => "private",
        }
    }

    fn from_internet_route(has_route: bool) -> Self {
        if has_route {
            Reachability::Public
        } else {
            Reachability::Private
        }
    }
}

impl fmt::Display for Reachability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a subnet's classification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    /// The subnet is bound to one or more route tables.
    Explicit,
    /// No binding; the network's default table decided.
    Inherited,
    /// No binding and the network has no resolvable default table.
    NoDefault,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub reachability: Reachability,
    pub basis: Basis,
    /// Bound to tables that disagree; resolved as public.
    pub ambiguous: bool,
}

#[derive(Debug, Clone)]
struct DefaultTable {
    id: String,
    has_internet_route: bool,
}

/// Route-table semantics of a whole snapshot.
///
/// Association sets are collected up front so every subnet is decided
/// against the complete picture: an explicit binding anywhere overrides
/// inheritance from the default table.
#[derive(Debug, Clone, Default)]
pub struct RouteTableClassifier {
    defaults: HashMap<String, DefaultTable>,
    internet_tables: HashSet<String>,
    explicit: HashMap<String, Vec<String>>,
}

impl RouteTableClassifier {
    pub fn new(index: &ResourceIndex) -> Self {
        let mut defaults = HashMap::new();
        for vpc_id in index.route_table_vpcs() {
            let mut mains = index.route_tables_of(vpc_id).filter(|rt| rt.is_main());
            let Some(main) = mains.next() else {
                continue;
            };
            let ignored: Vec<&str> = mains.map(|rt| rt.id.as_str()).collect();
            if !ignored.is_empty() {
                tracing::warn!(
                    vpc_id,
                    default = %main.id,
                    ?ignored,
                    "several main route tables; using the first"
                );
            }
            defaults.insert(
                vpc_id.to_string(),
                DefaultTable {
                    id: main.id.clone(),
                    has_internet_route: main.has_internet_route(),
                },
            );
        }

        let mut internet_tables = HashSet::new();
        let mut explicit: HashMap<String, Vec<String>> = HashMap::new();
        for rt in index.route_tables.iter() {
            if rt.has_internet_route() {
                internet_tables.insert(rt.id.clone());
            }
            for subnet_id in rt.associated_subnets() {
                let tables = explicit.entry(subnet_id.to_string()).or_default();
                if !tables.contains(&rt.id) {
                    tables.push(rt.id.clone());
                }
            }
        }

        Self {
            defaults,
            internet_tables,
            explicit,
        }
    }

    pub fn default_route_table(&self, vpc_id: &str) -> Option<&str> {
        self.defaults.get(vpc_id).map(|d| d.id.as_str())
    }

    pub fn is_default_route_table(&self, rt: &RouteTable) -> bool {
        self.default_route_table(&rt.vpc_id) == Some(rt.id.as_str())
    }

    /// False when the network has no default table at all.
    pub fn default_has_internet_route(&self, vpc_id: &str) -> bool {
        self.defaults
            .get(vpc_id)
            .is_some_and(|d| d.has_internet_route)
    }

    pub fn has_internet_route(&self, route_table_id: &str) -> bool {
        self.internet_tables.contains(route_table_id)
    }

    /// Tables the subnet is explicitly bound to, in snapshot order.
    pub fn explicit_route_tables(&self, subnet_id: &str) -> &[String] {
        self.explicit.get(subnet_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn classify(&self, subnet: &Subnet) -> Classification {
        let tables = self.explicit_route_tables(&subnet.id);
        if tables.is_empty() {
            let basis = if self.defaults.contains_key(&subnet.vpc_id) {
                Basis::Inherited
            } else {
                Basis::NoDefault
            };
            return Classification {
                reachability: Reachability::from_internet_route(
                    self.default_has_internet_route(&subnet.vpc_id),
                ),
                basis,
                ambiguous: false,
            };
        }

        let public = tables.iter().filter(|t| self.has_internet_route(t)).count();
        Classification {
            reachability: Reachability::from_internet_route(public > 0),
            basis: Basis::Explicit,
            ambiguous: public > 0 && public < tables.len(),
        }
    }
}
