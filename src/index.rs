use std::collections::HashMap;

use crate::decode::decode;
use crate::diagnostic::Diagnostic;
use crate::resource::*;
use crate::snapshot::Snapshot;

/// Records of one category keyed by identifier, in first-seen order.
#[derive(Debug, Clone)]
pub struct CategoryMap<T> {
    records: Vec<T>,
    by_id: HashMap<String, usize>,
}

impl<T> Default for CategoryMap<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            by_id: HashMap::new(),
        }
    }
}

impl<T: Record> CategoryMap<T> {
    /// Returns false, keeping the existing record, when the id is already present.
    pub fn insert(&mut self, record: T) -> bool {
        if self.by_id.contains_key(record.id()) {
            return false;
        }
        self.by_id.insert(record.id().to_string(), self.records.len());
        self.records.push(record);
        true
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Typed, deduplicated view of a [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct ResourceIndex {
    pub vpcs: CategoryMap<VirtualNetwork>,
    pub subnets: CategoryMap<Subnet>,
    pub route_tables: CategoryMap<RouteTable>,
    pub acls: CategoryMap<Acl>,
    pub interfaces: CategoryMap<Interface>,
    pub endpoints: CategoryMap<Endpoint>,
    route_tables_by_vpc: HashMap<String, Vec<usize>>,
    vpc_order: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl ResourceIndex {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut index = Self::default();
        for category in Category::ALL {
            for value in snapshot.records(category) {
                match decode(category, value) {
                    Ok(record) => index.insert(record),
                    Err(diagnostic) => {
                        tracing::debug!(%diagnostic, "skipping record");
                        index.diagnostics.push(diagnostic);
                    }
                }
            }
        }
        tracing::debug!(
            records = index.len(),
            diagnostics = index.diagnostics.len(),
            "resource index built"
        );
        index
    }

    pub fn insert(&mut self, record: ResourceRecord) {
        let category = record.category();
        let id = record.id().to_string();
        let inserted = match record {
            ResourceRecord::VirtualNetwork(r) => self.vpcs.insert(r),
            ResourceRecord::Subnet(r) => self.subnets.insert(r),
            ResourceRecord::RouteTable(r) => {
                let vpc_id = r.vpc_id.clone();
                let position = self.route_tables.len();
                let inserted = self.route_tables.insert(r);
                if inserted {
                    self.route_tables_by_vpc
                        .entry(vpc_id.clone())
                        .or_insert_with(|| {
                            self.vpc_order.push(vpc_id);
                            Vec::new()
                        })
                        .push(position);
                }
                inserted
            }
            ResourceRecord::Acl(r) => self.acls.insert(r),
            ResourceRecord::Interface(r) => self.interfaces.insert(r),
            ResourceRecord::Endpoint(r) => self.endpoints.insert(r),
        };
        if !inserted {
            tracing::debug!(%category, id = %id, "duplicate record ignored");
            self.diagnostics.push(Diagnostic::duplicate(category, &id));
        }
    }

    /// Route tables whose parent is `vpc_id`, in snapshot order.
    pub fn route_tables_of<'a>(&'a self, vpc_id: &str) -> impl Iterator<Item = &'a RouteTable> + use<'a> {
        self.route_tables_by_vpc
            .get(vpc_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.route_tables.records[i])
    }

    /// Every network id that owns at least one route table, including ids
    /// with no network record in the snapshot.
    pub fn route_table_vpcs(&self) -> impl Iterator<Item = &str> + '_ {
        self.vpc_order.iter().map(String::as_str)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.vpcs.len()
            + self.subnets.len()
            + self.route_tables.len()
            + self.acls.len()
            + self.interfaces.len()
            + self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
