use crate::classifier::RouteTableClassifier;
use crate::detail;
use crate::diagnostic::Diagnostic;
use crate::graph::{Node, TopologyGraph};
use crate::index::ResourceIndex;
use crate::resource::{Category, Record};
use crate::snapshot::Snapshot;

/// Result of one build: the graph plus everything that could not be placed.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub graph: TopologyGraph,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildOutput {
    /// True when some record was dropped, as opposed to informational notes.
    pub fn has_skips(&self) -> bool {
        self.diagnostics.iter().any(|d| !d.kind.is_informational())
    }

    /// Process status for a run that produced this output: 2 when `strict`
    /// and a record was skipped, else 0. Fatal errors exit with 1 before
    /// any output exists.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && self.has_skips() { 2 } else { 0 }
    }
}

/// Build the topology graph of `snapshot`.
pub fn build(snapshot: &Snapshot) -> BuildOutput {
    let index = ResourceIndex::from_snapshot(snapshot);
    GraphBuilder::new(&index).build()
}

/// Walks an index category by category, accumulating nodes and edges.
pub struct GraphBuilder<'a> {
    index: &'a ResourceIndex,
    classifier: RouteTableClassifier,
    graph: TopologyGraph,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(index: &'a ResourceIndex) -> Self {
        Self {
            index,
            classifier: RouteTableClassifier::new(index),
            graph: TopologyGraph::default(),
            diagnostics: index.diagnostics().to_vec(),
        }
    }

    pub fn build(mut self) -> BuildOutput {
        self.add_vpcs();
        self.add_subnets();
        self.add_route_tables();
        self.add_acls();
        self.add_interfaces();
        self.add_endpoints();

        let stats = self.graph.stats();
        tracing::info!(
            nodes = stats.nodes,
            edges = stats.edges,
            dangling = stats.dangling_edges,
            public_subnets = stats.public_subnets,
            diagnostics = self.diagnostics.len(),
            "topology graph built"
        );
        for edge in self.graph.dangling_edges() {
            tracing::debug!(from = %edge.from, to = %edge.to, "edge references a resource outside the snapshot");
        }

        BuildOutput {
            graph: self.graph,
            diagnostics: self.diagnostics,
        }
    }

    fn node<R: Record>(&mut self, record: &R, detail: String) -> &mut Self {
        self.graph.add_node(Node {
            id: record.id().to_string(),
            category: R::CATEGORY,
            label: record.label(),
            detail,
            reachability: None,
        });
        self
    }

    fn edge(&mut self, from: &str, to: &str) -> &mut Self {
        self.graph.add_edge(from, to);
        self
    }

    fn add_vpcs(&mut self) {
        let index = self.index;
        for vpc in index.vpcs.iter() {
            self.node(vpc, detail::vpc_detail(vpc));
        }
    }

    fn add_subnets(&mut self) {
        let index = self.index;
        for subnet in index.subnets.iter() {
            let classification = self.classifier.classify(subnet);
            if classification.ambiguous {
                let tables: Vec<&str> = self
                    .classifier
                    .explicit_route_tables(&subnet.id)
                    .iter()
                    .map(String::as_str)
                    .collect();
                self.diagnostics.push(Diagnostic::ambiguous(&subnet.id, &tables));
            }
            let reachability = classification.reachability;
            tracing::debug!(
                subnet = %subnet.id,
                %reachability,
                basis = ?classification.basis,
                "subnet classified"
            );
            self.graph.add_node(Node {
                id: subnet.id.clone(),
                category: Category::Subnet,
                label: subnet.label(),
                detail: detail::subnet_detail(subnet, reachability),
                reachability: Some(reachability),
            });
            self.edge(&subnet.vpc_id, &subnet.id);
        }
    }

    fn add_route_tables(&mut self) {
        let index = self.index;
        for rt in index.route_tables.iter() {
            let is_default = self.classifier.is_default_route_table(rt);
            self.node(rt, detail::route_table_detail(rt, is_default));
            if is_default {
                self.edge(&rt.vpc_id, &rt.id);
            }
            for subnet_id in rt.associated_subnets() {
                self.edge(&rt.id, subnet_id);
            }
        }
    }

    fn add_acls(&mut self) {
        let index = self.index;
        for acl in index.acls.iter() {
            self.node(acl, detail::acl_detail(acl))
                .edge(&acl.vpc_id, &acl.id);
            for subnet_id in acl.associated_subnets() {
                self.edge(&acl.id, subnet_id);
            }
        }
    }

    fn add_interfaces(&mut self) {
        let index = self.index;
        for eni in index.interfaces.iter() {
            self.node(eni, detail::interface_detail(eni))
                .edge(&eni.subnet_id, &eni.id);
        }
    }

    fn add_endpoints(&mut self) {
        let index = self.index;
        for endpoint in index.endpoints.iter() {
            self.node(endpoint, detail::endpoint_detail(endpoint))
                .edge(&endpoint.vpc_id, &endpoint.id);
            for subnet_id in &endpoint.subnet_ids {
                self.edge(&endpoint.id, subnet_id);
            }
            for rt_id in &endpoint.route_table_ids {
                self.edge(&endpoint.id, rt_id);
            }
        }
    }
}
