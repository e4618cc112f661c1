use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use vpcmap::{Category, DiagnosticKind, Reachability, Snapshot, build};

fn snapshot(value: Value) -> Snapshot {
    serde_json::from_value(value).unwrap()
}

fn vpc(id: &str) -> Value {
    json!({"VpcId": id, "CidrBlock": "10.0.0.0/16", "State": "available"})
}

fn subnet(id: &str, vpc_id: &str) -> Value {
    json!({"SubnetId": id, "VpcId": vpc_id, "CidrBlock": "10.0.1.0/24"})
}

fn main_table(id: &str, vpc_id: &str, target: &str) -> Value {
    json!({
        "RouteTableId": id,
        "VpcId": vpc_id,
        "Associations": [{"Main": true}],
        "Routes": [
            {"DestinationCidrBlock": "10.0.0.0/16", "GatewayId": "local"},
            {"DestinationCidrBlock": "0.0.0.0/0", "GatewayId": target}
        ]
    })
}

fn table(id: &str, vpc_id: &str, subnets: &[&str], routes: Value) -> Value {
    let associations: Vec<Value> = subnets.iter().map(|s| json!({"SubnetId": s})).collect();
    json!({
        "RouteTableId": id,
        "VpcId": vpc_id,
        "Associations": associations,
        "Routes": routes
    })
}

fn sorted_edges(graph: &vpcmap::TopologyGraph) -> Vec<(String, String)> {
    let mut edges: Vec<(String, String)> = graph
        .edges()
        .iter()
        .map(|e| {
            let (a, b) = if e.from <= e.to {
                (&e.from, &e.to)
            } else {
                (&e.to, &e.from)
            };
            (a.clone(), b.clone())
        })
        .collect();
    edges.sort();
    edges
}

fn pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

// =============================================================================
// Graph invariants
// =============================================================================

#[test]
fn duplicate_subnet_yields_one_node() {
    let out = build(&snapshot(json!({
        "Vpcs": [vpc("vpc-1")],
        "Subnets": [subnet("subnet-1", "vpc-1"), subnet("subnet-1", "vpc-1")]
    })));
    assert_eq!(out.graph.nodes_in(Category::Subnet).count(), 1);
    assert_eq!(out.graph.edges().len(), 1);
    assert!(
        out.diagnostics.iter().all(|d| d.kind == DiagnosticKind::DuplicateRecord),
        "only an informational note, got: {:?}",
        out.diagnostics
    );
}

#[test]
fn no_duplicate_edges_across_paths() {
    // Both the route table and the endpoint name subnet-1 twice.
    let out = build(&snapshot(json!({
        "Vpcs": [vpc("vpc-1")],
        "Subnets": [subnet("subnet-1", "vpc-1")],
        "RouteTables": [{
            "RouteTableId": "rtb-1",
            "VpcId": "vpc-1",
            "Associations": [{"SubnetId": "subnet-1"}, {"SubnetId": "subnet-1"}]
        }],
        "VpcEndpoints": [{
            "VpcEndpointId": "vpce-1",
            "VpcId": "vpc-1",
            "SubnetIds": ["subnet-1", "subnet-1"]
        }]
    })));
    let edges = sorted_edges(&out.graph);
    let mut deduped = edges.clone();
    deduped.dedup();
    assert_eq!(edges, deduped);
    assert_eq!(
        edges,
        vec![
            pair("rtb-1", "subnet-1"),
            pair("subnet-1", "vpc-1"),
            pair("subnet-1", "vpce-1"),
            pair("vpc-1", "vpce-1"),
        ]
    );
}

#[test]
fn dangling_reference_is_recorded_without_diagnostic() {
    let out = build(&snapshot(json!({
        "NetworkAcls": [{
            "NetworkAclId": "acl-1",
            "VpcId": "vpc-shared",
            "Associations": [{"SubnetId": "subnet-elsewhere"}]
        }]
    })));
    assert!(out.graph.has_edge("acl-1", "vpc-shared"));
    assert!(out.graph.has_edge("acl-1", "subnet-elsewhere"));
    assert_eq!(out.graph.node("subnet-elsewhere"), None);
    assert_eq!(out.graph.dangling_edges().count(), 2);
    assert!(out.diagnostics.is_empty());
}

#[test]
fn all_collections_empty() {
    let out = build(&Snapshot::default());
    assert!(out.graph.nodes().is_empty());
    assert!(out.graph.edges().is_empty());
    assert!(out.diagnostics.is_empty());
}

#[test]
fn build_is_deterministic() {
    let input = snapshot(json!({
        "Vpcs": [vpc("vpc-1"), vpc("vpc-2")],
        "Subnets": [subnet("subnet-2", "vpc-2"), subnet("subnet-1", "vpc-1")],
        "RouteTables": [main_table("rtb-1", "vpc-1", "igw-1")],
        "NetworkAcls": [{"NetworkAclId": "acl-1", "VpcId": "vpc-1", "Associations": [{"SubnetId": "subnet-1"}]}]
    }));
    let first = build(&input);
    let second = build(&input);
    assert_eq!(first.graph.nodes(), second.graph.nodes());
    assert_eq!(sorted_edges(&first.graph), sorted_edges(&second.graph));
    let order: Vec<&str> = first.graph.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(order, vec!["vpc-1", "vpc-2", "subnet-2", "subnet-1", "rtb-1", "acl-1"]);
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn default_inheritance_is_public() {
    let out = build(&snapshot(json!({
        "Vpcs": [vpc("vpc-1")],
        "RouteTables": [main_table("rtb-1", "vpc-1", "igw-1")],
        "Subnets": [subnet("subnet-1", "vpc-1")]
    })));
    assert_eq!(out.graph.reachability("subnet-1"), Some(Reachability::Public));
}

#[test]
fn explicit_association_overrides_default() {
    let out = build(&snapshot(json!({
        "Vpcs": [vpc("vpc-1")],
        "RouteTables": [
            main_table("rtb-1", "vpc-1", "igw-1"),
            table("rtb-2", "vpc-1", &["subnet-1"], json!([
                {"DestinationCidrBlock": "0.0.0.0/0", "NatGatewayId": "nat-1"}
            ]))
        ],
        "Subnets": [subnet("subnet-1", "vpc-1")]
    })));
    assert_eq!(out.graph.reachability("subnet-1"), Some(Reachability::Private));
}

#[test]
fn ambiguous_association_is_public() {
    let out = build(&snapshot(json!({
        "Vpcs": [vpc("vpc-1")],
        "RouteTables": [
            table("rtb-pub", "vpc-1", &["subnet-1"], json!([
                {"DestinationCidrBlock": "0.0.0.0/0", "GatewayId": "igw-1"}
            ])),
            table("rtb-priv", "vpc-1", &["subnet-1"], json!([]))
        ],
        "Subnets": [subnet("subnet-1", "vpc-1")]
    })));
    assert_eq!(out.graph.reachability("subnet-1"), Some(Reachability::Public));
    let kinds: Vec<DiagnosticKind> = out.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::AmbiguousClassification]);
    assert!(!out.has_skips());
}

#[test]
fn irregular_igw_references_are_public() {
    for gateway in ["igw-", "igw-0abc.legacy", "igw-0abc-x"] {
        let out = build(&snapshot(json!({
            "RouteTables": [main_table("rtb-1", "vpc-1", gateway)],
            "Subnets": [subnet("subnet-1", "vpc-1")]
        })));
        assert_eq!(
            out.graph.reachability("subnet-1"),
            Some(Reachability::Public),
            "gateway {gateway}"
        );
    }
}

#[test]
fn badly_typed_route_field_keeps_explicit_binding() {
    let out = build(&snapshot(json!({
        "Vpcs": [vpc("vpc-1")],
        "RouteTables": [
            main_table("rtb-1", "vpc-1", "igw-1"),
            table("rtb-2", "vpc-1", &["subnet-1"], json!([
                {"DestinationCidrBlock": "0.0.0.0/0", "NatGatewayId": "nat-1", "State": 1}
            ]))
        ],
        "Subnets": [subnet("subnet-1", "vpc-1")]
    })));
    assert!(out.graph.contains_node("rtb-2"));
    assert!(out.graph.has_edge("rtb-2", "subnet-1"));
    assert_eq!(out.graph.reachability("subnet-1"), Some(Reachability::Private));
    assert!(out.diagnostics.is_empty(), "got: {:?}", out.diagnostics);
}

#[test]
fn non_igw_gateways_are_private() {
    let out = build(&snapshot(json!({
        "RouteTables": [main_table("rtb-1", "vpc-1", "vgw-1")],
        "Subnets": [subnet("subnet-1", "vpc-1")]
    })));
    assert_eq!(out.graph.reachability("subnet-1"), Some(Reachability::Private));

    let out = build(&snapshot(json!({
        "RouteTables": [main_table("rtb-1", "vpc-1", "eigw-1")],
        "Subnets": [subnet("subnet-1", "vpc-1")]
    })));
    assert_eq!(out.graph.reachability("subnet-1"), Some(Reachability::Private));
}

#[test]
fn default_tables_are_per_vpc() {
    let out = build(&snapshot(json!({
        "RouteTables": [
            main_table("rtb-1", "vpc-1", "igw-1"),
            main_table("rtb-2", "vpc-2", "vgw-2")
        ],
        "Subnets": [subnet("subnet-1", "vpc-1"), subnet("subnet-2", "vpc-2")]
    })));
    assert_eq!(out.graph.reachability("subnet-1"), Some(Reachability::Public));
    assert_eq!(out.graph.reachability("subnet-2"), Some(Reachability::Private));
    assert!(out.graph.has_edge("vpc-1", "rtb-1"));
    assert!(out.graph.has_edge("vpc-2", "rtb-2"));
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_inherited_public_subnet() {
    let out = build(&snapshot(json!({
        "Vpcs": [{"VpcId": "vpc-1"}],
        "RouteTables": [{
            "RouteTableId": "rtb-1",
            "VpcId": "vpc-1",
            "Associations": [{"Main": true}],
            "Routes": [{"DestinationCidrBlock": "0.0.0.0/0", "GatewayId": "igw-1"}]
        }],
        "Subnets": [{"SubnetId": "subnet-1", "VpcId": "vpc-1"}]
    })));

    let mut ids: Vec<&str> = out.graph.nodes().iter().map(|n| n.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["rtb-1", "subnet-1", "vpc-1"]);
    assert_eq!(
        sorted_edges(&out.graph),
        vec![pair("rtb-1", "vpc-1"), pair("subnet-1", "vpc-1")]
    );
    assert_eq!(out.graph.reachability("subnet-1"), Some(Reachability::Public));
    assert!(out.diagnostics.is_empty());
}

#[test]
fn scenario_explicit_private_table() {
    let out = build(&snapshot(json!({
        "Vpcs": [{"VpcId": "vpc-1"}],
        "RouteTables": [
            {
                "RouteTableId": "rtb-1",
                "VpcId": "vpc-1",
                "Associations": [{"Main": true}],
                "Routes": [{"DestinationCidrBlock": "0.0.0.0/0", "GatewayId": "igw-1"}]
            },
            {
                "RouteTableId": "rtb-2",
                "VpcId": "vpc-1",
                "Associations": [{"Main": false, "SubnetId": "subnet-1"}],
                "Routes": [{"DestinationCidrBlock": "10.0.0.0/16", "GatewayId": "local"}]
            }
        ],
        "Subnets": [{"SubnetId": "subnet-1", "VpcId": "vpc-1"}]
    })));

    assert_eq!(out.graph.reachability("subnet-1"), Some(Reachability::Private));
    assert_eq!(
        sorted_edges(&out.graph),
        vec![
            pair("rtb-1", "vpc-1"),
            pair("rtb-2", "subnet-1"),
            pair("subnet-1", "vpc-1"),
        ]
    );
}

#[test]
fn scenario_subnet_missing_parent() {
    let out = build(&snapshot(json!({
        "Vpcs": [{"VpcId": "vpc-1"}],
        "Subnets": [{"SubnetId": "subnet-1", "CidrBlock": "10.0.1.0/24"}]
    })));

    assert_eq!(out.graph.node("subnet-1"), None);
    assert_eq!(out.graph.nodes().len(), 1);
    assert!(out.graph.edges().is_empty());
    assert_eq!(out.diagnostics.len(), 1);
    let d = &out.diagnostics[0];
    assert_eq!(d.kind, DiagnosticKind::MissingRequiredField);
    assert_eq!(d.category, Category::Subnet);
    assert_eq!(d.resource_id.as_deref(), Some("subnet-1"));
    assert!(out.has_skips());
}

// =============================================================================
// Labels and details
// =============================================================================

#[test]
fn label_from_first_name_tag() {
    let out = build(&snapshot(json!({
        "Vpcs": [
            {"VpcId": "vpc-1", "Tags": [{"Key": "env", "Value": "prod"}, {"Key": "Name", "Value": "core"}, {"Key": "Name", "Value": "dup"}]},
            {"VpcId": "vpc-2"}
        ]
    })));
    assert_eq!(out.graph.node("vpc-1").unwrap().label, "core");
    assert_eq!(out.graph.node("vpc-2").unwrap().label, "vpc-2");
}

#[test]
fn details_are_category_specific() {
    let out = build(&snapshot(json!({
        "Vpcs": [vpc("vpc-1")],
        "Subnets": [subnet("subnet-1", "vpc-1")],
        "RouteTables": [main_table("rtb-1", "vpc-1", "igw-1")],
        "NetworkInterfaces": [{
            "NetworkInterfaceId": "eni-1",
            "SubnetId": "subnet-1",
            "PrivateIpAddresses": [{"PrivateIpAddress": "10.0.1.10"}],
            "Association": {"PublicIp": "3.3.3.3"},
            "Status": "in-use"
        }],
        "VpcEndpoints": [{
            "VpcEndpointId": "vpce-1",
            "VpcId": "vpc-1",
            "VpcEndpointType": "Gateway",
            "ServiceName": "com.amazonaws.us-east-1.s3",
            "State": "available"
        }]
    })));
    for node in out.graph.nodes() {
        assert!(!node.detail.is_empty(), "{} has empty detail", node.id);
    }
    let detail = |id: &str| out.graph.node(id).unwrap().detail.clone();
    assert!(detail("vpc-1").starts_with("VPC: vpc-1\nCIDR: 10.0.0.0/16"));
    assert!(detail("subnet-1").contains("Reachability: public"));
    assert!(detail("rtb-1").contains("Destination: 0.0.0.0/0, Target: igw-1"));
    assert!(detail("eni-1").contains("Public IP: 3.3.3.3"));
    assert!(detail("vpce-1").contains("Service: com.amazonaws.us-east-1.s3"));
}
