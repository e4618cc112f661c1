//! Human-readable detail text for each node category.

use crate::classifier::Reachability;
use crate::reference::UNRESOLVED;
use crate::resource::*;

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(UNRESOLVED)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

pub fn vpc_detail(vpc: &VirtualNetwork) -> String {
    let mut lines = vec![
        format!("VPC: {}", vpc.id),
        format!("CIDR: {}", or_na(vpc.cidr_block.as_deref())),
        format!("State: {}", or_na(vpc.state.as_deref())),
        format!("DHCP Options: {}", or_na(vpc.dhcp_options_id.as_deref())),
    ];
    if vpc.is_default {
        lines.push("Default VPC: yes".to_string());
    }
    lines.join("\n")
}

pub fn subnet_detail(subnet: &Subnet, reachability: Reachability) -> String {
    let mut lines = vec![
        format!("Subnet: {}", subnet.id),
        format!("CIDR: {}", or_na(subnet.cidr_block.as_deref())),
        format!("AZ: {}", or_na(subnet.availability_zone.as_deref())),
        format!("State: {}", or_na(subnet.state.as_deref())),
        format!("Reachability: {reachability}"),
    ];
    if subnet.map_public_ip_on_launch {
        lines.push("Auto-assign public IP: yes".to_string());
    }
    if let Some(count) = subnet.available_ip_address_count {
        lines.push(format!("Available IPs: {count}"));
    }
    lines.join("\n")
}

/// Route states other than `active` (e.g. `blackhole`) are shown after the target.
pub fn route_summary(route: &RouteEntry) -> String {
    let summary = format!("Destination: {}, Target: {}", route.destination, route.target);
    match route.state.as_deref() {
        Some(state) if !state.is_empty() && state != "active" => format!("{summary} ({state})"),
        _ => summary,
    }
}

pub fn route_table_detail(rt: &RouteTable, is_default: bool) -> String {
    let mut lines = vec![
        format!("Route Table: {}", rt.id),
        format!("VPC: {}", rt.vpc_id),
    ];
    if is_default {
        lines.push("Main: yes".to_string());
    }
    if rt.routes.is_empty() {
        lines.push("Routes: none".to_string());
    } else {
        lines.push("Routes:".to_string());
        lines.extend(rt.routes.iter().map(route_summary));
    }
    lines.join("\n")
}

pub fn acl_detail(acl: &Acl) -> String {
    [
        format!("Network ACL: {}", acl.id),
        format!("VPC: {}", acl.vpc_id),
        format!("Default: {}", yes_no(acl.is_default)),
        format!("Entries: {}", acl.entry_count),
    ]
    .join("\n")
}

pub fn interface_detail(eni: &Interface) -> String {
    let private_ips = if eni.private_ips.is_empty() {
        UNRESOLVED.to_string()
    } else {
        eni.private_ips.join(", ")
    };
    let mut lines = vec![
        format!("ENI: {}", eni.id),
        format!("Subnet: {}", eni.subnet_id),
        format!("VPC: {}", or_na(eni.vpc_id.as_deref())),
        format!("Private IPs: {private_ips}"),
        format!("Public IP: {}", or_na(eni.public_ip.as_deref())),
        format!("Status: {}", or_na(eni.status.as_deref())),
    ];
    if let Some(kind) = eni.interface_type.as_deref().filter(|k| !k.is_empty()) {
        lines.push(format!("Type: {kind}"));
    }
    if let Some(description) = eni.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("Description: {description}"));
    }
    lines.join("\n")
}

pub fn endpoint_detail(endpoint: &Endpoint) -> String {
    [
        format!("VPC Endpoint: {}", endpoint.id),
        format!("Type: {}", or_na(endpoint.endpoint_type.as_deref())),
        format!("Service: {}", or_na(endpoint.service_name.as_deref())),
        format!("State: {}", or_na(endpoint.state.as_deref())),
    ]
    .join("\n")
}
