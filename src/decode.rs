//! Decoding of flat JSON resource records into typed variants.
//!
//! Field names follow the EC2 `Describe*` response shapes. Every field is
//! optional on the wire; required identifiers are checked after
//! deserialization so a missing one becomes a diagnostic, not a decode
//! failure. Optional fields of the wrong JSON type read as absent, and
//! list elements of the wrong shape are dropped one at a time, so only
//! the identifier and parent reference can make a record malformed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::diagnostic::Diagnostic;
use crate::reference::{RouteDestination, RouteTarget};
use crate::resource::*;

/// Decode one raw record of `category`.
pub fn decode(category: Category, value: &Value) -> Result<ResourceRecord, Diagnostic> {
    match category {
        Category::VirtualNetwork => decode_as::<RawVpc>(value).map(ResourceRecord::VirtualNetwork),
        Category::Subnet => decode_as::<RawSubnet>(value).map(ResourceRecord::Subnet),
        Category::RouteTable => decode_as::<RawRouteTable>(value).map(ResourceRecord::RouteTable),
        Category::Acl => decode_as::<RawAcl>(value).map(ResourceRecord::Acl),
        Category::Interface => decode_as::<RawInterface>(value).map(ResourceRecord::Interface),
        Category::Endpoint => decode_as::<RawEndpoint>(value).map(ResourceRecord::Endpoint),
    }
}

trait RawRecord {
    type Output: Record;

    const ID_FIELD: &'static str;

    /// Err carries the name of the missing required field.
    fn into_record(self) -> Result<Self::Output, &'static str>;
}

fn decode_as<'a, R>(value: &'a Value) -> Result<R::Output, Diagnostic>
where
    R: RawRecord + Deserialize<'a>,
{
    let category = <R::Output as Record>::CATEGORY;
    let Some(fields) = value.as_object() else {
        return Err(Diagnostic::malformed(category, None, "record is not a JSON object"));
    };
    let id_hint = fields
        .get(R::ID_FIELD)
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string);

    let raw = R::deserialize(value)
        .map_err(|e| Diagnostic::malformed(category, id_hint.clone(), e.to_string()))?;
    raw.into_record()
        .map_err(|field| Diagnostic::missing_field(category, id_hint, field))
}

fn required(value: Option<String>, field: &'static str) -> Result<String, &'static str> {
    value.filter(|v| !v.trim().is_empty()).ok_or(field)
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect();
    if kept.len() < total {
        tracing::debug!(dropped = total - kept.len(), "ignoring malformed list elements");
    }
    Ok(Some(kept))
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawTag {
    #[serde(default, deserialize_with = "lenient")]
    key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    value: Option<String>,
}

fn tags(raw: Option<Vec<RawTag>>) -> Vec<Tag> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|t| {
            let key = t.key?;
            Some(Tag::new(key, t.value.unwrap_or_default()))
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawAssociation {
    #[serde(default, deserialize_with = "lenient")]
    main: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    subnet_id: Option<String>,
}

fn associations(raw: Option<Vec<RawAssociation>>) -> Vec<Association> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|a| {
            if a.main == Some(true) {
                Some(Association::Main)
            } else {
                a.subnet_id
                    .filter(|id| !id.trim().is_empty())
                    .map(Association::Subnet)
            }
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawVpc {
    vpc_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    cidr_block: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    dhcp_options_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    is_default: Option<bool>,
    #[serde(default, deserialize_with = "lenient_list")]
    tags: Option<Vec<RawTag>>,
}

impl RawRecord for RawVpc {
    type Output = VirtualNetwork;
    const ID_FIELD: &'static str = "VpcId";

    fn into_record(self) -> Result<VirtualNetwork, &'static str> {
        Ok(VirtualNetwork {
            id: required(self.vpc_id, Self::ID_FIELD)?,
            tags: tags(self.tags),
            cidr_block: self.cidr_block,
            state: self.state,
            dhcp_options_id: self.dhcp_options_id,
            is_default: self.is_default.unwrap_or(false),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawSubnet {
    subnet_id: Option<String>,
    vpc_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    cidr_block: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    availability_zone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    map_public_ip_on_launch: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    available_ip_address_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_list")]
    tags: Option<Vec<RawTag>>,
}

impl RawRecord for RawSubnet {
    type Output = Subnet;
    const ID_FIELD: &'static str = "SubnetId";

    fn into_record(self) -> Result<Subnet, &'static str> {
        Ok(Subnet {
            id: required(self.subnet_id, Self::ID_FIELD)?,
            vpc_id: required(self.vpc_id, "VpcId")?,
            tags: tags(self.tags),
            cidr_block: self.cidr_block,
            availability_zone: self.availability_zone,
            state: self.state,
            map_public_ip_on_launch: self.map_public_ip_on_launch.unwrap_or(false),
            available_ip_address_count: self.available_ip_address_count,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRoute {
    #[serde(default, deserialize_with = "lenient")]
    destination_cidr_block: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    destination_ipv6_cidr_block: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    destination_prefix_list_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    gateway_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    nat_gateway_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    network_interface_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    state: Option<String>,
}

impl From<RawRoute> for RouteEntry {
    fn from(r: RawRoute) -> Self {
        RouteEntry {
            destination: RouteDestination::from_fields(
                r.destination_cidr_block,
                r.destination_ipv6_cidr_block,
                r.destination_prefix_list_id,
            ),
            target: RouteTarget::from_fields(r.gateway_id, r.nat_gateway_id, r.network_interface_id),
            state: r.state,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRouteTable {
    route_table_id: Option<String>,
    vpc_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    routes: Option<Vec<RawRoute>>,
    #[serde(default, deserialize_with = "lenient_list")]
    associations: Option<Vec<RawAssociation>>,
    #[serde(default, deserialize_with = "lenient_list")]
    tags: Option<Vec<RawTag>>,
}

impl RawRecord for RawRouteTable {
    type Output = RouteTable;
    const ID_FIELD: &'static str = "RouteTableId";

    fn into_record(self) -> Result<RouteTable, &'static str> {
        Ok(RouteTable {
            id: required(self.route_table_id, Self::ID_FIELD)?,
            vpc_id: required(self.vpc_id, "VpcId")?,
            tags: tags(self.tags),
            routes: self
                .routes
                .unwrap_or_default()
                .into_iter()
                .map(RouteEntry::from)
                .collect(),
            associations: associations(self.associations),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawAcl {
    network_acl_id: Option<String>,
    vpc_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    is_default: Option<bool>,
    #[serde(default, deserialize_with = "lenient_list")]
    associations: Option<Vec<RawAssociation>>,
    #[serde(default, deserialize_with = "lenient_list")]
    entries: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient_list")]
    tags: Option<Vec<RawTag>>,
}

impl RawRecord for RawAcl {
    type Output = Acl;
    const ID_FIELD: &'static str = "NetworkAclId";

    fn into_record(self) -> Result<Acl, &'static str> {
        // ACL associations are always subnet bindings.
        let associations = associations(self.associations)
            .into_iter()
            .filter(|a| a.subnet_id().is_some())
            .collect();
        Ok(Acl {
            id: required(self.network_acl_id, Self::ID_FIELD)?,
            vpc_id: required(self.vpc_id, "VpcId")?,
            tags: tags(self.tags),
            is_default: self.is_default.unwrap_or(false),
            associations,
            entry_count: self.entries.map_or(0, |e| e.len()),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawPrivateIp {
    #[serde(default, deserialize_with = "lenient")]
    private_ip_address: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawIpAssociation {
    #[serde(default, deserialize_with = "lenient")]
    public_ip: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawInterface {
    network_interface_id: Option<String>,
    subnet_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    vpc_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    private_ip_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    private_ip_addresses: Option<Vec<RawPrivateIp>>,
    #[serde(default, deserialize_with = "lenient")]
    association: Option<RawIpAssociation>,
    #[serde(default, deserialize_with = "lenient")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    interface_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    tag_set: Option<Vec<RawTag>>,
    #[serde(default, deserialize_with = "lenient_list")]
    tags: Option<Vec<RawTag>>,
}

impl RawRecord for RawInterface {
    type Output = Interface;
    const ID_FIELD: &'static str = "NetworkInterfaceId";

    fn into_record(self) -> Result<Interface, &'static str> {
        let mut private_ips: Vec<String> = self
            .private_ip_addresses
            .unwrap_or_default()
            .into_iter()
            .filter_map(|ip| ip.private_ip_address)
            .collect();
        if private_ips.is_empty() {
            private_ips.extend(self.private_ip_address);
        }
        Ok(Interface {
            id: required(self.network_interface_id, Self::ID_FIELD)?,
            subnet_id: required(self.subnet_id, "SubnetId")?,
            vpc_id: self.vpc_id,
            tags: tags(self.tag_set.or(self.tags)),
            private_ips,
            public_ip: self.association.and_then(|a| a.public_ip),
            status: self.status,
            description: self.description,
            interface_type: self.interface_type,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawEndpoint {
    vpc_endpoint_id: Option<String>,
    vpc_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    vpc_endpoint_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    service_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    state: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    subnet_ids: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    route_table_ids: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    tags: Option<Vec<RawTag>>,
}

impl RawRecord for RawEndpoint {
    type Output = Endpoint;
    const ID_FIELD: &'static str = "VpcEndpointId";

    fn into_record(self) -> Result<Endpoint, &'static str> {
        Ok(Endpoint {
            id: required(self.vpc_endpoint_id, Self::ID_FIELD)?,
            vpc_id: required(self.vpc_id, "VpcId")?,
            tags: tags(self.tags),
            endpoint_type: self.vpc_endpoint_type,
            service_name: self.service_name,
            state: self.state,
            subnet_ids: self.subnet_ids.unwrap_or_default(),
            route_table_ids: self.route_table_ids.unwrap_or_default(),
        })
    }
}
