use std::fmt;
use std::net::IpAddr;

use winnow::prelude::*;
use winnow::ascii::dec_uint;
use winnow::combinator::{alt, eof, terminated};
use winnow::token::{take_till, take_while};

/// Rendered in place of a route target or destination that is not set.
pub const UNRESOLVED: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayKind {
    Internet,
    EgressOnlyInternet,
    VirtualPrivate,
    Local,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    Gateway { id: String, kind: GatewayKind },
    NatGateway(String),
    Interface(String),
    Unresolved,
}

impl RouteTarget {
    /// First present of gateway, NAT gateway, interface.
    pub fn from_fields(
        gateway_id: Option<String>,
        nat_gateway_id: Option<String>,
        network_interface_id: Option<String>,
    ) -> Self {
        if let Some(id) = non_blank(gateway_id) {
            let kind = gateway_kind(&id);
            RouteTarget::Gateway { id, kind }
        } else if let Some(id) = non_blank(nat_gateway_id) {
            RouteTarget::NatGateway(id)
        } else if let Some(id) = non_blank(network_interface_id) {
            RouteTarget::Interface(id)
        } else {
            RouteTarget::Unresolved
        }
    }

    pub fn is_internet_gateway(&self) -> bool {
        matches!(
            self,
            RouteTarget::Gateway {
                kind: GatewayKind::Internet,
                ..
            }
        )
    }

    pub fn reference(&self) -> &str {
        match self {
            RouteTarget::Gateway { id, .. } => id,
            RouteTarget::NatGateway(id) | RouteTarget::Interface(id) => id,
            RouteTarget::Unresolved => UNRESOLVED,
        }
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reference())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    pub addr: IpAddr,
    pub prefix_len: u8,
}

impl Cidr {
    pub fn parse(s: &str) -> Option<Cidr> {
        cidr.parse(s.trim()).ok()
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDestination {
    Cidr(Cidr),
    PrefixList(String),
    /// Present but not a recognisable CIDR; kept verbatim for display.
    Other(String),
    Unresolved,
}

impl RouteDestination {
    /// First present of IPv4 CIDR, IPv6 CIDR, prefix list.
    pub fn from_fields(
        ipv4_cidr: Option<String>,
        ipv6_cidr: Option<String>,
        prefix_list_id: Option<String>,
    ) -> Self {
        if let Some(raw) = non_blank(ipv4_cidr).or_else(|| non_blank(ipv6_cidr)) {
            match Cidr::parse(&raw) {
                Some(c) => RouteDestination::Cidr(c),
                None => RouteDestination::Other(raw),
            }
        } else if let Some(id) = non_blank(prefix_list_id) {
            if is_prefix_list(&id) {
                RouteDestination::PrefixList(id)
            } else {
                RouteDestination::Other(id)
            }
        } else {
            RouteDestination::Unresolved
        }
    }
}

impl fmt::Display for RouteDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteDestination::Cidr(c) => write!(f, "{c}"),
            RouteDestination::PrefixList(id) | RouteDestination::Other(id) => f.write_str(id),
            RouteDestination::Unresolved => f.write_str(UNRESOLVED),
        }
    }
}

/// Kind of gateway named by a route's gateway reference.
///
/// Only the `<prefix>-` head is looked at; whatever follows the dash is
/// the gateway's own business.
pub fn gateway_kind(id: &str) -> GatewayKind {
    let mut input = id.trim();
    gateway_ref(&mut input).unwrap_or(GatewayKind::Other)
}

/// Splits `igw-0abc` into (`igw`, `0abc`).
pub fn parse_resource_id(id: &str) -> Option<(&str, &str)> {
    resource_id.parse(id).ok()
}

fn is_prefix_list(id: &str) -> bool {
    matches!(parse_resource_id(id), Some(("pl", _)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn gateway_ref(input: &mut &str) -> winnow::Result<GatewayKind> {
    alt((
        terminated("local", eof).value(GatewayKind::Local),
        resource_prefix.map(|prefix| match prefix {
            "igw" => GatewayKind::Internet,
            "eigw" => GatewayKind::EgressOnlyInternet,
            "vgw" => GatewayKind::VirtualPrivate,
            _ => GatewayKind::Other,
        }),
    ))
    .parse_next(input)
}

fn resource_id<'s>(input: &mut &'s str) -> winnow::Result<(&'s str, &'s str)> {
    (resource_prefix, resource_suffix).parse_next(input)
}

fn resource_prefix<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    terminated(take_while(1.., |c: char| c.is_ascii_lowercase()), "-").parse_next(input)
}

fn resource_suffix<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric()).parse_next(input)
}

fn cidr(input: &mut &str) -> winnow::Result<Cidr> {
    let addr = take_till(1.., '/')
        .try_map(|s: &str| s.parse::<IpAddr>())
        .parse_next(input)?;
    "/".parse_next(input)?;
    let max = if addr.is_ipv4() { 32 } else { 128 };
    let prefix_len = dec_uint::<_, u8, _>
        .verify(|len: &u8| *len <= max)
        .parse_next(input)?;
    Ok(Cidr { addr, prefix_len })
}
