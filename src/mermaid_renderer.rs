use std::collections::HashSet;

use crate::graph::{Node, TopologyGraph};
use crate::resource::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Direction {
    #[value(name = "td")]
    TopDown,
    #[default]
    #[value(name = "lr")]
    LeftRight,
}

impl Direction {
    fn keyword(self) -> &'static str {
        match self {
            Direction::TopDown => "TD",
            Direction::LeftRight => "LR",
        }
    }
}

const PUBLIC_ACCENT: &str = "stroke:#00C853,stroke-width:3px";
const EXTERNAL_STYLE: &str = "fill:#222222,stroke:#888888,stroke-dasharray:4 4,color:#FFFFFF";

pub fn render(graph: &TopologyGraph, direction: Direction) -> String {
    let mut lines = vec![format!("graph {}", direction.keyword())];

    for node in graph.nodes() {
        lines.push(format!(
            "    {}[\"{}\"]:::{}",
            mermaid_id(&node.id),
            escape(&node_label(node)),
            node.category.as_str()
        ));
    }

    let mut external: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for edge in graph.dangling_edges() {
        for end in [edge.from.as_str(), edge.to.as_str()] {
            if !graph.contains_node(end) && seen.insert(end) {
                external.push(end);
            }
        }
    }
    for id in &external {
        lines.push(format!("    {}[\"{}\"]:::external", mermaid_id(id), escape(id)));
    }

    for edge in graph.edges() {
        lines.push(format!("    {} --- {}", mermaid_id(&edge.from), mermaid_id(&edge.to)));
    }

    for category in Category::ALL {
        if graph.nodes_in(category).next().is_some() {
            lines.push(format!(
                "    classDef {} fill:{},stroke:#222222,color:#000000",
                category.as_str(),
                category.color()
            ));
        }
    }
    if !external.is_empty() {
        lines.push(format!("    classDef external {EXTERNAL_STYLE}"));
    }

    let public: Vec<String> = graph
        .nodes()
        .iter()
        .filter(|n| n.is_public_subnet())
        .map(|n| mermaid_id(&n.id))
        .collect();
    if !public.is_empty() {
        lines.push(format!("    classDef public {PUBLIC_ACCENT}"));
        lines.push(format!("    class {} public", public.join(",")));
    }

    lines.join("\n") + "\n"
}

fn node_label(node: &Node) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if node.label != node.id {
        parts.push(&node.label);
    }
    parts.push(&node.id);
    if let Some(r) = node.reachability {
        parts.push(r.as_str());
    }
    parts.join("<br/>")
}

/// Mermaid ids may only use word characters; `-` would read as a link.
///
/// Alphanumerics pass through, `_` doubles, anything else becomes
/// `_<hex code point>_`, so distinct resource ids never share a node.
pub fn mermaid_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for c in id.chars() {
        match c {
            c if c.is_ascii_alphanumeric() => out.push(c),
            '_' => out.push_str("__"),
            c => out.push_str(&format!("_{:x}_", u32::from(c))),
        }
    }
    out
}

fn escape(label: &str) -> String {
    label
        .replace('"', "#quot;")
        .replace("\r\n", "<br/>")
        .replace(['\n', '\r'], "<br/>")
}
