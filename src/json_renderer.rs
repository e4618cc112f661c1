use serde::Serialize;

use crate::builder::BuildOutput;
use crate::diagnostic::Diagnostic;
use crate::graph::{Edge, GraphStats, Node};

#[derive(Serialize)]
struct Document<'a> {
    nodes: &'a [Node],
    edges: &'a [Edge],
    diagnostics: &'a [Diagnostic],
    stats: GraphStats,
}

pub fn render(output: &BuildOutput) -> Result<String, serde_json::Error> {
    let document = Document {
        nodes: output.graph.nodes(),
        edges: output.graph.edges(),
        diagnostics: &output.diagnostics,
        stats: output.graph.stats(),
    };
    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    Ok(json)
}
