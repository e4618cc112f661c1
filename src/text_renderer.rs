use crate::builder::BuildOutput;
use crate::display_width::{column_widths, pad_right};
use crate::graph::{Node, TopologyGraph};
use crate::resource::Category;

const INDENT: &str = "  ";
const COLUMN_GAP: &str = "  ";

pub struct TextOptions {
    pub details: bool,
    pub diagnostics: bool,
}

pub fn render(output: &BuildOutput, options: &TextOptions) -> String {
    let graph = &output.graph;
    let mut lines: Vec<String> = Vec::new();

    if graph.nodes().is_empty() {
        lines.push("no resources found".to_string());
    }

    let rows: Vec<Vec<String>> = graph.nodes().iter().map(node_row).collect();
    let widths = column_widths(&rows);

    for category in Category::ALL {
        let members: Vec<(usize, &Node)> = graph
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.category == category)
            .collect();
        if members.is_empty() {
            continue;
        }
        lines.push(format!("{} ({})", category.title(), members.len()));
        for (i, node) in members {
            lines.push(format!("{INDENT}{}", format_row(&rows[i], &widths)));
            if options.details {
                for detail in node.detail.lines() {
                    lines.push(format!("{INDENT}{INDENT}{detail}"));
                }
            }
        }
    }

    if !graph.edges().is_empty() {
        lines.push(format!("Edges ({})", graph.edges().len()));
        lines.extend(edge_lines(graph));
    }

    if options.diagnostics && !output.diagnostics.is_empty() {
        lines.push(format!("Diagnostics ({})", output.diagnostics.len()));
        for d in &output.diagnostics {
            lines.push(format!("{INDENT}[{}] {d}", d.kind.as_str()));
        }
    }

    lines
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

fn node_row(node: &Node) -> Vec<String> {
    let label = if node.label == node.id {
        String::new()
    } else {
        node.label.clone()
    };
    let reachability = node
        .reachability
        .map(|r| r.as_str().to_string())
        .unwrap_or_default();
    vec![node.id.clone(), label, reachability]
}

fn format_row(row: &[String], widths: &[usize]) -> String {
    row.iter()
        .zip(widths)
        .map(|(cell, &w)| pad_right(cell, w))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
}

fn edge_lines(graph: &TopologyGraph) -> Vec<String> {
    let rows: Vec<Vec<&str>> = graph
        .edges()
        .iter()
        .map(|e| vec![e.from.as_str(), "---", e.to.as_str()])
        .collect();
    let widths = column_widths(&rows);
    graph
        .edges()
        .iter()
        .zip(&rows)
        .map(|(edge, row)| {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| pad_right(cell, w))
                .collect();
            let mut line = format!("{INDENT}{}", cells.join(" "));
            if graph.is_dangling(edge) {
                line.push_str("  (dangling)");
            }
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn output(value: serde_json::Value) -> BuildOutput {
        build(&serde_json::from_value(value).unwrap())
    }

    fn plain() -> TextOptions {
        TextOptions {
            details: false,
            diagnostics: true,
        }
    }

    #[test]
    fn render_empty_snapshot() {
        assert_eq!(render(&BuildOutput::default(), &plain()), "no resources found");
    }

    #[test]
    fn render_groups_and_aligns() {
        let out = output(json!({
            "Vpcs": [{"VpcId": "vpc-1", "Tags": [{"Key": "Name", "Value": "prod"}]}],
            "Subnets": [{"SubnetId": "subnet-1", "VpcId": "vpc-1"}]
        }));
        let expected = "\
VPC (1)
  vpc-1     prod
Subnet (1)
  subnet-1        private
Edges (1)
  vpc-1 --- subnet-1";
        assert_eq!(render(&out, &plain()), expected);
    }

    #[test]
    fn render_marks_dangling_edges() {
        let out = output(json!({"Subnets": [{"SubnetId": "subnet-1", "VpcId": "vpc-x"}]}));
        let text = render(&out, &plain());
        assert!(text.contains("vpc-x --- subnet-1  (dangling)"), "got:\n{text}");
    }

    #[test]
    fn render_details_and_diagnostics() {
        let out = output(json!({
            "Vpcs": [{"VpcId": "vpc-1", "CidrBlock": "10.0.0.0/16"}],
            "Subnets": [{"SubnetId": "subnet-1"}]
        }));
        let options = TextOptions {
            details: true,
            diagnostics: true,
        };
        let text = render(&out, &options);
        assert!(text.contains("    CIDR: 10.0.0.0/16"), "got:\n{text}");
        assert!(text.contains("Diagnostics (1)"), "got:\n{text}");
        assert!(text.contains("[missing_required_field] subnet subnet-1"), "got:\n{text}");

        let quiet = TextOptions {
            details: false,
            diagnostics: false,
        };
        assert!(!render(&out, &quiet).contains("Diagnostics"));
    }
}
