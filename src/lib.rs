pub mod builder;
pub mod classifier;
pub mod decode;
pub mod detail;
pub mod diagnostic;
pub mod display_width;
pub mod error;
pub mod graph;
pub mod index;
pub mod json_renderer;
pub mod mermaid_renderer;
pub mod reference;
pub mod resource;
pub mod snapshot;
pub mod text_renderer;

pub use builder::{BuildOutput, GraphBuilder, build};
pub use classifier::{Reachability, RouteTableClassifier};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::Error;
pub use graph::{Edge, Node, TopologyGraph};
pub use index::ResourceIndex;
pub use mermaid_renderer::Direction;
pub use resource::Category;
pub use snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Mermaid,
    Json,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub direction: Direction,
    pub details: bool,
    pub diagnostics: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            direction: Direction::LeftRight,
            details: false,
            diagnostics: true,
        }
    }
}

pub fn render(input: &str) -> Result<String, Error> {
    render_with_options(input, &RenderOptions::default())
}

pub fn render_with_options(input: &str, options: &RenderOptions) -> Result<String, Error> {
    let snapshot = Snapshot::from_json(input)?;
    let output = build(&snapshot);
    render_output(&output, options)
}

pub fn render_output(output: &BuildOutput, options: &RenderOptions) -> Result<String, Error> {
    match options.format {
        OutputFormat::Text => {
            let text_options = text_renderer::TextOptions {
                details: options.details,
                diagnostics: options.diagnostics,
            };
            Ok(text_renderer::render(output, &text_options) + "\n")
        }
        OutputFormat::Mermaid => Ok(mermaid_renderer::render(&output.graph, options.direction)),
        OutputFormat::Json => Ok(json_renderer::render(output)?),
    }
}
