//! GraphLoom command-line interface.
//!
//! Loads a triples file (or the bundled sample), materializes the graph,
//! optionally toggles node expansions, prints a summary, and exports views.

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use graphloom::{
    export, toggle_node, BuildOptions, GraphBuilder, GraphData, GraphStatistics, VisibilityMode,
};

#[derive(Parser, Debug)]
#[command(name = "graphloom", version, about = "Materialize triple data into an explorable graph")]
struct Args {
    /// Triple file to load (JSON-LD, RDF/XML, Turtle, N-Triples or CSV).
    /// Omit to load the bundled sample dataset.
    file: Option<PathBuf>,

    /// Start with only the root neighborhood visible instead of everything
    #[arg(long)]
    progressive: bool,

    /// Filtered-triple count at which the build switches to the chunked path
    #[arg(long, default_value_t = 10_000)]
    chunk_threshold: usize,

    /// Toggle this node id after building; repeatable, applied in order
    #[arg(long = "expand", value_name = "NODE_ID")]
    expand: Vec<String>,

    /// Write the graph structure as pretty JSON to this path
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Write a JSON-LD rendition of the graph to this path
    #[arg(long, value_name = "PATH")]
    jsonld: Option<PathBuf>,

    /// Write one Subject,Predicate,Object row per link to this path
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> graphloom::Result<()> {
    let mut graph = match &args.file {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            let triples = graphloom::parse_document(&content)?;
            println!("Parsed {} triples from {}", triples.len(), path.display());

            let visibility = if args.progressive {
                VisibilityMode::Progressive
            } else {
                VisibilityMode::Full
            };
            let options = BuildOptions {
                visibility,
                chunk_threshold: args.chunk_threshold,
                ..BuildOptions::default()
            };
            GraphBuilder::with_options(options)
                .on_progress(|progress| {
                    println!(
                        "  processed {} / {} triples ({} nodes)",
                        progress.processed_triples, progress.total_triples, progress.unique_nodes
                    );
                })
                .build(&triples)?
        }
        None => {
            println!("No input file given, loading the bundled sample");
            graphloom::bootstrap::sample_graph()
        }
    };

    for node_id in &args.expand {
        graph = toggle_node(&graph, node_id);
        println!("Toggled '{}' ({} nodes visible)", node_id, graph.metadata.visible_nodes);
    }

    print_summary(&graph);

    if let Some(path) = &args.json {
        fs::write(path, export::graph_to_json(&graph)?)?;
        println!("Wrote JSON to {}", path.display());
    }
    if let Some(path) = &args.jsonld {
        fs::write(path, export::graph_to_jsonld(&graph)?)?;
        println!("Wrote JSON-LD to {}", path.display());
    }
    if let Some(path) = &args.csv {
        fs::write(path, export::graph_to_csv(&graph))?;
        println!("Wrote CSV to {}", path.display());
    }

    Ok(())
}

fn print_summary(graph: &GraphData) {
    let stats = GraphStatistics::from_graph(graph);

    println!("\nGraph Summary");
    println!(
        "  Nodes: {} ({} subjects, {} objects)",
        stats.total_nodes, stats.subject_nodes, stats.object_nodes
    );
    println!(
        "  Relationships: {} ({} distinct labels)",
        stats.total_relationships, stats.unique_relationship_types
    );
    println!(
        "  Visible: {} of {} nodes{}",
        graph.metadata.visible_nodes,
        graph.metadata.total_nodes,
        if graph.metadata.has_more { " (more available)" } else { "" }
    );
    if graph.metadata.filtered_out_triples > 0 {
        println!("  Filtered out {} annotation triples", graph.metadata.filtered_out_triples);
    }

    let mut distribution: Vec<(&str, usize)> = stats
        .relationship_distribution
        .iter()
        .map(|(label, count)| (label.as_str(), *count))
        .collect();
    distribution.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    if !distribution.is_empty() {
        println!("  Top relationships:");
        for (label, count) in distribution.iter().take(5) {
            println!("    {:>5}  {}", count, label);
        }
    }
}
