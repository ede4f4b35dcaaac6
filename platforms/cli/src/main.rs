use clap::Parser;
use std::fs;
use std::path::Path;
use tmfold::loader::TableLoader;
use tmfold::tables::TableManager;
use tmfold::{convert, decode_tape, encode_tape, estimate, export, Table};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Source transition table file to reduce
    #[clap(required_unless_present = "sample", conflicts_with = "sample")]
    table: Option<String>,

    /// Use an embedded sample table by name instead of a file
    #[clap(short, long)]
    sample: Option<String>,

    /// Target alphabet size to reduce to
    #[clap(short, long, default_value_t = 2)]
    target: usize,

    /// Original-alphabet tape to translate into the reduced alphabet
    #[clap(short, long)]
    input: Option<String>,

    /// Reduced-alphabet tape to translate back
    #[clap(short, long)]
    conv: Option<String>,

    /// Directory to write nodes.tsv and edges.tsv of the original table
    #[clap(short, long)]
    graph: Option<String>,

    /// Only print the synthesized rules
    #[clap(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let table = match (&cli.table, &cli.sample) {
        (Some(path), _) => TableLoader::load_table(Path::new(path)).unwrap(),
        (None, Some(name)) => TableManager::by_name(name).unwrap(),
        (None, None) => unreachable!("clap enforces a table source"),
    };

    let reduction = convert(&table, cli.target).unwrap();

    if !cli.quiet {
        print_report(&table, &reduction, cli.target);
    }

    println!("{}", reduction.render());

    if let Some(dir) = &cli.graph {
        let graph = export(&table);
        let dir = Path::new(dir);
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("nodes.tsv"), graph.render_nodes() + "\n").unwrap();
        fs::write(dir.join("edges.tsv"), graph.render_edges() + "\n").unwrap();
    }

    if let Some(tape) = &cli.input {
        println!("\nTAPE {}", encode_tape(reduction.dictionary(), tape).unwrap());
    }

    if let Some(tape) = &cli.conv {
        println!(
            "\nCONVERT BACK {}",
            decode_tape(reduction.dictionary(), tape).unwrap()
        );
    }
}

fn print_report(table: &Table, reduction: &tmfold::Reduction, target: usize) {
    let (states, symbols, halts) = table.stats();
    let expected_rules = estimate(states, symbols, halts, target);

    println!(
        "This is a {} state, {} symbol machine with {} halt state(s).",
        states, symbols, halts
    );
    println!(
        "To convert to a {} symbol machine we can expect a ({}, {}) result.",
        target, expected_rules, target
    );

    println!("\nTarget word size: {} symbols", reduction.width());

    let (reads, writes, moves) = table.class_counts();
    let expected = [
        ("reads", states * symbols),
        ("writes", states * symbols),
        ("moves", 2 * states + halts),
    ];

    println!();
    println!("\tExpected\tActual");
    for ((label, predicted), actual) in expected.iter().zip([reads, writes, moves]) {
        println!("{}\t{}\t{}", label, predicted, actual);
    }

    println!("\nDICT");
    for (symbol, code) in reduction.dictionary().iter() {
        println!("{} -> {}", symbol, code);
    }
    println!();
}
