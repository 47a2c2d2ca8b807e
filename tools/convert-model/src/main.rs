use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use console::style;
use feature_nnf::{
    utils::{FeatureGraph, FeatureTree},
    ComplexConstraintConverter, ConverterOptions, FeatureModel, NnfConverter,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[clap(version, about = "Replaces the complex constraints of a feature model by structure")]
struct Opts {
    /// A feature model in JSON format.
    model: PathBuf,

    /// Tie positive literals to their features in both directions so that the
    /// set of valid configurations does not change.
    #[clap(long)]
    preserve: bool,

    /// Reject constraints nested deeper than this.
    #[clap(long)]
    max_depth: Option<usize>,

    /// Also write the converted model as graphviz to this file.
    #[clap(long)]
    graphviz: Option<PathBuf>,

    /// Print the converted model as JSON instead of as a tree.
    #[clap(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "feature_nnf=info".into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let file = File::open(&opts.model)
        .with_context(|| format!("cannot open {}", opts.model.display()))?;
    let model: FeatureTree = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not a valid feature model", opts.model.display()))?;

    let complex = ComplexConstraintConverter::<NnfConverter>::complex_constraints(&model);
    eprintln!(
        "{} {} feature(s), {} constraint(s), {} complex",
        style("loaded").bold().green(),
        model.feature_count(),
        model.constraint_count(),
        complex.len()
    );
    for &id in &complex {
        if let Some(constraint) = model.constraint(id) {
            eprintln!("  {}", style(constraint).dim());
        }
    }

    let options = ConverterOptions::new()
        .preserve(opts.preserve)
        .max_depth(opts.max_depth);
    let mut converter =
        ComplexConstraintConverter::with_strategy(NnfConverter::with_options(options));
    let result = converter.convert(&model)?;

    eprintln!(
        "{} {} feature(s), {} constraint(s)",
        style("converted").bold().green(),
        result.feature_count(),
        result.constraint_count()
    );

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.display());
    }

    if let Some(path) = opts.graphviz {
        let file = File::create(&path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        FeatureGraph::from_tree(&result).graphviz(&mut writer, &result)?;
        writer.flush()?;
        eprintln!("{} {}", style("wrote").bold().green(), path.display());
    }

    Ok(())
}
