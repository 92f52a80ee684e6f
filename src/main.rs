use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ts_codegen::config::{load_config, merge_with_cli_args, Config};
use ts_codegen::generators::{Generator, GeneratorRegistry};
use ts_codegen::parsers::ParserRegistry;
use ts_codegen::{scan_inputs, ScanOptions};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Swagger / OpenAPI document to generate from (JSON or YAML), repeatable
    #[arg(short, long)]
    spec: Vec<PathBuf>,

    /// Output directory for generated code
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to config file (overrides default location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Prefix interfaces with `I` and type aliases with `T`
    #[arg(long)]
    type_with_prefix: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "ts_codegen=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configuration
    let config = load_config(args.config.as_deref())?;
    let config = merge_with_cli_args(config, args.spec, args.output, args.type_with_prefix);

    if config.data.is_empty() {
        anyhow::bail!("No input documents specified. Use --spec or list them under `data` in the config file");
    }

    let generator_registry = GeneratorRegistry::new();
    let generator = generator_registry.get(&config.generator).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown generator: {} (available: {})",
            config.generator,
            generator_registry.available_generators().join(", ")
        )
    })?;
    generator.validate_config(&config)?;

    fs::create_dir_all(&config.output)
        .with_context(|| format!("Failed to create output directory: {:?}", config.output))?;

    let parser_registry = ParserRegistry::new();

    // A broken document must not stop the rest of the batch
    let mut generated_count = 0;
    for source in &config.data {
        match generate_document(source, &parser_registry, generator, &config) {
            Ok(output_path) => {
                println!("✅ Generated: {:?}", output_path);
                generated_count += 1;
            }
            Err(err) => error!("Skipping {:?}: {:#}", source, err),
        }
    }

    if generated_count == 0 {
        println!("⚠️  Nothing was generated. Check the input documents.");
    } else {
        println!("🎉 Successfully generated {} file(s)!", generated_count);
    }

    Ok(())
}

fn generate_document(
    source: &Path,
    parsers: &ParserRegistry,
    generator: &dyn Generator,
    config: &Config,
) -> Result<PathBuf> {
    println!("📖 Reading input from: {:?}", source);

    let parser = parsers
        .detect(source)
        .ok_or_else(|| anyhow::anyhow!("Unsupported input file: {:?}", source))?;

    let inputs = parser
        .parse(source)
        .with_context(|| format!("Failed to parse {:?}", source))?;

    let scan = scan_inputs(
        inputs,
        ScanOptions {
            type_with_prefix: config.type_with_prefix,
        },
    );

    println!(
        "🔍 Resolved {} declarations from {} schemas",
        scan.registry.get_declarations().len(),
        scan.inputs.schemas.len()
    );

    let output = generator
        .generate(&scan.inputs, &scan.registry, config)
        .with_context(|| format!("Failed to generate with '{}'", generator.name()))?;

    let output_path = config.output.join(&output.filename);
    fs::write(&output_path, output.content)
        .with_context(|| format!("Failed to write output file: {:?}", output_path))?;

    Ok(output_path)
}
