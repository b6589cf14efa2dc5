use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use terrain_generator::hydrology::HydrologyReport;
use terrain_generator::{config, generate, Biome, GenerationContext};

#[derive(Parser, Debug)]
#[command(name = "terrain_generator")]
#[command(about = "Generate procedural terrain with resources, rivers and lakes")]
struct Args {
    /// Width of the grid in cells
    #[arg(short = 'W', long, default_value = "128")]
    width: usize,

    /// Height of the grid in cells
    #[arg(short = 'H', long, default_value = "128")]
    height: usize,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Biome preset (e.g. plains, dark-forest, islands)
    #[arg(short, long)]
    biome: Option<Biome>,

    /// JSON file with generation parameters; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base tree density before the biome multiplier
    #[arg(long)]
    tree_density: Option<f64>,

    /// Fraction of high ground that spawns rivers (0 disables hydrology)
    #[arg(long)]
    river_density: Option<f64>,

    /// Crystal patch threshold (0.0-1.0)
    #[arg(long)]
    crystal_threshold: Option<f64>,

    /// Stone patch threshold (0.0-1.0)
    #[arg(long)]
    stone_threshold: Option<f64>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

/// Build the run context: config file (or defaults), then CLI overrides.
fn build_context(args: &Args) -> Result<GenerationContext, Box<dyn std::error::Error>> {
    let file = match &args.config {
        Some(path) => config::load_file(path)?,
        None => config::ContextFile::default(),
    };
    let mut context = file.into_context(args.seed);

    if let Some(biome) = args.biome {
        context.biome = biome;
    }
    if let Some(density) = args.tree_density {
        context.tree_density = density;
    }
    if let Some(density) = args.river_density {
        context.river_density = density;
    }
    if let Some(threshold) = args.crystal_threshold {
        context.crystal_threshold = threshold;
    }
    if let Some(threshold) = args.stone_threshold {
        context.stone_threshold = threshold;
    }

    context.validate()?;
    Ok(context)
}

fn print_hydrology(report: &HydrologyReport) {
    println!("Hydrology:");
    println!("  Sources above threshold: {}", report.sources);
    println!(
        "  Rivers: {} (target {}), tributaries: {}",
        report.river_count(),
        report.target_rivers,
        report.tributary_count()
    );
    println!("  River cells: {}", report.river_cells);
    println!("  Lakes: {} ({} cells)", report.lakes, report.lake_cells);
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let context = match build_context(&args) {
        Ok(context) => context,
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    };

    println!("Generating terrain with seed: {}", context.seed);
    println!("Biome: {}", context.biome.display_name());
    println!("Map size: {}x{}", args.width, args.height);

    let world = match generate(args.width, args.height, &context) {
        Ok(world) => world,
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    };

    println!();
    println!("{}", world.stats());

    let water = &world.water_levels;
    println!(
        "Water levels: {} deep, {} shallow, {} ice, {} sand ({} resources cleared)",
        water.deep_water, water.shallow_water, water.ice, water.sand, water.resources_cleared
    );

    match &world.hydrology {
        Some(report) => print_hydrology(report),
        None => println!("Hydrology: disabled (river density 0)"),
    }
}
