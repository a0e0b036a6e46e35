//! Veneer CLI — synthesize and inspect object-oriented binding surfaces
//! for flat C APIs.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};

use veneer_cache::{Fingerprint, SurfaceCache};
use veneer_model::ApiManifest;
use veneer_surface::{render, synthesize_api, CollisionPolicy, Surface};

#[derive(Parser)]
#[command(name = "veneer", version, about = "Object-oriented binding surfaces for flat C APIs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize the binding surface from an API manifest
    Synth {
        /// Input `.api.toml` manifest
        #[arg(long)]
        manifest: PathBuf,
        /// Write the surface artifact as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
        /// Cache root: reuse the surface for this manifest's fingerprint if
        /// present, generate and publish it otherwise
        #[arg(long)]
        cache_root: Option<PathBuf>,
        /// Fail on method or property collisions instead of replacing
        #[arg(long)]
        fail_on_collision: bool,
    },
    /// Render the surface as generated source text
    Render {
        /// Input `.api.toml` manifest
        #[arg(long)]
        manifest: PathBuf,
        /// Fail on method or property collisions instead of replacing
        #[arg(long)]
        fail_on_collision: bool,
    },
    /// Compute the cache fingerprint for an installation
    Fingerprint {
        /// Installation path (e.g. the path to llvm-config)
        installation: PathBuf,
        /// API version string
        version: String,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Synth {
            manifest,
            json,
            cache_root,
            fail_on_collision,
        } => {
            let surface = match cache_root {
                Some(root) => cached_surface(&root, &manifest, fail_on_collision)?,
                None => load_surface(&manifest, fail_on_collision)?,
            };
            if let Some(path) = json {
                let artifact = serde_json::to_string_pretty(&surface)?;
                std::fs::write(&path, artifact)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("wrote {}", path.display());
            }
            print_summary(&surface);
        }
        Commands::Render {
            manifest,
            fail_on_collision,
        } => {
            let surface = load_surface(&manifest, fail_on_collision)?;
            print!("{}", render(&surface));
        }
        Commands::Fingerprint {
            installation,
            version,
        } => {
            println!("{}", Fingerprint::compute(&installation, &version));
        }
    }
    Ok(())
}

fn load_surface(manifest: &Path, fail_on_collision: bool) -> anyhow::Result<Surface> {
    let manifest = ApiManifest::load(manifest)
        .with_context(|| format!("loading manifest {}", manifest.display()))?;
    let surface = synthesize_api(&manifest, policy_for(fail_on_collision))?;
    Ok(surface)
}

/// Synthesize through the cache: one surface per (manifest path, version)
/// fingerprint, reused verbatim when present.
fn cached_surface(
    root: &Path,
    manifest_path: &Path,
    fail_on_collision: bool,
) -> anyhow::Result<Surface> {
    let manifest = ApiManifest::load(manifest_path)
        .with_context(|| format!("loading manifest {}", manifest_path.display()))?;
    let fingerprint = Fingerprint::compute(manifest_path, &manifest.version);
    let cache = SurfaceCache::new(root.to_path_buf());
    let surface = cache.get_or_create(&fingerprint, || {
        synthesize_api(&manifest, policy_for(fail_on_collision))
    })?;
    Ok(surface)
}

fn policy_for(fail_on_collision: bool) -> CollisionPolicy {
    if fail_on_collision {
        CollisionPolicy::Fail
    } else {
        CollisionPolicy::Replace
    }
}

fn print_summary(surface: &Surface) {
    println!(
        "surface '{}': {} classes, {} methods, {} properties, {} iterators, {} globals",
        surface.api_name,
        surface.classes.values().filter(|c| !c.is_empty()).count(),
        surface.method_count(),
        surface.property_count(),
        surface.iterator_count(),
        surface.globals.len()
    );
    for class in surface.classes.values() {
        if class.is_empty() {
            continue;
        }
        println!(
            "  {}: {} methods, {} properties, {} iterators",
            class.owner_type,
            class.methods.len(),
            class.properties.len(),
            class.iterators.len()
        );
    }
}
