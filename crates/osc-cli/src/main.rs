mod schema_files;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use osc_core::config::{self, CONFIG_FILE_NAME, CollisionPolicy, ConstructOptions, OscConfig};
use osc_core::parse::{self, spec::OpenApiSpec};
use osc_core::transform;

#[derive(Parser)]
#[command(
    name = "osc",
    about = "Bundle OpenAPI 3.x documents with generated component schemas",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register JSON Schema files under components/schemas and write the result
    Bundle {
        /// Path to the OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file; `.json` writes JSON, anything else YAML. Stdout when unset
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON Schema file, or directory of them, to register
        #[arg(short, long = "schema")]
        schemas: Vec<PathBuf>,

        /// What to do when a schema name is already registered
        #[arg(long)]
        on_collision: Option<CollisionArg>,

        /// Prefix of the generated `$ref` pointers
        #[arg(long)]
        ref_prefix: Option<String>,
    },

    /// Validate an OpenAPI document and its component references
    Validate {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new osc configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CollisionArg {
    Overwrite,
    KeepExisting,
    Error,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::Overwrite => CollisionPolicy::Overwrite,
            CollisionArg::KeepExisting => CollisionPolicy::KeepExisting,
            CollisionArg::Error => CollisionPolicy::Error,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bundle {
            input,
            output,
            schemas,
            on_collision,
            ref_prefix,
        } => {
            let mut cfg = try_load_config()?.unwrap_or_default();
            if let Some(policy) = on_collision {
                cfg.construct.on_collision = policy.into();
            }
            if let Some(prefix) = ref_prefix {
                cfg.construct.ref_prefix = prefix;
            }
            cmd_bundle(input, output, schemas, cfg)
        }

        Commands::Validate { input } => cmd_validate(input),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "osc", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OscConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

fn load_document(path: &Path) -> Result<OpenApiSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let parsed = if is_json(path) {
        parse::from_json(&content)
    } else {
        parse::from_yaml(&content)
    };
    parsed.with_context(|| format!("failed to load {}", path.display()))
}

fn render_document(spec: &OpenApiSpec, output: Option<&Path>) -> Result<String> {
    let rendered = match output {
        Some(path) if is_json(path) => parse::to_json(spec)?,
        _ => parse::to_yaml(spec)?,
    };
    Ok(rendered)
}

fn bundle(
    input: &Path,
    schemas: &[PathBuf],
    options: &ConstructOptions,
    output: Option<&Path>,
) -> Result<String> {
    let open_api = load_document(input)?;
    let classes = schema_files::load_schema_classes(schemas)?;
    let bundled = transform::construct_with_options(&open_api, &classes, options)
        .with_context(|| format!("failed to construct {}", input.display()))?;
    transform::check_refs(&bundled)?;
    render_document(&bundled, output)
}

fn cmd_bundle(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    schemas: Vec<PathBuf>,
    cfg: OscConfig,
) -> Result<()> {
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output = output.or_else(|| cfg.output.as_ref().map(PathBuf::from));
    let schemas = if schemas.is_empty() {
        cfg.schemas.iter().map(PathBuf::from).collect()
    } else {
        schemas
    };

    let rendered = bundle(&input, &schemas, &cfg.construct, output.as_deref())?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Bundled {} → {}", input.display(), path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let parsed = load_document(&input)?;

    eprintln!(
        "Valid OpenAPI {} document: {}",
        parsed.openapi, parsed.info.title
    );
    eprintln!("  Version: {}", parsed.info.version);
    for server in &parsed.servers {
        eprintln!("  Server: {}", server.default_url());
    }
    eprintln!("  Paths: {}", parsed.paths.len());
    eprintln!("  Webhooks: {}", parsed.webhooks.len());

    if let Some(ref components) = parsed.components {
        eprintln!("  Schemas: {}", components.schemas.len());
    }

    transform::check_refs(&parsed)
        .with_context(|| format!("unresolved reference in {}", input.display()))?;

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
