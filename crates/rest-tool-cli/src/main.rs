use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;
use serde::Serialize;

use rest_tool_core::OasApi;
use rest_tool_core::config::{self, CONFIG_FILE_NAME, EndpointOverrides, RestToolConfig};
use rest_tool_core::services::ServiceRegistry;

#[derive(Parser)]
#[command(
    name = "rest-tool",
    about = "Inspect Swagger 2.0 / OpenAPI 3.0 specifications and mock service descriptors",
    version
)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "yaml")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the format, title and version of a specification
    Info(SpecArgs),

    /// List the servers of a specification
    Servers(SpecArgs),

    /// List the endpoints of a specification
    Endpoints {
        #[command(flatten)]
        spec: SpecArgs,

        /// Keep response examples
        #[arg(long)]
        include_examples: bool,

        /// Only static endpoints
        #[arg(long = "static", conflicts_with = "non_static")]
        static_only: bool,

        /// Only regular operations
        #[arg(long)]
        non_static: bool,
    },

    /// List the mock service descriptors
    Services(ServicesArgs),

    /// List every test case of every service
    TestCases(ServicesArgs),

    /// Initialize a new rest-tool configuration
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

#[derive(Args)]
struct SpecArgs {
    /// Path to the specification (YAML or JSON); defaults to the configured input
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(Args)]
struct ServicesArgs {
    /// Root directory of the REST API
    #[arg(long)]
    restapi_root: Option<PathBuf>,

    /// Directory of the service descriptors, relative to the REST API root
    #[arg(long)]
    services_root: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let format = cli.format;

    match cli.command {
        Commands::Info(spec) => cmd_info(spec, format),

        Commands::Servers(spec) => {
            let (api, _) = load_api(spec)?;
            print_output(&api.servers(), format)
        }

        Commands::Endpoints {
            spec,
            include_examples,
            static_only,
            non_static,
        } => cmd_endpoints(spec, include_examples, static_only, non_static, format),

        Commands::Services(args) => cmd_services(args, format),

        Commands::TestCases(args) => {
            let registry = load_registry(args)?;
            print_output(&registry.all_test_cases(), format)
        }

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "rest-tool", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn load_config() -> Result<RestToolConfig> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let config = config::load_config(&config_path)?;
    if config.is_none() {
        debug!("no {CONFIG_FILE_NAME} found, using defaults");
    }
    Ok(config.unwrap_or_default())
}

fn load_api(spec: SpecArgs) -> Result<(OasApi, RestToolConfig)> {
    let cfg = load_config()?;
    let input = spec.input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let api = OasApi::load(input.as_path(), &cfg.loader)
        .with_context(|| format!("failed to load {}", input.display()))?;
    Ok((api, cfg))
}

fn load_registry(args: ServicesArgs) -> Result<ServiceRegistry> {
    let cfg = load_config()?;
    let restapi_root = args
        .restapi_root
        .unwrap_or_else(|| PathBuf::from(&cfg.services.restapi_root));
    let services_root = args
        .services_root
        .unwrap_or_else(|| PathBuf::from(&cfg.services.services_root));
    ServiceRegistry::load(&restapi_root, &services_root).with_context(|| {
        format!(
            "failed to load services from {}",
            restapi_root.join(&services_root).display()
        )
    })
}

fn print_output<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(value)?;
            print!("{}", yaml);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn cmd_info(spec: SpecArgs, format: OutputFormat) -> Result<()> {
    let (api, _) = load_api(spec)?;
    let summary = serde_json::json!({
        "format": api.format().as_str(),
        "title": api.title().ok(),
        "version": api.version().ok(),
        "servers": api.servers().len(),
        "endpoints": api.endpoints(&Default::default()).len(),
    });
    print_output(&summary, format)
}

fn cmd_endpoints(
    spec: SpecArgs,
    include_examples: bool,
    static_only: bool,
    non_static: bool,
    format: OutputFormat,
) -> Result<()> {
    let (api, cfg) = load_api(spec)?;
    let overrides = EndpointOverrides {
        include_examples: include_examples.then_some(true),
    };
    let options = cfg.endpoints.merge(overrides);

    let endpoints = if static_only {
        api.static_endpoints(&options)
    } else if non_static {
        api.non_static_endpoints(&options)
    } else {
        api.endpoints(&options)
    };
    print_output(&endpoints, format)
}

fn cmd_services(args: ServicesArgs, format: OutputFormat) -> Result<()> {
    let registry = load_registry(args)?;
    let summary: Vec<serde_json::Value> = registry
        .services()
        .values()
        .map(|service| {
            serde_json::json!({
                "uriTemplate": service.uri_template,
                "name": service.name,
                "style": service.style,
                "methods": service.method_list,
                "contentPath": service.content_path,
            })
        })
        .collect();
    print_output(&summary, format)
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
