use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::config::{load_config, load_input, resolve_config_path, GeneratorConfig};
use crate::generator::{
    build_registry, default_template_names, default_template_source, generate,
    generate_with_writer, MemoryWriter,
};

/// Command-line interface for openapi-typegen
#[derive(Parser)]
#[command(name = "openapi-typegen")]
#[command(about = "Generate Rust types from normalized API definitions", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate type and operation units from a definitions document
    Generate {
        /// Path to the definitions document (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the generator config (typegen.toml)
        /// If not provided, will auto-detect alongside the input
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target directory; units are written to <OUTPUT>/<PACKAGE_NAME>/
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Name of the generated module
        #[arg(long)]
        package_name: Option<String>,

        /// Directory of template override files (<name>.rs.j2)
        #[arg(long)]
        template_dir: Option<PathBuf>,

        /// Disable type generation; no units are written
        #[arg(long, default_value_t = false)]
        skip_types: bool,

        /// Run rustfmt over the written units
        #[arg(long, default_value_t = false)]
        format: bool,

        /// Render everything and list the units without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Inspect the built-in templates
    Templates {
        #[command(subcommand)]
        command: TemplateCommands,
    },
}

/// `templates` subcommands
#[derive(Subcommand)]
pub enum TemplateCommands {
    /// List the names of the built-in templates
    List,
    /// Print the source of a built-in template
    Show {
        /// Template name (see `templates list`)
        name: String,
    },
}

/// Parse the process arguments and execute the command, printing to stdout
///
/// # Errors
///
/// Returns an error if:
/// - An explicit `--config` path does not exist
/// - The config or definitions document cannot be read or parsed
/// - A template override does not parse or names an unknown template
/// - Rendering or writing any unit fails
/// - rustfmt fails when `--format` is given
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    execute(&cli, &mut stdout.lock())
}

/// Execute `cli`, writing command output to `out`
pub fn execute(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Generate {
            input,
            config,
            output,
            package_name,
            template_dir,
            skip_types,
            format,
            dry_run,
        } => {
            let mut generator_config = match resolve_config_path(config.as_deref(), input)? {
                Some(path) => load_config(&path)?.unwrap_or_default(),
                None => GeneratorConfig::default(),
            };
            if let Some(output) = output {
                generator_config.target_dir = output.clone();
            }
            if let Some(name) = package_name {
                generator_config.package_name = name.clone();
            }
            if let Some(dir) = template_dir {
                generator_config.template_dir = Some(dir.clone());
            }
            if *skip_types {
                generator_config.generate_types = false;
            }
            if *format {
                generator_config.format = true;
            }

            let definitions = load_input(input)?;

            if *dry_run {
                let registry = build_registry(&generator_config)?;
                let writer = MemoryWriter::new();
                generate_with_writer(&generator_config, &definitions, &registry, &writer)?;
                let out_dir = generator_config.output_dir();
                for unit in writer.unit_names() {
                    writeln!(out, "{}", out_dir.join(format!("{unit}.rs")).display())?;
                }
                return Ok(());
            }

            let report = generate(&generator_config, &definitions)?;
            info!(
                output = %generator_config.output_dir().display(),
                units = report.units().count(),
                "wrote generated units"
            );
            Ok(())
        }
        Commands::Templates { command } => match command {
            TemplateCommands::List => {
                for name in default_template_names() {
                    writeln!(out, "{name}")?;
                }
                Ok(())
            }
            TemplateCommands::Show { name } => {
                let source = default_template_source(name)
                    .with_context(|| format!("unknown template '{name}'"))?;
                out.write_all(source.as_bytes())?;
                Ok(())
            }
        },
    }
}
