//! Command-line interface implementation for Inochi.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;


/// Command-line arguments structure for Inochi.
#[derive(Parser, Debug)]
#[command(author, version, about = "Inochi: gives life to new projects", long_about = None)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Instill Inochi into a directory by generating a new project
    Init(InitArgs),

    /// Show version information of an existing project
    Info(InfoArgs),
}

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Name of the new project
    #[arg(short, long, env = "INOCHI_PROJECT")]
    pub project: String,

    /// Package name, instead of the one derived from the project name
    #[arg(long, env = "INOCHI_PACKAGE")]
    pub package: Option<String>,

    /// Command that reconciles updated files.
    /// It receives the backup, the candidate and the current file as arguments.
    #[arg(short, long, env = "INOCHI_MERGER")]
    pub merger: Option<String>,

    /// Directory containing the templates, instead of the built-in ones
    #[arg(long, env = "INOCHI_TEMPLATES")]
    pub templates: Option<PathBuf>,

    /// Directory where the project will be generated
    #[arg(value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct InfoArgs {
    /// Directory of the project
    #[arg(value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument
                || e.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            {
                eprintln!("{}", e.render());
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
