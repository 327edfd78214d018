//! Inochi's main application entry point and orchestration logic.
//! Handles command-line argument parsing and dispatches to the
//! scaffolding and project inspection flows.

use inochi::{
    cli::{get_args, Args, Commands, InfoArgs, InitArgs},
    config::Registry,
    error::{default_error_handler, Result},
    generate::{ConsoleNotifier, FileGenerator, WriteOutcome},
    logger::init_logger,
    project::Project,
    renderer::MiniJinjaRenderer,
    scaffold::{ProjectNames, Scaffold},
    template::TemplateEngine,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn run(args: Args) -> Result<()> {
    let mut registry = Registry::new();
    match args.command {
        Commands::Init(init) => run_init(init, &mut registry),
        Commands::Info(info) => run_info(info, &mut registry),
    }
}

/// Generates a new project.
///
/// # Flow
/// 1. Derives the library symbol and package name from the project name
/// 2. Resolves the new project's configuration
/// 3. Renders every scaffold template and writes it without clobbering
fn run_init(args: InitArgs, registry: &mut Registry) -> Result<()> {
    let names = ProjectNames::derive(&args.project, args.package.as_deref())?;

    let notifier = ConsoleNotifier;
    let renderer = MiniJinjaRenderer::new();
    let generator = FileGenerator::new(&notifier, args.merger);
    let engine = match args.templates {
        Some(template_dir) => TemplateEngine::new(template_dir, &renderer, &generator),
        None => TemplateEngine::with_default_templates(&renderer, &generator),
    };

    let outcomes = Scaffold::new(&engine, &args.output_dir).init(registry, &names)?;

    let updated = outcomes.iter().filter(|(_, o)| *o == WriteOutcome::Updated).count();
    if updated > 0 {
        log::info!("{updated} file(s) differ; review the .old and .new files next to them.");
    }
    Ok(())
}

/// Prints version information and authors of an existing project.
fn run_info(args: InfoArgs, registry: &mut Registry) -> Result<()> {
    let project = Project::load(&args.project_dir, registry)?;

    println!("{}", project.config.version_info());
    let authors = project.authors()?;
    if !authors.is_empty() {
        println!("authors:");
        for author in authors {
            if author.contact.is_empty() {
                println!("  - {}", author.name);
            } else {
                println!("  - {} <{}>", author.name, author.contact);
            }
        }
    }
    Ok(())
}
