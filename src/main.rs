use clap::{Parser, Subcommand};

use meridian_cli::commands::{add, new_project, serve, test};
use meridian_cli::project::{PluginKind, ProjectKind};

#[derive(Parser)]
#[command(
    name = "meridian",
    version,
    about = "Meridian CLI — scaffold and manage Meridian projects"
)]
struct Cli {
    /// Suppress all console messages except errors
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new Meridian project
    New {
        /// Project type
        #[arg(value_name = "TYPE", value_enum)]
        kind: Option<ProjectKind>,
        /// Project name
        name: Option<String>,
        /// Skip installing dependencies
        #[arg(long)]
        skip_install: bool,
        /// Skip git initialization
        #[arg(long)]
        skip_git: bool,
        /// Never prompt; fail when required arguments are missing
        #[arg(long)]
        no_interactive: bool,
    },
    /// Add a plugin to the current app
    Add {
        /// Plugin type
        #[arg(value_name = "TYPE", value_enum)]
        kind: PluginKind,
        /// Plugin package reference, or a path under src/ with --local
        name: String,
        /// Prefix for all routes registered by a provider
        #[arg(long)]
        route_prefix: Option<String>,
        /// Plugin configuration as a JSON object
        #[arg(long)]
        config: Option<String>,
        /// Merge the configuration into the app root configuration
        #[arg(long)]
        add_to_root: bool,
        /// Skip installing the plugin package
        #[arg(long)]
        skip_install: bool,
        /// Register a plugin directory inside this project's src/
        #[arg(long)]
        local: bool,
    },
    /// Run tests in the current project
    Test,
    /// Run a Meridian server for the current project
    Serve {
        /// Port number of the server
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::New {
            kind,
            name,
            skip_install,
            skip_git,
            no_interactive,
        } => new_project::run(new_project::CliNewOpts {
            kind,
            name,
            skip_install,
            skip_git,
            no_interactive,
            quiet: cli.quiet,
        }),
        Commands::Add {
            kind,
            name,
            route_prefix,
            config,
            add_to_root,
            skip_install,
            local,
        } => add::run(
            kind,
            &name,
            add::CliAddOpts {
                route_prefix,
                config,
                add_to_root,
                skip_install,
                local,
                quiet: cli.quiet,
            },
        ),
        Commands::Test => test::run(cli.quiet),
        Commands::Serve { port } => serve::run(port, cli.quiet),
    };

    if let Err(e) = result {
        eprintln!("{}", colored::Colorize::red(format!("Error: {e}").as_str()));
        std::process::exit(1);
    }
}
