mod cmd;
mod http;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "grind",
    about = "Cooldown-driven game character automation: routines, manual actions, and status",
    version,
    propagate_version = true
)]
struct Cli {
    /// Base URL of a running grind server
    #[arg(long, global = true, env = "GRIND_SERVER", default_value = "http://localhost:4180")]
    server: String,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the automation server
    Serve {
        /// Config file (YAML)
        #[arg(long, env = "GRIND_CONFIG")]
        config: Option<PathBuf>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// List all account characters
    Characters,

    /// Show a character's state and active routine
    Status { name: String },

    /// Move a character to a map position
    Move { name: String, x: i32, y: i32 },

    /// Start a gathering routine
    Gather {
        name: String,

        /// Resource to harvest
        #[arg(long, value_enum)]
        resource: ResourceArg,

        /// Stop after this many minutes (unbounded when omitted)
        #[arg(long)]
        minutes: Option<u64>,
    },

    /// Start a fighting routine
    Fight {
        name: String,

        /// Monster to hunt
        #[arg(long, value_enum)]
        monster: MonsterArg,

        /// Stop after this many minutes (unbounded when omitted)
        #[arg(long)]
        minutes: Option<u64>,
    },

    /// Cancel a character's active routine
    Cancel { name: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceArg {
    Copper,
    Gold,
    AshTree,
}

impl ResourceArg {
    fn wire(self) -> &'static str {
        match self {
            Self::Copper => "copper",
            Self::Gold => "gold",
            Self::AshTree => "ash_tree",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MonsterArg {
    Chicken,
    Cow,
    GreenSlime,
}

impl MonsterArg {
    fn wire(self) -> &'static str {
        match self {
            Self::Chicken => "chicken",
            Self::Cow => "cow",
            Self::GreenSlime => "green_slime",
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let server = cli.server.as_str();
    let result = match cli.command {
        Commands::Serve { config, port } => cmd::serve::run(config.as_deref(), port),
        Commands::Characters => cmd::characters::run(server, cli.json),
        Commands::Status { name } => cmd::status::run(server, &name, cli.json),
        Commands::Move { name, x, y } => cmd::move_to::run(server, &name, x, y, cli.json),
        Commands::Gather {
            name,
            resource,
            minutes,
        } => cmd::routine::start(server, &name, "gather", "resource", resource.wire(), minutes, cli.json),
        Commands::Fight {
            name,
            monster,
            minutes,
        } => cmd::routine::start(server, &name, "fight", "monster", monster.wire(), minutes, cli.json),
        Commands::Cancel { name } => cmd::routine::cancel(server, &name, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
