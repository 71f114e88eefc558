use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "hearth",
    about = "Hearth — happiness-maximizing homestead assignment",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan housing for homeless villagers without changing the snapshot
    Plan {
        /// Village snapshot (.json or .toml)
        #[arg(short, long)]
        snapshot: String,
        /// Config file (default: ./hearth.toml if present)
        #[arg(short, long)]
        config: Option<String>,
        /// Only house the newest homeless villager
        #[arg(long)]
        newest: bool,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Plan and apply housing, then write the updated snapshot
    Assign {
        #[arg(short, long)]
        snapshot: String,
        #[arg(short, long)]
        config: Option<String>,
        #[arg(long)]
        newest: bool,
        /// Where to write the result (default: overwrite the snapshot)
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Show total, used, and free beds
    Beds {
        #[arg(short, long)]
        snapshot: String,
        #[arg(short, long)]
        config: Option<String>,
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Make every villager homeless
    Release {
        #[arg(short, long)]
        snapshot: String,
        #[arg(short, long)]
        config: Option<String>,
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Manage hearth.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a hearth.toml with every option at its default
    Init {
        #[arg(short, long, default_value = ".")]
        path: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hearth=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { snapshot, config, newest, format } => {
            commands::plan::plan(&snapshot, config.as_deref(), newest, &format)
        }
        Commands::Assign { snapshot, config, newest, out } => {
            commands::village::assign(&snapshot, config.as_deref(), newest, out.as_deref())
        }
        Commands::Beds { snapshot, config, format } => {
            commands::village::beds(&snapshot, config.as_deref(), &format)
        }
        Commands::Release { snapshot, config, out } => {
            commands::village::release(&snapshot, config.as_deref(), out.as_deref())
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { path } => commands::config::init(&path),
        },
    }
}
