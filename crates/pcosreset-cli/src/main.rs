use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pcosreset-cli", version, about = "PCOS Reset funnel CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the onboarding quiz
    Quiz {
        #[command(subcommand)]
        action: commands::quiz::QuizAction,
    },
    /// BMI, goal projection and unit conversion
    Metrics {
        #[command(subcommand)]
        action: commands::metrics::MetricsAction,
    },
    /// Subscription plans and Stripe checkout
    Checkout {
        #[command(subcommand)]
        action: commands::checkout::CheckoutAction,
    },
    /// Personalised meal plan generation
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Send the current answers to the lead table
    Submit,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// API keys for Stripe, the AI providers and Supabase
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Print a shell completion script
    Completions {
        shell: Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PCOSRESET_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Quiz { action } => commands::quiz::run(action),
        Commands::Metrics { action } => commands::metrics::run(action),
        Commands::Checkout { action } => commands::checkout::run(action),
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Submit => commands::submit::run(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pcosreset-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
