use anyhow::Result;
use clap::Parser;
use opencurrencyx::commands::{self, ClientOptions, Config};
use opencurrencyx::runtime::RealRuntime;

/// ocx - OpenCurrencyX command line client
///
/// Query exchange rates, convert amounts and look up historical rates.
///
/// The API base URL is taken from --api, then the OCX_API environment
/// variable, then http://localhost:3000/api/v1.
///
/// Examples:
///   ocx convert USD EUR 100     # Convert 100 US dollars to euros
///   ocx rates EUR --fast        # Show euro rates, from cache when fresh
#[derive(Parser, Debug)]
#[command(name = "ocx", author, version = env!("OCX_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL (also via OCX_API)
    #[arg(long = "api", short = 'a', value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Per-attempt request timeout in seconds (default 5)
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Additional attempts after a failed request (default 2)
    #[arg(long, value_name = "N", global = true)]
    pub retries: Option<usize>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Convert an amount between currencies
    Convert(ConvertArgs),

    /// Show rates for a base currency
    Rates(RatesArgs),

    /// List supported currencies
    Currencies(CurrenciesArgs),

    /// Show historical rates for a base currency
    History(HistoryArgs),

    /// Show API status
    Status,
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Source currency
    #[arg(value_name = "FROM")]
    pub from: String,

    /// Target currency
    #[arg(value_name = "TO")]
    pub to: String,

    /// Amount to convert
    #[arg(value_name = "AMOUNT")]
    pub amount: f64,

    /// Use cached data if available
    #[arg(long)]
    pub fast: bool,
}

#[derive(clap::Args, Debug)]
pub struct RatesArgs {
    /// Base currency
    #[arg(value_name = "BASE", default_value = "USD")]
    pub base: String,

    /// Use cached data if available
    #[arg(long)]
    pub fast: bool,
}

#[derive(clap::Args, Debug)]
pub struct CurrenciesArgs {
    /// Use cached data if available
    #[arg(long)]
    pub fast: bool,
}

#[derive(clap::Args, Debug)]
pub struct HistoryArgs {
    /// Base currency
    #[arg(value_name = "BASE")]
    pub base: String,

    /// Date (YYYY-MM-DD)
    #[arg(value_name = "DATE")]
    pub date: String,

    /// Use cached data if available
    #[arg(long)]
    pub fast: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let options = ClientOptions {
        api_url: cli.api_url,
        timeout_secs: cli.timeout,
        retries: cli.retries,
    };
    let config = Config::new(RealRuntime, options)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Convert(args) => {
            commands::convert(&config, &args.from, &args.to, args.amount, args.fast, &mut out)
                .await?
        }
        Commands::Rates(args) => commands::rates(&config, &args.base, args.fast, &mut out).await?,
        Commands::Currencies(args) => commands::currencies(&config, args.fast, &mut out).await?,
        Commands::History(args) => {
            commands::history(&config, &args.base, &args.date, args.fast, &mut out).await?
        }
        Commands::Status => commands::status(&config, &mut out).await?,
    }
    Ok(())
}
