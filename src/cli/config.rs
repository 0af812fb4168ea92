//! Command line configuration

use std::{num::NonZeroUsize, path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand, ValueEnum};

use kopi_prima::{
    cart::{DEFAULT_SHIPPING_COST, DEFAULT_WEIGHT_GRAMS},
    catalog::DEFAULT_PAGE_SIZE,
    settings::StorefrontSettings,
    sources::DEFAULT_API_URL,
};

/// Kopi Prima storefront
#[derive(Debug, Parser)]
#[command(name = "kopi-prima", about = "Kopi Prima storefront", long_about = None)]
pub struct StorefrontConfig {
    /// Products API endpoint
    #[arg(long, env = "KOPI_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Read products from a YAML or JSON file instead of the API
    #[arg(long, env = "KOPI_FIXTURE")]
    pub fixture: Option<PathBuf>,

    /// File holding the cart and login state
    #[arg(long, env = "KOPI_STORAGE", default_value = ".kopi-prima.json")]
    pub storage: PathBuf,

    /// Products per page
    #[arg(long, env = "KOPI_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: NonZeroUsize,

    /// Flat shipping charge in rupiah
    #[arg(long, env = "KOPI_SHIPPING_COST", default_value_t = DEFAULT_SHIPPING_COST)]
    pub shipping_cost: u64,

    /// Pause before an accepted checkout is placed, in milliseconds
    #[arg(long, env = "KOPI_CHECKOUT_DELAY_MS", default_value_t = 1500)]
    pub checkout_delay_ms: u64,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Command,
}

impl StorefrontConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Library settings derived from the flags.
    pub fn settings(&self) -> StorefrontSettings {
        StorefrontSettings {
            page_size: self.page_size,
            shipping_cost: self.shipping_cost,
            checkout_delay: Duration::from_millis(self.checkout_delay_ms),
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Storefront commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List products
    Browse(BrowseArgs),

    /// Show one product
    Details {
        /// Product id
        id: u64,
    },

    /// Suggest search terms
    Suggest {
        /// Partial search text
        query: String,
    },

    /// Show or change the cart
    #[command(subcommand)]
    Cart(CartCommand),

    /// Place an order for the cart
    Checkout,

    /// Sign in
    Login,

    /// Sign out
    Logout,
}

/// Catalog view flags.
#[derive(Debug, Default, Args)]
pub struct BrowseArgs {
    /// Category, or "all"
    #[arg(short, long)]
    pub category: Option<String>,

    /// Search text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Origin to include; repeat for several
    #[arg(long)]
    pub origin: Vec<String>,

    /// Roast level to include; repeat for several
    #[arg(long)]
    pub roast: Vec<String>,

    /// Process to include; repeat for several
    #[arg(long)]
    pub process: Vec<String>,

    /// Sort order (default, price-low, price-high, name-asc, name-desc, popular)
    #[arg(long)]
    pub sort: Option<String>,

    /// Page number
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,
}

/// Cart commands
#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart
    Show,

    /// Add a product
    Add {
        /// Product id
        id: u64,

        /// Weight in grams
        #[arg(short, long, default_value_t = DEFAULT_WEIGHT_GRAMS)]
        weight: u32,

        /// Number of units
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Change the quantity of a line; zero removes it
    Set {
        /// Line number as shown by `cart show`
        line: NonZeroUsize,

        /// New quantity
        quantity: u32,
    },

    /// Remove a line
    Remove {
        /// Line number as shown by `cart show`
        line: NonZeroUsize,
    },

    /// Empty the cart
    Clear,
}
