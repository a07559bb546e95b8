use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use shipinvoice::config::{
    config_dir, load_config, load_session, save_session, CargoItem, CONFIG_TEMPLATE,
};
use shipinvoice::error::{InvoiceError, Result};
use shipinvoice::invoice::format::{format_money, format_quantity};
use shipinvoice::invoice::{compute_line, generate_invoice, GenerateOptions, InvoiceTotals};
use shipinvoice::TypstRenderer;

#[derive(Parser)]
#[command(name = "shipinvoice")]
#[command(version, about = "Shipping invoice generator for weight-rated cargo", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config or ~/.shipinvoice)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Set the client the invoice is billed to
    Client {
        /// Full name
        #[arg(long)]
        name: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Street address
        #[arg(long)]
        address: Option<String>,

        /// Destination country
        #[arg(long)]
        country: Option<String>,
    },

    /// Add a cargo item to the cart
    Add {
        /// Item description
        description: String,

        /// Declared value of the goods
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        value: f64,

        /// Weight in kilograms
        #[arg(long, allow_negative_numbers = true)]
        weight: f64,

        /// Tax for this item
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        tax: f64,

        /// Charge the declared value to the customer
        #[arg(long)]
        charge: bool,
    },

    /// Remove every item from the cart
    Clear {
        /// Also forget the client details
        #[arg(long)]
        all: bool,
    },

    /// Show the cart with line totals
    Show {
        /// Currency: primary, secondary, or its label
        #[arg(long)]
        currency: Option<String>,

        /// Rate per kilogram (default: the currency's configured rate)
        #[arg(long, allow_negative_numbers = true)]
        rate: Option<f64>,
    },

    /// Generate the invoice PDF
    Generate {
        /// Currency: primary, secondary, or its label
        #[arg(long)]
        currency: Option<String>,

        /// Rate per kilogram (default: the currency's configured rate)
        #[arg(long, allow_negative_numbers = true)]
        rate: Option<f64>,

        /// Custom output file path (default: output_dir/Invoice_<client>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show configuration and session summary
    Status,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Client {
            name,
            phone,
            address,
            country,
        } => cmd_client(&cfg_dir, name, phone, address, country),
        Commands::Add {
            description,
            value,
            weight,
            tax,
            charge,
        } => cmd_add(&cfg_dir, &description, value, weight, tax, charge),
        Commands::Clear { all } => cmd_clear(&cfg_dir, all),
        Commands::Show { currency, rate } => cmd_show(&cfg_dir, currency.as_deref(), rate),
        Commands::Generate {
            currency,
            rate,
            output,
        } => cmd_generate(
            &cfg_dir,
            GenerateOptions {
                currency,
                rate,
                output,
            },
        ),
        Commands::Status => cmd_status(&cfg_dir),
    }
}

fn ensure_initialized(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(InvoiceError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    Ok(())
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(InvoiceError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized shipinvoice config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit branding and rates:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Optionally add a logo:    {}/logo.png",
        cfg_dir.display()
    );
    println!();
    println!("Then build an invoice:");
    println!("  shipinvoice client --name <name> --phone <phone>");
    println!("  shipinvoice add <description> --weight <kg> [--value <v>] [--tax <t>] [--charge]");
    println!("  shipinvoice generate");

    Ok(())
}

/// Update the session's client record
fn cmd_client(
    cfg_dir: &Path,
    name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    country: Option<String>,
) -> Result<()> {
    ensure_initialized(cfg_dir)?;
    let mut session = load_session(cfg_dir)?;
    let client = &mut session.client;

    if let Some(name) = name {
        client.name = name.trim().to_string();
    }
    if let Some(phone) = phone {
        client.phone = phone.trim().to_string();
    }
    if let Some(address) = address {
        client.address = address.trim().to_string();
    }
    if let Some(country) = country {
        client.destination_country = country.trim().to_string();
    }

    println!("Client: {}", display_or_dash(&client.name));
    println!("  Phone:       {}", display_or_dash(&client.phone));
    println!("  Address:     {}", display_or_dash(&client.address));
    println!("  Destination: {}", display_or_dash(&client.destination_country));

    save_session(cfg_dir, &session)
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Append a cargo item to the cart
fn cmd_add(
    cfg_dir: &Path,
    description: &str,
    value: f64,
    weight: f64,
    tax: f64,
    charge: bool,
) -> Result<()> {
    ensure_initialized(cfg_dir)?;
    let item = CargoItem::new(description, value, weight, tax, charge)?;
    let mut session = load_session(cfg_dir)?;

    println!(
        "Added '{}' ({} Kg){}",
        item.description,
        format_quantity(item.weight_kg),
        if item.charge_declared_value {
            ", declared value charged"
        } else {
            ""
        }
    );
    session.add_item(item);
    println!("  Items in cart: {}", session.items().len());

    save_session(cfg_dir, &session)
}

/// Clear the cart
fn cmd_clear(cfg_dir: &Path, all: bool) -> Result<()> {
    ensure_initialized(cfg_dir)?;
    let mut session = load_session(cfg_dir)?;
    let removed = session.items().len();

    session.clear();
    if all {
        session.client = Default::default();
    }
    save_session(cfg_dir, &session)?;

    println!("Removed {removed} item(s) from the cart");
    if all {
        println!("Client details cleared");
    }
    Ok(())
}

#[derive(Tabled)]
struct CartRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "WEIGHT")]
    weight: String,
    #[tabled(rename = "CHARGED")]
    charged: String,
    #[tabled(rename = "LINE TOTAL")]
    line_total: String,
}

/// Show cart contents with line totals
fn cmd_show(cfg_dir: &Path, currency: Option<&str>, rate: Option<f64>) -> Result<()> {
    ensure_initialized(cfg_dir)?;
    let config = load_config(cfg_dir)?;
    let session = load_session(cfg_dir)?;

    if session.is_empty() {
        println!("The cart is empty.");
        println!("Add items with: shipinvoice add <description> --weight <kg>");
        return Ok(());
    }

    let pricing = config.pricing.resolve(currency, rate)?;
    let label = pricing.currency_label.as_str();

    let rows: Vec<CartRow> = session
        .items()
        .iter()
        .enumerate()
        .map(|(idx, item)| CartRow {
            index: idx + 1,
            description: item.description.clone(),
            weight: format!("{} Kg", format_quantity(item.weight_kg)),
            charged: if item.charge_declared_value {
                format_money(item.declared_value, label)
            } else {
                "-".to_string()
            },
            line_total: format_money(compute_line(item, pricing.rate_per_kg).line_total, label),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    let totals = InvoiceTotals::compute(session.items(), pricing.rate_per_kg);
    println!(
        "Rate: {} {} / Kg",
        format_quantity(pricing.rate_per_kg),
        label
    );
    println!("Estimated total: {}", format_money(totals.grand_total, label));

    Ok(())
}

/// Generate the invoice PDF for the current session
fn cmd_generate(cfg_dir: &Path, options: GenerateOptions) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let generated = generate_invoice(cfg_dir, &options, &TypstRenderer::new())?;
    let label = generated.pricing.currency_label.as_str();

    println!("Generated invoice {}", generated.number);
    println!("  Client: {}", generated.client);
    println!(
        "  Total:  {}",
        format_money(generated.totals.grand_total, label)
    );
    println!("  Saved:  {}", generated.path.display());

    Ok(())
}

/// Show configuration and session summary
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    ensure_initialized(cfg_dir)?;
    let config = load_config(cfg_dir)?;
    let session = load_session(cfg_dir)?;

    println!("Invoice Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Company:          {}", config.company.name);
    println!(
        "Currencies:       {} ({} / Kg), {} ({} / Kg), default {}",
        config.pricing.primary.label,
        format_quantity(config.pricing.primary.rate),
        config.pricing.secondary.label,
        format_quantity(config.pricing.secondary.rate),
        config.pricing.default
    );
    println!("Client:           {}", display_or_dash(&session.client.name));
    println!("Items in cart:    {}", session.items().len());

    Ok(())
}
