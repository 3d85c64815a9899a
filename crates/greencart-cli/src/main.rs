//! GreenCart CLI - browse the catalog, manage your cart and orders
//!
//! Thin client over the GreenCart REST API. The session token from `login`
//! is kept in the config file and sent as a bearer token.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password};
use uuid::Uuid;

use api::{GreenCartClient, OrderInfo, ProductInfo, ProductSearch};
use config::Config;

#[derive(Parser)]
#[command(name = "greencart")]
#[command(about = "GreenCart CLI - sustainable local marketplace", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        /// Account email (will prompt if not provided)
        #[arg(short, long)]
        email: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show the logged-in account
    Whoami,

    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },

    /// Manage your cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },

    /// Place an order for everything in the cart
    Checkout,

    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },

    /// Administrator commands
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Show current configuration
    Config {
        /// Set the API base URL
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Text search over title and description
        #[arg(short, long)]
        search: Option<String>,
        /// Comma-separated sustainability tags (organic, handmade, recycled)
        #[arg(short, long)]
        tags: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Only products from sellers in this city
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show product details
    Show {
        /// Product ID
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents
    Show,

    /// Add a product to the cart
    Add {
        /// Product ID
        product: Uuid,
        #[arg(short, long, default_value_t = 1)]
        quantity: i32,
    },

    /// Remove a cart line
    Remove {
        /// Cart item ID (see `greencart cart show`)
        item: Uuid,
    },

    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrderAction {
    /// List your orders
    List,

    /// Show one order
    Show {
        /// Order ID
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List all users
    Users,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { email, password } => cmd_login(email, password).await,
        Commands::Logout => cmd_logout(),
        Commands::Whoami => cmd_whoami().await,
        Commands::Products { action } => cmd_products(action).await,
        Commands::Cart { action } => cmd_cart(action).await,
        Commands::Checkout => cmd_checkout().await,
        Commands::Orders { action } => cmd_orders(action).await,
        Commands::Admin { action } => cmd_admin(action).await,
        Commands::Config { base_url } => cmd_config(base_url),
    }
}

/// Client carrying the stored token; fails when not logged in
fn authed_client(config: &Config) -> Result<GreenCartClient> {
    let token = config.require_token()?;
    Ok(GreenCartClient::new(&config.base_url, Some(token)))
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(email: Option<String>, password: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let email = match email {
        Some(e) => e,
        None => Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .context("Failed to read email")?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .context("Failed to read password")?,
    };

    let client = GreenCartClient::new(&config.base_url, None);
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => println!("{}", "OK".green()),
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not reach GreenCart API at {}", config.base_url);
        }
    }

    let auth = client.login(&email, &password).await?;
    config.set_session(auth.token, auth.user.email.clone());
    config.save()?;

    println!(
        "{} Logged in as {} ({})",
        "✓".green(),
        auth.user.username.cyan(),
        auth.user.role
    );

    Ok(())
}

fn cmd_logout() -> Result<()> {
    let mut config = Config::load()?;

    if config.clear_session() {
        config.save()?;
        println!("{} Logged out", "✓".green());
    } else {
        println!("Not logged in.");
    }

    Ok(())
}

async fn cmd_whoami() -> Result<()> {
    let config = Config::load()?;
    let client = authed_client(&config)?;
    let user = client.me().await?;

    println!("{}", user.username.bold());
    println!("  ID: {}", user.id.to_string().dimmed());
    println!("  Email: {}", user.email);
    println!("  Role: {}", user.role.cyan());
    println!("  City: {}", user.city);
    println!("  Member since: {}", user.created_at.format("%Y-%m-%d"));

    Ok(())
}

async fn cmd_products(action: ProductAction) -> Result<()> {
    let config = Config::load()?;
    let client = GreenCartClient::new(&config.base_url, config.token.as_deref());

    match action {
        ProductAction::List { search, tags, category, city, page, limit } => {
            let query = ProductSearch { search, tags, category, city, page, limit };
            let result = client.list_products(&query).await?;

            if result.products.is_empty() {
                println!("No products found.");
                return Ok(());
            }

            println!(
                "{} (page {}/{}, {} total)",
                "Products:".bold(),
                result.pagination.page,
                result.pagination.pages.max(1),
                result.pagination.total
            );
            for product in &result.products {
                print_product_line(product);
            }
        }

        ProductAction::Show { id } => {
            let product = client.get_product(id).await?;

            println!("{}", product.title.bold());
            println!("  ID: {}", product.id.to_string().dimmed());
            println!("  Price: ${:.2}", product.price);
            println!("  Stock: {}", product.stock);
            if let Some(category) = &product.category {
                println!("  Category: {}", category);
            }
            if !product.sustainability_tags.is_empty() {
                println!("  Tags: {}", product.sustainability_tags.join(", ").green());
            }
            println!(
                "  Rating: {:.1} ({} reviews)",
                product.average_rating, product.review_count
            );
            if let Some(seller) = &product.seller {
                println!("  Seller: {} ({})", seller.username.cyan(), seller.city);
            }
            println!("\n{}", product.description);
        }
    }

    Ok(())
}

async fn cmd_cart(action: CartAction) -> Result<()> {
    let config = Config::load()?;
    let client = authed_client(&config)?;

    let cart = match action {
        CartAction::Show => client.cart().await?,
        CartAction::Add { product, quantity } => {
            let cart = client.add_to_cart(product, quantity).await?;
            println!("{} Item added to cart", "✓".green());
            cart
        }
        CartAction::Remove { item } => {
            let cart = client.remove_from_cart(item).await?;
            println!("{} Item removed from cart", "✓".green());
            cart
        }
        CartAction::Clear => {
            client.clear_cart().await?;
            println!("{} Cart cleared", "✓".green());
            return Ok(());
        }
    };

    if cart.items.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    println!("{}", "Cart:".bold());
    for item in &cart.items {
        let (title, price) = match &item.product {
            Some(p) => (p.title.as_str(), p.price),
            None => ("(unavailable)", 0.0),
        };
        println!(
            "  {} {} x{} @ ${:.2}",
            item.id.to_string()[..8].dimmed(),
            truncate_string(title, 40),
            item.quantity,
            price
        );
    }
    println!("  Total: {}", format!("${}", cart.total_amount).bold());

    Ok(())
}

async fn cmd_checkout() -> Result<()> {
    let config = Config::load()?;
    let client = authed_client(&config)?;

    let order = client.checkout().await?;
    println!("{} Order placed", "✓".green());
    print_order(&order);

    Ok(())
}

async fn cmd_orders(action: OrderAction) -> Result<()> {
    let config = Config::load()?;
    let client = authed_client(&config)?;

    match action {
        OrderAction::List => {
            let orders = client.list_orders().await?;

            if orders.is_empty() {
                println!("No orders yet.");
                return Ok(());
            }

            println!("{}", "Orders:".bold());
            for order in orders {
                println!(
                    "  {} {} ${:.2} {} ({} items)",
                    order.id.to_string().dimmed(),
                    order.created_at.format("%Y-%m-%d"),
                    order.total_amount,
                    order.status.green(),
                    order.items.len()
                );
            }
        }

        OrderAction::Show { id } => {
            let order = client.get_order(id).await?;
            print_order(&order);
        }
    }

    Ok(())
}

async fn cmd_admin(action: AdminAction) -> Result<()> {
    let config = Config::load()?;
    let client = authed_client(&config)?;

    match action {
        AdminAction::Users => {
            let result = client.admin_users().await?;

            println!("{} ({})", "Users:".bold(), result.count);
            for user in result.users {
                let status = if user.is_active {
                    "active".green()
                } else {
                    "inactive".red()
                };
                println!(
                    "  {} {} <{}> {} {}",
                    user.id.to_string().dimmed(),
                    user.username.cyan(),
                    user.email,
                    user.role,
                    status
                );
            }
        }
    }

    Ok(())
}

fn cmd_config(base_url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = base_url {
        config.base_url = url;
        config.save()?;
        println!("{} Base URL updated", "✓".green());
    }

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  Session: {}",
        match &config.email {
            Some(email) => email.green(),
            None => "Not logged in".red(),
        }
    );

    Ok(())
}

// ============================================
// Output helpers
// ============================================

fn print_product_line(product: &ProductInfo) {
    let tags = if product.sustainability_tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", product.sustainability_tags.join(", "))
    };
    println!(
        "  {} {} ${:.2} ★{:.1}{}",
        product.id.to_string().dimmed(),
        truncate_string(&product.title, 40).cyan(),
        product.price,
        product.average_rating,
        tags.green()
    );
}

fn print_order(order: &OrderInfo) {
    println!("{} {}", "Order".bold(), order.id);
    println!("  Placed: {}", order.created_at.format("%Y-%m-%d %H:%M"));
    println!("  Status: {} / payment {}", order.status.green(), order.payment_status);
    for item in &order.items {
        println!(
            "  - {} x{} @ ${:.2}",
            truncate_string(&item.product_title, 40),
            item.quantity,
            item.price
        );
    }
    println!("  Total: {}", format!("${:.2}", order.total_amount).bold());
}

fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Soy Candle", 40), "Soy Candle");
        assert_eq!(truncate_string("Bamboo Toothbrush Set", 6), "Bamboo...");
        assert_eq!(truncate_string("Café crème", 4), "Café...");
    }

    #[test]
    fn test_cart_add_defaults_to_one() {
        let cli = Cli::try_parse_from([
            "greencart",
            "cart",
            "add",
            "6f1c1c52-7d3e-4a57-9f3c-2d1b1b7a8e10",
        ])
        .unwrap();
        match cli.command {
            Commands::Cart { action: CartAction::Add { quantity, .. } } => assert_eq!(quantity, 1),
            _ => panic!("expected cart add"),
        }
    }
}
