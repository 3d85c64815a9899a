//! Fill a GreenCart database with demo accounts, products, orders and reviews.
//!
//! ```text
//! DATABASE_URL=postgres://... cargo run --bin seed            # wipe, then seed
//! DATABASE_URL=postgres://... cargo run --bin seed -- --clear # wipe only
//! ```

use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use greencart::{
    services::{checkout::PAYMENT_METHOD, rating::RatingSummary},
    Order, OrderItem, OrderRepository, OrderStatus, PaymentStatus, Product, ProductRepository,
    Review, ReviewRepository, Role, SustainabilityTag, User, UserRepository,
};
use greencart_server::{
    adapters::{
        PgMaintenance, PgOrderRepository, PgProductRepository, PgReviewRepository,
        PgUserRepository, TableCounts,
    },
    auth::hash_password,
};

const PROFILE_IMAGE: &str = "https://res.cloudinary.com/demo/image/upload/sample.jpg";

#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Seed the GreenCart database with demo data", long_about = None)]
struct Cli {
    /// Only delete existing data
    #[arg(long)]
    clear: bool,
}

struct SeedUser {
    username: &'static str,
    password: &'static str,
    role: Role,
    city: &'static str,
}

const USERS: [SeedUser; 5] = [
    SeedUser { username: "admin", password: "admin123", role: Role::Admin, city: "New York" },
    SeedUser { username: "seller1", password: "seller123", role: Role::Seller, city: "San Francisco" },
    SeedUser { username: "seller2", password: "seller123", role: Role::Seller, city: "Los Angeles" },
    SeedUser { username: "buyer1", password: "buyer123", role: Role::Buyer, city: "San Francisco" },
    SeedUser { username: "buyer2", password: "buyer123", role: Role::Buyer, city: "Los Angeles" },
];

struct SeedProduct {
    /// Index into the two sellers
    seller: usize,
    title: &'static str,
    description: &'static str,
    price: f64,
    image: &'static str,
    tags: &'static [SustainabilityTag],
    category: &'static str,
    stock: i32,
}

const PRODUCTS: [SeedProduct; 8] = [
    SeedProduct {
        seller: 0,
        title: "Organic Cotton T-Shirt",
        description: "Comfortable 100% organic cotton t-shirt, sustainably sourced and ethically produced.",
        price: 29.99,
        image: "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=800&q=80&auto=format&fit=crop",
        tags: &[SustainabilityTag::Organic],
        category: "Clothing",
        stock: 50,
    },
    SeedProduct {
        seller: 0,
        title: "Handmade Ceramic Mug",
        description: "Beautiful handcrafted ceramic mug, perfect for your morning coffee or tea.",
        price: 24.99,
        image: "https://images.unsplash.com/photo-1544787219-7f47ccb76574?w=800&q=80&auto=format&fit=crop",
        tags: &[SustainabilityTag::Handmade],
        category: "Home & Kitchen",
        stock: 30,
    },
    SeedProduct {
        seller: 0,
        title: "Recycled Plastic Backpack",
        description: "Durable backpack made from 100% recycled plastic bottles. Eco-friendly and stylish.",
        price: 49.99,
        image: "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=800&q=80&auto=format&fit=crop",
        tags: &[SustainabilityTag::Recycled],
        category: "Accessories",
        stock: 25,
    },
    SeedProduct {
        seller: 1,
        title: "Organic Honey",
        description: "Pure organic honey from local beekeepers. No additives or preservatives.",
        price: 15.99,
        image: "https://images.unsplash.com/photo-1558642452-9d2a7deb7f62?w=800&q=80&auto=format&fit=crop",
        tags: &[SustainabilityTag::Organic],
        category: "Food & Beverage",
        stock: 100,
    },
    SeedProduct {
        seller: 1,
        title: "Handmade Wooden Cutting Board",
        description: "Artisan-crafted cutting board from sustainable wood sources.",
        price: 39.99,
        image: "https://images.unsplash.com/photo-1610701596007-11502861dcfa?w=800&q=80&auto=format&fit=crop",
        tags: &[SustainabilityTag::Handmade],
        category: "Home & Kitchen",
        stock: 15,
    },
    SeedProduct {
        seller: 1,
        title: "Recycled Paper Notebook Set",
        description: "Set of 3 notebooks made from 100% recycled paper. Perfect for journaling.",
        price: 18.99,
        image: "https://images.unsplash.com/photo-1531346878377-a5be20888e57?w=800&q=80&auto=format&fit=crop",
        tags: &[SustainabilityTag::Recycled],
        category: "Stationery",
        stock: 60,
    },
    SeedProduct {
        seller: 0,
        title: "Organic Bamboo Toothbrush",
        description: "Biodegradable bamboo toothbrush with soft bristles. Eco-friendly dental care.",
        price: 8.99,
        image: "https://images.unsplash.com/photo-1607613009820-a29f7bb81c04?w=800&q=80&auto=format&fit=crop",
        tags: &[SustainabilityTag::Organic],
        category: "Personal Care",
        stock: 200,
    },
    SeedProduct {
        seller: 1,
        title: "Handmade Soy Candle",
        description: "Hand-poured soy candle with natural essential oils. Burns clean and long.",
        price: 22.99,
        image: "https://5.imimg.com/data5/SELLER/Default/2023/12/368986516/YS/WW/LZ/148092396/soy-wax-meditation-aromatherapy-candles-500x500.jpg",
        tags: &[SustainabilityTag::Handmade, SustainabilityTag::Organic],
        category: "Home & Decor",
        stock: 40,
    },
];

/// (buyer index, [(product index, quantity)])
const ORDERS: [(usize, &[(usize, i32)]); 2] = [(0, &[(0, 2), (1, 1)]), (1, &[(3, 3)])];

/// (order index, product index, rating, comment)
const REVIEWS: [(usize, usize, i32, &str); 3] = [
    (0, 0, 5, "Excellent quality! The organic cotton is so soft and comfortable."),
    (0, 1, 4, "Beautiful craftsmanship. Love the design!"),
    (1, 3, 5, "Best honey I've ever tasted. Will definitely buy again!"),
];

fn print_counts(label: &str, counts: TableCounts) {
    println!("{label}");
    println!("  Users:    {}", counts.users);
    println!("  Products: {}", counts.products);
    println!("  Orders:   {}", counts.orders);
    println!("  Reviews:  {}", counts.reviews);
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("seed=info,info")),
        )
        .init();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to the database")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let maintenance = PgMaintenance::new(pool.clone());
    let cleared = maintenance.clear_all().await?;
    tracing::info!("Existing data cleared");

    if cli.clear {
        print_counts("Deleted:", cleared);
        return Ok(());
    }

    let users = PgUserRepository::new(pool.clone());
    let products = PgProductRepository::new(pool.clone());
    let orders = PgOrderRepository::new(pool.clone());
    let reviews = PgReviewRepository::new(pool.clone());

    // Users
    let mut created_users = Vec::with_capacity(USERS.len());
    for seed in &USERS {
        let password_hash = hash_password(seed.password)?;
        let mut user = User::new(
            seed.username.to_string(),
            format!("{}@greencart.com", seed.username),
            password_hash,
            seed.role,
            seed.city.to_string(),
        );
        user.profile_image = Some(PROFILE_IMAGE.to_string());
        created_users.push(users.save(&user).await?);
    }
    tracing::info!("Created {} users", created_users.len());

    let by_role = |role: Role| -> Vec<Uuid> {
        created_users
            .iter()
            .filter(|u| u.role == role)
            .map(|u| u.id)
            .collect()
    };
    let seller_ids = by_role(Role::Seller);
    let buyer_ids = by_role(Role::Buyer);

    // Products
    let mut created_products: Vec<Product> = Vec::with_capacity(PRODUCTS.len());
    for seed in &PRODUCTS {
        let product = Product::new(
            seller_ids[seed.seller],
            seed.title.to_string(),
            seed.description.to_string(),
            seed.price,
            vec![seed.image.to_string()],
            seed.tags.to_vec(),
            Some(seed.category.to_string()),
            seed.stock,
        )?;
        created_products.push(products.save(&product).await?);
    }
    tracing::info!("Created {} products", created_products.len());

    // Orders
    let mut created_orders = Vec::with_capacity(ORDERS.len());
    for (buyer, lines) in ORDERS {
        let items = lines
            .iter()
            .map(|&(index, quantity)| {
                let product = &created_products[index];
                OrderItem {
                    id: Uuid::new_v4(),
                    product_id: Some(product.id),
                    product_title: product.title.clone(),
                    seller_id: product.seller_id,
                    quantity,
                    price: product.price,
                }
            })
            .collect();
        let order = Order::new(
            buyer_ids[buyer],
            items,
            OrderStatus::Completed,
            PaymentStatus::Completed,
            PAYMENT_METHOD,
        );
        created_orders.push(orders.place_order(&order).await?);
    }
    tracing::info!("Created {} orders", created_orders.len());

    // Reviews
    let mut ratings: HashMap<Uuid, Vec<i32>> = HashMap::new();
    for (order, product, rating, comment) in REVIEWS {
        let order = &created_orders[order];
        let product = &created_products[product];
        let review = Review::new(
            product.id,
            product.seller_id,
            order.buyer_id,
            order.id,
            rating,
            Some(comment.to_string()),
        )?;
        reviews.insert(&review).await?;
        ratings.entry(product.id).or_default().push(rating);
    }
    tracing::info!("Created {} reviews", REVIEWS.len());

    for (product_id, product_ratings) in &ratings {
        let summary = RatingSummary::from_ratings(product_ratings).rounded(1);
        products
            .update_rating(*product_id, summary.average, summary.count as i32)
            .await?;
    }
    tracing::info!("Product ratings updated");

    print_counts("Seeded:", maintenance.counts().await?);
    println!("  admin@greencart.com / admin123");
    println!("  seller1@greencart.com, seller2@greencart.com / seller123");
    println!("  buyer1@greencart.com, buyer2@greencart.com / buyer123");

    Ok(())
}
