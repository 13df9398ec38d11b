use clap::Parser;
use miette::{IntoDiagnostic, Result};
use serde::Deserialize;
use std::fs::File;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use storefront_orders::application::workflow::OrderWorkflow;
use storefront_orders::config::{PayPalConfig, WorkflowConfig};
use storefront_orders::domain::cart::Cart;
use storefront_orders::domain::ports::{
    CartStore, CartStoreBox, OrderStoreBox, PaymentAuthorityBox, ProductStore, ProductStoreBox,
};
use storefront_orders::domain::product::Product;
use storefront_orders::infrastructure::in_memory::{
    InMemoryCartStore, InMemoryOrderStore, InMemoryProductStore,
};
use storefront_orders::infrastructure::paypal::PayPalClient;
use storefront_orders::interfaces::http;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to serve the REST API on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Public base URL of the deployment, used for payment callback URLs.
    #[arg(long)]
    public_base_url: String,

    /// Currency code sent with payment intents.
    #[arg(long, default_value = "USD")]
    currency: String,

    /// PayPal API endpoint.
    #[arg(long, default_value = "https://api.sandbox.paypal.com")]
    paypal_api_url: String,

    #[arg(long)]
    paypal_client_id: String,

    #[arg(long)]
    paypal_client_secret: String,

    /// Optional JSON file with products and carts to seed the in-memory
    /// stores for local runs.
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[derive(Deserialize)]
struct SeedData {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    carts: Vec<Cart>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let products = InMemoryProductStore::new();
    let carts = InMemoryCartStore::new();

    if let Some(seed_path) = &cli.seed {
        let file = File::open(seed_path).into_diagnostic()?;
        let seed: SeedData = serde_json::from_reader(file).into_diagnostic()?;
        for product in seed.products {
            products.store(product).await.into_diagnostic()?;
        }
        for cart in seed.carts {
            carts.store(cart).await.into_diagnostic()?;
        }
    }

    let paypal = PayPalClient::new(PayPalConfig::new(
        cli.paypal_api_url,
        cli.paypal_client_id,
        cli.paypal_client_secret,
    ))
    .into_diagnostic()?;

    let order_store: OrderStoreBox = Box::new(InMemoryOrderStore::new());
    let product_store: ProductStoreBox = Box::new(products);
    let cart_store: CartStoreBox = Box::new(carts);
    let authority: PaymentAuthorityBox = Box::new(paypal);

    let workflow = Arc::new(OrderWorkflow::new(
        WorkflowConfig::new(cli.public_base_url, cli.currency),
        order_store,
        product_store,
        cart_store,
        authority,
    ));

    let listener = TcpListener::bind(cli.bind).await.into_diagnostic()?;
    tracing::info!(addr = %cli.bind, "serving order API");
    axum::serve(listener, http::router(workflow))
        .await
        .into_diagnostic()?;

    Ok(())
}
