//! Product catalog commands.

use serde::Serialize;

use exportdesk_core::resources::{Product, Products, ResourceClient, ResourcePayload};
use exportdesk_core::routes::Route;

use crate::cli::ProductCommands;
use crate::commands::common;
use crate::error::CliError;
use crate::session_store::KeyringSessionStore;

pub async fn run_products(
    api_url: Option<&str>,
    command: ProductCommands,
) -> Result<(), CliError> {
    let credentials = common::credential_store()?;
    common::require_admission(&credentials, Route::Products)?;

    let config = common::resolve_config(api_url)?;
    let client: ResourceClient<Products, KeyringSessionStore> =
        ResourceClient::new(config, credentials)?;

    match command {
        ProductCommands::List { json } => run_list(&client, json).await,
        ProductCommands::Add {
            title,
            description,
            image,
        } => {
            let mut payload = ResourcePayload::new()
                .field("title", title)
                .field("description", description);
            if let Some(path) = image {
                payload = payload.image(common::read_image(&path)?);
            }
            client.create(payload).await?;
            let products = client.list().await?;
            println!("Product created ({} in catalog).", products.len());
            Ok(())
        }
        ProductCommands::Update {
            id,
            title,
            description,
            image,
        } => {
            let mut payload = ResourcePayload::new()
                .field("title", title)
                .field("description", description);
            if let Some(path) = image {
                payload = payload.image(common::read_image(&path)?);
            }
            client.update(&id, payload).await?;
            client.list().await?;
            println!("Product updated.");
            Ok(())
        }
        ProductCommands::Delete { id, yes } => {
            if !common::confirm("Are you sure you want to delete this product?", yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            client.remove(&id).await?;
            let products = client.list().await?;
            println!("Product deleted ({} in catalog).", products.len());
            Ok(())
        }
    }
}

#[derive(Debug, Serialize)]
struct ProductListItem {
    id: String,
    title: String,
    description: String,
    image_src: Option<String>,
}

async fn run_list(
    client: &ResourceClient<Products, KeyringSessionStore>,
    as_json: bool,
) -> Result<(), CliError> {
    let products = client.list().await?;

    if as_json {
        let items = products
            .iter()
            .map(product_to_list_item)
            .collect::<Vec<ProductListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if products.is_empty() {
        println!("No products yet.");
        return Ok(());
    }
    for line in format_product_lines(&products) {
        println!("{line}");
    }
    Ok(())
}

fn product_to_list_item(product: &Product) -> ProductListItem {
    ProductListItem {
        id: product.id.clone(),
        title: product.title.clone(),
        description: product.description.clone(),
        image_src: product.image_src.clone(),
    }
}

fn format_product_lines(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .map(|product| {
            let title = common::preview(&product.title, 40);
            let image_marker = if product.image_src.is_some() {
                "image"
            } else {
                "-"
            };
            format!("{:<24}  {title:<40}  {image_marker}", product.id)
        })
        .collect()
}
