//! Command handlers

use std::{
    io::{self, Write},
    sync::Arc,
};

use thiserror::Error;
use tracing::debug;

use kopi_prima::{
    auth::{AuthError, AuthService, StoredSession},
    catalog::{Facet, SortKey},
    products::ProductId,
    render::{self, RenderError},
    sources::{FixtureProductSource, HttpProductSource, ProductSource},
    storage::{FileStore, StorageError},
    storefront::{Storefront, StorefrontError},
};

use super::config::{BrowseArgs, CartCommand, Command, StorefrontConfig};

/// Errors surfaced to the terminal.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The storage file could not be opened or written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A storefront operation failed.
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    /// Signing out failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Output could not be written.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Writing to the terminal failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// No product has the requested id.
    #[error("product {0} not found")]
    UnknownProduct(ProductId),

    /// The requested page is past the last page of results.
    #[error("page {page} out of range, {total} page(s) available")]
    PageOutOfRange {
        /// Requested page
        page: usize,

        /// Pages available for the current filters
        total: usize,
    },
}

type Shop = Storefront<Arc<FileStore>>;

/// Run the configured command, writing results to `out`.
///
/// # Errors
///
/// Returns a [`CommandError`] if the command fails.
pub async fn run(config: &StorefrontConfig, mut out: impl Write) -> Result<(), CommandError> {
    let store = Arc::new(FileStore::open(&config.storage)?);
    let session = StoredSession::new(Arc::clone(&store));
    let mut shop = Storefront::new(Arc::clone(&store), config.settings());

    debug!(command = ?config.command, storage = %config.storage.display(), "running command");

    match config.command {
        Command::Browse(ref args) => {
            load_catalog(&mut shop, config).await;
            browse(&mut shop, args, &mut out)?;
        }
        Command::Details { id } => {
            load_catalog(&mut shop, config).await;

            let id = ProductId::new(id);
            let details = shop
                .catalog()?
                .product_details(id)
                .ok_or(CommandError::UnknownProduct(id))?;

            render::write_product_details(&mut out, &details)?;
        }
        Command::Suggest { ref query } => {
            load_catalog(&mut shop, config).await;

            let suggestions = shop.catalog()?.suggestions(query);

            render::write_suggestions(&mut out, &suggestions)?;
        }
        Command::Cart(ref command) => cart(&mut shop, command, config, &mut out).await?,
        Command::Checkout => checkout(&mut shop, &session, &mut out).await?,
        Command::Login => {
            session.login()?;
            writeln!(out, "Signed in")?;
        }
        Command::Logout => {
            session.logout().await?;
            writeln!(out, "Signed out")?;
        }
    }

    Ok(())
}

async fn load_catalog(shop: &mut Shop, config: &StorefrontConfig) {
    let source: Box<dyn ProductSource> = match &config.fixture {
        Some(path) => Box::new(FixtureProductSource::new(path)),
        None => Box::new(HttpProductSource::new(&config.api_url)),
    };

    shop.load(source.as_ref()).await;
}

fn browse(shop: &mut Shop, args: &BrowseArgs, out: &mut impl Write) -> Result<(), CommandError> {
    let catalog = shop.catalog_mut()?;

    if let Some(category) = &args.category {
        catalog.set_category(category.as_str());
    }

    if let Some(search) = &args.search {
        catalog.set_search(search);
    }

    for (facet, values) in [
        (Facet::Origin, &args.origin),
        (Facet::Roast, &args.roast),
        (Facet::Process, &args.process),
    ] {
        for value in values {
            catalog.toggle_facet(facet, value.as_str());
        }
    }

    if let Some(sort) = &args.sort {
        let sort: SortKey = sort.parse().unwrap_or_default();
        catalog.set_sort(sort);
    }

    if args.page != catalog.view().page && !catalog.go_to_page(args.page) {
        return Err(CommandError::PageOutOfRange {
            page: args.page,
            total: catalog.total_pages(),
        });
    }

    render::write_product_page(out, &catalog.current_page())?;

    Ok(())
}

async fn cart(
    shop: &mut Shop,
    command: &CartCommand,
    config: &StorefrontConfig,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match *command {
        CartCommand::Show => {}
        CartCommand::Add {
            id,
            weight,
            quantity,
        } => {
            load_catalog(shop, config).await;

            let line = shop.add_to_cart_quantity(ProductId::new(id), weight, quantity)?;

            writeln!(
                out,
                "Added {} ({}) to cart, now {} in cart",
                line.name,
                line.weight_label(),
                line.quantity
            )?;
        }
        CartCommand::Set { line, quantity } => {
            shop.cart_mut()
                .update_quantity(line.get() - 1, quantity)
                .map_err(StorefrontError::from)?;
        }
        CartCommand::Remove { line } => {
            let removed = shop
                .cart_mut()
                .remove_line(line.get() - 1)
                .map_err(StorefrontError::from)?;

            writeln!(out, "Removed {} ({})", removed.name, removed.weight_label())?;
        }
        CartCommand::Clear => {
            shop.cart_mut().clear().map_err(StorefrontError::from)?;
        }
    }

    let cart = shop.cart();

    render::write_cart(out, cart.lines(), &cart.totals())?;

    Ok(())
}

async fn checkout<A: AuthService>(
    shop: &mut Shop,
    auth: &A,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match shop.checkout(auth).await {
        Ok(confirmation) => render::write_order_confirmation(out, &confirmation)?,
        Err(StorefrontError::Checkout(error)) if error.redirect_to_login() => {
            writeln!(out, "Please sign in before checking out (kopi-prima login)")?;
        }
        Err(error) => return Err(error.into()),
    }

    Ok(())
}
