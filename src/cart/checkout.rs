//! Checkout
//!
//! Checkout runs in two phases so that a caller can show a pending state:
//! [`CartLedger::begin_checkout`] validates and sets the latch, and
//! [`CartLedger::complete_checkout`] places the order. [`CartLedger::checkout`]
//! runs both with a delay in between.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use jiff::Timestamp;
use thiserror::Error;
use tracing::{info, warn};

use super::{CartError, CartLedger};
use crate::{auth::AuthService, storage::KeyValueStore};

/// Delay between accepting a checkout and placing the order.
pub const DEFAULT_CHECKOUT_DELAY: Duration = Duration::from_millis(1500);

/// Checkout errors
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The shopper must sign in first; the cart is untouched.
    #[error("sign in to check out")]
    NotAuthenticated,

    /// Another checkout has been accepted and not yet completed.
    #[error("checkout already in progress")]
    CheckoutInProgress,

    /// The order was placed but the emptied cart could not be saved.
    #[error(transparent)]
    Cart(#[from] CartError),
}

impl CheckoutError {
    /// Whether the caller should send the shopper to the sign-in page.
    pub fn redirect_to_login(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }
}

/// Order number, `ORD-` followed by eight digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderNumber(u32);

impl OrderNumber {
    /// Derive an order number from the last eight digits of a Unix
    /// millisecond timestamp.
    pub fn from_timestamp(timestamp: Timestamp) -> Self {
        let digits = timestamp.as_millisecond().rem_euclid(100_000_000);

        Self(u32::try_from(digits).unwrap_or_default())
    }

    /// Order number for an order placed now.
    pub fn now() -> Self {
        Self::from_timestamp(Timestamp::now())
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "ORD-{:08}", self.0)
    }
}

/// An accepted checkout waiting to be completed.
///
/// Only [`CartLedger::begin_checkout`] creates one, and completing consumes it.
/// The ledger refuses further checkouts while this token is alive; dropping it
/// without completing cancels the checkout and leaves the cart as it was.
#[derive(Debug)]
pub struct PendingCheckout {
    started_at: Timestamp,
    latch: Arc<AtomicBool>,
}

impl PendingCheckout {
    /// When the checkout was accepted.
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }
}

impl Drop for PendingCheckout {
    fn drop(&mut self) {
        self.latch.store(false, Ordering::Release);
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Order number
    pub order_number: OrderNumber,

    /// Subtotal before shipping
    pub subtotal: u64,

    /// Amount charged, shipping included
    pub total: u64,

    /// Units ordered
    pub item_count: u64,
}

impl<S: KeyValueStore> CartLedger<S> {
    /// Whether a checkout has been accepted and not completed.
    pub fn is_checkout_pending(&self) -> bool {
        self.checkout_pending.load(Ordering::Acquire)
    }

    /// Accept a checkout and set the latch.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::CheckoutInProgress`] while another checkout is
    /// pending, [`CheckoutError::EmptyCart`] if the cart has no lines, and
    /// [`CheckoutError::NotAuthenticated`] if `auth` reports no session. The
    /// cart is unchanged in every case.
    pub fn begin_checkout<A>(&mut self, auth: &A) -> Result<PendingCheckout, CheckoutError>
    where
        A: AuthService + ?Sized,
    {
        if self.is_checkout_pending() {
            return Err(CheckoutError::CheckoutInProgress);
        }

        if self.lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if !auth.is_authenticated() {
            info!("checkout needs a signed-in shopper");

            return Err(CheckoutError::NotAuthenticated);
        }

        self.checkout_pending.store(true, Ordering::Release);

        info!(lines = self.lines.len(), "checkout accepted");

        Ok(PendingCheckout {
            started_at: Timestamp::now(),
            latch: Arc::clone(&self.checkout_pending),
        })
    }

    /// Place the order, empty the cart and release the latch.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Cart`] if the emptied cart could not be
    /// saved. The order is still placed and the latch released.
    pub fn complete_checkout(
        &mut self,
        pending: PendingCheckout,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let totals = self.totals();

        let confirmation = OrderConfirmation {
            order_number: OrderNumber::now(),
            subtotal: totals.subtotal,
            total: totals.total,
            item_count: totals.item_count,
        };

        info!(
            order = %confirmation.order_number,
            total = confirmation.total,
            accepted_at = %pending.started_at,
            "order placed"
        );

        drop(pending);

        if let Err(error) = self.clear() {
            warn!(%error, order = %confirmation.order_number, "order placed but cart not saved");

            return Err(error.into());
        }

        Ok(confirmation)
    }

    /// Accept, wait `delay`, then place the order.
    ///
    /// Dropping the returned future before it finishes cancels the checkout:
    /// the cart is untouched and a new checkout can start.
    ///
    /// # Errors
    ///
    /// As [`CartLedger::begin_checkout`] and [`CartLedger::complete_checkout`].
    pub async fn checkout<A>(
        &mut self,
        auth: &A,
        delay: Duration,
    ) -> Result<OrderConfirmation, CheckoutError>
    where
        A: AuthService + ?Sized,
    {
        let pending = self.begin_checkout(auth)?;

        tokio::time::sleep(delay).await;

        self.complete_checkout(pending)
    }
}
