//! In-app purchase boundary
//!
//! Products, purchase errors and the entitlement derived from a verified
//! receipt. The platform store sits behind `PurchaseService`; nothing in the
//! simulation consults an entitlement yet.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a store product is sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductKind {
    /// Used up once delivered, bought again
    Consumable,
    /// Bought once, never expires
    NonConsumable,
    AutoRenewingSubscription,
    /// Fixed period, no renewal
    NonRenewingSubscription,
}

impl ProductKind {
    pub fn is_subscription(&self) -> bool {
        matches!(
            self,
            ProductKind::AutoRenewingSubscription | ProductKind::NonRenewingSubscription
        )
    }
}

/// Products offered by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    /// Ten lives, valid for 30 days
    TenLivesPerMonth,
}

impl Product {
    pub const ALL: [Product; 1] = [Product::TenLivesPerMonth];

    pub fn id(&self) -> &'static str {
        match self {
            Product::TenLivesPerMonth => "com.leiwang.taprunfast.tenLifes",
        }
    }

    pub fn kind(&self) -> ProductKind {
        match self {
            Product::TenLivesPerMonth => ProductKind::NonRenewingSubscription,
        }
    }

    /// Validity period after purchase, if the product lapses
    pub fn validity(&self) -> Option<Duration> {
        match self {
            Product::TenLivesPerMonth => Some(Duration::days(30)),
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("purchase cancelled")]
    Cancelled,
    #[error("invalid product identifier")]
    InvalidProduct,
    #[error("store not reachable")]
    NotConnected,
    #[error("subscription expired")]
    Expired,
    #[error("product not purchased")]
    NotPurchased,
    #[error("unknown store error")]
    Unknown,
}

/// Outcome of receipt verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verification {
    Purchased {
        product_ids: Vec<String>,
        purchased_at: DateTime<Utc>,
    },
    Expired,
    NotPurchased,
}

/// Right to a product, derived from a verified purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub product: Product,
    pub purchased_at: DateTime<Utc>,
    /// `None` for products that never lapse
    pub expires_at: Option<DateTime<Utc>>,
}

impl Entitlement {
    pub fn new(product: Product, purchased_at: DateTime<Utc>) -> Self {
        Self {
            product,
            purchased_at,
            expires_at: product.validity().map(|d| purchased_at + d),
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now >= self.purchased_at && self.expires_at.is_none_or(|end| now < end)
    }
}

/// Platform store
pub trait PurchaseService {
    fn purchase(&mut self, product: Product) -> Result<(), StoreError>;
    fn verify(&mut self, product: Product) -> Result<Verification, StoreError>;
}

/// Map a verification result to an entitlement for `product`
pub fn check_verification(
    product: Product,
    verification: &Verification,
    now: DateTime<Utc>,
) -> Result<Entitlement, StoreError> {
    match verification {
        Verification::Purchased {
            product_ids,
            purchased_at,
        } => {
            if !product_ids.iter().any(|id| id == product.id()) {
                return Err(StoreError::InvalidProduct);
            }
            let entitlement = Entitlement::new(product, *purchased_at);
            if product.kind().is_subscription() && !entitlement.is_active(now) {
                return Err(StoreError::Expired);
            }
            Ok(entitlement)
        }
        Verification::Expired => Err(StoreError::Expired),
        Verification::NotPurchased => Err(StoreError::NotPurchased),
    }
}

/// Buy `product`, then verify the receipt
pub fn purchase_and_confirm<P: PurchaseService>(
    service: &mut P,
    product: Product,
    now: DateTime<Utc>,
) -> Result<Entitlement, StoreError> {
    service.purchase(product)?;
    let verification = service.verify(product)?;
    let entitlement = check_verification(product, &verification, now)?;
    log::info!(
        "Entitlement to {} active until {:?}",
        product.id(),
        entitlement.expires_at
    );
    Ok(entitlement)
}
