//! The cart aggregate.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s, unique by
//! [`ProductIdentity`]. Every line has `quantity >= 1`; a line whose quantity
//! would drop to zero is removed instead.
//!
//! The aggregate only mutates memory. Persisting and re-projecting after a
//! mutation is the job of the browsing-context session that owns the cart.
//!
//! # Persisted layout
//!
//! A cart serializes as a bare JSON array of
//! `{"img": .., "name": .., "price": "25.00", "quantity": 1}` records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::types::ProductIdentity;

/// One product in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    identity: ProductIdentity,
    /// Unit price in USD, fixed by the first add of this identity.
    price: Decimal,
    quantity: u32,
}

impl LineItem {
    /// Create a line with an explicit quantity.
    #[must_use]
    pub const fn new(identity: ProductIdentity, unit_price_base: Decimal, quantity: u32) -> Self {
        Self {
            identity,
            price: unit_price_base,
            quantity,
        }
    }

    #[must_use]
    pub const fn identity(&self) -> &ProductIdentity {
        &self.identity
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    #[must_use]
    pub fn img(&self) -> &str {
        &self.identity.img
    }

    #[must_use]
    pub const fn unit_price_base(&self) -> Decimal {
        self.price
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity, in USD.
    #[must_use]
    pub fn line_total_base(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// A requested change to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartMutation {
    /// Add one unit, creating the line at the given price if absent.
    AddOrIncrement {
        identity: ProductIdentity,
        unit_price_base: Decimal,
    },
    /// Add one unit to an existing line.
    Increment(ProductIdentity),
    /// Remove one unit; the line disappears when it reaches zero.
    Decrement(ProductIdentity),
    /// Drop the line regardless of quantity.
    Remove(ProductIdentity),
}

impl CartMutation {
    /// The identity this mutation targets.
    #[must_use]
    pub const fn identity(&self) -> &ProductIdentity {
        match self {
            Self::AddOrIncrement { identity, .. }
            | Self::Increment(identity)
            | Self::Decrement(identity)
            | Self::Remove(identity) => identity,
        }
    }
}

/// Result of applying a [`CartMutation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The mutation applied; the identity now has this quantity (0 = removed).
    Quantity(u32),
    /// The identity was not in the cart, nothing changed.
    NotFound,
}

impl MutationOutcome {
    /// Resulting quantity for the targeted identity.
    #[must_use]
    pub const fn quantity(self) -> u32 {
        match self {
            Self::Quantity(quantity) => quantity,
            Self::NotFound => 0,
        }
    }

    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Quantity(_))
    }
}

/// Ordered collection of line items, unique by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from raw records, restoring the aggregate invariants.
    ///
    /// Zero-quantity records are dropped and repeated identities are merged
    /// into the first occurrence (quantities summed, first price kept).
    #[must_use]
    pub fn from_items(records: Vec<LineItem>) -> Self {
        let mut cart = Self::new();
        for record in records {
            if record.quantity == 0 {
                continue;
            }
            match cart.position(&record.identity) {
                Some(index) => {
                    if let Some(existing) = cart.items.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(record.quantity);
                    }
                }
                None => cart.items.push(record),
            }
        }
        cart
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Look up the line for an identity.
    #[must_use]
    pub fn get(&self, identity: &ProductIdentity) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.identity == identity)
    }

    /// Quantity held for an identity; 0 when absent.
    #[must_use]
    pub fn quantity_of(&self, identity: &ProductIdentity) -> u32 {
        self.get(identity).map_or(0, LineItem::quantity)
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |sum, item| sum.saturating_add(item.quantity))
    }

    /// Sum of all line totals, in USD.
    #[must_use]
    pub fn subtotal_base(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |sum, item| {
                sum.saturating_add(item.line_total_base())
            })
    }

    /// Add one unit of `identity`, appending a new line at `unit_price_base`
    /// when absent. An existing line keeps its original price.
    ///
    /// Returns the resulting quantity.
    pub fn add_or_increment(&mut self, identity: &ProductIdentity, unit_price_base: Decimal) -> u32 {
        if let Some(item) = self.get_mut(identity) {
            item.quantity = item.quantity.saturating_add(1);
            return item.quantity;
        }
        self.items
            .push(LineItem::new(identity.clone(), unit_price_base, 1));
        1
    }

    /// Add one unit to an existing line. `None` if the identity is absent.
    pub fn increment(&mut self, identity: &ProductIdentity) -> Option<u32> {
        let item = self.get_mut(identity)?;
        item.quantity = item.quantity.saturating_add(1);
        Some(item.quantity)
    }

    /// Remove one unit from an existing line, dropping the line at zero.
    ///
    /// Returns the remaining quantity (0 when the line was removed), or
    /// `None` if the identity is absent.
    pub fn decrement(&mut self, identity: &ProductIdentity) -> Option<u32> {
        let index = self.position(identity)?;
        let remaining = {
            let item = self.items.get_mut(index)?;
            item.quantity = item.quantity.saturating_sub(1);
            item.quantity
        };
        if remaining == 0 {
            self.items.remove(index);
        }
        Some(remaining)
    }

    /// Drop the line for `identity`. Returns whether a line was removed.
    pub fn remove(&mut self, identity: &ProductIdentity) -> bool {
        match self.position(identity) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Apply a mutation and report its outcome.
    pub fn apply(&mut self, mutation: &CartMutation) -> MutationOutcome {
        match mutation {
            CartMutation::AddOrIncrement {
                identity,
                unit_price_base,
            } => MutationOutcome::Quantity(self.add_or_increment(identity, *unit_price_base)),
            CartMutation::Increment(identity) => self
                .increment(identity)
                .map_or(MutationOutcome::NotFound, MutationOutcome::Quantity),
            CartMutation::Decrement(identity) => self
                .decrement(identity)
                .map_or(MutationOutcome::NotFound, MutationOutcome::Quantity),
            CartMutation::Remove(identity) => {
                if self.remove(identity) {
                    MutationOutcome::Quantity(0)
                } else {
                    MutationOutcome::NotFound
                }
            }
        }
    }

    fn position(&self, identity: &ProductIdentity) -> Option<usize> {
        self.items.iter().position(|item| &item.identity == identity)
    }

    fn get_mut(&mut self, identity: &ProductIdentity) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| &item.identity == identity)
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(records: Vec<LineItem>) -> Self {
        Self::from_items(records)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}
