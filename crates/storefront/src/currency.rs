//! Currency selector.
//!
//! Remembers the shopper's display currency in the `currency` slot and serves
//! it to projections as a [`CurrencyProvider`].

use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use serde::Serialize;
use vitrine_core::{CurrencyCode, CurrencyContext, CurrencyProvider};

use crate::cart::storage::{StorageArea, StorageError};

/// Storage key of the selected currency code.
pub const CURRENCY_SLOT: &str = "currency";

/// One entry of the currency panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyOption {
    pub code: CurrencyCode,
    pub symbol: &'static str,
    pub flag: &'static str,
    pub icon: &'static str,
    pub rate: Decimal,
    pub selected: bool,
}

impl CurrencyOption {
    /// Every supported currency in panel order, marking `selected`.
    #[must_use]
    pub fn table(selected: CurrencyCode) -> Vec<Self> {
        CurrencyCode::ALL
            .into_iter()
            .map(|code| Self {
                code,
                symbol: code.symbol(),
                flag: code.flag(),
                icon: code.icon(),
                rate: code.rate(),
                selected: code == selected,
            })
            .collect()
    }
}

/// The display currency of one browsing context.
pub struct CurrencySelector {
    storage: Arc<dyn StorageArea>,
    current: RwLock<CurrencyCode>,
}

impl CurrencySelector {
    /// Restore the saved selection; absent or unknown codes select USD.
    #[must_use]
    pub fn load(storage: Arc<dyn StorageArea>) -> Self {
        let current = storage
            .get_item(CURRENCY_SLOT)
            .and_then(|saved| match saved.parse::<CurrencyCode>() {
                Ok(code) => Some(code),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring saved currency");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            storage,
            current: RwLock::new(current),
        }
    }

    /// The selected currency.
    #[must_use]
    pub fn current_code(&self) -> CurrencyCode {
        self.current
            .read()
            .map(|code| *code)
            .unwrap_or_default()
    }

    /// The currency panel with the current selection marked.
    #[must_use]
    pub fn options(&self) -> Vec<CurrencyOption> {
        CurrencyOption::table(self.current_code())
    }

    /// Select `code` and remember it.
    ///
    /// The selection takes effect even if it cannot be saved. Projections
    /// pick it up the next time they run.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the selection could not be persisted.
    pub fn select(&self, code: CurrencyCode) -> Result<(), StorageError> {
        if let Ok(mut current) = self.current.write() {
            *current = code;
        }
        tracing::debug!(currency = %code, "Currency selected");
        self.storage.set_item(CURRENCY_SLOT, code.as_str())
    }
}

impl CurrencyProvider for CurrencySelector {
    fn current(&self) -> Option<CurrencyContext> {
        self.current.read().ok().map(|code| code.context())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cart::storage::MemoryStorage;

    #[test]
    fn test_defaults_to_usd() {
        let selector = CurrencySelector::load(Arc::new(MemoryStorage::new()));
        assert_eq!(selector.current_code(), CurrencyCode::USD);
        assert_eq!(selector.current().unwrap().symbol, "$");
    }

    #[test]
    fn test_unknown_saved_code_falls_back() {
        let storage = MemoryStorage::new();
        storage.set_item(CURRENCY_SLOT, "XYZ").unwrap();
        let selector = CurrencySelector::load(Arc::new(storage));
        assert_eq!(selector.current_code(), CurrencyCode::USD);
    }

    #[test]
    fn test_selection_is_remembered() {
        let storage: Arc<dyn StorageArea> = Arc::new(MemoryStorage::new());
        let selector = CurrencySelector::load(Arc::clone(&storage));
        selector.select(CurrencyCode::HTG).unwrap();

        assert_eq!(storage.get_item(CURRENCY_SLOT).as_deref(), Some("HTG"));
        let context = selector.current().unwrap();
        assert_eq!(context.symbol, "G");
        assert_eq!(context.rate, CurrencyCode::HTG.rate());

        let restored = CurrencySelector::load(storage);
        assert_eq!(restored.current_code(), CurrencyCode::HTG);
    }

    #[test]
    fn test_options_mark_selection() {
        let selector = CurrencySelector::load(Arc::new(MemoryStorage::new()));
        selector.select(CurrencyCode::EUR).unwrap();

        let options = selector.options();
        assert_eq!(options.len(), CurrencyCode::ALL.len());
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].code, CurrencyCode::EUR);
        assert_eq!(selected[0].flag, "🇪🇺");
        assert_eq!(selected[0].icon, "assets/icons/europe-flag.svg");
    }
}
