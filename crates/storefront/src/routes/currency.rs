//! Currency panel handler.

use axum::{Json, extract::Query};
use serde::Deserialize;
use vitrine_core::CurrencyCode;

use crate::currency::CurrencyOption;
use crate::error::{AppError, Result};

#[derive(Debug, Default, Deserialize)]
pub struct CurrencyQuery {
    /// Code to mark as selected; USD when absent.
    pub currency: Option<String>,
}

/// Parse a `?currency=` value, USD when absent.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for codes outside the table.
pub fn requested_currency(code: Option<&str>) -> Result<CurrencyCode> {
    code.map_or(Ok(CurrencyCode::USD), |code| {
        code.parse::<CurrencyCode>()
            .map_err(|e| AppError::BadRequest(e.to_string()))
    })
}

/// The currency panel: code, symbol, flag, icon and rate of every currency.
#[tracing::instrument]
pub async fn options(Query(query): Query<CurrencyQuery>) -> Result<Json<Vec<CurrencyOption>>> {
    let selected = requested_currency(query.currency.as_deref())?;
    Ok(Json(CurrencyOption::table(selected)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_currency() {
        assert_eq!(requested_currency(None).unwrap(), CurrencyCode::USD);
        assert_eq!(requested_currency(Some("htg")).unwrap(), CurrencyCode::HTG);

        let err = requested_currency(Some("XYZ")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_options_serialize_panel() {
        let Json(options) = options(Query(CurrencyQuery {
            currency: Some("DOP".to_string()),
        }))
        .await
        .unwrap();

        let json = serde_json::to_value(&options).unwrap();
        let dop = json
            .as_array()
            .unwrap()
            .iter()
            .find(|o| o["code"] == "DOP")
            .unwrap();
        assert_eq!(dop["symbol"], "RD$");
        assert_eq!(dop["icon"], "assets/icons/dominican-flag.svg");
        assert_eq!(dop["rate"], "58.75");
        assert_eq!(dop["selected"], true);
    }
}
