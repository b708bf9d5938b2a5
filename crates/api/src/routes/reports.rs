//! Report routes.
//!
//! Transactions-by-customers and transactions-by-vendors reports. Both
//! return the aggregated contact sections and the row tree the client table
//! renders.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use tally_core::reports::{
    ContactKind, ContactReportQuery, NegativeFormat, NumberFormat, ReportService,
};
use tally_db::ContactLedgerRepository;
use tally_shared::AppError;
use tally_shared::config::ReportsConfig;
use tally_shared::types::ContactId;

use crate::error::error_response;
use crate::routes::parse_id_list;
use crate::{AppState, middleware::AuthUser};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reports/transactions-by-customers",
            get(transactions_by_customers),
        )
        .route(
            "/reports/transactions-by-vendors",
            get(transactions_by_vendors),
        )
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters shared by the contact reports.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsByContactParams {
    /// Start date (defaults to January 1st of the current year).
    pub from_date: Option<NaiveDate>,
    /// End date (defaults to December 31st of the current year).
    pub to_date: Option<NaiveDate>,
    /// Comma-separated customer ids.
    pub customer_ids: Option<String>,
    /// Comma-separated vendor ids.
    pub vendor_ids: Option<String>,
    /// Skip contacts with no activity and zero balances.
    #[serde(default)]
    pub none_zero: bool,
    /// Skip contacts without transactions in the period.
    #[serde(default)]
    pub none_transactions: bool,
    /// Decimal places for amounts.
    pub precision: Option<u32>,
    /// Render zero amounts as blank cells.
    #[serde(default)]
    pub hide_zero: bool,
    /// Negative amount style.
    pub negative_format: Option<NegativeFormat>,
    /// Prefix amounts with the base currency code.
    #[serde(default)]
    pub show_currency: bool,
}

impl TransactionsByContactParams {
    fn contact_query(
        &self,
        kind: ContactKind,
        today: NaiveDate,
    ) -> Result<ContactReportQuery, AppError> {
        let (raw_ids, field) = match kind {
            ContactKind::Customer => (self.customer_ids.as_deref(), "customer_ids"),
            ContactKind::Vendor => (self.vendor_ids.as_deref(), "vendor_ids"),
        };
        let contact_ids: Vec<ContactId> = raw_ids
            .map(|raw| parse_id_list(raw, field))
            .transpose()?
            .unwrap_or_default();

        let year = today.year();
        let from_date = match self.from_date {
            Some(date) => date,
            None => NaiveDate::from_ymd_opt(year, 1, 1)
                .ok_or_else(|| AppError::Internal(format!("no January 1st in {year}")))?,
        };
        let to_date = match self.to_date {
            Some(date) => date,
            None => NaiveDate::from_ymd_opt(year, 12, 31)
                .ok_or_else(|| AppError::Internal(format!("no December 31st in {year}")))?,
        };

        Ok(ContactReportQuery {
            from_date,
            to_date,
            contact_ids,
            none_zero: self.none_zero,
            none_transactions: self.none_transactions,
        })
    }

    fn number_format(&self, defaults: &ReportsConfig) -> NumberFormat {
        NumberFormat {
            hide_zero: self.hide_zero,
            negative: self.negative_format.unwrap_or_default(),
            currency_code: self.show_currency.then(|| defaults.base_currency.clone()),
            ..NumberFormat::with_precision(self.precision.unwrap_or(defaults.precision))
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn transactions_by_customers(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<TransactionsByContactParams>,
) -> Response {
    transactions_by_contact(&state, &auth, &params, ContactKind::Customer).await
}

async fn transactions_by_vendors(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<TransactionsByContactParams>,
) -> Response {
    transactions_by_contact(&state, &auth, &params, ContactKind::Vendor).await
}

async fn transactions_by_contact(
    state: &AppState,
    auth: &AuthUser,
    params: &TransactionsByContactParams,
    kind: ContactKind,
) -> Response {
    let query = match params.contact_query(kind, Utc::now().date_naive()) {
        Ok(query) => query,
        Err(e) => return error_response(&e),
    };
    let format = params.number_format(&state.reports);

    let service = ReportService::new(Arc::new(ContactLedgerRepository::new(
        (*state.db).clone(),
    )));
    let result = match kind {
        ContactKind::Customer => {
            service
                .transactions_by_customers(auth.tenant_id(), &query, &format)
                .await
        }
        ContactKind::Vendor => {
            service
                .transactions_by_vendors(auth.tenant_id(), &query, &format)
                .await
        }
    };

    match result {
        Ok(report) => Json(report).into_response(),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_defaults_to_current_year() {
        let query = TransactionsByContactParams::default()
            .contact_query(ContactKind::Customer, date(2026, 10, 17))
            .unwrap();

        assert_eq!(query.from_date, date(2026, 1, 1));
        assert_eq!(query.to_date, date(2026, 12, 31));
        assert!(query.contact_ids.is_empty());
    }

    #[test]
    fn test_contact_ids_follow_report_kind() {
        let params = TransactionsByContactParams {
            customer_ids: Some("1,2".to_string()),
            vendor_ids: Some("9".to_string()),
            ..TransactionsByContactParams::default()
        };
        let today = date(2026, 10, 17);

        let customers = params.contact_query(ContactKind::Customer, today).unwrap();
        let vendors = params.contact_query(ContactKind::Vendor, today).unwrap();

        assert_eq!(customers.contact_ids, vec![ContactId::new(1), ContactId::new(2)]);
        assert_eq!(vendors.contact_ids, vec![ContactId::new(9)]);
    }

    #[test]
    fn test_bad_contact_id_is_rejected() {
        let params = TransactionsByContactParams {
            vendor_ids: Some("1,x".to_string()),
            ..TransactionsByContactParams::default()
        };

        let err = params
            .contact_query(ContactKind::Vendor, date(2026, 1, 1))
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_number_format_from_params_and_config() {
        let config = ReportsConfig {
            precision: 3,
            base_currency: "EUR".to_string(),
        };

        let format = TransactionsByContactParams::default().number_format(&config);
        assert_eq!(format.precision, 3);
        assert_eq!(format.currency_code, None);

        let params = TransactionsByContactParams {
            precision: Some(0),
            negative_format: Some(NegativeFormat::Parentheses),
            show_currency: true,
            ..TransactionsByContactParams::default()
        };
        let format = params.number_format(&config);
        assert_eq!(format.precision, 0);
        assert_eq!(format.negative, NegativeFormat::Parentheses);
        assert_eq!(format.currency_code.as_deref(), Some("EUR"));
    }
}
