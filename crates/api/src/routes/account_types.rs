//! Account type routes.
//!
//! Read-only access to the account type taxonomy, used by clients to build
//! account pickers and to group accounts on financial statements.

use axum::{
    Json, Router,
    extract::{Path, Query},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tally_core::accounts::{self, AccountType, RootType};
use tally_shared::AppError;

use crate::AppState;
use crate::error::error_response;

/// Creates the account type routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/account-types", get(list_account_types))
        .route("/account-types/{key}", get(get_account_type))
}

/// Statement an account type is reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    /// Balance sheet.
    BalanceSheet,
    /// Income statement.
    IncomeSheet,
}

/// Query parameters for listing account types.
#[derive(Debug, Default, Deserialize)]
pub struct AccountTypesQuery {
    /// Root type filter, e.g. `asset`.
    pub root_type: Option<String>,
    /// Statement filter.
    pub statement: Option<Statement>,
}

async fn list_account_types(Query(query): Query<AccountTypesQuery>) -> Response {
    match filter_account_types(&query) {
        Ok(types) => Json(types).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn get_account_type(Path(key): Path<String>) -> Response {
    match accounts::lookup(&key) {
        Ok(account_type) => Json(account_type).into_response(),
        Err(e) => error_response(&e),
    }
}

fn filter_account_types(query: &AccountTypesQuery) -> Result<Vec<&'static AccountType>, AppError> {
    let root = query
        .root_type
        .as_deref()
        .map(str::parse::<RootType>)
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(accounts::all()
        .iter()
        .filter(|t| root.is_none_or(|r| t.is_root_type(r)))
        .filter(|t| match query.statement {
            Some(Statement::BalanceSheet) => t.on_balance_sheet,
            Some(Statement::IncomeSheet) => t.on_income_sheet,
            None => true,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::accounts::AccountTypeKey;

    #[test]
    fn test_no_filter_returns_whole_table() {
        let types = filter_account_types(&AccountTypesQuery::default()).unwrap();
        assert_eq!(types.len(), accounts::all().len());
    }

    #[test]
    fn test_filter_by_root_and_statement() {
        let query = AccountTypesQuery {
            root_type: Some("expense".to_string()),
            statement: Some(Statement::IncomeSheet),
        };
        let types = filter_account_types(&query).unwrap();

        assert!(!types.is_empty());
        assert!(types.iter().all(|t| t.root_type == RootType::Expense));
        assert!(types.iter().any(|t| t.is(AccountTypeKey::CostOfGoodsSold)));
    }

    #[test]
    fn test_unknown_root_type_is_rejected() {
        let query = AccountTypesQuery {
            root_type: Some("revenue-ish".to_string()),
            statement: None,
        };
        assert!(matches!(
            filter_account_types(&query),
            Err(AppError::Validation(_))
        ));
    }
}
