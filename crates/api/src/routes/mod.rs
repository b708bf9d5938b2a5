//! API route definitions.

use std::str::FromStr;

use axum::{Router, middleware};
use tally_shared::AppError;

use crate::{AppState, middleware::auth_middleware};

pub mod account_types;
pub mod actions;
pub mod health;
pub mod items;
pub mod reports;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(account_types::routes())
        .merge(actions::routes())
        .merge(items::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}

/// Parses a comma-separated id list such as `1,2,3`.
///
/// Blank segments are skipped; a segment that is not an id fails the whole
/// list.
pub(crate) fn parse_id_list<T: FromStr>(raw: &str, field: &str) -> Result<Vec<T>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| AppError::Validation(format!("{field}: '{s}' is not a valid id")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_shared::types::ItemId;

    #[test]
    fn test_parse_id_list() {
        let ids: Vec<ItemId> = parse_id_list("1, 2,,3 ", "ids").unwrap();
        assert_eq!(ids, vec![ItemId::new(1), ItemId::new(2), ItemId::new(3)]);
    }

    #[test]
    fn test_parse_id_list_rejects_garbage() {
        let err = parse_id_list::<ItemId>("1,two", "ids").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: ids: 'two' is not a valid id");
    }

    #[test]
    fn test_parse_id_list_empty() {
        assert!(parse_id_list::<ItemId>(" , ", "ids").unwrap().is_empty());
    }
}
