//! The account type reference table.

use serde::{Deserialize, Serialize};

use super::error::TaxonomyError;

/// Normal balance side of an account.
///
/// - Debit-normal accounts (assets, expenses) grow with debits
/// - Credit-normal accounts (liabilities, equity, income) grow with credits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    /// Debit-normal.
    Debit,
    /// Credit-normal.
    Credit,
}

/// Root classification of an account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootType {
    /// Assets.
    Asset,
    /// Liabilities.
    Liability,
    /// Owner's equity.
    Equity,
    /// Income and other income.
    Income,
    /// Expenses, including cost of goods sold.
    Expense,
}

impl RootType {
    /// The normal side shared by every type under this root.
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::Asset | Self::Expense => NormalSide::Debit,
            Self::Liability | Self::Equity | Self::Income => NormalSide::Credit,
        }
    }

    /// Returns the lowercase key used in query strings and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for RootType {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(TaxonomyError::NotFound(s.to_string())),
        }
    }
}

/// Intermediate grouping used by statement sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParentType {
    /// Current assets.
    CurrentAsset,
    /// Fixed and other non-current assets.
    FixedAsset,
    /// Current liabilities.
    CurrentLiability,
    /// Long-term liabilities.
    LongTermLiability,
    /// Other non-current liabilities.
    NonCurrentLiability,
    /// Equity.
    Equity,
    /// Income.
    Income,
    /// Expenses.
    Expense,
}

/// Key of an account type as stored on accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountTypeKey {
    /// Cash on hand.
    Cash,
    /// Bank accounts.
    Bank,
    /// Amounts owed by customers.
    AccountsReceivable,
    /// Stock held for sale.
    Inventory,
    /// Other current assets.
    OtherCurrentAsset,
    /// Property, plant and equipment.
    FixedAsset,
    /// Other non-current assets.
    NonCurrentAsset,
    /// Amounts owed to vendors.
    AccountsPayable,
    /// Credit card balances.
    CreditCard,
    /// Taxes collected and owed.
    TaxPayable,
    /// Other current liabilities.
    OtherCurrentLiability,
    /// Long-term liabilities.
    LongTermLiability,
    /// Other non-current liabilities.
    NonCurrentLiability,
    /// Owner's equity.
    Equity,
    /// Operating income.
    Income,
    /// Non-operating income.
    OtherIncome,
    /// Cost of goods sold.
    CostOfGoodsSold,
    /// Operating expenses.
    Expense,
    /// Non-operating expenses.
    OtherExpense,
}

impl AccountTypeKey {
    /// Returns the kebab-case key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
            Self::AccountsReceivable => "accounts-receivable",
            Self::Inventory => "inventory",
            Self::OtherCurrentAsset => "other-current-asset",
            Self::FixedAsset => "fixed-asset",
            Self::NonCurrentAsset => "non-current-asset",
            Self::AccountsPayable => "accounts-payable",
            Self::CreditCard => "credit-card",
            Self::TaxPayable => "tax-payable",
            Self::OtherCurrentLiability => "other-current-liability",
            Self::LongTermLiability => "long-term-liability",
            Self::NonCurrentLiability => "non-current-liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::OtherIncome => "other-income",
            Self::CostOfGoodsSold => "cost-of-goods-sold",
            Self::Expense => "expense",
            Self::OtherExpense => "other-expense",
        }
    }

    /// Returns the reference record for this key.
    #[must_use]
    pub fn account_type(self) -> &'static AccountType {
        &ACCOUNT_TYPES[self as usize]
    }
}

impl std::fmt::Display for AccountTypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountTypeKey {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s).map(|t| t.key)
    }
}

/// Immutable account type reference record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccountType {
    /// Stable key.
    pub key: AccountTypeKey,
    /// Human-readable label.
    pub label: &'static str,
    /// Normal balance side.
    pub normal_side: NormalSide,
    /// Intermediate grouping.
    pub parent_type: ParentType,
    /// Root classification.
    pub root_type: RootType,
    /// Appears on the balance sheet.
    pub on_balance_sheet: bool,
    /// Appears on the income statement.
    pub on_income_sheet: bool,
}

impl AccountType {
    /// Returns true when this type is the given key.
    #[must_use]
    pub fn is(&self, key: AccountTypeKey) -> bool {
        self.key == key
    }

    /// Returns true when this type sits under the given root.
    #[must_use]
    pub fn is_root_type(&self, root: RootType) -> bool {
        self.root_type == root
    }
}

const fn row(
    key: AccountTypeKey,
    label: &'static str,
    parent_type: ParentType,
    root_type: RootType,
) -> AccountType {
    let on_balance_sheet = matches!(
        root_type,
        RootType::Asset | RootType::Liability | RootType::Equity
    );
    AccountType {
        key,
        label,
        normal_side: root_type.normal_side(),
        parent_type,
        root_type,
        on_balance_sheet,
        on_income_sheet: !on_balance_sheet,
    }
}

/// The full taxonomy, in chart-of-accounts order. Row `i` holds the key whose
/// discriminant is `i`.
pub static ACCOUNT_TYPES: [AccountType; 19] = [
    row(AccountTypeKey::Cash, "Cash", ParentType::CurrentAsset, RootType::Asset),
    row(AccountTypeKey::Bank, "Bank", ParentType::CurrentAsset, RootType::Asset),
    row(
        AccountTypeKey::AccountsReceivable,
        "Accounts Receivable",
        ParentType::CurrentAsset,
        RootType::Asset,
    ),
    row(AccountTypeKey::Inventory, "Inventory", ParentType::CurrentAsset, RootType::Asset),
    row(
        AccountTypeKey::OtherCurrentAsset,
        "Other Current Asset",
        ParentType::CurrentAsset,
        RootType::Asset,
    ),
    row(AccountTypeKey::FixedAsset, "Fixed Asset", ParentType::FixedAsset, RootType::Asset),
    row(
        AccountTypeKey::NonCurrentAsset,
        "Non-Current Asset",
        ParentType::FixedAsset,
        RootType::Asset,
    ),
    row(
        AccountTypeKey::AccountsPayable,
        "Accounts Payable",
        ParentType::CurrentLiability,
        RootType::Liability,
    ),
    row(
        AccountTypeKey::CreditCard,
        "Credit Card",
        ParentType::CurrentLiability,
        RootType::Liability,
    ),
    row(
        AccountTypeKey::TaxPayable,
        "Tax Payable",
        ParentType::CurrentLiability,
        RootType::Liability,
    ),
    row(
        AccountTypeKey::OtherCurrentLiability,
        "Other Current Liability",
        ParentType::CurrentLiability,
        RootType::Liability,
    ),
    row(
        AccountTypeKey::LongTermLiability,
        "Long Term Liability",
        ParentType::LongTermLiability,
        RootType::Liability,
    ),
    row(
        AccountTypeKey::NonCurrentLiability,
        "Non-Current Liability",
        ParentType::NonCurrentLiability,
        RootType::Liability,
    ),
    row(AccountTypeKey::Equity, "Equity", ParentType::Equity, RootType::Equity),
    row(AccountTypeKey::Income, "Income", ParentType::Income, RootType::Income),
    row(AccountTypeKey::OtherIncome, "Other Income", ParentType::Income, RootType::Income),
    row(
        AccountTypeKey::CostOfGoodsSold,
        "Cost of Goods Sold",
        ParentType::Expense,
        RootType::Expense,
    ),
    row(AccountTypeKey::Expense, "Expense", ParentType::Expense, RootType::Expense),
    row(AccountTypeKey::OtherExpense, "Other Expense", ParentType::Expense, RootType::Expense),
];

/// Looks up an account type by its kebab-case key.
///
/// # Errors
///
/// Returns `TaxonomyError::NotFound` for an unknown key.
pub fn lookup(key: &str) -> Result<&'static AccountType, TaxonomyError> {
    let wanted = key.trim();
    ACCOUNT_TYPES
        .iter()
        .find(|t| t.key.as_str().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| TaxonomyError::NotFound(key.to_string()))
}

/// Every account type, in chart-of-accounts order.
#[must_use]
pub fn all() -> &'static [AccountType] {
    &ACCOUNT_TYPES
}

/// Account types under the given root classification.
pub fn by_root_type(root: RootType) -> impl Iterator<Item = &'static AccountType> {
    ACCOUNT_TYPES.iter().filter(move |t| t.root_type == root)
}

/// Account types shown on the balance sheet.
pub fn balance_sheet_types() -> impl Iterator<Item = &'static AccountType> {
    ACCOUNT_TYPES.iter().filter(|t| t.on_balance_sheet)
}

/// Account types shown on the income statement.
pub fn income_sheet_types() -> impl Iterator<Item = &'static AccountType> {
    ACCOUNT_TYPES.iter().filter(|t| t.on_income_sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;
    use std::str::FromStr;

    #[test]
    fn test_every_key_has_one_row() {
        let keys: HashSet<_> = ACCOUNT_TYPES.iter().map(|t| t.key).collect();
        assert_eq!(keys.len(), ACCOUNT_TYPES.len());
        for (i, t) in ACCOUNT_TYPES.iter().enumerate() {
            assert_eq!(t.key as usize, i, "{} is out of place", t.key);
            assert_eq!(t.key.account_type(), t);
        }
    }

    #[test]
    fn test_key_resolves_to_its_own_row() {
        assert_eq!(AccountTypeKey::Cash.account_type().label, "Cash");
        let last = AccountTypeKey::OtherExpense.account_type();
        assert_eq!(last.label, "Other Expense");
        assert_eq!(last.root_type, RootType::Expense);
    }

    #[test]
    fn test_normal_side_fixed_per_root() {
        for t in all() {
            assert_eq!(t.normal_side, t.root_type.normal_side(), "{}", t.key);
        }
    }

    #[test]
    fn test_each_type_on_exactly_one_statement() {
        for t in all() {
            assert_ne!(t.on_balance_sheet, t.on_income_sheet, "{}", t.key);
        }
    }

    #[rstest]
    #[case("cash", AccountTypeKey::Cash, RootType::Asset, NormalSide::Debit)]
    #[case("accounts-payable", AccountTypeKey::AccountsPayable, RootType::Liability, NormalSide::Credit)]
    #[case("equity", AccountTypeKey::Equity, RootType::Equity, NormalSide::Credit)]
    #[case("other-income", AccountTypeKey::OtherIncome, RootType::Income, NormalSide::Credit)]
    #[case("cost-of-goods-sold", AccountTypeKey::CostOfGoodsSold, RootType::Expense, NormalSide::Debit)]
    #[case(" Inventory ", AccountTypeKey::Inventory, RootType::Asset, NormalSide::Debit)]
    fn test_lookup(
        #[case] key: &str,
        #[case] expected: AccountTypeKey,
        #[case] root: RootType,
        #[case] side: NormalSide,
    ) {
        let account_type = lookup(key).unwrap();
        assert_eq!(account_type.key, expected);
        assert_eq!(account_type.root_type, root);
        assert_eq!(account_type.normal_side, side);
    }

    #[test]
    fn test_lookup_unknown_key() {
        assert_eq!(
            lookup("other_asset"),
            Err(TaxonomyError::NotFound("other_asset".to_string()))
        );
    }

    #[test]
    fn test_key_round_trip_through_str_and_serde() {
        for t in all() {
            assert_eq!(AccountTypeKey::from_str(t.key.as_str()).unwrap(), t.key);
            let json = serde_json::to_string(&t.key).unwrap();
            assert_eq!(json, format!("\"{}\"", t.key));
        }
    }

    #[test]
    fn test_root_type_filters() {
        let income: Vec<_> = by_root_type(RootType::Income).map(|t| t.key).collect();
        assert_eq!(income, vec![AccountTypeKey::Income, AccountTypeKey::OtherIncome]);

        assert_eq!(balance_sheet_types().count() + income_sheet_types().count(), 19);
        assert!(income_sheet_types().any(|t| t.is(AccountTypeKey::CostOfGoodsSold)));
        assert!(balance_sheet_types().all(|t| !t.is_root_type(RootType::Expense)));
    }

    #[test]
    fn test_root_type_parse() {
        assert_eq!(RootType::from_str("Liability").unwrap(), RootType::Liability);
        assert!(RootType::from_str("revenue").is_err());
    }
}
