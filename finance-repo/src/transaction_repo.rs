use crate::user_repo::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[async_trait]
pub trait TransactionRepo: Sync + Send {
    async fn get_transaction(
        &self,
        user: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError>;

    /// Transactions owned by `user` matching `filter`, newest first.
    async fn get_all_transactions(
        &self,
        user: UserId,
        filter: Filter,
    ) -> Result<Vec<Transaction>, TransactionRepoError>;

    async fn create_new_transaction(
        &self,
        user: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn update_transaction(
        &self,
        user: UserId,
        transaction_id: i32,
        update: TransactionUpdate,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn delete_transaction(
        &self,
        user: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn get_summary(&self, user: UserId) -> Result<Summary, TransactionRepoError>;
}

#[derive(Error, Debug)]
pub enum TransactionRepoError {
    #[error("Transaction with id {0} not found")]
    TransactionNotFound(i32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum TransactionType {
    #[serde(alias = "income")]
    Income,
    #[serde(alias = "expense")]
    Expense,
}

impl TransactionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown transaction type '{0}', expected Income or Expense")]
pub struct UnknownTransactionType(pub String);

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("income") {
            Ok(TransactionType::Income)
        } else if s.eq_ignore_ascii_case("expense") {
            Ok(TransactionType::Expense)
        } else {
            Err(UnknownTransactionType(s.to_owned()))
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub title: String,
    pub date: DateTime<Utc>,
    pub method: String,
    pub category: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub user_id: UserId,
}

impl Ord for Transaction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Transaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Client payload for creating a transaction. Any owner id sent by the client is ignored; the
/// owner is always supplied separately by the caller.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewTransaction {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub title: String,
    #[serde(deserialize_with = "crate::datetime::deserialize")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl NewTransaction {
    pub fn new(
        amount: Decimal,
        title: String,
        date: DateTime<Utc>,
        method: String,
        category: String,
        transaction_type: TransactionType,
    ) -> NewTransaction {
        NewTransaction {
            amount,
            title,
            date,
            method,
            category,
            transaction_type,
        }
    }

    pub fn to_transaction(self, id: i32, user_id: UserId) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            title: self.title,
            date: self.date,
            method: self.method,
            category: self.category,
            transaction_type: self.transaction_type,
            user_id,
        }
    }
}

/// Fields replaced by an update. Method and category are left as they were.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TransactionUpdate {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(deserialize_with = "crate::datetime::deserialize")]
    pub date: DateTime<Utc>,
}

impl TransactionUpdate {
    pub fn new(
        title: String,
        amount: Decimal,
        transaction_type: TransactionType,
        date: DateTime<Utc>,
    ) -> TransactionUpdate {
        TransactionUpdate {
            title,
            amount,
            transaction_type,
            date,
        }
    }

    pub fn apply_to(self, transaction: &mut Transaction) {
        transaction.title = self.title;
        transaction.amount = self.amount;
        transaction.transaction_type = self.transaction_type;
        transaction.date = self.date;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    pub transaction_type: Option<TransactionType>,
    /// Inclusive lower bound.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    pub until: Option<DateTime<Utc>>,
}

impl Filter {
    pub const NONE: Filter = Filter {
        transaction_type: None,
        from: None,
        until: None,
    };

    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(transaction_type) = self.transaction_type {
            if transaction.transaction_type != transaction_type {
                return false;
            }
        }
        if let Some(from) = self.from {
            if transaction.date < from {
                return false;
            }
        }
        if let Some(until) = self.until {
            if transaction.date >= until {
                return false;
            }
        }
        true
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Summary {
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl Summary {
    /// `None` when the balance does not fit in a [Decimal].
    pub fn new(income: Decimal, expense: Decimal) -> Option<Summary> {
        Some(Summary {
            income,
            expense,
            balance: income.checked_sub(expense)?,
        })
    }
}
