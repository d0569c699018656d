use crate::sqlx_repo::SQLxRepo;
use crate::transaction_repo::TransactionRepoError::TransactionNotFound;
use crate::transaction_repo::{
    Filter, NewTransaction, Summary, Transaction, TransactionRepo, TransactionRepoError,
    TransactionType, TransactionUpdate,
};
use crate::user_repo::UserId;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{query_as, Postgres, QueryBuilder};
use tracing::instrument;

const TRANSACTION_COLUMNS: &str =
    "id, amount, title, date, method, category, transaction_type, user_id";

#[derive(sqlx::FromRow)]
struct TransactionEntry {
    id: i32,
    amount: Decimal,
    title: String,
    date: DateTime<Utc>,
    method: String,
    category: String,
    transaction_type: String,
    user_id: UserId,
}

impl TryFrom<TransactionEntry> for Transaction {
    type Error = TransactionRepoError;

    fn try_from(value: TransactionEntry) -> Result<Self, Self::Error> {
        let transaction_type: TransactionType = value
            .transaction_type
            .parse()
            .with_context(|| format!("Transaction {} has an invalid type", value.id))?;
        Ok(Transaction {
            id: value.id,
            amount: value.amount,
            title: value.title,
            date: value.date,
            method: value.method,
            category: value.category,
            transaction_type,
            user_id: value.user_id,
        })
    }
}

impl SQLxRepo {
    #[instrument(skip(self))]
    async fn get_transaction_entries(
        &self,
        user: UserId,
        filter: Filter,
    ) -> Result<Vec<TransactionEntry>, TransactionRepoError> {
        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        query_builder
            .push(TRANSACTION_COLUMNS)
            .push(" FROM transactions WHERE user_id = ")
            .push_bind(user);
        if let Some(transaction_type) = filter.transaction_type {
            query_builder
                .push(" AND transaction_type = ")
                .push_bind(transaction_type.as_str());
        }
        if let Some(from) = filter.from {
            query_builder.push(" AND date >= ").push_bind(from);
        }
        if let Some(until) = filter.until {
            query_builder.push(" AND date < ").push_bind(until);
        }
        query_builder.push(" ORDER BY date DESC, id DESC");

        let transaction_entries: Vec<TransactionEntry> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get transactions for user {}", user))?;
        Ok(transaction_entries)
    }
}

#[async_trait]
impl TransactionRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_transaction(
        &self,
        user: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let transaction_entry: Option<TransactionEntry> = query_as(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1 AND user_id = $2"
        ))
        .bind(transaction_id)
        .bind(user)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get transaction {}", transaction_id))?;

        transaction_entry
            .ok_or(TransactionNotFound(transaction_id))?
            .try_into()
    }

    #[instrument(skip(self))]
    async fn get_all_transactions(
        &self,
        user: UserId,
        filter: Filter,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        self.get_transaction_entries(user, filter)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    #[instrument(skip(self, new_transaction))]
    async fn create_new_transaction(
        &self,
        user: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let transaction_entry: TransactionEntry = query_as(&format!(
            "INSERT INTO transactions(amount, title, date, method, category, transaction_type, user_id) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(new_transaction.amount)
        .bind(&new_transaction.title)
        .bind(new_transaction.date)
        .bind(&new_transaction.method)
        .bind(&new_transaction.category)
        .bind(new_transaction.transaction_type.as_str())
        .bind(user)
        .fetch_one(&self.pool)
        .await
        .context("Unable to insert transaction")?;

        transaction_entry.try_into()
    }

    #[instrument(skip(self, update))]
    async fn update_transaction(
        &self,
        user: UserId,
        transaction_id: i32,
        update: TransactionUpdate,
    ) -> Result<Transaction, TransactionRepoError> {
        let transaction_entry: Option<TransactionEntry> = query_as(&format!(
            "UPDATE transactions SET title = $1, amount = $2, transaction_type = $3, date = $4 WHERE id = $5 AND user_id = $6 RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(&update.title)
        .bind(update.amount)
        .bind(update.transaction_type.as_str())
        .bind(update.date)
        .bind(transaction_id)
        .bind(user)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to update transaction {}", transaction_id))?;

        transaction_entry
            .ok_or(TransactionNotFound(transaction_id))?
            .try_into()
    }

    #[instrument(skip(self))]
    async fn delete_transaction(
        &self,
        user: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let transaction_entry: Option<TransactionEntry> = query_as(&format!(
            "DELETE FROM transactions WHERE id = $1 AND user_id = $2 RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(transaction_id)
        .bind(user)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to delete transaction {}", transaction_id))?;

        transaction_entry
            .ok_or(TransactionNotFound(transaction_id))?
            .try_into()
    }

    #[instrument(skip(self))]
    async fn get_summary(&self, user: UserId) -> Result<Summary, TransactionRepoError> {
        let (income, expense): (Decimal, Decimal) = query_as(
            r#"
            SELECT COALESCE(SUM(amount) FILTER (WHERE transaction_type = 'Income'), 0)  AS income,
                   COALESCE(SUM(amount) FILTER (WHERE transaction_type = 'Expense'), 0) AS expense
            FROM transactions
            WHERE user_id = $1
            "#,
        )
        .bind(user)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Unable to get summary for user {}", user))?;

        let summary = Summary::new(income, expense)
            .ok_or_else(|| anyhow!("Summary balance overflow for user {}", user))?;
        Ok(summary)
    }
}
