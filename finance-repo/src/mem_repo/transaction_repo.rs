use crate::transaction_repo::TransactionRepoError::TransactionNotFound;
use crate::transaction_repo::{
    Filter, NewTransaction, Summary, Transaction, TransactionRepo, TransactionRepoError,
    TransactionType, TransactionUpdate,
};
use crate::user_repo::UserId;
use anyhow::anyhow;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

struct State {
    transactions: HashMap<i32, Transaction>,
    user_transactions: HashMap<UserId, HashSet<i32>>,
    next_id: i32,
}

impl State {
    fn owned_mut(&mut self, user: UserId, transaction_id: i32) -> Option<&mut Transaction> {
        let owned = self
            .user_transactions
            .get(&user)
            .is_some_and(|ids| ids.contains(&transaction_id));
        if owned {
            self.transactions.get_mut(&transaction_id)
        } else {
            None
        }
    }
}

pub struct MemTransactionRepo {
    state: RwLock<State>,
}

impl MemTransactionRepo {
    pub fn new() -> MemTransactionRepo {
        let state = State {
            transactions: HashMap::new(),
            user_transactions: HashMap::new(),
            next_id: 1,
        };
        MemTransactionRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

#[async_trait]
impl TransactionRepo for MemTransactionRepo {
    async fn get_transaction(
        &self,
        user: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let Some(transaction_ids) = read_guard.user_transactions.get(&user) else {
            return Err(TransactionNotFound(transaction_id));
        };
        if !transaction_ids.contains(&transaction_id) {
            return Err(TransactionNotFound(transaction_id));
        }

        let transaction = read_guard
            .transactions
            .get(&transaction_id)
            .expect("transactions should contain same ids as user_transactions")
            .clone();
        Ok(transaction)
    }

    async fn get_all_transactions(
        &self,
        user: UserId,
        filter: Filter,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let Some(transaction_ids) = read_guard.user_transactions.get(&user) else {
            return Ok(Vec::new());
        };

        let mut transactions: Vec<Transaction> = transaction_ids
            .iter()
            .map(|id| {
                read_guard
                    .transactions
                    .get(id)
                    .expect("transactions should have all the ids from user_transactions")
            })
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.cmp(a));

        Ok(transactions)
    }

    async fn create_new_transaction(
        &self,
        user: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let id = write_guard.next_id;
        write_guard.next_id += 1;

        let transaction = new_transaction.to_transaction(id, user);

        write_guard.transactions.insert(id, transaction.clone());
        write_guard
            .user_transactions
            .entry(user)
            .or_default()
            .insert(id);

        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        user: UserId,
        transaction_id: i32,
        update: TransactionUpdate,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let Some(transaction) = write_guard.owned_mut(user, transaction_id) else {
            return Err(TransactionNotFound(transaction_id));
        };
        update.apply_to(transaction);
        Ok(transaction.clone())
    }

    async fn delete_transaction(
        &self,
        user: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let Some(transaction_ids) = write_guard.user_transactions.get_mut(&user) else {
            return Err(TransactionNotFound(transaction_id));
        };
        if !transaction_ids.remove(&transaction_id) {
            return Err(TransactionNotFound(transaction_id));
        }

        let transaction = write_guard
            .transactions
            .remove(&transaction_id)
            .expect("transaction should exist if there is an entry in user_transactions");
        Ok(transaction)
    }

    async fn get_summary(&self, user: UserId) -> Result<Summary, TransactionRepoError> {
        let transactions = self.get_all_transactions(user, Filter::NONE).await?;

        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        for t in transactions {
            let total = match t.transaction_type {
                TransactionType::Income => &mut income,
                TransactionType::Expense => &mut expense,
            };
            *total = total
                .checked_add(t.amount)
                .ok_or_else(|| anyhow!("Summary overflow for user {}", user))?;
        }

        let summary = Summary::new(income, expense)
            .ok_or_else(|| anyhow!("Summary balance overflow for user {}", user))?;
        Ok(summary)
    }
}
