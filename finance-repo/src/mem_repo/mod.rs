use crate::transaction_repo::TransactionRepo;
use crate::user_repo::UserRepo;
use std::sync::Arc;

mod transaction_repo;
mod user_repo;

pub fn create_repos() -> (Arc<dyn UserRepo>, Arc<dyn TransactionRepo>) {
    let user_repo = user_repo::MemUserRepo::new();
    let transaction_repo = transaction_repo::MemTransactionRepo::new();

    (Arc::new(user_repo), Arc::new(transaction_repo))
}
