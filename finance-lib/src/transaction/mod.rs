use actix_web::{web, Scope};

pub mod handlers;

/// `/transactions` routes. The fixed segments are registered ahead of `/{transaction_id}` so they
/// are not captured as ids.
pub fn transaction_service() -> Scope {
    web::scope("/transactions")
        .service(handlers::get_summary)
        .service(handlers::filter_transactions)
        .service(handlers::get_all_transactions)
        .service(handlers::create_new_transaction)
        .service(handlers::get_transaction)
        .service(handlers::update_transaction)
        .service(handlers::delete_transaction)
}
