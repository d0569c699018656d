use std::sync::Arc;

use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use finance_repo::datetime::{parse_date, parse_datetime, start_of_next_day};
use finance_repo::transaction_repo::{
    Filter, NewTransaction, TransactionRepo, TransactionType, TransactionUpdate,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::error::HandlerError;
use crate::user::UserId;

#[get("/{transaction_id}")]
pub async fn get_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    params: web::Path<i32>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let transaction_id = params.into_inner();
    let transaction = transaction_repo
        .get_transaction(user_id.into_inner(), transaction_id)
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[get("")]
pub async fn get_all_transactions(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let transactions = transaction_repo
        .get_all_transactions(user_id.into_inner(), Filter::NONE)
        .await?;
    Ok(HttpResponse::Ok().json(transactions))
}

#[post("")]
pub async fn create_new_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    new_transaction: web::Json<NewTransaction>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let new_transaction = new_transaction.into_inner();
    if new_transaction.title.trim().is_empty() {
        return Err(HandlerError::Validation("Title is required.".to_string()));
    }
    let transaction = transaction_repo
        .create_new_transaction(user_id.into_inner(), new_transaction)
        .await?;
    info!(transaction_id = transaction.id, "created transaction");
    Ok(HttpResponse::Ok().json(transaction))
}

#[put("/{transaction_id}")]
pub async fn update_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    params: web::Path<i32>,
    update: web::Json<TransactionUpdate>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let transaction_id = params.into_inner();
    let update = update.into_inner();
    if update.title.trim().is_empty() {
        return Err(HandlerError::Validation("Title is required.".to_string()));
    }
    let transaction = transaction_repo
        .update_transaction(user_id.into_inner(), transaction_id, update)
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[delete("/{transaction_id}")]
pub async fn delete_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    params: web::Path<i32>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let transaction_id = params.into_inner();
    transaction_repo
        .delete_transaction(user_id.into_inner(), transaction_id)
        .await?;
    info!(transaction_id, "deleted transaction");
    Ok(HttpResponse::Ok().json(json!({ "message": "Transaction deleted successfully" })))
}

#[get("/summary")]
pub async fn get_summary(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let summary = transaction_repo.get_summary(user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Query string of `GET /transactions/filter`. Every field is optional and an empty value is
/// treated as absent.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct FilterQuery {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl TryFrom<FilterQuery> for Filter {
    type Error = HandlerError;

    fn try_from(query: FilterQuery) -> Result<Self, Self::Error> {
        let transaction_type = match non_empty(query.transaction_type) {
            Some(value) => Some(
                value
                    .parse::<TransactionType>()
                    .map_err(|e| HandlerError::Validation(e.to_string()))?,
            ),
            None => None,
        };
        // a bare date starts at midnight; a timestamp is kept as given
        let from = match non_empty(query.from) {
            Some(value) => Some(parse_datetime(&value).map_err(|e| {
                HandlerError::Validation(format!("Invalid 'from' date: {}", e))
            })?),
            None => None,
        };
        let until = match non_empty(query.to) {
            Some(value) => {
                let to = parse_query_date("to", &value)?;
                Some(start_of_next_day(to).ok_or_else(|| {
                    HandlerError::Validation(format!("'to' date {} is out of range", to))
                })?)
            }
            None => None,
        };
        Ok(Filter {
            transaction_type,
            from,
            until,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn parse_query_date(name: &str, value: &str) -> Result<chrono::NaiveDate, HandlerError> {
    parse_date(value)
        .map_err(|e| HandlerError::Validation(format!("Invalid '{}' date: {}", name, e)))
}

#[get("/filter")]
pub async fn filter_transactions(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    query: web::Query<FilterQuery>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let filter = Filter::try_from(query.into_inner())?;
    debug!(?filter, "filtering transactions");
    let transactions = transaction_repo
        .get_all_transactions(user_id.into_inner(), filter)
        .await?;
    Ok(HttpResponse::Ok().json(transactions))
}
