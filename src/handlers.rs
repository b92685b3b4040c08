use axum::{Json, extract::rejection::JsonRejection};
use validator::Validate;

use crate::common::error::AppError;

pub mod client;
pub mod configuration;
pub mod email_block;
pub mod petshop;
pub mod responsible_person;
pub mod worker;

// Corpo JSON já desserializado e validado
pub(crate) fn validated<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    Ok(payload)
}
