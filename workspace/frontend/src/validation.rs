//! Form checks run before a request is sent. Messages match the server's.

use std::str::FromStr;

use common::{CreateInvestorRequest, Credentials, DEFAULT_THRESHOLD};
use rust_decimal::Decimal;

pub fn credentials(username: &str, password: &str) -> Result<Credentials, String> {
    let username = username.trim();
    if username.is_empty() {
        return Err("username is required".to_string());
    }
    if password.is_empty() {
        return Err("password is required".to_string());
    }
    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub fn new_investor(name: &str, surname: &str, investment: &str) -> Result<CreateInvestorRequest, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("name is required".to_string());
    }
    let surname = surname.trim();
    if surname.is_empty() {
        return Err("surname is required".to_string());
    }
    let investment = non_negative(investment)
        .ok_or_else(|| "investment must be a non-negative number".to_string())?;

    Ok(CreateInvestorRequest {
        name: name.to_string(),
        surname: surname.to_string(),
        investment,
    })
}

/// Threshold for the "greater than" view; blank means the default
pub fn threshold(input: &str) -> Result<Decimal, String> {
    if input.trim().is_empty() {
        return Ok(Decimal::from(DEFAULT_THRESHOLD));
    }
    non_negative(input).ok_or_else(|| "amount must be a non-negative number".to_string())
}

pub fn investor_id(input: &str) -> Result<i32, String> {
    match input.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err("Invalid investor id".to_string()),
    }
}

fn non_negative(input: &str) -> Option<Decimal> {
    let value = Decimal::from_str(input.trim())
        .or_else(|_| Decimal::from_scientific(input.trim()))
        .ok()?;
    (!value.is_sign_negative() || value.is_zero()).then(|| value.normalize())
}
