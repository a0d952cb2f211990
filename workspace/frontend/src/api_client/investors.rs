use super::{get, post};
use common::{CreateInvestorRequest, CreatedInvestorDto, InvestorDto, InvestorStateDto};
use rust_decimal::Decimal;

/// Create an investor attributed to the token holder
pub async fn create_investor(
    token: &str,
    request: &CreateInvestorRequest,
) -> Result<CreatedInvestorDto, String> {
    post("/investors", request, Some(token)).await
}

/// Get all investors
pub async fn list_investors(token: &str) -> Result<Vec<InvestorDto>, String> {
    get("/investors", Some(token)).await
}

/// Investors whose investment is at least `amount`
pub async fn list_investors_above(token: &str, amount: Decimal) -> Result<Vec<InvestorDto>, String> {
    get(&threshold_endpoint(amount), Some(token)).await
}

/// Current state of one investor
pub async fn get_investor_state(token: &str, investor_id: i32) -> Result<InvestorStateDto, String> {
    get(&format!("/investors/{}/state", investor_id), Some(token)).await
}

fn threshold_endpoint(amount: Decimal) -> String {
    format!("/investors/greater?amount={}", amount.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_threshold_endpoint() {
        assert_eq!(
            threshold_endpoint(Decimal::from(15_000)),
            "/investors/greater?amount=15000"
        );
        assert_eq!(
            threshold_endpoint(Decimal::from_str("2500.50").unwrap()),
            "/investors/greater?amount=2500.5"
        );
    }
}
