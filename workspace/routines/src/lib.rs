//! Delegated investor routines.
//!
//! The threshold listing and the activity state of an investor are computed by
//! routines that live in the database (`sp_inversionistas_mayor` and
//! `fn_estado_inversionista`). This crate hides them behind the
//! [`InvestorRoutines`] trait so handlers see a single typed contract:
//!
//! - [`StoredRoutines`] calls the real MySQL/MariaDB routines.
//! - [`PortableRoutines`] answers the same questions with ORM queries and is
//!   used on SQLite (tests, local development).

pub mod error;
pub mod portable;
pub mod stored;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use model::entities::investor;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

pub use error::{Result, RoutineError};
pub use portable::PortableRoutines;
pub use stored::StoredRoutines;

/// Canonical investor row produced by every routine implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestorRow {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub investment: Decimal,
    /// Foreign key to the registering user, resolved by the caller.
    pub registered_by_id: Option<i32>,
}

impl From<investor::Model> for InvestorRow {
    fn from(model: investor::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            surname: model.surname,
            investment: model.investment,
            registered_by_id: model.registered_by_id,
        }
    }
}

/// Activity state of an investor as computed by the state routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvestorState {
    Active,
    Inactive,
}

impl InvestorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestorState::Active => "active",
            InvestorState::Inactive => "inactive",
        }
    }
}

impl fmt::Display for InvestorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestorState {
    type Err = RoutineError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(InvestorState::Active),
            "inactive" => Ok(InvestorState::Inactive),
            _ => Err(RoutineError::UnexpectedState(value.to_string())),
        }
    }
}

/// The narrow interface over the database-side investor routines.
///
/// Implementations borrow the pooled connection for the duration of a call
/// and hold no connection of their own.
#[async_trait]
pub trait InvestorRoutines: Send + Sync + fmt::Debug {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Investors whose investment is greater than or equal to `amount`.
    async fn fetch_above_threshold(
        &self,
        db: &DatabaseConnection,
        amount: Decimal,
    ) -> Result<Vec<InvestorRow>>;

    /// State of the investor with `investor_id`, or `None` when the routine
    /// yields no value.
    async fn compute_state(
        &self,
        db: &DatabaseConnection,
        investor_id: i32,
    ) -> Result<Option<InvestorState>>;
}
