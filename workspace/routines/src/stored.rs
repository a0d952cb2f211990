use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, QueryResult, Statement};
use tracing::{debug, error, instrument, trace, warn};

use crate::error::{Result, RoutineError};
use crate::{InvestorRoutines, InvestorRow, InvestorState};

const THRESHOLD_PROCEDURE: &str = "CALL sp_inversionistas_mayor(?)";
const STATE_FUNCTION: &str = "SELECT fn_estado_inversionista(?) AS state";

/// Calls the routines provisioned in a MySQL/MariaDB database.
///
/// Both routines are opaque: their bodies are maintained outside this
/// repository. Rows coming back from the procedure are normalized into
/// [`InvestorRow`] here so nothing downstream depends on their raw column
/// naming.
#[derive(Debug, Default, Clone)]
pub struct StoredRoutines;

impl StoredRoutines {
    pub fn new() -> Self {
        Self
    }

    fn ensure_backend(db: &DatabaseConnection) -> Result<DbBackend> {
        let backend = db.get_database_backend();
        if backend != DbBackend::MySql {
            warn!("Stored routines requested on {:?} backend", backend);
            return Err(RoutineError::UnsupportedBackend(backend));
        }
        Ok(backend)
    }
}

/// Reads one procedure row, tolerating both snake_case and camelCase column
/// names for the owner key and a DOUBLE or DECIMAL investment column.
fn normalize_row(row: &QueryResult) -> Result<InvestorRow> {
    let id: i32 = row.try_get("", "id").map_err(malformed("id"))?;
    let name: String = row.try_get("", "name").map_err(malformed("name"))?;
    let surname: String = row.try_get("", "surname").map_err(malformed("surname"))?;

    let investment = match row.try_get::<Decimal>("", "investment") {
        Ok(value) => value,
        Err(_) => {
            let raw: f64 = row.try_get("", "investment").map_err(malformed("investment"))?;
            Decimal::from_f64(raw)
                .ok_or_else(|| RoutineError::MalformedRow(format!("investment {raw}")))?
        }
    };

    let registered_by_id = match row.try_get::<Option<i32>>("", "registered_by_id") {
        Ok(value) => value,
        Err(_) => row
            .try_get::<Option<i32>>("", "registeredById")
            .map_err(malformed("registered_by_id"))?,
    };

    Ok(InvestorRow {
        id,
        name,
        surname,
        investment,
        registered_by_id,
    })
}

fn malformed(column: &'static str) -> impl Fn(sea_orm::DbErr) -> RoutineError {
    move |e| RoutineError::MalformedRow(format!("{column}: {e}"))
}

#[async_trait]
impl InvestorRoutines for StoredRoutines {
    fn name(&self) -> &'static str {
        "stored"
    }

    #[instrument(skip(self, db))]
    async fn fetch_above_threshold(
        &self,
        db: &DatabaseConnection,
        amount: Decimal,
    ) -> Result<Vec<InvestorRow>> {
        let backend = Self::ensure_backend(db)?;
        trace!("Executing {}", THRESHOLD_PROCEDURE);

        let stmt = Statement::from_sql_and_values(backend, THRESHOLD_PROCEDURE, [amount.into()]);
        let rows = db.query_all(stmt).await.map_err(|e| {
            error!("Threshold procedure failed: {}", e);
            RoutineError::Database(e)
        })?;

        debug!("Threshold procedure returned {} rows", rows.len());
        rows.iter().map(normalize_row).collect()
    }

    #[instrument(skip(self, db))]
    async fn compute_state(
        &self,
        db: &DatabaseConnection,
        investor_id: i32,
    ) -> Result<Option<InvestorState>> {
        let backend = Self::ensure_backend(db)?;
        trace!("Executing {}", STATE_FUNCTION);

        let stmt = Statement::from_sql_and_values(backend, STATE_FUNCTION, [investor_id.into()]);
        let Some(row) = db.query_one(stmt).await? else {
            debug!("State function returned no row for investor {}", investor_id);
            return Ok(None);
        };

        let value: Option<String> = row.try_get("", "state")?;
        match value {
            Some(raw) => raw.parse().map(Some),
            None => {
                debug!("State function returned NULL for investor {}", investor_id);
                Ok(None)
            }
        }
    }
}
