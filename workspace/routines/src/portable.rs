use async_trait::async_trait;
use model::entities::investor;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, instrument, trace};

use crate::error::Result;
use crate::{InvestorRoutines, InvestorRow, InvestorState};

/// Routine implementation built from plain ORM queries.
///
/// Works on every backend. The activity rule is not known to this codebase, so
/// it is configurable: an investor is active when its investment is strictly
/// greater than `active_floor`.
#[derive(Debug, Clone)]
pub struct PortableRoutines {
    active_floor: Decimal,
}

impl Default for PortableRoutines {
    fn default() -> Self {
        Self::new(Decimal::ZERO)
    }
}

impl PortableRoutines {
    pub fn new(active_floor: Decimal) -> Self {
        Self { active_floor }
    }

    pub fn active_floor(&self) -> Decimal {
        self.active_floor
    }

    fn state_for(&self, investment: Decimal) -> InvestorState {
        if investment > self.active_floor {
            InvestorState::Active
        } else {
            InvestorState::Inactive
        }
    }
}

#[async_trait]
impl InvestorRoutines for PortableRoutines {
    fn name(&self) -> &'static str {
        "portable"
    }

    #[instrument(skip(self, db))]
    async fn fetch_above_threshold(
        &self,
        db: &DatabaseConnection,
        amount: Decimal,
    ) -> Result<Vec<InvestorRow>> {
        trace!("Querying investors with investment >= {}", amount);
        let rows = investor::Entity::find()
            .filter(investor::Column::Investment.gte(amount))
            .order_by_asc(investor::Column::Id)
            .all(db)
            .await?;

        debug!("Threshold query returned {} rows", rows.len());
        Ok(rows.into_iter().map(InvestorRow::from).collect())
    }

    #[instrument(skip(self, db))]
    async fn compute_state(
        &self,
        db: &DatabaseConnection,
        investor_id: i32,
    ) -> Result<Option<InvestorState>> {
        let found = investor::Entity::find_by_id(investor_id).one(db).await?;
        Ok(found.map(|row| self.state_for(row.investment)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use model::entities::user;
    use sea_orm::{ActiveModelTrait, Database, Set};

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn seed(db: &DatabaseConnection, amounts: &[i64]) -> Vec<investor::Model> {
        let owner = user::ActiveModel {
            username: Set("owner".to_string()),
            password: Set("hash".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();

        let mut created = Vec::new();
        for (i, amount) in amounts.iter().enumerate() {
            let row = investor::ActiveModel {
                name: Set(format!("Name{}", i)),
                surname: Set(format!("Surname{}", i)),
                investment: Set(Decimal::from(*amount)),
                registered_by_id: Set(Some(owner.id)),
                ..Default::default()
            }
            .insert(db)
            .await
            .unwrap();
            created.push(row);
        }
        created
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive_and_ordered() {
        let db = setup_db().await;
        seed(&db, &[30_000, 100, 15_000, 14_999]).await;

        let routines = PortableRoutines::default();
        let rows = routines
            .fetch_above_threshold(&db, Decimal::from(15_000))
            .await
            .unwrap();

        let amounts: Vec<Decimal> = rows.iter().map(|r| r.investment).collect();
        assert_eq!(amounts, vec![Decimal::from(30_000), Decimal::from(15_000)]);
        assert!(rows.windows(2).all(|w| w[0].id < w[1].id));
        assert!(rows.iter().all(|r| r.registered_by_id.is_some()));
    }

    #[tokio::test]
    async fn test_threshold_zero_returns_everything() {
        let db = setup_db().await;
        seed(&db, &[0, 1, 2]).await;

        let rows = PortableRoutines::default()
            .fetch_above_threshold(&db, Decimal::ZERO)
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_state_uses_active_floor() {
        let db = setup_db().await;
        let created = seed(&db, &[0, 500, 5_000]).await;

        let default_rule = PortableRoutines::default();
        assert_eq!(
            default_rule.compute_state(&db, created[0].id).await.unwrap(),
            Some(InvestorState::Inactive)
        );
        assert_eq!(
            default_rule.compute_state(&db, created[1].id).await.unwrap(),
            Some(InvestorState::Active)
        );

        let strict_rule = PortableRoutines::new(Decimal::from(1_000));
        assert_eq!(
            strict_rule.compute_state(&db, created[1].id).await.unwrap(),
            Some(InvestorState::Inactive)
        );
        assert_eq!(
            strict_rule.compute_state(&db, created[2].id).await.unwrap(),
            Some(InvestorState::Active)
        );
    }

    #[tokio::test]
    async fn test_state_of_unknown_investor_is_none() {
        let db = setup_db().await;
        let state = PortableRoutines::default().compute_state(&db, 4242).await.unwrap();
        assert_eq!(state, None);
    }
}
