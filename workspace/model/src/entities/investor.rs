use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::user;

/// A person holding an investment, recorded by an authenticated user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "investors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub surname: String,
    /// Invested amount, always >= 0. Stored as-is, no currency conversion.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub investment: Decimal,
    /// The user who registered this investor. Null when the user row is gone.
    pub registered_by_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::RegisteredById",
        to = "user::Column::Id",
        on_delete = "SetNull"
    )]
    RegisteredBy,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RegisteredBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
