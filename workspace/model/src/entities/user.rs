use sea_orm::entity::prelude::*;

/// A registered user able to sign in and record investors.
/// Rows are created by registration and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Trimmed, case-sensitive login name.
    #[sea_orm(unique)]
    pub username: String,
    /// Base64 HMAC digest of the password. Never serialized to clients.
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Investors registered by this user.
    #[sea_orm(has_many = "super::investor::Entity")]
    Investor,
}

impl Related<super::investor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Investor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
