//! Root for the SeaORM entity modules of the investor registry.

pub mod investor;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::investor::Entity as Investor;
    pub use super::user::Entity as User;
}
