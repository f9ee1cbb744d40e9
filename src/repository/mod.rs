//! Persistence access. Each repository is a trait so services can be exercised
//! without a database; the `Pg*` types are the production implementations and
//! only ever bind values through `$n` placeholders.

pub mod business;
pub mod contact;
pub mod sessions;
pub mod users;

pub use business::{BusinessRepository, PgBusinessRepository};
pub use contact::{ContactRepository, PgContactRepository};
pub use sessions::{PgSessionRepository, SessionRepository};
pub use users::{PgUserRepository, UserRepository};
