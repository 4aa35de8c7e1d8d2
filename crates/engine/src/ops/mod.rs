use sea_orm::DatabaseConnection;

mod auth;
mod categories;
mod menu;
mod orders;
mod seed;

pub use seed::SeedReport;

/// Evaluate `$body` with `$tx` bound to a fresh transaction. The transaction
/// is committed when the body yields `Ok`; on `Err` it is dropped, which rolls
/// it back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        match $body {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Menu, order and staff store backed by one database connection.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Connection the engine runs on. Migrations must already be applied.
    pub fn database(self, database: DatabaseConnection) -> Self {
        Self { database }
    }

    pub async fn build(self) -> crate::ResultEngine<Engine> {
        let Self { database } = self;
        Ok(Engine { database })
    }
}
