use sea_orm::DatabaseConnection;

use crate::{Money, ResultEngine};

mod appointments;
mod expenses;
mod patients;
mod reports;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Fee charged per appointment when no other value is configured (₹500).
pub const DEFAULT_APPOINTMENT_FEE: Money = Money::new(50_000);

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    appointment_fee: Money,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Fee used for the earnings figure of the overview.
    #[must_use]
    pub fn appointment_fee(&self) -> Money {
        self.appointment_fee
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    appointment_fee: Money,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            appointment_fee: DEFAULT_APPOINTMENT_FEE,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    pub fn appointment_fee(mut self, fee: Money) -> EngineBuilder {
        self.appointment_fee = fee;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        crate::util::ensure_non_negative(self.appointment_fee, "appointment_fee")?;
        Ok(Engine {
            database: self.database,
            appointment_fee: self.appointment_fee,
        })
    }
}
