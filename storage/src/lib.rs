use crowdfund_status::{failed_precondition, internal, Status};

pub mod database {
    pub mod client;
    pub mod store;
}
pub mod models {
    pub mod campaign;
    pub mod donation;
    pub mod organization;
}
pub mod sqlx {
    pub mod client;
    pub mod store;
}
pub mod stores {
    pub mod campaign;
    pub mod donation;
    pub mod donation_and_campaign;
    pub mod organization;
}

/// SQLSTATE raised by postgres when a write or delete breaks a foreign key.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Error occurred when executing some SQL operation.
    #[error("sql failed: {0:?}")]
    Sql(::sqlx::Error),

    /// A row is still referenced by (or would reference) a missing row.
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Error occurred when running migrations.
    #[error("migration failed: {0:?}")]
    Migrate(#[from] ::sqlx::migrate::MigrateError),

    /// Some other/unexpected error occurred.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<::sqlx::Error> for Error {
    fn from(error: ::sqlx::Error) -> Self {
        match &error {
            ::sqlx::Error::Database(database_error)
                if database_error.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) =>
            {
                Error::ForeignKeyViolation(database_error.message().to_string())
            }
            _ => Error::Sql(error),
        }
    }
}

impl From<Error> for Status {
    fn from(error: Error) -> Self {
        match error {
            Error::ForeignKeyViolation(message) => {
                failed_precondition!("operation violates referential integrity: {}", message)
            }
            error => internal!("storage error: {:?}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crowdfund_status::Code;

    #[test]
    fn foreign_key_violation_maps_to_failed_precondition() {
        let status: Status = Error::ForeignKeyViolation("campaigns_organization_id_fkey".into()).into();
        assert_eq!(status.code(), Code::FailedPrecondition);
        assert!(status.message().contains("campaigns_organization_id_fkey"));
    }

    #[test]
    fn other_errors_map_to_internal() {
        let status: Status = Error::Sql(::sqlx::Error::RowNotFound).into();
        assert_eq!(status.code(), Code::Internal);

        let status: Status = Error::Other(anyhow::anyhow!("broken")).into();
        assert_eq!(status.code(), Code::Internal);
    }

    #[test]
    fn non_database_sqlx_errors_stay_sql() {
        assert!(matches!(
            Error::from(::sqlx::Error::PoolTimedOut),
            Error::Sql(::sqlx::Error::PoolTimedOut)
        ));
    }
}
