use crowdfund_storage::Error;
use log::{error, warn};
use tonic::Status;

/// Converts a storage error into the status returned to the caller, logging
/// it along the way.
pub fn storage_status(err: Error) -> Status {
    match &err {
        Error::ForeignKeyViolation(message) => {
            warn!("Rejected by referential integrity: {}", message)
        }
        other => error!("Storage failure: {:?}", other),
    }
    err.into()
}
