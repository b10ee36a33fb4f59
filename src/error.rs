use thiserror::Error;

pub type Result<T, E = KycError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum KycError {
    #[error("This request for KYC has already been closed")]
    AlreadyClosed,
    #[error("This request for KYC has already been approved")]
    AlreadyApproved,
    #[error("All two parties have already approved this request for KYC")]
    AlreadyFullyApproved,
    #[error("This person has already approved this request for KYC")]
    DuplicateApproval,
    #[error("Your bank has already approved of this request")]
    BankAlreadyApproved,
    #[error(
        "Cannot close this request for KYC until it is fully approved and the product has been received by the applicant"
    )]
    NotReadyForClose,
    #[error("KYC request {0} not found")]
    NotFound(String),
    #[error("KYC request {0} already exists")]
    AlreadyExists(String),
    #[error("Unknown party: {0}")]
    UnknownParty(String),
    #[error("Only a customer can apply for KYC")]
    ApplicantNotCustomer,
    #[error("Stale write on KYC request {id}: submitted version {submitted}, stored version {stored}")]
    VersionConflict {
        id: String,
        submitted: u64,
        stored: u64,
    },
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}
