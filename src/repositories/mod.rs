pub mod attempt_repository;
pub mod descriptive_repository;
pub mod pdf_repository;
pub mod result_repository;
pub mod test_repository;
pub mod user_repository;

pub use attempt_repository::{AttemptRepository, MongoAttemptRepository};
pub use descriptive_repository::{DescriptiveRepository, MongoDescriptiveRepository};
pub use pdf_repository::{MongoPdfRepository, PdfRepository};
pub use result_repository::{MongoResultRepository, ResultRepository};
pub use test_repository::{MongoTestRepository, TestRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

use mongodb::{
    bson::{doc, Document},
    error::{Error, ErrorKind, WriteFailure},
};

const DUPLICATE_KEY: i32 = 11000;

pub(crate) fn is_duplicate_key(err: &Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

/// Ids are UUIDv7, so id order is creation order. `created_at` is stored as
/// an RFC 3339 string and does not sort by instant.
pub(crate) fn newest_first() -> Document {
    doc! { "id": -1 }
}

pub(crate) fn oldest_first() -> Document {
    doc! { "id": 1 }
}
