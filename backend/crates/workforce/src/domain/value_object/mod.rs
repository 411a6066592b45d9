pub mod complaint;
pub mod severity;
pub mod status;
pub mod worker_category;
pub mod worker_identifier;
