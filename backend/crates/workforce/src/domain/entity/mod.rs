pub mod audit_entry;
pub mod complaint;
pub mod incident;
pub mod verification_record;
pub mod worker;
