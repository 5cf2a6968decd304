pub mod repo_impl;
pub mod exist_by_ids;
pub mod load_batch;
pub mod find_by_phone_number;
pub mod find_or_create_by_phone;

pub use repo_impl::GuardianRepositoryImpl;
