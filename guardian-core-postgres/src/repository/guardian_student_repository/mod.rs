pub mod repo_impl;
pub mod create;
pub mod find;
pub mod update;
pub mod delete;
pub mod list_by_student;
pub mod list_by_guardian;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::GuardianStudentRepositoryImpl;
