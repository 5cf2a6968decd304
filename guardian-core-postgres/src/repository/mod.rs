pub mod audit;
pub mod communication;
pub mod db_init;
pub mod finance;
pub mod guardian_repository;
pub mod guardian_student_repository;
pub mod student_repository;
