pub mod create_batch;
pub mod delete_batch;
pub mod exist_by_ids;
pub mod find_by_filter;
pub mod find_by_student;
pub mod find_overdue;
pub mod load_batch;
pub mod repo_impl;
pub mod statistics;
pub mod update_batch;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::FeeRepositoryImpl;
