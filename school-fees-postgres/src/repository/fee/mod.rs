pub mod fee_repository;
