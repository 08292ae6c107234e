/// Connection and pool configuration tests
pub mod db_tests;


/// Transaction commit, rollback and constraint handling
pub mod transaction_tests;
