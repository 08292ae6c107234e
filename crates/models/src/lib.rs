pub mod errors;
pub mod db;
pub mod bid_list;
pub mod curve_point;
pub mod rating;
pub mod rule_name;
pub mod trade;
pub mod user;
pub mod role;
pub mod user_role;
pub mod user_credentials;

#[cfg(test)]
mod tests;
