//! Reference-data entities: DTOs plus their `CrudRepository` implementations.

pub mod bid;
pub mod curve_point;
pub mod rating;
pub mod rule;
pub mod trade;

pub use bid::{BidListDto, BidRepository};
pub use curve_point::{CurvePointDto, CurvePointRepository};
pub use rating::{RatingDto, RatingRepository};
pub use rule::{RuleDto, RuleRepository};
pub use trade::{TradeDto, TradeRepository};
