use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trade")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub account: String,
    pub account_type: String,
    pub buy_quantity: Option<f64>,
    pub sell_quantity: Option<f64>,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub trade_date: Option<DateTimeUtc>,
    pub trade_security: Option<String>,
    pub trade_status: Option<String>,
    pub trader: Option<String>,
    pub benchmark: Option<String>,
    pub book: Option<String>,
    pub creation_name: Option<String>,
    pub creation_date: Option<DateTimeUtc>,
    pub revision_name: Option<String>,
    pub revision_date: Option<DateTimeUtc>,
    pub deal_name: Option<String>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
