use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "curve_point")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub curve_id: i16,
    pub term: Option<f64>,
    pub curve_point_value: Option<f64>,
    pub as_of_date: Option<DateTimeUtc>,
    pub creation_date: Option<DateTimeUtc>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
