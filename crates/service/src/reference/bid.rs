use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use models::bid_list;

use crate::errors::ServiceError;
use crate::repository::{write_versioned, CrudRepository};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BidListDto {
    #[serde(default)]
    pub bid_list_id: Option<i32>,
    #[validate(length(min = 1, max = 50, message = "Account is required and cannot exceed 50 characters."))]
    pub account: String,
    #[validate(length(min = 1, max = 50, message = "BidType is required and cannot exceed 50 characters."))]
    pub bid_type: String,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "BidQuantity must be a non-negative number."))]
    pub bid_quantity: Option<f64>,
}

impl From<bid_list::Model> for BidListDto {
    fn from(m: bid_list::Model) -> Self {
        Self {
            bid_list_id: Some(m.id),
            account: m.account,
            bid_type: m.bid_type,
            bid_quantity: m.bid_quantity,
        }
    }
}

impl BidListDto {
    fn into_active_model(self) -> bid_list::ActiveModel {
        bid_list::ActiveModel {
            id: NotSet,
            account: Set(self.account),
            bid_type: Set(self.bid_type),
            bid_quantity: Set(self.bid_quantity),
            version: NotSet,
        }
    }
}

pub struct BidRepository;

#[async_trait]
impl CrudRepository for BidRepository {
    type Id = i32;
    type Dto = BidListDto;
    const ENTITY: &'static str = "BidList";

    fn dto_id(dto: &BidListDto) -> Option<i32> { dto.bid_list_id }

    async fn list<C: ConnectionTrait>(conn: &C) -> Result<Vec<BidListDto>, ServiceError> {
        let rows = bid_list::Entity::find().order_by_asc(bid_list::Column::Id).all(conn).await?;
        Ok(rows.into_iter().map(BidListDto::from).collect())
    }

    async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Option<BidListDto>, ServiceError> {
        Ok(bid_list::Entity::find_by_id(id).one(conn).await?.map(BidListDto::from))
    }

    async fn create<C: ConnectionTrait>(conn: &C, dto: BidListDto) -> Result<BidListDto, ServiceError> {
        dto.validate()?;
        let mut am = dto.into_active_model();
        am.version = Set(1);
        let created = am.insert(conn).await?;
        info!(id = created.id, "bid created");
        Ok(created.into())
    }

    async fn update<C: ConnectionTrait>(conn: &C, id: i32, dto: BidListDto) -> Result<Option<BidListDto>, ServiceError> {
        dto.validate()?;
        let Some(current) = bid_list::Entity::find_by_id(id).one(conn).await? else {
            return Ok(None);
        };
        let written = write_versioned::<bid_list::Entity, _>(
            conn,
            Self::ENTITY,
            bid_list::Column::Id,
            id,
            bid_list::Column::Version,
            current.version,
            dto.into_active_model(),
        )
        .await?;
        if !written {
            return Ok(None);
        }
        Self::get(conn, id).await
    }

    async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> Result<bool, ServiceError> {
        let res = bid_list::Entity::delete_by_id(id).exec(conn).await?;
        Ok(res.rows_affected > 0)
    }

    async fn exists<C: ConnectionTrait>(conn: &C, id: i32) -> Result<bool, ServiceError> {
        Ok(bid_list::Entity::find_by_id(id).one(conn).await?.is_some())
    }
}
