use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use models::trade;

use crate::errors::ServiceError;
use crate::repository::{write_versioned, CrudRepository};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TradeDto {
    #[serde(default)]
    pub trade_id: Option<i32>,
    #[validate(length(min = 1, max = 50, message = "Account is required and cannot exceed 50 characters."))]
    pub account: String,
    #[validate(length(min = 1, max = 50, message = "AccountType is required and cannot exceed 50 characters."))]
    pub account_type: String,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "BuyQuantity must be a non-negative number."))]
    pub buy_quantity: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "SellQuantity must be a non-negative number."))]
    pub sell_quantity: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "BuyPrice must be a non-negative number."))]
    pub buy_price: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "SellPrice must be a non-negative number."))]
    pub sell_price: Option<f64>,
    #[serde(default)]
    pub trade_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 100, message = "TradeSecurity cannot exceed 100 characters."))]
    pub trade_security: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50, message = "TradeStatus cannot exceed 50 characters."))]
    pub trade_status: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50, message = "Trader cannot exceed 50 characters."))]
    pub trader: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50, message = "Benchmark cannot exceed 50 characters."))]
    pub benchmark: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50, message = "Book cannot exceed 50 characters."))]
    pub book: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50, message = "CreationName cannot exceed 50 characters."))]
    pub creation_name: Option<String>,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 50, message = "RevisionName cannot exceed 50 characters."))]
    pub revision_name: Option<String>,
    #[serde(default)]
    pub revision_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 50, message = "DealName cannot exceed 50 characters."))]
    pub deal_name: Option<String>,
}

impl From<trade::Model> for TradeDto {
    fn from(m: trade::Model) -> Self {
        Self {
            trade_id: Some(m.id),
            account: m.account,
            account_type: m.account_type,
            buy_quantity: m.buy_quantity,
            sell_quantity: m.sell_quantity,
            buy_price: m.buy_price,
            sell_price: m.sell_price,
            trade_date: m.trade_date,
            trade_security: m.trade_security,
            trade_status: m.trade_status,
            trader: m.trader,
            benchmark: m.benchmark,
            book: m.book,
            creation_name: m.creation_name,
            creation_date: m.creation_date,
            revision_name: m.revision_name,
            revision_date: m.revision_date,
            deal_name: m.deal_name,
        }
    }
}

impl TradeDto {
    fn into_active_model(self) -> trade::ActiveModel {
        trade::ActiveModel {
            id: NotSet,
            account: Set(self.account),
            account_type: Set(self.account_type),
            buy_quantity: Set(self.buy_quantity),
            sell_quantity: Set(self.sell_quantity),
            buy_price: Set(self.buy_price),
            sell_price: Set(self.sell_price),
            trade_date: Set(self.trade_date),
            trade_security: Set(self.trade_security),
            trade_status: Set(self.trade_status),
            trader: Set(self.trader),
            benchmark: Set(self.benchmark),
            book: Set(self.book),
            creation_name: Set(self.creation_name),
            creation_date: Set(self.creation_date),
            revision_name: Set(self.revision_name),
            revision_date: Set(self.revision_date),
            deal_name: Set(self.deal_name),
            version: NotSet,
        }
    }
}

pub struct TradeRepository;

#[async_trait]
impl CrudRepository for TradeRepository {
    type Id = i32;
    type Dto = TradeDto;
    const ENTITY: &'static str = "Trade";

    fn dto_id(dto: &TradeDto) -> Option<i32> { dto.trade_id }

    async fn list<C: ConnectionTrait>(conn: &C) -> Result<Vec<TradeDto>, ServiceError> {
        let rows = trade::Entity::find().order_by_asc(trade::Column::Id).all(conn).await?;
        Ok(rows.into_iter().map(TradeDto::from).collect())
    }

    async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Option<TradeDto>, ServiceError> {
        Ok(trade::Entity::find_by_id(id).one(conn).await?.map(TradeDto::from))
    }

    async fn create<C: ConnectionTrait>(conn: &C, dto: TradeDto) -> Result<TradeDto, ServiceError> {
        dto.validate()?;
        let mut am = dto.into_active_model();
        am.version = Set(1);
        let created = am.insert(conn).await?;
        info!(id = created.id, account = %created.account, "trade created");
        Ok(created.into())
    }

    async fn update<C: ConnectionTrait>(conn: &C, id: i32, dto: TradeDto) -> Result<Option<TradeDto>, ServiceError> {
        dto.validate()?;
        let Some(current) = trade::Entity::find_by_id(id).one(conn).await? else {
            return Ok(None);
        };
        let written = write_versioned::<trade::Entity, _>(
            conn,
            Self::ENTITY,
            trade::Column::Id,
            id,
            trade::Column::Version,
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
        let res = trade::Entity::delete_by_id(id).exec(conn).await?;
        Ok(res.rows_affected > 0)
    }

    async fn exists<C: ConnectionTrait>(conn: &C, id: i32) -> Result<bool, ServiceError> {
        Ok(trade::Entity::find_by_id(id).one(conn).await?.is_some())
    }
}
