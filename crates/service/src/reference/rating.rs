use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use models::rating;

use crate::errors::ServiceError;
use crate::repository::{write_versioned, CrudRepository};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingDto {
    #[serde(default)]
    pub id: Option<i32>,
    #[validate(length(min = 1, max = 50, message = "MoodysRating is required and cannot exceed 50 characters."))]
    pub moodys_rating: String,
    #[validate(length(min = 1, max = 50, message = "SandPRating is required and cannot exceed 50 characters."))]
    pub sand_p_rating: String,
    #[validate(length(min = 1, max = 50, message = "FitchRating is required and cannot exceed 50 characters."))]
    pub fitch_rating: String,
    #[serde(default)]
    #[validate(range(min = 0, max = 255, message = "OrderNumber must be between 0 and 255."))]
    pub order_number: Option<i16>,
}

impl From<rating::Model> for RatingDto {
    fn from(m: rating::Model) -> Self {
        Self {
            id: Some(m.id),
            moodys_rating: m.moodys_rating,
            sand_p_rating: m.sand_p_rating,
            fitch_rating: m.fitch_rating,
            order_number: m.order_number,
        }
    }
}

impl RatingDto {
    fn into_active_model(self) -> rating::ActiveModel {
        rating::ActiveModel {
            id: NotSet,
            moodys_rating: Set(self.moodys_rating),
            sand_p_rating: Set(self.sand_p_rating),
            fitch_rating: Set(self.fitch_rating),
            order_number: Set(self.order_number),
            version: NotSet,
        }
    }
}

pub struct RatingRepository;

#[async_trait]
impl CrudRepository for RatingRepository {
    type Id = i32;
    type Dto = RatingDto;
    const ENTITY: &'static str = "Rating";

    fn dto_id(dto: &RatingDto) -> Option<i32> { dto.id }

    async fn list<C: ConnectionTrait>(conn: &C) -> Result<Vec<RatingDto>, ServiceError> {
        let rows = rating::Entity::find().order_by_asc(rating::Column::Id).all(conn).await?;
        Ok(rows.into_iter().map(RatingDto::from).collect())
    }

    async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Option<RatingDto>, ServiceError> {
        Ok(rating::Entity::find_by_id(id).one(conn).await?.map(RatingDto::from))
    }

    async fn create<C: ConnectionTrait>(conn: &C, dto: RatingDto) -> Result<RatingDto, ServiceError> {
        dto.validate()?;
        let mut am = dto.into_active_model();
        am.version = Set(1);
        let created = am.insert(conn).await?;
        info!(id = created.id, "rating created");
        Ok(created.into())
    }

    async fn update<C: ConnectionTrait>(conn: &C, id: i32, dto: RatingDto) -> Result<Option<RatingDto>, ServiceError> {
        dto.validate()?;
        let Some(current) = rating::Entity::find_by_id(id).one(conn).await? else {
            return Ok(None);
        };
        let written = write_versioned::<rating::Entity, _>(
            conn,
            Self::ENTITY,
            rating::Column::Id,
            id,
            rating::Column::Version,
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
        let res = rating::Entity::delete_by_id(id).exec(conn).await?;
        Ok(res.rows_affected > 0)
    }

    async fn exists<C: ConnectionTrait>(conn: &C, id: i32) -> Result<bool, ServiceError> {
        Ok(rating::Entity::find_by_id(id).one(conn).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn round_trip_through_store() -> anyhow::Result<()> {
        let db = get_db().await?;
        let input = RatingDto {
            id: None,
            moodys_rating: "Aa1".into(),
            sand_p_rating: "AA+".into(),
            fitch_rating: "AA+".into(),
            order_number: Some(2),
        };
        let created = RatingRepository::create(&db, input.clone()).await?;
        let id = created.id.expect("id");
        assert_eq!(RatingDto { id: None, ..created.clone() }, input);

        assert!(RatingRepository::delete(&db, id).await?);
        assert!(!RatingRepository::exists(&db, id).await?);
        assert_eq!(RatingRepository::get(&db, id).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn empty_agency_rating_is_rejected() -> anyhow::Result<()> {
        let db = get_db().await?;
        let input = RatingDto { id: None, moodys_rating: String::new(), sand_p_rating: "A".into(), fitch_rating: "A".into(), order_number: None };
        let err = RatingRepository::create(&db, input).await.unwrap_err();
        assert!(err.to_string().contains("MoodysRating"));
        Ok(())
    }
}
