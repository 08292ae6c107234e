use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use models::curve_point;

use crate::errors::ServiceError;
use crate::repository::{write_versioned, CrudRepository};

/// One point on a yield curve.
///
/// `curveId` is a byte-sized curve identifier, not a foreign key.
/// Dates default to the time of creation when omitted from a create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurvePointDto {
    #[serde(default)]
    pub id: Option<i32>,
    #[validate(range(min = 0, max = 255, message = "CurveId must be between 0 and 255."))]
    pub curve_id: i16,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Term must be a non-negative number."))]
    pub term: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "CurvePointValue must be a non-negative number."))]
    pub curve_point_value: Option<f64>,
    #[serde(default)]
    pub as_of_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
}

impl From<curve_point::Model> for CurvePointDto {
    fn from(m: curve_point::Model) -> Self {
        Self {
            id: Some(m.id),
            curve_id: m.curve_id,
            term: m.term,
            curve_point_value: m.curve_point_value,
            as_of_date: m.as_of_date,
            creation_date: m.creation_date,
        }
    }
}

impl CurvePointDto {
    fn into_active_model(self) -> curve_point::ActiveModel {
        curve_point::ActiveModel {
            id: NotSet,
            curve_id: Set(self.curve_id),
            term: Set(self.term),
            curve_point_value: Set(self.curve_point_value),
            as_of_date: Set(self.as_of_date),
            creation_date: Set(self.creation_date),
            version: NotSet,
        }
    }
}

pub struct CurvePointRepository;

#[async_trait]
impl CrudRepository for CurvePointRepository {
    type Id = i32;
    type Dto = CurvePointDto;
    const ENTITY: &'static str = "CurvePoint";

    fn dto_id(dto: &CurvePointDto) -> Option<i32> { dto.id }

    async fn list<C: ConnectionTrait>(conn: &C) -> Result<Vec<CurvePointDto>, ServiceError> {
        let rows = curve_point::Entity::find().order_by_asc(curve_point::Column::Id).all(conn).await?;
        Ok(rows.into_iter().map(CurvePointDto::from).collect())
    }

    async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Option<CurvePointDto>, ServiceError> {
        Ok(curve_point::Entity::find_by_id(id).one(conn).await?.map(CurvePointDto::from))
    }

    async fn create<C: ConnectionTrait>(conn: &C, mut dto: CurvePointDto) -> Result<CurvePointDto, ServiceError> {
        dto.validate()?;
        let now = Utc::now();
        dto.as_of_date.get_or_insert(now);
        dto.creation_date.get_or_insert(now);
        let mut am = dto.into_active_model();
        am.version = Set(1);
        let created = am.insert(conn).await?;
        info!(id = created.id, curve_id = created.curve_id, "curve point created");
        Ok(created.into())
    }

    async fn update<C: ConnectionTrait>(conn: &C, id: i32, dto: CurvePointDto) -> Result<Option<CurvePointDto>, ServiceError> {
        dto.validate()?;
        let Some(current) = curve_point::Entity::find_by_id(id).one(conn).await? else {
            return Ok(None);
        };
        let written = write_versioned::<curve_point::Entity, _>(
            conn,
            Self::ENTITY,
            curve_point::Column::Id,
            id,
            curve_point::Column::Version,
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
        let res = curve_point::Entity::delete_by_id(id).exec(conn).await?;
        Ok(res.rows_affected > 0)
    }

    async fn exists<C: ConnectionTrait>(conn: &C, id: i32) -> Result<bool, ServiceError> {
        Ok(curve_point::Entity::find_by_id(id).one(conn).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn dto(curve_id: i16) -> CurvePointDto {
        CurvePointDto { id: None, curve_id, term: Some(1.5), curve_point_value: Some(2.25), as_of_date: None, creation_date: None }
    }

    #[tokio::test]
    async fn create_fills_missing_dates() -> anyhow::Result<()> {
        let db = get_db().await?;
        let created = CurvePointRepository::create(&db, dto(3)).await?;
        assert!(created.as_of_date.is_some());
        assert!(created.creation_date.is_some());
        assert_eq!(created.curve_id, 3);
        Ok(())
    }

    #[tokio::test]
    async fn curve_id_must_fit_a_byte() -> anyhow::Result<()> {
        let db = get_db().await?;
        assert!(matches!(CurvePointRepository::create(&db, dto(256)).await, Err(ServiceError::Validation(_))));
        assert!(matches!(CurvePointRepository::create(&db, dto(-1)).await, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() -> anyhow::Result<()> {
        let db = get_db().await?;
        for c in [9, 4, 7] {
            CurvePointRepository::create(&db, dto(c)).await?;
        }
        let ids: Vec<i32> = CurvePointRepository::list(&db).await?.into_iter().filter_map(|d| d.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 3);
        Ok(())
    }
}
