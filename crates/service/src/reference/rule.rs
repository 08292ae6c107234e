use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use models::rule_name;

use crate::errors::ServiceError;
use crate::repository::{write_versioned, CrudRepository};

/// A named business rule with its JSON, template and SQL fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleDto {
    #[serde(default)]
    pub id: Option<i32>,
    #[validate(length(min = 1, max = 100, message = "Name is required and cannot exceed 100 characters."))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters."))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Json is required."))]
    pub json: String,
    #[validate(length(min = 1, message = "Template is required."))]
    pub template: String,
    #[validate(length(min = 1, message = "SqlStr is required."))]
    pub sql_str: String,
    #[validate(length(min = 1, message = "SqlPart is required."))]
    pub sql_part: String,
}

impl From<rule_name::Model> for RuleDto {
    fn from(m: rule_name::Model) -> Self {
        Self {
            id: Some(m.id),
            name: m.name,
            description: m.description,
            json: m.json,
            template: m.template,
            sql_str: m.sql_str,
            sql_part: m.sql_part,
        }
    }
}

impl RuleDto {
    fn into_active_model(self) -> rule_name::ActiveModel {
        rule_name::ActiveModel {
            id: NotSet,
            name: Set(self.name),
            description: Set(self.description),
            json: Set(self.json),
            template: Set(self.template),
            sql_str: Set(self.sql_str),
            sql_part: Set(self.sql_part),
            version: NotSet,
        }
    }
}

pub struct RuleRepository;

#[async_trait]
impl CrudRepository for RuleRepository {
    type Id = i32;
    type Dto = RuleDto;
    const ENTITY: &'static str = "RuleName";

    fn dto_id(dto: &RuleDto) -> Option<i32> { dto.id }

    async fn list<C: ConnectionTrait>(conn: &C) -> Result<Vec<RuleDto>, ServiceError> {
        let rows = rule_name::Entity::find().order_by_asc(rule_name::Column::Id).all(conn).await?;
        Ok(rows.into_iter().map(RuleDto::from).collect())
    }

    async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Option<RuleDto>, ServiceError> {
        Ok(rule_name::Entity::find_by_id(id).one(conn).await?.map(RuleDto::from))
    }

    async fn create<C: ConnectionTrait>(conn: &C, dto: RuleDto) -> Result<RuleDto, ServiceError> {
        dto.validate()?;
        let mut am = dto.into_active_model();
        am.version = Set(1);
        let created = am.insert(conn).await?;
        info!(id = created.id, name = %created.name, "rule created");
        Ok(created.into())
    }

    async fn update<C: ConnectionTrait>(conn: &C, id: i32, dto: RuleDto) -> Result<Option<RuleDto>, ServiceError> {
        dto.validate()?;
        let Some(current) = rule_name::Entity::find_by_id(id).one(conn).await? else {
            return Ok(None);
        };
        let written = write_versioned::<rule_name::Entity, _>(
            conn,
            Self::ENTITY,
            rule_name::Column::Id,
            id,
            rule_name::Column::Version,
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
        let res = rule_name::Entity::delete_by_id(id).exec(conn).await?;
        Ok(res.rows_affected > 0)
    }

    async fn exists<C: ConnectionTrait>(conn: &C, id: i32) -> Result<bool, ServiceError> {
        Ok(rule_name::Entity::find_by_id(id).one(conn).await?.is_some())
    }
}
