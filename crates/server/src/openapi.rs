//! OpenAPI document served at `/api-docs/openapi.json`.
//!
//! Auth and role endpoints are annotated directly. The reference-data
//! resources share generic handlers, so their paths are added here.

use serde::Serialize;
use utoipa::openapi::path::{OperationBuilder, ParameterBuilder, ParameterIn, PathItem, PathItemType};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme};
use utoipa::openapi::{
    ArrayBuilder, ContentBuilder, ObjectBuilder, Ref, RefOr, Required, ResponseBuilder, Schema, SchemaType,
};
use utoipa::{Modify, OpenApi, ToSchema};

use service::auth::domain::{AuthSession, AuthUser, LoginInput, RegisterInput};
use service::auth::Claims;
use service::reference::{BidListDto, CurvePointDto, RatingDto, RuleDto, TradeDto};
use service::user::{RoleDto, RoleNames, UserDto};

use crate::routes::{auth::RegisterOutput, users::AddRolesOutput};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Body of every error response and of delete/role acknowledgements.
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Poseidon API", description = "Financial reference data with user and role administration."),
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::users::user_roles,
        crate::routes::users::add_roles,
        crate::routes::users::set_roles,
        crate::routes::users::remove_role,
        crate::routes::users::list_roles,
        crate::routes::users::create_role,
        crate::routes::users::delete_role,
    ),
    components(schemas(
        HealthResponse,
        MessageResponse,
        RegisterInput,
        RegisterOutput,
        LoginInput,
        AuthUser,
        AuthSession,
        Claims,
        BidListDto,
        CurvePointDto,
        RatingDto,
        RuleDto,
        TradeDto,
        UserDto,
        RoleDto,
        RoleNames,
        AddRolesOutput,
    )),
    tags(
        (name = "health"),
        (name = "auth", description = "Registration, login and session"),
        (name = "reference", description = "Bids, curve points, ratings, rules and trades"),
        (name = "users", description = "User accounts and role membership (Admin)"),
        (name = "roles", description = "Role catalogue (Admin)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

/// (base path, tag, body schema, id schema type)
const RESOURCES: &[(&str, &str, &str, bool)] = &[
    ("/bids", "reference", "BidListDto", true),
    ("/curve-points", "reference", "CurvePointDto", true),
    ("/ratings", "reference", "RatingDto", true),
    ("/rules", "reference", "RuleDto", true),
    ("/trades", "reference", "TradeDto", true),
    ("/users", "users", "UserDto", false),
];

fn json_content(schema: impl Into<RefOr<Schema>>) -> utoipa::openapi::Content {
    ContentBuilder::new().schema(schema).build()
}

fn response(description: &str, schema: Option<RefOr<Schema>>) -> utoipa::openapi::Response {
    let builder = ResponseBuilder::new().description(description);
    match schema {
        Some(s) => builder.content("application/json", json_content(s)).build(),
        None => builder.build(),
    }
}

fn message() -> Option<RefOr<Schema>> {
    Some(Ref::from_schema_name("MessageResponse").into())
}

fn crud_operations(name: &str, tag: &str, schema: &str, int_id: bool) -> [(String, PathItemType, utoipa::openapi::path::Operation); 5] {
    let item: RefOr<Schema> = Ref::from_schema_name(schema).into();
    let list = RefOr::T(Schema::Array(ArrayBuilder::new().items(Ref::from_schema_name(schema)).build()));
    let id_type = if int_id { SchemaType::Integer } else { SchemaType::String };
    let id_param = || {
        ParameterBuilder::new()
            .name("id")
            .parameter_in(ParameterIn::Path)
            .required(Required::True)
            .schema(Some(RefOr::T(Schema::Object(ObjectBuilder::new().schema_type(id_type.clone()).build()))))
            .build()
    };
    let body = || {
        RequestBodyBuilder::new()
            .content("application/json", json_content(Ref::from_schema_name(schema)))
            .required(Some(Required::True))
            .build()
    };
    let op = |id: String| {
        OperationBuilder::new()
            .tag(tag)
            .operation_id(Some(id))
            .security(SecurityRequirement::new("bearer", Vec::<String>::new()))
            .response("401", response("Unauthorized", message()))
    };
    let base = name.to_string();
    let at = format!("{name}/{{id}}");
    let slug = name.trim_start_matches('/').replace('-', "_");
    [
        (
            base.clone(),
            PathItemType::Get,
            op(format!("list_{slug}")).response("200", response("All rows", Some(list))).build(),
        ),
        (
            base,
            PathItemType::Post,
            op(format!("create_{slug}"))
                .request_body(Some(body()))
                .response("201", response("Created; Location header points at the new row", Some(item.clone())))
                .response("400", response("Validation failed or malformed JSON", message()))
                .response("403", response("Admin role required", message()))
                .build(),
        ),
        (
            at.clone(),
            PathItemType::Get,
            op(format!("get_{slug}"))
                .parameter(id_param())
                .response("200", response("Row", Some(item.clone())))
                .response("404", response("Not Found", message()))
                .build(),
        ),
        (
            at.clone(),
            PathItemType::Put,
            op(format!("update_{slug}"))
                .parameter(id_param())
                .request_body(Some(body()))
                .response("200", response("Updated row", Some(item)))
                .response("400", response("Validation failed or id mismatch", message()))
                .response("403", response("Admin role required", message()))
                .response("404", response("Not Found", message()))
                .response("409", response("Concurrent modification or duplicate", message()))
                .build(),
        ),
        (
            at,
            PathItemType::Delete,
            op(format!("delete_{slug}"))
                .parameter(id_param())
                .response("200", response("Deleted", message()))
                .response("403", response("Admin role required", message()))
                .response("404", response("Not Found", message()))
                .build(),
        ),
    ]
}

impl ApiDoc {
    /// Annotated paths plus the generic CRUD resources.
    pub fn document() -> utoipa::openapi::OpenApi {
        let mut doc = ApiDoc::openapi();
        for (name, tag, schema, int_id) in RESOURCES {
            for (path, method, operation) in crud_operations(name, tag, schema, *int_id) {
                match doc.paths.paths.get_mut(&path) {
                    Some(existing) => {
                        existing.operations.insert(method, operation);
                    }
                    None => {
                        doc.paths.paths.insert(path, PathItem::new(method, operation));
                    }
                }
            }
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_crud_and_annotated_paths() {
        let doc = ApiDoc::document();
        let paths = &doc.paths.paths;
        for p in ["/health", "/auth/login", "/bids", "/bids/{id}", "/trades/{id}", "/users/{id}", "/users/{id}/roles", "/roles/{name}"] {
            assert!(paths.contains_key(p), "missing {p}");
        }
        assert_eq!(paths["/curve-points/{id}"].operations.len(), 3);
        assert!(doc.components.unwrap().security_schemes.contains_key("bearer"));
    }
}
