use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Account as exposed to administrators. `password` is accepted on input
/// and never serialized back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 50, message = "UserName is required and cannot exceed 50 characters."))]
    pub user_name: String,
    #[serde(default, skip_serializing)]
    #[validate(length(max = 100, message = "Password cannot exceed 100 characters."))]
    pub password: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100, message = "FullName cannot exceed 100 characters."))]
    pub full_name: Option<String>,
    /// Checked with `models::user::validate_email`, the same rule registration uses.
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoleDto {
    pub id: i32,
    pub name: String,
}

/// Role body accepted either as a bare string or as a list of strings.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RoleNames {
    One(String),
    Many(Vec<String>),
}

impl RoleNames {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            RoleNames::One(name) => vec![name],
            RoleNames::Many(names) => names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_is_write_only() {
        let dto: UserDto = serde_json::from_str(
            r#"{"userName":"jdoe","password":"Secr3t!pass","email":"j@d.com","roles":["User"]}"#,
        )
        .unwrap();
        assert_eq!(dto.password.as_deref(), Some("Secr3t!pass"));
        let out = serde_json::to_value(&dto).unwrap();
        assert!(out.get("password").is_none());
        assert_eq!(out["userName"], "jdoe");
    }

    #[test]
    fn role_names_accept_string_or_list() {
        let one: RoleNames = serde_json::from_str(r#""Admin""#).unwrap();
        let many: RoleNames = serde_json::from_str(r#"["Admin","User"]"#).unwrap();
        assert_eq!(one.into_vec(), vec!["Admin".to_string()]);
        assert_eq!(many.into_vec().len(), 2);
    }
}
