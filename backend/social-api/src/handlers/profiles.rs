//! GET /api/users/{user_id}/profile - Profile with follow counts
//! PUT /api/profile                 - Update the caller's profile

use actix_web::{web, HttpResponse};
use actix_middleware::Session;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::parse_id;
use crate::app_state::AppState;
use crate::domain::models::{FollowCounts, Profile, ProfileUpdate};
use crate::error::{AppError, Result};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(flatten)]
    pub counts: FollowCounts,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,
    #[validate(length(max = 160, message = "introduction must be at most 160 characters"))]
    pub introduction: Option<String>,
    #[validate(url(message = "icon must be a URL"))]
    pub icon: Option<String>,
}

impl UpdateProfileRequest {
    /// Trim the name and drop empty optional fields before validation.
    fn normalized(self) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            name: self.name.trim().to_string(),
            introduction: non_empty(self.introduction),
            icon: non_empty(self.icon).map(|s| s.trim().to_string()),
        }
    }
}

pub async fn get_profile(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let user_id = parse_id(&path.into_inner(), "user id")?;

    let profile = state
        .profiles
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    let counts = state.follows.counts(user_id).await?;

    Ok(HttpResponse::Ok().json(ProfileResponse { profile, counts }))
}

pub async fn update_profile(
    body: web::Json<UpdateProfileRequest>,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse> {
    let user_id = session.require()?;

    let request = body.into_inner().normalized();
    request.validate()?;

    let update = ProfileUpdate {
        name: request.name,
        introduction: request.introduction,
        icon: request.icon,
    };

    let profile = state
        .profiles
        .update_profile(user_id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(HttpResponse::Ok().json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_request_validates() {
        let request = UpdateProfileRequest {
            name: "  hanako  ".to_string(),
            introduction: Some("".to_string()),
            icon: Some(" https://example.com/a.png ".to_string()),
        }
        .normalized();

        assert_eq!(request.name, "hanako");
        assert_eq!(request.introduction, None);
        assert_eq!(request.icon.as_deref(), Some("https://example.com/a.png"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_name_and_bad_icon_rejected() {
        let request = UpdateProfileRequest {
            name: "   ".to_string(),
            introduction: None,
            icon: Some("not a url".to_string()),
        }
        .normalized();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("icon"));
    }
}
