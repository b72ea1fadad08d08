//! Auth and client-config DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use saju::AuthUser;

/// Settings the browser page needs at load time
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfigResponse {
    /// Kakao JavaScript key for sharing, if configured
    pub kakao_js_key: Option<String>,
    /// Whether login is required
    pub auth_enabled: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginQuery {
    /// Where Supabase sends the browser after login
    pub redirect_to: Option<String>,
}

/// Current user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub display_name: String,
    pub anonymous: bool,
}

impl From<AuthUser> for MeResponse {
    fn from(user: AuthUser) -> Self {
        Self {
            display_name: user.display_name(),
            anonymous: user.is_anonymous(),
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}
