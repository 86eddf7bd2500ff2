//! Authentication route handlers.
//!
//! Login, registration, and logout. Expected failures redirect back to the
//! form with an `?error=` code; only infrastructure failures become errors.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::cart::header_cart_count;
use crate::services::{AuthError, AuthService, CartService, auth::Registration};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart_count: u32,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart_count: u32,
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let cart_count = header_cart_count(&state, &session, current_user.as_ref()).await;
    LoginTemplate {
        current_user,
        cart_count,
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
///
/// On success the guest cart is merged into the user's persisted cart.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool());
    let user = match auth.login(form.username.trim(), &form.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            return Redirect::to("/auth/login?error=credentials").into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "login failed");
            return Redirect::to("/auth/login?error=failed").into_response();
        }
    };

    let current_user = CurrentUser::from(&user);
    if let Err(e) = set_current_user(&session, &current_user).await {
        tracing::error!(error = %e, "failed to set session");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    // Anything added while browsing as a guest follows the user in.
    if let Err(e) = CartService::new(state.pool())
        .merge_guest_cart(&session, user.id)
        .await
    {
        tracing::error!(error = %e, "failed to merge guest cart on login");
    }

    Redirect::to("/account").into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let cart_count = header_cart_count(&state, &session, current_user.as_ref()).await;
    RegisterTemplate {
        current_user,
        cart_count,
        error: query.error,
    }
}

/// Handle registration form submission.
///
/// Registration does not log the user in; they land on the login page with a
/// success banner.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let auth = AuthService::new(state.pool());
    let result = auth
        .register(Registration {
            username: form.username.trim(),
            email: form.email.trim(),
            password: &form.password,
            password_confirm: &form.password_confirm,
            first_name: form.first_name.as_deref().map(str::trim),
            last_name: form.last_name.as_deref().map(str::trim),
        })
        .await;

    match result {
        Ok(_) => Redirect::to("/auth/login?success=registered").into_response(),
        Err(AuthError::PasswordMismatch) => {
            Redirect::to("/auth/register?error=password_mismatch").into_response()
        }
        Err(AuthError::WeakPassword(_)) => {
            Redirect::to("/auth/register?error=password_too_short").into_response()
        }
        Err(AuthError::InvalidUsername(_)) => {
            Redirect::to("/auth/register?error=invalid_username").into_response()
        }
        Err(AuthError::InvalidEmail(_)) => {
            Redirect::to("/auth/register?error=invalid_email").into_response()
        }
        Err(AuthError::UsernameTaken) => {
            Redirect::to("/auth/register?error=username_taken").into_response()
        }
        Err(AuthError::EmailTaken) => {
            Redirect::to("/auth/register?error=email_taken").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "registration failed");
            Redirect::to("/auth/register?error=failed").into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout. Destroys the whole session, guest cart included.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "failed to clear session");
    }

    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "failed to flush session");
    }

    Redirect::to("/").into_response()
}
