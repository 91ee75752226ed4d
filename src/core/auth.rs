//! Sessions, roles and capabilities
//!
//! The dashboard used to read the role and token from ambient storage in
//! every component. Here the session is an explicit value passed to whoever
//! needs it, and the question "may this role do that to a record in this
//! state" has exactly one answer: [`Capabilities::allowed_actions`].

use crate::core::error::{AuthError, DeskResult, ValidationError};
use crate::core::status::MeasurementStatus;
use crate::core::validation::FormErrors;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use validator::Validate;

/// Dashboard role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Office staff: full control over appointments and users
    #[default]
    Admin,
    /// Field user: works on appointments assigned to them
    Normal,
}

impl Role {
    /// Parse a stored role; anything missing or unknown falls back to admin
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("normal") => Role::Normal,
            _ => Role::Admin,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Normal => "normal",
        }
    }

    /// Statuses this role sees on the overview
    pub fn visible_statuses(&self) -> &'static [MeasurementStatus] {
        match self {
            Role::Admin => &MeasurementStatus::ALL,
            Role::Normal => &[MeasurementStatus::Assigned, MeasurementStatus::InProgress],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something a user can do to a measurement appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    /// Customer name, mobile and address
    EditCustomerDetails,
    AssignUser,
    ChangeDate,
    /// Add, remove and edit area rows (name, dimensions, notes)
    EditAreas,
    /// Upload, capture and remove photos
    ManagePhotos,
    Delete,
    Share,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::View,
        Action::Create,
        Action::EditCustomerDetails,
        Action::AssignUser,
        Action::ChangeDate,
        Action::EditAreas,
        Action::ManagePhotos,
        Action::Delete,
        Action::Share,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::EditCustomerDetails => "edit customer details",
            Action::AssignUser => "assign a user",
            Action::ChangeDate => "change the date",
            Action::EditAreas => "edit areas",
            Action::ManagePhotos => "manage photos",
            Action::Delete => "delete",
            Action::Share => "share",
        }
    }
}

/// Set of actions allowed in one context
pub type ActionSet = BTreeSet<Action>;

/// Access policy for one action
#[derive(Debug, Clone)]
pub enum AccessPolicy {
    /// Every role, every status
    Public,

    /// Role must be one of these
    HasRole(Vec<Role>),

    /// Record must not be approved yet (new records count as not approved)
    NotApproved,

    /// Only for a record that does not exist yet
    NewRecord,

    /// Combination of policies (AND)
    And(Vec<AccessPolicy>),

    /// Combination of policies (OR)
    Or(Vec<AccessPolicy>),
}

impl AccessPolicy {
    /// Check the policy for a role acting on a record in `status`
    ///
    /// `status` is `None` for a record that does not exist yet.
    pub fn check(&self, role: Role, status: Option<MeasurementStatus>) -> bool {
        match self {
            AccessPolicy::Public => true,
            AccessPolicy::HasRole(roles) => roles.contains(&role),
            AccessPolicy::NotApproved => !status.is_some_and(|s| s.is_approved()),
            AccessPolicy::NewRecord => status.is_none(),
            AccessPolicy::And(policies) => policies.iter().all(|p| p.check(role, status)),
            AccessPolicy::Or(policies) => policies.iter().any(|p| p.check(role, status)),
        }
    }

    /// Parse policy from string (for YAML config)
    pub fn parse_policy(s: &str) -> Self {
        match s {
            "public" => AccessPolicy::Public,
            "not_approved" => AccessPolicy::NotApproved,
            "admin_only" => AccessPolicy::HasRole(vec![Role::Admin]),
            "admin_unless_approved" => AccessPolicy::And(vec![
                AccessPolicy::HasRole(vec![Role::Admin]),
                AccessPolicy::NotApproved,
            ]),
            _ => AccessPolicy::HasRole(vec![Role::Admin]),
        }
    }
}

/// The single place that decides which controls a role gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    role: Role,
}

impl Capabilities {
    pub fn for_role(role: Role) -> Self {
        Self { role }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Policy guarding `action`
    pub fn policy(action: Action) -> AccessPolicy {
        match action {
            Action::View | Action::Share => AccessPolicy::Public,
            Action::Create => AccessPolicy::And(vec![
                AccessPolicy::HasRole(vec![Role::Admin]),
                AccessPolicy::NewRecord,
            ]),
            Action::Delete => AccessPolicy::HasRole(vec![Role::Admin]),
            Action::EditCustomerDetails | Action::AssignUser | Action::ChangeDate => {
                AccessPolicy::parse_policy("admin_unless_approved")
            }
            Action::EditAreas | Action::ManagePhotos => AccessPolicy::NotApproved,
        }
    }

    /// Everything this role may do to a record in `status`
    pub fn allowed_actions(&self, status: Option<MeasurementStatus>) -> ActionSet {
        Action::ALL
            .into_iter()
            .filter(|action| self.can(status, *action))
            .collect()
    }

    pub fn can(&self, status: Option<MeasurementStatus>, action: Action) -> bool {
        Self::policy(action).check(self.role, status)
    }

    /// Like [`Capabilities::can`] but as an error for service calls
    pub fn require(
        &self,
        status: Option<MeasurementStatus>,
        action: Action,
    ) -> Result<(), AuthError> {
        if self.can(status, action) {
            Ok(())
        } else {
            Err(AuthError::Forbidden {
                role: self.role.to_string(),
                action: action.as_str().to_string(),
            })
        }
    }
}

/// The signed-in user as the session knows them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub user_id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl SessionUser {
    pub fn role(&self) -> Role {
        Role::from_stored(self.role.as_deref())
    }
}

/// Explicit session context handed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(access_token: impl Into<String>, user: SessionUser) -> Self {
        Self {
            access_token: Some(access_token.into()),
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Role of the signed-in user; admin when nothing says otherwise
    pub fn role(&self) -> Role {
        self.user.as_ref().map(SessionUser::role).unwrap_or_default()
    }

    /// Token for authenticated calls
    pub fn token(&self) -> Result<&str, AuthError> {
        match self.access_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(AuthError::Unauthenticated),
        }
    }

    pub fn logout(&mut self) {
        self.access_token = None;
        self.user = None;
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_role(self.role())
    }
}

/// Login form input
#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Per field in form order: required first, then the format rule
    pub fn check(&self) -> Result<(), ValidationError> {
        let report = self.validate().err();
        let field_errors = report.as_ref().map(|r| r.field_errors()).unwrap_or_default();

        let mut errors = FormErrors::new();
        let fields = [
            ("email", &self.email, "Email is required"),
            ("password", &self.password, "Password is required"),
        ];
        for (field, value, required) in fields {
            if value.is_empty() {
                errors.push(field, required);
                continue;
            }
            let message = field_errors
                .get(field)
                .and_then(|failures| failures.iter().find_map(|f| f.message.as_ref()));
            if let Some(message) = message {
                errors.push(field, message.to_string());
            }
        }
        errors.into_result(())
    }
}

/// Turns a login form into a session
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, form: &LoginForm) -> DeskResult<Session>;
}

/// Fixed-credential authenticator used by the demo dashboard
#[derive(Debug, Clone)]
pub struct StaticAuthenticator {
    email: String,
    password: String,
    token: String,
}

impl StaticAuthenticator {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            token: token.into(),
        }
    }
}

impl Default for StaticAuthenticator {
    fn default() -> Self {
        Self::new("admin@demo.com", "admin123", "fake_token_123")
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn login(&self, form: &LoginForm) -> DeskResult<Session> {
        form.check()?;
        if form.email != self.email || form.password != self.password {
            tracing::warn!(email = %form.email, "login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }
        tracing::info!(email = %form.email, "login accepted");
        Ok(Session::new(
            self.token.clone(),
            SessionUser {
                user_id: None,
                email: form.email.clone(),
                role: Some(Role::Admin.as_str().to_string()),
            },
        ))
    }
}
