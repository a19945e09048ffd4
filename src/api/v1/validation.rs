use super::handler::{CreateProjectRequest, LoginRequest, RegisterRequest, RoleRequest};
use serde::Serialize;

/// One rule violation, addressed to the offending request field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn check_length(errors: &mut Vec<FieldError>, field: &str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.push(FieldError::new(
            field,
            format!("must be between {} and {} characters", min, max),
        ));
    }
}

fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

pub fn validate_register(request: &RegisterRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    check_length(&mut errors, "username", &request.username, 4, 30);
    if !looks_like_email(&request.email) {
        errors.push(FieldError::new("email", "must be a valid email address"));
    }
    if request.password.chars().count() < 6 {
        errors.push(FieldError::new(
            "password",
            "must be at least 6 characters",
        ));
    }

    errors
}

pub fn validate_login(request: &LoginRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if request.username.is_empty() {
        errors.push(FieldError::new("username", "must not be empty"));
    }
    if request.password.is_empty() {
        errors.push(FieldError::new("password", "must not be empty"));
    }

    errors
}

pub fn validate_create_project(request: &CreateProjectRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    check_length(&mut errors, "title", &request.title, 4, 30);
    check_length(
        &mut errors,
        "short_description",
        &request.short_description,
        20,
        200,
    );
    check_length(
        &mut errors,
        "long_description",
        &request.long_description,
        300,
        10_000,
    );

    for (index, role) in request.roles.iter().enumerate() {
        validate_role(&mut errors, index, role);
    }

    errors
}

fn validate_role(errors: &mut Vec<FieldError>, index: usize, role: &RoleRequest) {
    check_length(errors, &format!("roles[{index}].title"), &role.title, 3, 40);
    check_length(
        errors,
        &format!("roles[{index}].description"),
        &role.description,
        20,
        300,
    );
    if role.skills.is_empty() || role.skills.len() > 5 {
        errors.push(FieldError::new(
            format!("roles[{index}].skills"),
            "must list between 1 and 5 skills",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "aria.voss".to_string(),
            email: "aria@example.com".to_string(),
            password: "correct horse".to_string(),
        }
    }

    fn project_request() -> CreateProjectRequest {
        CreateProjectRequest {
            title: "Sampler Swap".to_string(),
            short_description: "A marketplace for trading sampler patches.".to_string(),
            long_description: "long ".repeat(80),
            roles: vec![RoleRequest {
                title: "Backend engineer".to_string(),
                description: "Own the ingestion pipeline and the public API.".to_string(),
                skills: vec!["rust".to_string()],
            }],
        }
    }

    #[test]
    fn a_valid_registration_passes() {
        assert!(validate_register(&register_request()).is_empty());
    }

    #[test]
    fn short_usernames_are_flagged() {
        let mut request = register_request();
        request.username = "ab".to_string();

        let errors = validate_register(&request);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "username");
    }

    #[test]
    fn malformed_emails_are_flagged() {
        for email in ["", "no-at-sign", "@missing.local", "space in@mail.com", "a@nodot"] {
            let mut request = register_request();
            request.email = email.to_string();

            let errors = validate_register(&request);

            assert_eq!(errors.len(), 1, "email {:?} should be rejected", email);
            assert_eq!(errors[0].field, "email");
        }
    }

    #[test]
    fn short_passwords_are_flagged() {
        let mut request = register_request();
        request.password = "abc".to_string();

        let errors = validate_register(&request);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
    }

    #[test]
    fn every_violation_is_reported_at_once() {
        let request = RegisterRequest {
            username: "ab".to_string(),
            email: "bogus".to_string(),
            password: "x".to_string(),
        };

        assert_eq!(validate_register(&request).len(), 3);
    }

    #[test]
    fn empty_login_fields_are_flagged() {
        let request = LoginRequest {
            username: String::new(),
            password: String::new(),
        };

        assert_eq!(validate_login(&request).len(), 2);
    }

    #[test]
    fn a_valid_project_passes() {
        assert!(validate_create_project(&project_request()).is_empty());
    }

    #[test]
    fn description_bounds_are_enforced() {
        let mut request = project_request();
        request.short_description = "too short".to_string();
        request.long_description = "too short".to_string();

        let errors = validate_create_project(&request);

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["short_description", "long_description"]);
    }

    #[test]
    fn role_errors_are_addressed_by_index() {
        let mut request = project_request();
        request.roles.push(RoleRequest {
            title: "ok title".to_string(),
            description: "A perfectly reasonable role description.".to_string(),
            skills: Vec::new(),
        });

        let errors = validate_create_project(&request);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "roles[1].skills");
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let mut request = project_request();
        // 4 characters, 8 bytes
        request.title = "žůžo".to_string();

        assert!(validate_create_project(&request).is_empty());
    }
}
