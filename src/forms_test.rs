use super::*;

fn valid_create_form() -> CreateUserForm {
    CreateUserForm {
        username: "ana".to_owned(),
        email: "ana@zgrada.hr".to_owned(),
        password: "tajna".to_owned(),
        repeated_password: "tajna".to_owned(),
        role: NewUserRole::default(),
    }
}

// =============================================================
// LoginForm
// =============================================================

#[test]
fn login_form_requires_both_fields() {
    let errors = LoginForm::default().validate();
    assert_eq!(errors.get(LoginField::Email), Some(EMAIL_REQUIRED_LOGIN));
    assert_eq!(errors.get(LoginField::Password), Some(PASSWORD_REQUIRED));
}

#[test]
fn login_form_valid_has_no_errors() {
    assert!(LoginForm::new("a@b.com", "secret").validate().is_empty());
}

#[test]
fn login_form_credentials_carry_fields() {
    let credentials = LoginForm::new("a@b.com", "secret").credentials();
    assert_eq!(credentials, LoginCredentials::password("a@b.com", "secret"));
}

// =============================================================
// CreateUserForm
// =============================================================

#[test]
fn create_form_valid_has_no_errors() {
    assert!(valid_create_form().validate().is_empty());
}

#[test]
fn create_form_empty_reports_every_required_field() {
    let errors = CreateUserForm::default().validate();
    assert_eq!(errors.get(CreateUserField::Username), Some(USERNAME_REQUIRED));
    assert_eq!(errors.get(CreateUserField::Email), Some(EMAIL_REQUIRED));
    assert_eq!(errors.get(CreateUserField::Password), Some(PASSWORD_REQUIRED));
    assert_eq!(errors.get(CreateUserField::RepeatedPassword), Some(PASSWORD_REQUIRED));
    assert_eq!(errors.get(CreateUserField::Form), None);
}

#[test]
fn create_form_rejects_malformed_email() {
    for email in ["ana", "ana@zgrada", "@.", "ana zgrada.hr"] {
        let form = CreateUserForm { email: email.to_owned(), ..valid_create_form() };
        assert_eq!(form.validate().get(CreateUserField::Email), Some(EMAIL_FORMAT), "email {email:?}");
    }
}

#[test]
fn create_form_rejects_mismatched_passwords() {
    let form = CreateUserForm { repeated_password: "druga".to_owned(), ..valid_create_form() };
    let errors = form.validate();
    assert_eq!(errors.get(CreateUserField::RepeatedPassword), Some(PASSWORDS_DIFFER));
    assert_eq!(errors.iter().count(), 1);
}

#[test]
fn new_user_role_defaults_to_suvlasnik() {
    assert_eq!(NewUserRole::default(), NewUserRole::Suvlasnik);
    assert_eq!(Role::from(NewUserRole::Predstavnik), Role::Predstavnik);
}

#[test]
fn new_user_serializes_lowercase_role() {
    let body = serde_json::to_value(valid_create_form().to_new_user()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "username": "ana",
            "email": "ana@zgrada.hr",
            "password": "tajna",
            "role": "suvlasnik"
        })
    );
}

#[test]
fn form_errors_last_write_wins() {
    let mut errors = FormErrors::single(LoginField::Password, "first");
    errors.set(LoginField::Password, "second");
    assert_eq!(errors.get(LoginField::Password), Some("second"));
}

#[test]
fn debug_output_hides_passwords() {
    let rendered = format!("{:?} {:?}", valid_create_form(), LoginForm::new("a@b.com", "secret"));
    assert!(!rendered.contains("tajna"));
    assert!(!rendered.contains("secret"));
}
