//! Tests for user value types.

use super::*;
use crate::domain::PasswordHasher;
use rstest::rstest;

#[rstest]
#[case(" ANN@X.com ", "ann@x.com")]
#[case("bob@example.org", "bob@example.org")]
#[case("\tMixed@Case.IO\n", "mixed@case.io")]
fn email_is_trimmed_and_lower_cased(#[case] raw: &str, #[case] expected: &str) {
    let email = Email::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_email_is_rejected(#[case] raw: &str) {
    assert_eq!(Email::new(raw), Err(UserValidationError::EmptyEmail));
}

#[rstest]
#[case("active", UserStatus::Active)]
#[case(" Inactive ", UserStatus::Inactive)]
fn status_parses_known_values(#[case] raw: &str, #[case] expected: UserStatus) {
    assert_eq!(raw.parse::<UserStatus>(), Ok(expected));
}

#[rstest]
fn status_rejects_unknown_values() {
    let err = "banned".parse::<UserStatus>().expect_err("unknown status");
    assert_eq!(
        err,
        UserValidationError::UnknownStatus {
            value: "banned".to_owned()
        }
    );
}

#[rstest]
fn status_defaults_to_active() {
    assert_eq!(UserStatus::default(), UserStatus::Active);
}

#[rstest]
#[case("42", Ok(UserId::new(42)))]
#[case(" 7 ", Ok(UserId::new(7)))]
#[case("abc", Err(UserValidationError::InvalidId))]
#[case("", Err(UserValidationError::InvalidId))]
fn user_id_parses_numbers_only(
    #[case] raw: &str,
    #[case] expected: Result<UserId, UserValidationError>,
) {
    assert_eq!(raw.parse::<UserId>(), expected);
}

#[rstest]
fn setters_change_mutable_fields_only() {
    let created = chrono::DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");
    let hash = PasswordHasher.hash("pw");
    let mut user = User::new(
        UserId::new(1),
        NewUser {
            first_name: "Ann".to_owned(),
            last_name: "Lee".to_owned(),
            email: Email::new("ann@x.com").expect("valid email"),
            date_created: created,
            status: UserStatus::Active,
            password_hash: hash.clone(),
        },
    );

    user.set_first_name("Anna");
    user.set_last_name("");
    user.set_email(Email::new("anna@x.com").expect("valid email"));
    user.set_status(UserStatus::Inactive);

    assert_eq!(user.id(), UserId::new(1));
    assert_eq!(user.first_name(), "Anna");
    assert_eq!(user.last_name(), "");
    assert_eq!(user.email().as_ref(), "anna@x.com");
    assert_eq!(user.status(), UserStatus::Inactive);
    assert_eq!(user.date_created(), created);
    assert_eq!(user.password_hash(), &hash);
}

#[rstest]
fn draft_deserialises_snake_case_payload() {
    let draft: UserDraft = serde_json::from_str(
        r#"{"first_name":"Ann","last_name":"Lee","email":"ann@x.com","password":"pw","status":"inactive"}"#,
    )
    .expect("valid draft");
    assert_eq!(draft.first_name.as_deref(), Some("Ann"));
    assert_eq!(draft.status, Some(UserStatus::Inactive));
}
