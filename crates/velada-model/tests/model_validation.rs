use velada_model::{
    check_password_repeat, Email, EventInput, Field, FirstName, LastName, NationalId, ParseError,
    Phone, PlainPassword, RecordId, RegistrationInput,
};

fn valid_input() -> RegistrationInput {
    RegistrationInput {
        first_name: "Ana María".to_string(),
        last_name: "Mora".to_string(),
        email: "ana@example.com".to_string(),
        password: "abc123".to_string(),
        password_repeat: "abc123".to_string(),
        national_id: "1710034065".to_string(),
        phone: "0991234567".to_string(),
    }
}

#[test]
fn person_names_accept_letters_accents_and_spaces() {
    assert!(FirstName::parse("José").is_ok());
    assert!(FirstName::parse("Ana María").is_ok());
    assert!(LastName::parse("Núñez Vélez").is_ok());
    assert!(FirstName::parse(&"a".repeat(40)).is_ok());
}

#[test]
fn person_names_reject_digits_symbols_and_overlong_values() {
    assert!(FirstName::parse("Ana3").is_err());
    assert!(FirstName::parse("Ana-Maria").is_err());
    assert!(LastName::parse("O'Neil").is_err());
    assert!(matches!(
        FirstName::parse(&"a".repeat(41)),
        Err(ParseError::TooLong("first name", 40))
    ));
}

#[test]
fn person_names_reject_empty_and_whitespace_only() {
    assert!(matches!(
        FirstName::parse(""),
        Err(ParseError::Empty("first name"))
    ));
    assert!(matches!(
        FirstName::parse("   "),
        Err(ParseError::Empty("first name"))
    ));
}

#[test]
fn person_names_keep_the_input_verbatim() {
    let name = FirstName::parse(" Juan ").expect("padded name");
    assert_eq!(name.as_str(), " Juan ");
}

#[test]
fn email_accepts_common_shapes() {
    assert!(Email::parse("ana@example.com").is_ok());
    assert!(Email::parse("ana.maria+tag@mail.example-host.com").is_ok());
    assert!(Email::parse("a_b-c@x.co").is_ok());
    // The domain tail is permissive: dots may repeat or close the string.
    assert!(Email::parse("ana@mail.com.").is_ok());
}

#[test]
fn email_rejects_malformed_addresses() {
    assert!(Email::parse("ana@example").is_err());
    assert!(Email::parse("@example.com").is_err());
    assert!(Email::parse("ana example@mail.com").is_err());
    assert!(Email::parse("ana@exam_ple.com").is_err());
    assert!(Email::parse("ana").is_err());
    assert!(matches!(Email::parse(""), Err(ParseError::Empty("email"))));
}

#[test]
fn password_length_is_counted_in_characters() {
    assert!(PlainPassword::parse("abc123").is_ok());
    assert!(PlainPassword::parse("abcdefghij12").is_ok());
    assert!(PlainPassword::parse("abc12").is_err());
    assert!(PlainPassword::parse("abcdefghij123").is_err());
    // Twelve characters even though it is twenty-four bytes.
    assert!(PlainPassword::parse(&"ñ".repeat(12)).is_ok());
    assert!(PlainPassword::parse(&"ñ".repeat(13)).is_err());
}

#[test]
fn password_rejects_whitespace_only() {
    assert!(matches!(
        PlainPassword::parse("      "),
        Err(ParseError::Empty("password"))
    ));
}

#[test]
fn password_repeat_must_match_exactly() {
    assert!(check_password_repeat("abc123", "abc123").is_ok());
    assert!(matches!(
        check_password_repeat("abc123", "abc124"),
        Err(ParseError::Mismatch("password confirmation"))
    ));
    assert!(matches!(
        check_password_repeat("abc123", "ABC123"),
        Err(ParseError::Mismatch("password confirmation"))
    ));
    assert!(matches!(
        check_password_repeat("abc123", ""),
        Err(ParseError::Empty("password confirmation"))
    ));
}

#[test]
fn phone_accepts_seven_to_ten_digits() {
    assert!(Phone::parse("1234567").is_ok());
    assert!(Phone::parse("0991234567").is_ok());
    assert!(Phone::parse("123456").is_err());
    assert!(Phone::parse("12345678901").is_err());
    assert!(Phone::parse("099-123-4567").is_err());
    assert!(Phone::parse("+59399123456").is_err());
}

#[test]
fn national_id_accepts_checksum_valid_identifiers() {
    for id in ["1710034065", "0912345675", "2400000002", "1710034040"] {
        assert!(NationalId::parse(id).is_ok(), "expected {id} to validate");
    }
}

#[test]
fn national_id_rejects_bad_checksum_region_and_shape() {
    assert!(NationalId::parse("1710034066").is_err());
    assert!(NationalId::parse("2512345678").is_err());
    assert!(NationalId::parse("0012345678").is_err());
    assert!(NationalId::parse("171003406").is_err());
    assert!(NationalId::parse("17100340655").is_err());
    assert!(NationalId::parse("17100340a5").is_err());
    // Digits must be ASCII; other numeral systems do not qualify.
    assert!(NationalId::parse("١٧١٠٠٣٤٠٦٥").is_err());
}

#[test]
fn record_id_round_trips_and_rejects_whitespace() {
    let id = RecordId::from_millis(1_714_003_200_123);
    assert_eq!(id.as_str(), "1714003200123");
    assert_eq!(RecordId::parse("1714003200123").expect("parse"), id);
    assert!(RecordId::parse("").is_err());
    assert!(RecordId::parse("17 14").is_err());
}

#[test]
fn registration_validate_passes_a_fully_valid_form() {
    let validated = valid_input().validate().expect("valid form");
    assert_eq!(validated.email.as_str(), "ana@example.com");
    assert_eq!(validated.national_id.as_str(), "1710034065");
}

#[test]
fn registration_validate_collects_an_error_per_bad_field() {
    let input = RegistrationInput {
        first_name: "Ana3".to_string(),
        last_name: String::new(),
        email: "not-an-email".to_string(),
        password: "ab".to_string(),
        password_repeat: "xy".to_string(),
        national_id: "123".to_string(),
        phone: "abc".to_string(),
    };
    let errors = input.validate().expect_err("every field is invalid");
    assert_eq!(errors.len(), Field::ALL.len());
    for field in Field::ALL {
        assert!(errors.contains_key(&field), "missing error for {field}");
    }
}

#[test]
fn registration_validate_reports_only_the_failing_field() {
    let mut input = valid_input();
    input.phone = "12".to_string();
    let errors = input.validate().expect_err("phone is invalid");
    assert_eq!(errors.len(), 1);
    assert!(errors.contains_key(&Field::Phone));
}

#[test]
fn registration_validate_flags_mismatched_confirmation_alone() {
    let mut input = valid_input();
    input.password_repeat = "abc124".to_string();
    let errors = input.validate().expect_err("confirmation differs");
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors.get(&Field::PasswordRepeat),
        Some(ParseError::Mismatch(_))
    ));
}

#[test]
fn event_input_validates_fields_and_normalizes_empty_image() {
    let input = EventInput {
        title: "Feria de Quito".to_string(),
        date: "2026-12-06".to_string(),
        description: "Feria anual en el centro.".to_string(),
        image: "   ".to_string(),
    };
    let validated = input.validate().expect("valid event");
    assert!(validated.image.is_none());

    let bad = EventInput {
        title: String::new(),
        date: "06/12/2026".to_string(),
        description: "x".to_string(),
        image: String::new(),
    };
    let errors = bad.validate().expect_err("title and date are invalid");
    assert_eq!(errors.len(), 2);
}
