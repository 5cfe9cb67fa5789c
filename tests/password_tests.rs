use galerya_backend::util::password::{PasswordError, PasswordUtils, PasswordUtilsImpl};

#[test]
fn test_hash_password_produces_argon2_hash() {
    let hash = PasswordUtilsImpl::hash_password("correct horse battery staple").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert_ne!(hash, "correct horse battery staple");
}

#[test]
fn test_hashes_are_salted() {
    let a = PasswordUtilsImpl::hash_password("same-password").unwrap();
    let b = PasswordUtilsImpl::hash_password("same-password").unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_verify_password_success() {
    let hash = PasswordUtilsImpl::hash_password("hunter22hunter22").unwrap();
    assert!(PasswordUtilsImpl::verify_password("hunter22hunter22", &hash).unwrap());
}

#[test]
fn test_verify_password_wrong_password() {
    let hash = PasswordUtilsImpl::hash_password("hunter22hunter22").unwrap();
    assert!(!PasswordUtilsImpl::verify_password("wrong-password", &hash).unwrap());
}

#[test]
fn test_verify_password_invalid_hash_format() {
    let result = PasswordUtilsImpl::verify_password("whatever", "not-a-phc-string");
    assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
}

#[test]
fn test_unicode_passwords_round_trip() {
    let password = "pässwörd-日本語-🎨";
    let hash = PasswordUtilsImpl::hash_password(password).unwrap();
    assert!(PasswordUtilsImpl::verify_password(password, &hash).unwrap());
    assert!(!PasswordUtilsImpl::verify_password("pässwörd", &hash).unwrap());
}
