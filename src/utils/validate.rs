use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("Invalid time regex"));

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度：3 <= x <= 32（学号也可作为用户名）
    if username.len() < 3 || username.len() > 32 {
        return Err("Username length must be between 3 and 32 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_full_name(full_name: &str) -> Result<(), &'static str> {
    let trimmed = full_name.trim();
    if trimmed.is_empty() {
        return Err("Full name must not be empty");
    }
    if trimmed.chars().count() > 100 {
        return Err("Full name must be at most 100 characters");
    }
    Ok(())
}

/// HH:MM（24 小时制）
pub fn validate_time(time: &str) -> Result<(), &'static str> {
    if !TIME_RE.is_match(time) {
        return Err("Time must be in HH:MM format");
    }
    Ok(())
}

/// YYYY-MM-DD
pub fn validate_date(date: &str) -> Result<chrono::NaiveDate, &'static str> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| "Date must be in YYYY-MM-DD format")
}

/// 仅允许 http/https 链接
pub fn validate_url(url: &str) -> Result<(), &'static str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or("URL must start with http:// or https://")?;
    if rest.is_empty() || rest.starts_with('/') || rest.chars().any(char::is_whitespace) {
        return Err("URL is invalid");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：大写字母 + 小写字母 + 数字
/// - 可选：特殊字符（增强安全性）
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    // 1. 长度检查：至少 8 个字符
    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    // 2. 大写字母检查
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }

    // 3. 小写字母检查
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }

    // 4. 数字检查
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    // 5. 常见弱密码检查
    let weak_passwords = [
        "password",
        "12345678",
        "123456789",
        "qwerty123",
        "admin123",
        "password1",
        "Password1",
        "Qwerty123",
        "Abcd1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("siswa_01").is_ok());
        assert!(validate_username("2024001").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("budi santoso").is_err());
    }

    #[test]
    fn test_email_and_full_name() {
        assert!(validate_email("guru@sekolah.sch.id").is_ok());
        assert!(validate_email("guru@sekolah").is_err());
        assert!(validate_full_name("  Siti Aminah ").is_ok());
        assert!(validate_full_name("   ").is_err());
    }

    #[test]
    fn test_time_and_date() {
        assert!(validate_time("07:30").is_ok());
        assert!(validate_time("23:59").is_ok());
        assert!(validate_time("24:00").is_err());
        assert!(validate_time("7:30").is_err());
        assert!(validate_date("2025-07-14").is_ok());
        assert!(validate_date("2025-02-30").is_err());
        assert!(validate_date("14/07/2025").is_err());
    }

    #[test]
    fn test_url_scheme() {
        assert!(validate_url("https://drive.example.com/materi.pdf").is_ok());
        assert!(validate_url("http://sekolah.sch.id").is_ok());
        assert!(validate_url("javascript:alert(1)").is_err());
        assert!(validate_url("ftp://files.example.com").is_err());
        assert!(validate_url("https://").is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("MyP@ssw0rd").is_valid);
        assert!(validate_password("SecurePass123").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("Ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_no_uppercase() {
        let result = validate_password("abcd1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );
    }

    #[test]
    fn test_no_lowercase() {
        let result = validate_password("ABCD1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one lowercase letter")
        );
    }

    #[test]
    fn test_no_digit() {
        let result = validate_password("AbcdEfgh");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }
}
