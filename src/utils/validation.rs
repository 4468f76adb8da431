use crate::domain::model::{PetId, Species};
use crate::utils::error::{FieldViolation, PetError, Result, ViolationKind};
use regex::Regex;
use std::sync::OnceLock;

pub const NAME_MAX_CHARS: usize = 100;
pub const NAME_PATTERN: &str = r"^[A-Za-zА-Яа-я-]+$";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn name_regex() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| Regex::new(NAME_PATTERN).expect("name pattern is a valid regex"))
}

pub type FieldResult<T> = std::result::Result<T, FieldViolation>;

/// 名稱：1-100 個字元，僅限拉丁/西里爾字母與連字號
pub fn validate_name(name: &str) -> FieldResult<String> {
    let length = name.chars().count();
    if length == 0 || length > NAME_MAX_CHARS {
        return Err(FieldViolation::new(
            "name",
            ViolationKind::InvalidFormat,
            format!(
                "name must be between 1 and {} characters, got {}",
                NAME_MAX_CHARS, length
            ),
        ));
    }

    if !name_regex().is_match(name) {
        return Err(FieldViolation::new(
            "name",
            ViolationKind::InvalidFormat,
            "name may only contain Latin or Cyrillic letters and hyphens",
        ));
    }

    Ok(name.to_string())
}

pub fn validate_age(age: i64) -> FieldResult<i32> {
    if age < 0 {
        return Err(FieldViolation::new(
            "age",
            ViolationKind::InvalidRange,
            format!("age must be greater than or equal to 0, got {}", age),
        ));
    }

    i32::try_from(age).map_err(|_| {
        FieldViolation::new(
            "age",
            ViolationKind::InvalidRange,
            format!("age must not exceed {}, got {}", i32::MAX, age),
        )
    })
}

pub fn validate_species(species: &str) -> FieldResult<Species> {
    species.parse::<Species>().map_err(|_| {
        let allowed: Vec<&str> = Species::ALL.iter().map(Species::as_str).collect();
        FieldViolation::new(
            "type",
            ViolationKind::InvalidEnum,
            format!(
                "value '{}' is not permitted, expected one of: {}",
                species,
                allowed.join(", ")
            ),
        )
    })
}

pub fn validate_id(id: i64) -> FieldResult<PetId> {
    if id < 1 {
        return Err(FieldViolation::new(
            "id",
            ViolationKind::InvalidRange,
            format!("id must be a positive integer, got {}", id),
        ));
    }
    Ok(id)
}

pub fn validate_limit(limit: i64) -> FieldResult<u32> {
    if limit < 1 {
        return Err(FieldViolation::new(
            "limit",
            ViolationKind::InvalidRange,
            format!("limit must be a positive integer, got {}", limit),
        ));
    }
    // 超過 u32 的 limit 等同於不設上限
    Ok(u32::try_from(limit).unwrap_or(u32::MAX))
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(PetError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PetError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PetError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Rex").is_ok());
        assert!(validate_name("Шарик").is_ok());
        assert!(validate_name("Mister-Мурзик").is_ok());
        assert!(validate_name("-").is_ok());
        assert!(validate_name(&"a".repeat(100)).is_ok());
        assert!(validate_name(&"я".repeat(100)).is_ok());

        assert!(validate_name("").is_err());
        assert!(validate_name(&"a".repeat(101)).is_err());
        assert!(validate_name("Rex 2").is_err());
        assert!(validate_name("Rex1").is_err());
        assert!(validate_name("Ёжик").is_err());
        assert!(validate_name("Rex\n").is_err());
    }

    #[test]
    fn test_validate_name_reports_format_kind() {
        let violation = validate_name("R2-D2").unwrap_err();
        assert_eq!(violation.field, "name");
        assert_eq!(violation.kind, ViolationKind::InvalidFormat);
    }

    #[test]
    fn test_validate_age() {
        assert_eq!(validate_age(0).unwrap(), 0);
        assert_eq!(validate_age(15).unwrap(), 15);
        assert_eq!(validate_age(-1).unwrap_err().kind, ViolationKind::InvalidRange);
        assert!(validate_age(i64::from(i32::MAX) + 1).is_err());
    }

    #[test]
    fn test_validate_species() {
        assert_eq!(validate_species("dog").unwrap(), Species::Dog);
        assert_eq!(validate_species("cat").unwrap(), Species::Cat);

        let violation = validate_species("bird").unwrap_err();
        assert_eq!(violation.field, "type");
        assert_eq!(violation.kind, ViolationKind::InvalidEnum);
    }

    #[test]
    fn test_validate_id_and_limit() {
        assert_eq!(validate_id(1).unwrap(), 1);
        assert!(validate_id(0).is_err());
        assert!(validate_id(-7).is_err());

        assert_eq!(validate_limit(20).unwrap(), 20);
        assert_eq!(validate_limit(i64::MAX).unwrap(), u32::MAX);
        assert!(validate_limit(0).is_err());
    }

    #[test]
    fn test_validate_config_helpers() {
        assert!(validate_positive_number("port", 8000, 1).is_ok());
        assert!(validate_positive_number("port", 0, 1).is_err());
        assert!(validate_non_empty_string("host", "localhost").is_ok());
        assert!(validate_non_empty_string("host", "   ").is_err());
        assert!(validate_range("max_connections", 5u32, 1, 100).is_ok());
        assert!(validate_range("max_connections", 0u32, 1, 100).is_err());
    }
}
