// Helper functions for safe logging and serialization

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```ignore
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 && !parts[0].is_empty() {
            format!("{}***@{}", &parts[0][..1], parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Serializes skills from the stored JSON string to an array for API responses
pub fn serialize_skills<S>(skills: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match skills {
        Some(skills_json) => {
            let skills_vec: Vec<String> =
                serde_json::from_str(skills_json).unwrap_or_else(|_| Vec::new());
            skills_vec.serialize(serializer)
        }
        None => Vec::<String>::new().serialize(serializer),
    }
}

/// Deserializes skills from an array to a JSON string for database storage
pub fn deserialize_skills<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let skills_vec: Vec<String> = Vec::deserialize(deserializer)?;
    let skills_json = serde_json::to_string(&skills_vec).map_err(serde::de::Error::custom)?;
    Ok(Some(skills_json))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_email_log_masks_local_part() {
        assert_eq!(safe_email_log("user@example.com"), "u***@example.com");
    }

    #[test]
    fn test_safe_email_log_handles_garbage() {
        assert_eq!(safe_email_log("ab"), "***@***.***");
        assert_eq!(safe_email_log("not-an-email"), "***@***.***");
        assert_eq!(safe_email_log("@example.com"), "***@***.***");
    }
}
