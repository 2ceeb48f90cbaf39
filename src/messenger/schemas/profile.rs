use serde::{Deserialize, Serialize};

/// User profile returned by the Graph API for a page scoped user id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(rename = "profile_pic", skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Offset from UTC in hours, may be fractional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserialization() {
        let body = r#"{
            "first_name": "Peter",
            "last_name": "Chang",
            "profile_pic": "https://fbcdn-profile-a.akamaihd.net/hprofile.jpg",
            "locale": "en_US",
            "timezone": -7,
            "gender": "male"
        }"#;

        let profile: Profile = serde_json::from_str(body).unwrap();

        assert_eq!(profile.first_name, "Peter");
        assert_eq!(profile.last_name, "Chang");
        assert_eq!(
            profile.profile_picture.as_deref(),
            Some("https://fbcdn-profile-a.akamaihd.net/hprofile.jpg")
        );
        assert_eq!(profile.timezone, Some(-7.0));
        assert_eq!(profile.gender.as_deref(), Some("male"));
    }

    #[test]
    fn test_profile_with_missing_fields() {
        let profile: Profile = serde_json::from_str(r#"{"first_name":"Ana"}"#).unwrap();

        assert_eq!(profile.first_name, "Ana");
        assert!(profile.last_name.is_empty());
        assert!(profile.locale.is_none());
    }
}
