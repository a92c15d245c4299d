use std::collections::BTreeMap;

use serde_json::Value;

/// Reserved user info key holding the identity hint of a request.
///
/// When set to a string, it replaces the locator as the image identity in
/// the [`CacheKey`](crate::CacheKey). Use it for locators that carry volatile
/// parts (signed query parameters, cache busters) which do not change the
/// image itself.
pub const IMAGE_ID_KEY: &str = "pictura.image-id";

/// Arbitrary caller payload carried along with a request.
pub type UserInfo = BTreeMap<String, Value>;

/// Identity hint stored under [`IMAGE_ID_KEY`], if it is a string.
pub(crate) fn image_id(user_info: &UserInfo) -> Option<&str> {
    user_info.get(IMAGE_ID_KEY).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_id_requires_string() {
        let mut info = UserInfo::new();
        assert_eq!(image_id(&info), None);

        info.insert(IMAGE_ID_KEY.to_string(), Value::from(42));
        assert_eq!(image_id(&info), None);

        info.insert(IMAGE_ID_KEY.to_string(), Value::from("img-42"));
        assert_eq!(image_id(&info), Some("img-42"));
    }
}
