//! Image reference construction.

/// Normalize an image tag to its `:`-prefixed form. Idempotent: a tag that
/// already starts with `:` passes through unchanged.
pub fn normalize_tag(tag: &str) -> String {
    if tag.starts_with(':') {
        tag.to_string()
    } else {
        format!(":{}", tag)
    }
}

/// Build the target image reference for a service: the prefix and service
/// name verbatim, followed by the normalized tag.
pub fn build_image_reference(prefix: &str, service: &str, tag: &str) -> String {
    format!("{}{}{}", prefix, service, normalize_tag(tag))
}

/// Rancher launch configs address images as `docker:<reference>`.
pub fn image_uuid(image: &str) -> String {
    format!("docker:{}", image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag_adds_colon() {
        assert_eq!(normalize_tag("latest"), ":latest");
        assert_eq!(normalize_tag("v2.1.0"), ":v2.1.0");
    }

    #[test]
    fn test_normalize_tag_is_idempotent() {
        assert_eq!(normalize_tag(":latest"), ":latest");
        assert_eq!(normalize_tag(&normalize_tag("v2")), ":v2");
    }

    #[test]
    fn test_build_image_reference() {
        assert_eq!(
            build_image_reference("registry.example.com/", "web", "v2"),
            "registry.example.com/web:v2"
        );
        assert_eq!(
            build_image_reference("", "web", ":latest"),
            "web:latest"
        );
    }

    #[test]
    fn test_image_uuid_scheme() {
        assert_eq!(
            image_uuid("registry.example.com/web:v2"),
            "docker:registry.example.com/web:v2"
        );
    }
}
