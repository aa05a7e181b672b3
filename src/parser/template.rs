use anyhow::{anyhow, Result};
use regex::{NoExpand, Regex};

/// Placeholder name used by `Services.ServiceTemplateUrl`.
pub const SERVICE_PLACEHOLDER: &str = "service";

/// Regex for a single named placeholder, e.g. `{service}` or `{ service }`.
fn placeholder_regex(name: &str) -> Result<Regex> {
    Regex::new(&format!(r"\{{\s*{}\s*\}}", regex::escape(name)))
        .map_err(|e| anyhow!("invalid placeholder name '{}': {}", name, e))
}

pub fn contains_placeholder(template: &str, name: &str) -> bool {
    placeholder_regex(name)
        .map(|re| re.is_match(template))
        .unwrap_or(false)
}

/// Render a named placeholder
/// template: "https://{service}.internal/api"
/// name: "service", value: "obsstamm" -> "https://obsstamm.internal/api"
///
/// Every occurrence is replaced; a template without the placeholder is an error.
pub fn interpolate(template: &str, name: &str, value: &str) -> Result<String> {
    if template.trim().is_empty() {
        return Err(anyhow!("template is empty"));
    }

    let re = placeholder_regex(name)?;
    if !re.is_match(template) {
        return Err(anyhow!(
            "template '{}' contains no '{{{}}}' placeholder",
            template,
            name
        ));
    }

    Ok(re.replace_all(template, NoExpand(value)).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_basic() {
        let rendered = interpolate("https://{service}.internal/api", "service", "obsstamm").unwrap();
        assert_eq!(rendered, "https://obsstamm.internal/api");
    }

    #[test]
    fn test_interpolate_every_occurrence_and_whitespace() {
        let rendered = interpolate("https://{ service }.internal/{service}", "service", "obsstamm").unwrap();
        assert_eq!(rendered, "https://obsstamm.internal/obsstamm");
    }

    #[test]
    fn test_interpolate_value_is_not_a_regex_expansion() {
        let rendered = interpolate("https://{service}/", "service", "$1-svc").unwrap();
        assert_eq!(rendered, "https://$1-svc/");
    }

    #[test]
    fn test_interpolate_missing_placeholder() {
        assert!(interpolate("https://static.internal/api", "service", "obsstamm").is_err());
        assert!(interpolate("https://{other}.internal/api", "service", "obsstamm").is_err());
    }

    #[test]
    fn test_interpolate_empty_template() {
        assert!(interpolate("  ", "service", "obsstamm").is_err());
    }

    #[test]
    fn test_contains_placeholder() {
        assert!(contains_placeholder("https://{service}.internal", SERVICE_PLACEHOLDER));
        assert!(!contains_placeholder("https://svc.internal", SERVICE_PLACEHOLDER));
    }
}
