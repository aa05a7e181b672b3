use serde::{Deserialize, Serialize};

/// One entry of the `Circles` section: a distance ring around the company.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CircleProperty {
    pub radius_km: f64,
    /// CSS colour, e.g. `#2e7d32`
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_is_optional() {
        let circles: Vec<CircleProperty> = serde_yaml::from_str(
            "- RadiusKm: 5\n  Color: \"#2e7d32\"\n- RadiusKm: 12.5\n  Color: orange\n  Label: Region\n",
        )
        .unwrap();
        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0].radius_km, 5.0);
        assert_eq!(circles[0].label, None);
        assert_eq!(circles[1].label.as_deref(), Some("Region"));
    }
}
