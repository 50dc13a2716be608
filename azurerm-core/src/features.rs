//! Feature toggles for behaviour changing in the next major version

/// Environment variable opting into the 4.0 behaviour
pub const FOUR_POINT_OH_BETA_ENV: &str = "ARM_FOURPOINTZERO_BETA";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    /// Schemas and defaults of the upcoming major version
    pub four_point_oh_beta: bool,
}

impl Features {
    pub fn from_env() -> Self {
        let four_point_oh_beta = std::env::var(FOUR_POINT_OH_BETA_ENV)
            .map(|v| is_truthy(&v))
            .unwrap_or(false);
        log::debug!("features: four_point_oh_beta={}", four_point_oh_beta);
        Self { four_point_oh_beta }
    }

    pub fn four_point_oh() -> Self {
        Self {
            four_point_oh_beta: true,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values() {
        assert!(is_truthy("true"));
        assert!(is_truthy(" 1 "));
        assert!(is_truthy("TRUE"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn default_is_current_major_version() {
        assert!(!Features::default().four_point_oh_beta);
        assert!(Features::four_point_oh().four_point_oh_beta);
    }
}
