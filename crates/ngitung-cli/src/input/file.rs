use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read a JSON or YAML file, chosen by extension (`.yaml` / `.yml` are YAML,
/// everything else JSON).
pub fn read_json_or_yaml<T: DeserializeOwned>(
    path: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let is_yaml = matches!(
        canonical.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if !is_yaml {
        return read_json(path);
    }
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Resolve relative paths against the working directory and make sure the
/// target is an existing regular file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngitung_core::AnalysisConfig;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_an_error() {
        let err = read_json::<serde_json::Value>("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_yaml_config() {
        let mut f = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(f, "target_monthly_profit: 2000000\nsafety_factor: 1.5").unwrap();
        let cfg: AnalysisConfig = read_json_or_yaml(f.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.target_monthly_profit, dec!(2_000_000));
        assert_eq!(cfg.safety_factor, dec!(1.5));
        assert_eq!(cfg.sales_drop, dec!(30));
    }

    #[test]
    fn test_json_config() {
        let mut f = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(f, r#"{{"low_margin_threshold": 25}}"#).unwrap();
        let cfg: AnalysisConfig = read_json_or_yaml(f.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.low_margin_threshold, dec!(25));
    }
}
