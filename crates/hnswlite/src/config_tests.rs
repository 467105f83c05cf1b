//! Tests for config module

#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::distance::DistanceMetric;
    use crate::error::Error;
    use crate::index::{
        NeighborSelection, DEFAULT_EF_CONSTRUCTION, DEFAULT_EF_SEARCH, DEFAULT_MAX_CONNECTIONS,
    };
    use serial_test::serial;
    use std::io::Write;

    // ========================================================================
    // Default tests
    // ========================================================================

    #[test]
    fn test_config_default_values() {
        // Arrange & Act
        let config = IndexConfig::default();

        // Assert
        assert_eq!(config.index.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.index.ef_construction, DEFAULT_EF_CONSTRUCTION);
        assert_eq!(config.index.ef_search, DEFAULT_EF_SEARCH);
        assert_eq!(config.index.metric, DistanceMetric::Cosine);
        assert!(config.index.seed.is_none());
        assert_eq!(config.index.neighbor_selection, NeighborSelection::Closest);
    }

    #[test]
    fn test_config_default_params_match_hnsw_defaults() {
        // Arrange
        let config = IndexConfig::default();

        // Act
        let params = config.params(128).expect("default params are valid");

        // Assert
        assert_eq!(
            params,
            crate::HnswParams::new(128, DistanceMetric::Cosine)
        );
    }

    // ========================================================================
    // TOML parsing tests
    // ========================================================================

    #[test]
    fn test_config_from_toml_minimal() {
        // Arrange
        let toml = r#"
[index]
ef_search = 80
"#;

        // Act
        let config = IndexConfig::from_toml(toml).expect("parse");

        // Assert
        assert_eq!(config.index.ef_search, 80);
        // Other values should be defaults
        assert_eq!(config.index.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.index.metric, DistanceMetric::Cosine);
    }

    #[test]
    fn test_config_from_toml_full() {
        // Arrange
        let toml = r#"
[index]
max_connections = 24
ef_construction = 300
ef_search = 120
metric = "euclidean"
seed = 42

[index.neighbor_selection]
kind = "diverse"
alpha = 1.2
"#;

        // Act
        let config = IndexConfig::from_toml(toml).expect("parse");

        // Assert
        assert_eq!(config.index.max_connections, 24);
        assert_eq!(config.index.ef_construction, 300);
        assert_eq!(config.index.ef_search, 120);
        assert_eq!(config.index.metric, DistanceMetric::Euclidean);
        assert_eq!(config.index.seed, Some(42));
        assert_eq!(
            config.index.neighbor_selection,
            NeighborSelection::Diverse { alpha: 1.2 }
        );
    }

    #[test]
    fn test_config_from_toml_empty_is_default() {
        // Arrange & Act
        let config = IndexConfig::from_toml("").expect("parse");

        // Assert
        assert_eq!(config, IndexConfig::default());
    }

    #[test]
    fn test_config_from_toml_invalid_metric() {
        // Arrange
        let toml = r#"
[index]
metric = "manhattan"
"#;

        // Act
        let result = IndexConfig::from_toml(toml);

        // Assert
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_config_from_toml_wrong_type() {
        // Arrange
        let toml = r#"
[index]
max_connections = "sixteen"
"#;

        // Act
        let result = IndexConfig::from_toml(toml);

        // Assert
        let err = result.expect_err("string is not a usize");
        assert_eq!(err.code(), "HNSW-005");
    }

    // ========================================================================
    // Params tests
    // ========================================================================

    #[test]
    fn test_config_params_carries_every_field() {
        // Arrange
        let toml = r#"
[index]
max_connections = 8
ef_construction = 64
ef_search = 32
metric = "euclidean"
seed = 7
"#;
        let config = IndexConfig::from_toml(toml).expect("parse");

        // Act
        let params = config.params(3).expect("valid");

        // Assert
        assert_eq!(params.dimensions, 3);
        assert_eq!(params.max_connections, 8);
        assert_eq!(params.ef_construction, 64);
        assert_eq!(params.ef_search, 32);
        assert_eq!(params.metric, DistanceMetric::Euclidean);
        assert_eq!(params.seed, Some(7));
    }

    #[test]
    fn test_config_params_rejects_invalid_values() {
        // Arrange - ef_construction below max_connections
        let toml = r#"
[index]
max_connections = 32
ef_construction = 16
"#;
        let config = IndexConfig::from_toml(toml).expect("parse");

        // Act
        let result = config.params(64);

        // Assert
        assert!(matches!(result, Err(Error::InvalidParams(_))));
    }

    #[test]
    fn test_config_params_rejects_zero_dimensions() {
        // Arrange
        let config = IndexConfig::default();

        // Act & Assert
        assert!(matches!(config.params(0), Err(Error::InvalidParams(_))));
    }

    // ========================================================================
    // File loading tests
    // ========================================================================

    #[test]
    #[serial]
    fn test_config_load_from_path() {
        // Arrange
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[index]\nmax_connections = 12\nmetric = \"euclidean\"")
            .expect("write");

        // Act
        let config = IndexConfig::load_from_path(file.path()).expect("load");

        // Assert
        assert_eq!(config.index.max_connections, 12);
        assert_eq!(config.index.metric, DistanceMetric::Euclidean);
    }

    #[test]
    #[serial]
    fn test_config_load_from_missing_path_uses_defaults() {
        // Arrange
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.toml");

        // Act
        let config = IndexConfig::load_from_path(&path).expect("load");

        // Assert
        assert_eq!(config.index.ef_construction, DEFAULT_EF_CONSTRUCTION);
    }

    #[test]
    #[serial]
    fn test_config_load_from_malformed_file() {
        // Arrange
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[index\nmax_connections = ").expect("write");

        // Act
        let result = IndexConfig::load_from_path(file.path());

        // Assert
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    #[serial]
    fn test_config_env_overrides_file() {
        // Arrange
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[index]\nef_search = 30\nmax_connections = 12").expect("write");
        std::env::set_var("HNSWLITE_INDEX__EF_SEARCH", "80");

        // Act
        let result = IndexConfig::load_from_path(file.path());
        std::env::remove_var("HNSWLITE_INDEX__EF_SEARCH");
        let config = result.expect("load");

        // Assert
        assert_eq!(config.index.ef_search, 80);
        assert_eq!(config.index.max_connections, 12);
    }

    // ========================================================================
    // Serialization tests
    // ========================================================================

    #[test]
    fn test_config_to_toml() {
        // Arrange
        let config = IndexConfig::default();

        // Act
        let toml = config.to_toml().expect("serialize");

        // Assert
        assert!(toml.contains("[index]"));
        assert!(toml.contains("max_connections = 16"));
        assert!(toml.contains("metric = \"cosine\""));
    }

    #[test]
    fn test_config_roundtrip() {
        // Arrange
        let mut original = IndexConfig::default();
        original.index.ef_search = 99;
        original.index.seed = Some(1234);
        original.index.neighbor_selection = NeighborSelection::Diverse { alpha: 1.5 };

        // Act
        let toml = original.to_toml().expect("serialize");
        let parsed = IndexConfig::from_toml(&toml).expect("parse");

        // Assert
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_config_json_serialization() {
        // Arrange
        let config = IndexConfig::default();

        // Act
        let json = serde_json::to_value(config).expect("serialize");

        // Assert
        assert_eq!(json["index"]["metric"], "cosine");
        assert_eq!(json["index"]["neighbor_selection"]["kind"], "closest");
    }
}
