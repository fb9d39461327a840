use super::*;
use std::path::PathBuf;

mod config_tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_embedder_config_default() {
        let config = EmbedderConfig::default();
        assert_eq!(config.embedding_dim, DEFAULT_EMBEDDING_DIM);
        assert_eq!(config.max_seq_len, DEFAULT_MAX_SEQ_LEN);
        assert!(!config.testing_stub);
        assert!(config.model_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_embedder_config_new() {
        let config = EmbedderConfig::new("/models/kosimcse");
        assert_eq!(config.model_dir, PathBuf::from("/models/kosimcse"));
        assert!(!config.testing_stub);
    }

    #[test]
    fn test_embedder_config_stub() {
        let config = EmbedderConfig::stub();
        assert!(config.testing_stub);
        assert!(config.model_dir.as_os_str().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_embedder_config_validation_empty_dir_no_stub() {
        let config = EmbedderConfig {
            testing_stub: false,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidConfig { .. }));
    }

    #[test]
    fn test_embedder_config_validation_nonexistent_dir() {
        let config = EmbedderConfig {
            model_dir: PathBuf::from("/nonexistent/models/kosimcse"),
            testing_stub: false,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelNotFound { .. }));
    }

    #[test]
    fn test_embedder_config_model_available_false() {
        assert!(!EmbedderConfig::default().model_available());
        assert!(!EmbedderConfig::new("/nonexistent").model_available());
    }

    #[test]
    #[serial]
    fn test_embedder_config_from_env_empty() {
        unsafe {
            env::remove_var(EmbedderConfig::ENV_MODEL_DIR);
        }

        let config = EmbedderConfig::from_env();
        assert!(config.model_dir.as_os_str().is_empty());
    }

    #[test]
    #[serial]
    fn test_embedder_config_from_env_with_trimming() {
        unsafe {
            env::set_var(EmbedderConfig::ENV_MODEL_DIR, "  /models/kosimcse  ");
        }

        let config = EmbedderConfig::from_env();
        assert_eq!(config.model_dir, PathBuf::from("/models/kosimcse"));

        unsafe {
            env::remove_var(EmbedderConfig::ENV_MODEL_DIR);
        }
    }
}

mod embedder_tests {
    use super::*;

    fn stub_embedder() -> CaptionEmbedder {
        CaptionEmbedder::load(EmbedderConfig::stub()).expect("Should load in stub mode")
    }

    #[test]
    fn test_load_stub() {
        let embedder = stub_embedder();
        assert!(embedder.is_stub());
        assert!(!embedder.has_model());
        assert_eq!(embedder.embedding_dim(), DEFAULT_EMBEDDING_DIM);
    }

    #[test]
    fn test_load_model_not_available() {
        let config = EmbedderConfig {
            model_dir: PathBuf::from("/nonexistent/models"),
            testing_stub: false,
            ..Default::default()
        };
        assert!(CaptionEmbedder::load(config).is_err());
    }

    #[test]
    fn test_embed_stub_dimension_and_norm() {
        let embedder = stub_embedder();
        let emb = embedder.embed("fluffy corgi at the beach").expect("embed");

        assert_eq!(emb.len(), DEFAULT_EMBEDDING_DIM);
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6, "expected unit norm, got {}", norm);
    }

    #[test]
    fn test_embed_stub_determinism() {
        let embedder = stub_embedder();
        let emb1 = embedder.embed("same caption").expect("embed");
        let emb2 = embedder.embed("same caption").expect("embed");
        assert_eq!(emb1, emb2);
    }

    #[test]
    fn test_embed_stub_uniqueness() {
        let embedder = stub_embedder();
        let emb1 = embedder.embed("a dog").expect("embed");
        let emb2 = embedder.embed("a cat").expect("embed");
        assert_ne!(emb1, emb2);
    }

    #[test]
    fn test_embed_batch_empty() {
        let embedder = stub_embedder();
        let embeddings = embedder.embed_batch(&[]).expect("Should handle empty");
        assert!(embeddings.is_empty());
    }

    #[test]
    fn test_embed_batch_preserves_order() {
        let embedder = stub_embedder();
        let texts = vec!["first", "second", "third"];

        let batch = embedder.embed_batch(&texts).expect("embed batch");
        assert_eq!(batch.len(), 3);

        for (text, emb) in texts.iter().zip(batch.iter()) {
            let single = embedder.embed(text).expect("embed");
            assert_eq!(&single, emb, "batch row for '{}' should match single", text);
        }
    }

    #[test]
    fn test_embed_stub_empty_string() {
        let embedder = stub_embedder();
        let emb = embedder.embed("").expect("embed empty string");
        assert_eq!(emb.len(), DEFAULT_EMBEDDING_DIM);
    }
}

mod normalize_tests {
    use super::*;

    #[test]
    fn test_normalize_l2_unit_result() {
        let normalized = normalize_l2(vec![3.0, 4.0]);
        assert!((normalized[0] - 0.6).abs() < 1e-6);
        assert!((normalized[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_l2_zero_vector_unchanged() {
        let normalized = normalize_l2(vec![0.0; 8]);
        assert!(normalized.iter().all(|&x| x == 0.0));
    }
}
