#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.corpus.input, PathBuf::from("pubmed24n1220.xml"));
        assert_eq!(config.annotators.backend, AnnotatorBackend::Lexicon);
        assert_eq!(config.annotators.models.len(), BUILTIN_MODELS.len());
        assert_eq!(config.relations.backend, RelationBackend::Pattern);
        assert_eq!(config.output.json_path, PathBuf::from("biomedical_knowledge_base.json"));
        assert!(config.database.enabled);
        assert_eq!(config.database.database, "BIOMEDICAL_ARTICLES");
        assert_eq!(config.database.collection, "MedicalKnowledgeBase");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections_keep_field_defaults() {
        let config = Config::from_toml_str(
            r#"
            [pipeline]
            workers = 2

            [database]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.pipeline.workers, 2);
        assert_eq!(config.pipeline.article_timeout_secs, 300);
        assert!(!config.database.enabled);
        assert_eq!(config.database.uri, "mongodb://localhost:27017/");
    }

    #[test]
    fn test_backend_names() {
        let config = Config::from_toml_str(
            r#"
            [annotators]
            backend = "corenlp"
            corenlp_url = "http://nlp:9000"
            models = ["bc5cdr", "jnlpba"]

            [annotators.corenlp_models]
            bc5cdr = "models/bc5cdr.ser.gz"

            [relations]
            backend = "openie"
            url = "http://nlp:9000"

            [relations.server]
            classpath = "/opt/corenlp/*"
            "#,
        )
        .unwrap();
        assert_eq!(config.annotators.backend, AnnotatorBackend::CoreNlp);
        assert_eq!(config.relations.backend, RelationBackend::OpenIe);
        let server = config.relations.server.as_ref().unwrap();
        assert_eq!(server.memory, "4g");
        assert_eq!(server.port, 9000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(Config::from_toml_str("[annotators]\nbackend = \"spacy\"").is_err());
    }

    #[test]
    fn test_validate_rejects_empty_pool() {
        let mut config = Config::default();
        config.annotators.models.clear();
        assert!(matches!(config.validate(), Err(KbError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_model() {
        let mut config = Config::default();
        config.annotators.models = vec!["bc5cdr".into(), "bc5cdr".into()];
        assert!(matches!(config.validate(), Err(KbError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_segmenter() {
        let mut config = Config::default();
        config.annotators.segmenter = Some("scispacy".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scispacy"));
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut config = Config::default();
        config.pipeline.workers = 0;
        assert!(matches!(config.validate(), Err(KbError::Config(_))));
    }

    #[test]
    fn test_validate_requires_corenlp_url() {
        let mut config = Config::default();
        config.annotators.backend = AnnotatorBackend::CoreNlp;
        assert!(config.validate().is_err());
        config.annotators.corenlp_url = Some("http://localhost:9000".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mongo_uri_override() {
        let mut config = Config::default();
        config.apply_overrides(Some("mongodb://db.internal:27017/".into()));
        assert_eq!(config.database.uri, "mongodb://db.internal:27017/");

        config.apply_overrides(Some("   ".into()));
        assert_eq!(config.database.uri, "mongodb://db.internal:27017/");
    }

    #[test]
    fn test_validate_rejects_non_mongo_uri() {
        let mut config = Config::default();
        config.database.uri = "postgres://localhost:5432/".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("postgres://localhost:5432/"));

        config.database.uri = "mongodb+srv://cluster.example.net/".into();
        assert!(config.validate().is_ok());

        config.database.uri = "postgres://localhost:5432/".into();
        config.database.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let mut config = Config::default();
        assert_eq!(config.pipeline_options().article_timeout, Some(Duration::from_secs(300)));
        config.pipeline.article_timeout_secs = 0;
        assert_eq!(config.pipeline_options().article_timeout, None);
    }

    #[test]
    fn test_session_config_carries_launch() {
        let mut config = Config::default();
        assert_eq!(config.session_config().backend, ExtractorBackend::Pattern);

        config.relations.backend = RelationBackend::OpenIe;
        config.relations.server = Some(ServerConfig {
            java: default_java(),
            classpath: "/opt/corenlp/*".into(),
            memory: "8g".into(),
            port: 9001,
            startup_timeout_secs: 30,
        });
        match config.session_config().backend {
            ExtractorBackend::OpenIe { url, launch: Some(launch) } => {
                assert_eq!(url, "http://localhost:9000");
                assert_eq!(launch.memory, "8g");
                assert_eq!(launch.port, 9001);
                assert_eq!(launch.startup_timeout, Duration::from_secs(30));
            }
            other => panic!("unexpected backend: {other:?}"),
        }
    }

    #[test]
    fn test_builtin_pool_follows_model_order() {
        let mut config = Config::default();
        config.annotators.models = vec!["ncbi_disease".into(), "bc5cdr".into()];
        let pool = config.build_pool().unwrap();
        assert_eq!(pool.names().collect::<Vec<_>>(), vec!["ncbi_disease", "bc5cdr"]);
    }

    #[test]
    fn test_lexicon_dir_extends_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("custom.tsv"), "# custom terms\nkras\tGENE\n").unwrap();

        let mut config = Config::default();
        config.annotators.models = vec!["custom".into()];
        config.annotators.lexicon_dir = Some(dir.path().to_path_buf());
        let pool = config.build_pool().unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_unknown_model_without_lexicon_fails() {
        let mut config = Config::default();
        config.annotators.models = vec!["not_a_model".into()];
        assert!(config.build_pool().is_err());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.pipeline.workers, 4);
    }
}
