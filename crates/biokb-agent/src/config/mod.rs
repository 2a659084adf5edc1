//! Configuration loading for biokb.
//! Reads biokb.toml from the current directory or the path in BIOKB_CONFIG.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use biokb_common::KbError;
use biokb_ingestion::PipelineOptions;
use biokb_kg::{ExtractorBackend, ServerLaunch, SessionConfig};
use biokb_ner::{
    Annotator, AnnotatorPool, CoreNlpAnnotator, CoreNlpClient, LexiconAnnotator, NerError, BUILTIN_MODELS,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const CONFIG_ENV: &str = "BIOKB_CONFIG";
pub const MONGO_URI_ENV: &str = "BIOKB_MONGO_URI";
pub const DEFAULT_CONFIG_PATH: &str = "biokb.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub annotators: AnnotatorConfig,
    #[serde(default)]
    pub relations: RelationConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

// ── [corpus] ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    #[serde(default = "default_input")]
    pub input: PathBuf,
}

fn default_input() -> PathBuf { PathBuf::from("pubmed24n1220.xml") }

impl Default for CorpusConfig {
    fn default() -> Self {
        Self { input: default_input() }
    }
}

// ── [annotators] ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotatorBackend {
    /// In-process gazetteer annotators.
    Lexicon,
    /// Stanford CoreNLP server, one NER model per annotator.
    CoreNlp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    #[serde(default = "default_annotator_backend")]
    pub backend: AnnotatorBackend,
    /// Pool order. Output is concatenated in this order.
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    /// Annotator used for sentence segmentation; the first model if unset.
    #[serde(default)]
    pub segmenter: Option<String>,
    /// Directory of `<model>.tsv` lexicons extending the built-in term lists.
    #[serde(default)]
    pub lexicon_dir: Option<PathBuf>,
    #[serde(default)]
    pub corenlp_url: Option<String>,
    /// CoreNLP `ner.model` value per annotator name.
    #[serde(default)]
    pub corenlp_models: BTreeMap<String, String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_annotator_backend() -> AnnotatorBackend { AnnotatorBackend::Lexicon }
fn default_models() -> Vec<String> { BUILTIN_MODELS.iter().map(|m| m.to_string()).collect() }
fn default_request_timeout_secs() -> u64 { 60 }

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            backend: default_annotator_backend(),
            models: default_models(),
            segmenter: None,
            lexicon_dir: None,
            corenlp_url: None,
            corenlp_models: BTreeMap::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

// ── [relations] ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationBackend {
    Pattern,
    OpenIe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationConfig {
    #[serde(default = "default_relation_backend")]
    pub backend: RelationBackend,
    #[serde(default = "default_openie_url")]
    pub url: String,
    /// Launch a local server when none answers at `url`.
    #[serde(default)]
    pub server: Option<ServerConfig>,
}

fn default_relation_backend() -> RelationBackend { RelationBackend::Pattern }
fn default_openie_url() -> String { biokb_ner::corenlp::CORENLP_DEFAULT_URL.to_string() }

impl Default for RelationConfig {
    fn default() -> Self {
        Self {
            backend: default_relation_backend(),
            url: default_openie_url(),
            server: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_java")]
    pub java: String,
    pub classpath: String,
    #[serde(default = "default_memory")]
    pub memory: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,
}

fn default_java() -> String { "java".to_string() }
fn default_memory() -> String { "4g".to_string() }
fn default_port() -> u16 { 9000 }
fn default_startup_timeout_secs() -> u64 { 120 }

// ── [pipeline] ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// 0 disables the per-article timeout.
    #[serde(default = "default_article_timeout_secs")]
    pub article_timeout_secs: u64,
    #[serde(default)]
    pub strict: bool,
}

fn default_workers() -> usize { 4 }
fn default_article_timeout_secs() -> u64 { 300 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            article_timeout_secs: default_article_timeout_secs(),
            strict: false,
        }
    }
}

// ── [output] / [database] ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_json_path")]
    pub json_path: PathBuf,
}

fn default_json_path() -> PathBuf { PathBuf::from(biokb_db::DEFAULT_JSON_PATH) }

impl Default for OutputConfig {
    fn default() -> Self {
        Self { json_path: default_json_path() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_mongo_uri")]
    pub uri: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_true() -> bool { true }
fn default_mongo_uri() -> String { biokb_db::DEFAULT_MONGO_URI.to_string() }
fn default_database() -> String { biokb_db::DEFAULT_DATABASE.to_string() }
fn default_collection() -> String { biokb_db::DEFAULT_COLLECTION.to_string() }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            uri: default_mongo_uri(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

#[cfg(test)]
mod tests;

impl Config {
    /// Config path from BIOKB_CONFIG, falling back to `biokb.toml`.
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load `path`, or the defaults if it does not exist, then apply
    /// environment overrides.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            let config = Self::from_toml_str(&content)
                .with_context(|| format!("parsing config file {}", path.display()))?;
            info!(path = %path.display(), "Configuration loaded");
            config
        } else {
            warn!(
                path = %path.display(),
                "Config file not found, using defaults (copy biokb.example.toml to biokb.toml to customise)"
            );
            Self::default()
        };
        config.apply_overrides(std::env::var(MONGO_URI_ENV).ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn apply_overrides(&mut self, mongo_uri: Option<String>) {
        if let Some(uri) = mongo_uri.filter(|u| !u.trim().is_empty()) {
            self.database.uri = uri;
        }
    }

    pub fn validate(&self) -> Result<(), KbError> {
        let annotators = &self.annotators;
        if annotators.models.is_empty() {
            return Err(KbError::Config("annotators.models must name at least one model".into()));
        }
        let mut seen = HashSet::new();
        for model in &annotators.models {
            if model.trim().is_empty() {
                return Err(KbError::Config("annotators.models contains an empty name".into()));
            }
            if !seen.insert(model.as_str()) {
                return Err(KbError::Config(format!("annotators.models lists '{model}' twice")));
            }
        }
        if let Some(segmenter) = &annotators.segmenter {
            if !seen.contains(segmenter.as_str()) {
                return Err(KbError::Config(format!(
                    "annotators.segmenter '{segmenter}' is not one of annotators.models"
                )));
            }
        }
        if annotators.backend == AnnotatorBackend::CoreNlp
            && annotators.corenlp_url.as_deref().map_or(true, |u| u.trim().is_empty())
        {
            return Err(KbError::Config("annotators.backend = \"corenlp\" requires annotators.corenlp_url".into()));
        }
        if self.relations.backend == RelationBackend::OpenIe && self.relations.url.trim().is_empty() {
            return Err(KbError::Config("relations.backend = \"openie\" requires relations.url".into()));
        }
        if self.pipeline.workers == 0 {
            return Err(KbError::Config("pipeline.workers must be at least 1".into()));
        }
        if self.database.enabled {
            let uri = self.database.uri.trim();
            if uri.is_empty() {
                return Err(KbError::Config("database.uri is empty".into()));
            }
            if !uri.starts_with("mongodb://") && !uri.starts_with("mongodb+srv://") {
                return Err(KbError::Config(format!(
                    "database.uri '{uri}' must start with mongodb:// or mongodb+srv://"
                )));
            }
        }
        Ok(())
    }

    /// Build the annotator pool in configured model order.
    pub fn build_pool(&self) -> Result<AnnotatorPool, NerError> {
        let cfg = &self.annotators;
        let mut annotators: Vec<Arc<dyn Annotator>> = Vec::with_capacity(cfg.models.len());

        match cfg.backend {
            AnnotatorBackend::Lexicon => {
                for model in &cfg.models {
                    let file = cfg.lexicon_dir.as_ref().map(|dir| dir.join(format!("{model}.tsv")));
                    let annotator = match file {
                        Some(path) if path.exists() => LexiconAnnotator::with_lexicon_file(model, &path)?,
                        _ => LexiconAnnotator::builtin(model)?,
                    };
                    annotators.push(Arc::new(annotator));
                }
            }
            AnnotatorBackend::CoreNlp => {
                let url = cfg
                    .corenlp_url
                    .as_deref()
                    .ok_or_else(|| NerError::Config("annotators.corenlp_url is not set".into()))?;
                let client = Arc::new(CoreNlpClient::new(url, Duration::from_secs(cfg.request_timeout_secs))?);
                for model in &cfg.models {
                    let ner_model = cfg.corenlp_models.get(model).cloned();
                    annotators.push(Arc::new(CoreNlpAnnotator::new(model.clone(), Arc::clone(&client), ner_model)));
                }
            }
        }

        AnnotatorPool::new(annotators)
    }

    pub fn session_config(&self) -> SessionConfig {
        let backend = match self.relations.backend {
            RelationBackend::Pattern => ExtractorBackend::Pattern,
            RelationBackend::OpenIe => ExtractorBackend::OpenIe {
                url: self.relations.url.clone(),
                launch: self.relations.server.as_ref().map(|s| ServerLaunch {
                    java: s.java.clone(),
                    classpath: s.classpath.clone(),
                    memory: s.memory.clone(),
                    port: s.port,
                    startup_timeout: Duration::from_secs(s.startup_timeout_secs),
                }),
            },
        };
        SessionConfig {
            backend,
            request_timeout: Duration::from_secs(self.annotators.request_timeout_secs),
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            workers: self.pipeline.workers,
            article_timeout: match self.pipeline.article_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            strict: self.pipeline.strict,
        }
    }
}
