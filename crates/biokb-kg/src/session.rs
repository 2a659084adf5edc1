//! Run-scoped ownership of the relation extractor.
//!
//! A session is acquired once before the first document and released once
//! after the last one, or when the run aborts. For the OpenIE backend it may
//! own a locally launched server process, which is killed on release (or on
//! drop if release never happens).

use std::future::Future;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use biokb_ner::CoreNlpClient;
use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::extractor::RelationExtractor;
use crate::openie::OpenIeExtractor;
use crate::pattern::PatternExtractor;
use crate::{RelationError, Result};

const SERVER_MAIN_CLASS: &str = "edu.stanford.nlp.pipeline.StanfordCoreNLPServer";
const READY_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How to start a local annotation server when none is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLaunch {
    pub java: String,
    pub classpath: String,
    pub memory: String,
    pub port: u16,
    pub startup_timeout: Duration,
}

impl Default for ServerLaunch {
    fn default() -> Self {
        Self {
            java: "java".to_string(),
            classpath: "*".to_string(),
            memory: "4g".to_string(),
            port: 9000,
            startup_timeout: Duration::from_secs(120),
        }
    }
}

impl ServerLaunch {
    fn command(&self, request_timeout: Duration) -> Command {
        let mut cmd = Command::new(&self.java);
        cmd.arg(format!("-mx{}", self.memory))
            .arg("-cp")
            .arg(&self.classpath)
            .arg(SERVER_MAIN_CLASS)
            .arg("-port")
            .arg(self.port.to_string())
            .arg("-timeout")
            .arg(request_timeout.as_millis().to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorBackend {
    /// Offline relation-phrase matching.
    Pattern,
    /// OpenIE over HTTP. With `launch`, a server is started if `url` is not
    /// ready yet.
    OpenIe { url: String, launch: Option<ServerLaunch> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub backend: ExtractorBackend,
    pub request_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: ExtractorBackend::Pattern,
            request_timeout: Duration::from_secs(60),
        }
    }
}

pub struct ExtractorSession {
    extractor: Arc<dyn RelationExtractor>,
    server: Option<Child>,
    released: bool,
}

impl ExtractorSession {
    /// Bring the configured extractor up.
    pub async fn acquire(config: &SessionConfig) -> Result<Self> {
        match &config.backend {
            ExtractorBackend::Pattern => {
                info!(backend = "pattern", "Relation extractor session acquired");
                Ok(Self::from_extractor(Arc::new(PatternExtractor::new()?)))
            }
            ExtractorBackend::OpenIe { url, launch } => {
                let client = Arc::new(CoreNlpClient::new(url, config.request_timeout)?);
                let server = if client.is_ready().await {
                    info!(url = %url, "Attaching to running OpenIE server");
                    None
                } else if let Some(launch) = launch {
                    Some(start_server(&client, launch, config.request_timeout).await?)
                } else {
                    return Err(RelationError::Unavailable(format!(
                        "no OpenIE server is ready at {url} and no launch command is configured"
                    )));
                };

                info!(backend = "openie", url = %url, launched = server.is_some(), "Relation extractor session acquired");
                Ok(Self {
                    extractor: Arc::new(OpenIeExtractor::new(client)),
                    server,
                    released: false,
                })
            }
        }
    }

    /// Wrap an already constructed extractor.
    pub fn from_extractor(extractor: Arc<dyn RelationExtractor>) -> Self {
        Self { extractor, server: None, released: false }
    }

    pub fn extractor(&self) -> Arc<dyn RelationExtractor> {
        Arc::clone(&self.extractor)
    }

    /// Shut the extractor down and stop any server this session launched.
    pub async fn release(mut self) -> Result<()> {
        self.released = true;
        let shutdown = self.extractor.shutdown().await;

        if let Some(mut child) = self.server.take() {
            if let Err(e) = child.kill().await {
                warn!(error = %e, "Failed to stop OpenIE server");
                return Err(e.into());
            }
            info!("OpenIE server stopped");
        }

        shutdown?;
        info!(extractor = self.extractor.name(), "Relation extractor session released");
        Ok(())
    }

    /// Run `f` with this session's extractor and release the session
    /// afterwards, whatever `f` returned. An error from `f` takes precedence
    /// over a release error.
    pub async fn run_scoped<T, E, F, Fut>(self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(Arc<dyn RelationExtractor>) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: From<RelationError>,
    {
        let outcome = f(self.extractor()).await;
        let released = self.release().await;
        match (outcome, released) {
            (Err(e), Err(release_err)) => {
                warn!(error = %release_err, "Session release failed after an aborted run");
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(_), Err(release_err)) => Err(release_err.into()),
            (Ok(value), Ok(())) => Ok(value),
        }
    }

    /// Acquire a session from `config`, run `f`, then release it.
    pub async fn scoped<T, E, F, Fut>(config: &SessionConfig, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(Arc<dyn RelationExtractor>) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: From<RelationError>,
    {
        let session = Self::acquire(config).await?;
        session.run_scoped(f).await
    }
}

impl Drop for ExtractorSession {
    fn drop(&mut self) {
        if !self.released {
            warn!(extractor = self.extractor.name(), "Relation extractor session dropped without release");
        }
    }
}

async fn start_server(client: &CoreNlpClient, launch: &ServerLaunch, request_timeout: Duration) -> Result<Child> {
    info!(
        java = %launch.java,
        port = launch.port,
        memory = %launch.memory,
        "Launching OpenIE server"
    );
    let mut child = launch
        .command(request_timeout)
        .spawn()
        .map_err(|e| RelationError::Launch(format!("{}: {e}", launch.java)))?;

    let started = Instant::now();
    loop {
        if client.is_ready().await {
            info!(elapsed_ms = started.elapsed().as_millis() as u64, "OpenIE server ready");
            return Ok(child);
        }
        if let Some(status) = child.try_wait()? {
            return Err(RelationError::Launch(format!("server exited during startup with {status}")));
        }
        if started.elapsed() >= launch.startup_timeout {
            let _ = child.kill().await;
            return Err(RelationError::Launch(format!(
                "server not ready after {}s",
                launch.startup_timeout.as_secs()
            )));
        }
        tokio::time::sleep(READY_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use biokb_common::Triple;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        shutdowns: AtomicUsize,
    }

    #[async_trait]
    impl RelationExtractor for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn extract_triples(&self, _sentence: &str) -> Result<Vec<Triple>> {
            Ok(vec![])
        }

        async fn shutdown(&self) -> Result<()> {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_release_after_success() {
        let extractor = Arc::new(Counting::default());
        let session = ExtractorSession::from_extractor(extractor.clone());
        let value: std::result::Result<u32, RelationError> =
            session.run_scoped(|_| async { Ok(7) }).await;
        assert_eq!(value.unwrap(), 7);
        assert_eq!(extractor.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_release_after_abort() {
        let extractor = Arc::new(Counting::default());
        let session = ExtractorSession::from_extractor(extractor.clone());
        let value: std::result::Result<(), RelationError> = session
            .run_scoped(|_| async { Err(RelationError::Service("boom".into())) })
            .await;
        assert!(matches!(value, Err(RelationError::Service(_))));
        assert_eq!(extractor.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scoped_pattern_backend() {
        let triples: std::result::Result<Vec<Triple>, RelationError> =
            ExtractorSession::scoped(&SessionConfig::default(), |extractor| async move {
                extractor.extract_triples("Aspirin reduces inflammation.").await
            })
            .await;
        assert_eq!(triples.unwrap(), vec![Triple::new("Aspirin", "reduces", "inflammation")]);
    }

    #[tokio::test]
    async fn test_openie_without_server_or_launch_is_unavailable() {
        let config = SessionConfig {
            backend: ExtractorBackend::OpenIe { url: "http://127.0.0.1:9".into(), launch: None },
            request_timeout: Duration::from_secs(1),
        };
        let err = ExtractorSession::acquire(&config).await.err().unwrap();
        assert!(matches!(err, RelationError::Unavailable(_)));
    }

    #[test]
    fn test_launch_command_line() {
        let launch = ServerLaunch { classpath: "/opt/corenlp/*".into(), ..ServerLaunch::default() };
        let cmd = launch.command(Duration::from_secs(60));
        let std_cmd = cmd.as_std();
        let args: Vec<_> = std_cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(std_cmd.get_program().to_string_lossy(), "java");
        assert_eq!(
            args,
            vec!["-mx4g", "-cp", "/opt/corenlp/*", SERVER_MAIN_CLASS, "-port", "9000", "-timeout", "60000"]
        );
    }
}
