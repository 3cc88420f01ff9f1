//! Chrome process discovery and launch.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cdp::CdpClient;
use crate::driver::{BrowserDriver, LaunchOptions, Page};
use crate::error::BrowserError;

use super::page::ChromePage;

const STARTUP_POLL: Duration = Duration::from_millis(200);
const STARTUP_ATTEMPTS: u32 = 50;

/// Chrome launch settings.
#[derive(Debug, Clone)]
pub struct ChromeDriverConfig {
    /// Remote debugging port.
    pub debug_port: u16,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Explicit binary; otherwise well-known install locations are searched.
    pub chrome_path: Option<PathBuf>,
}

impl Default for ChromeDriverConfig {
    fn default() -> Self {
        Self {
            debug_port: 9222,
            viewport_width: 1280,
            viewport_height: 900,
            chrome_path: None,
        }
    }
}

impl ChromeDriverConfig {
    /// CDP endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.debug_port)
    }
}

/// Starts one Chrome process per launch.
///
/// Every launch binds the same debugging port, so only one page may be
/// alive at a time. A launch waits until the previous page is closed or
/// dropped.
pub struct ChromeDriver {
    config: ChromeDriverConfig,
    pub(super) slot: Arc<Mutex<()>>,
}

impl ChromeDriver {
    pub fn new(config: ChromeDriverConfig) -> Self {
        Self {
            config,
            slot: Arc::new(Mutex::new(())),
        }
    }

    pub fn config(&self) -> &ChromeDriverConfig {
        &self.config
    }

    /// Find a Chrome executable in well-known install locations.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(|p| PathBuf::from(*p)).find(|p| p.exists())
    }

    fn chrome_binary(&self) -> Result<PathBuf, BrowserError> {
        match &self.config.chrome_path {
            Some(path) if path.exists() => Ok(path.clone()),
            Some(path) => Err(BrowserError::LaunchFailed(format!(
                "configured Chrome binary {} does not exist",
                path.display()
            ))),
            None => Self::find_chrome().ok_or(BrowserError::ChromeNotFound),
        }
    }

    /// Command-line flags for a launch.
    pub(crate) fn chrome_args(&self, options: &LaunchOptions) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", self.config.debug_port),
            format!("--user-data-dir={}", options.profile_dir.display()),
            format!(
                "--window-size={},{}",
                self.config.viewport_width, self.config.viewport_height
            ),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-background-networking".to_string(),
            "--disable-sync".to_string(),
            "--disable-translate".to_string(),
            "--metrics-recording-only".to_string(),
        ];
        if options.headless {
            args.push("--headless=new".to_string());
        }
        args
    }

    async fn is_port_answering(&self) -> bool {
        CdpClient::version(&self.config.endpoint()).await.is_ok()
    }

    fn spawn(&self, binary: &Path, options: &LaunchOptions) -> Result<Child, BrowserError> {
        let mut cmd = Command::new(binary);
        cmd.args(self.chrome_args(options))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }
}

#[async_trait]
impl BrowserDriver for ChromeDriver {
    async fn launch(&self, options: LaunchOptions) -> Result<Box<dyn Page>, BrowserError> {
        let slot = match Arc::clone(&self.slot).try_lock_owned() {
            Ok(slot) => slot,
            Err(_) => {
                info!("Waiting for the previous browser to close");
                Arc::clone(&self.slot).lock_owned().await
            }
        };

        // Attaching to a foreign instance would ignore the requested profile.
        if self.is_port_answering().await {
            return Err(BrowserError::PortInUse(self.config.debug_port));
        }

        let binary = self.chrome_binary()?;
        if let Err(e) = tokio::fs::create_dir_all(&options.profile_dir).await {
            warn!("Failed to create profile directory: {}", e);
        }

        info!(
            headless = options.headless,
            "Launching Chrome with profile at: {}",
            options.profile_dir.display()
        );
        let mut child = self.spawn(&binary, &options)?;

        let mut ready = false;
        for _ in 0..STARTUP_ATTEMPTS {
            tokio::time::sleep(STARTUP_POLL).await;
            if let Ok(Some(status)) = child.try_wait() {
                return Err(BrowserError::LaunchFailed(format!(
                    "Chrome exited during startup ({})",
                    status
                )));
            }
            if self.is_port_answering().await {
                ready = true;
                break;
            }
        }

        if !ready {
            let _ = child.kill().await;
            return Err(BrowserError::LaunchFailed(
                "Chrome failed to start within timeout".to_string(),
            ));
        }

        let connected = async {
            let client = CdpClient::connect(&self.config.endpoint()).await?;
            let session = client.new_page().await?;
            Ok::<_, BrowserError>((client, session))
        }
        .await;

        match connected {
            Ok((client, session)) => {
                debug!("Connected to Chrome at {}", self.config.endpoint());
                Ok(Box::new(ChromePage::new(client, session, child, slot)))
            }
            Err(e) => {
                let _ = child.kill().await;
                Err(e)
            }
        }
    }
}
