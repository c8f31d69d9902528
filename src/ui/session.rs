use super::render::{render_notice, render_result, render_slide};
use super::state::{Action, Notice, Phase, RequestId, UiState};
use crate::api::{validate_url, ApiClient};
use crate::error::ClientError;
use crate::media::{AssetDownloader, DownloadAsset, MediaResult, Platform};
use anyhow::Result;
use chrono::Utc;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const HELP: &str = "\
Paste a video URL and press Enter to look it up.
  :platform <tiktok|instagram|youtube|facebook>  switch platform
  :get <n>    save download option n
  :all        save every download option
  :next       next slide    :prev  previous slide
  :help       this text     :quit  exit";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Fetch(String),
    Platform(Platform),
    Get(usize),
    All,
    Next,
    Prev,
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Some(Command::Fetch(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let command = match (parts.next().unwrap_or(""), parts.next()) {
        ("platform" | "p", Some(name)) => match name.parse() {
            Ok(platform) => Command::Platform(platform),
            Err(e) => Command::Invalid(e),
        },
        ("get" | "g", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Command::Get(n),
            _ => Command::Invalid(format!("'{}' is not a download option number", n)),
        },
        ("all", None) => Command::All,
        ("next" | "n", None) => Command::Next,
        ("prev", None) => Command::Prev,
        ("help" | "h", None) => Command::Help,
        ("quit" | "q", None) => Command::Quit,
        _ => Command::Invalid(format!("unknown command ':{}', try :help", rest)),
    };
    Some(command)
}

#[derive(Debug)]
pub enum Event {
    Fetched {
        request: RequestId,
        outcome: Result<MediaResult, ClientError>,
    },
    Saved {
        label: String,
        outcome: Result<Vec<PathBuf>>,
    },
}

/// Line-oriented interactive client. Lookups and saves run as background
/// tasks that report back through an [`Event`] channel, so a new URL can
/// supersede a lookup that is still in flight.
pub struct Session<W: Write> {
    client: Arc<ApiClient>,
    downloader: Arc<AssetDownloader>,
    output_dir: PathBuf,
    state: UiState,
    next_request: RequestId,
    in_flight: Option<CancellationToken>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(
        client: Arc<ApiClient>,
        downloader: Arc<AssetDownloader>,
        output_dir: PathBuf,
        platform: Platform,
        out: W,
    ) -> Self {
        Self {
            client,
            downloader,
            output_dir,
            state: UiState::new(platform),
            next_request: 0,
            in_flight: None,
            out,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &UiState {
        &self.state
    }

    fn print(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            error!("Failed to write output: {}", e);
        }
    }

    fn notify(&mut self, notice: Notice) {
        let text = render_notice(&notice);
        self.state.update(Action::Notify(notice));
        self.print(&text);
    }

    fn start_fetch(&mut self, input: String, events: &UnboundedSender<Event>) {
        // Bad input is reported here, before anything is sent.
        if let Err(e) = validate_url(&input) {
            if let Some(message) = e.user_message() {
                self.notify(Notice::Error(message.to_string()));
            }
            return;
        }

        if let Some(previous) = self.in_flight.take() {
            if self.state.is_loading() {
                info!("Superseding lookup {}", self.next_request);
            }
            previous.cancel();
        }

        self.next_request += 1;
        let request = self.next_request;
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        self.state.update(Action::RequestStarted(request));
        let platform = self.state.platform;
        self.print(&format!("Looking up {} media...", platform));

        let client = Arc::clone(&self.client);
        let events = events.clone();
        tokio::spawn(async move {
            let outcome = client.fetch(platform, &input, &token).await;
            let _ = events.send(Event::Fetched { request, outcome });
        });
    }

    fn start_save(&mut self, asset: DownloadAsset, events: &UnboundedSender<Event>) {
        self.print(&format!("Download started: {}", asset.label));

        let downloader = Arc::clone(&self.downloader);
        let dir = self.output_dir.clone();
        let events = events.clone();
        tokio::spawn(async move {
            let outcome = downloader.save(&asset, &dir).await;
            let _ = events.send(Event::Saved {
                label: asset.label,
                outcome,
            });
        });
    }

    fn assets(&self) -> Vec<DownloadAsset> {
        self.state
            .result
            .as_ref()
            .map(|r| r.assets.clone())
            .unwrap_or_default()
    }

    fn show_slide(&mut self, action: Action) {
        self.state.update(action);
        match render_slide(&self.state) {
            Some(text) => self.print(&text),
            None => self.print("No slides to show"),
        }
    }

    /// Applies one line of input. Returns `false` once the user asks to quit.
    pub fn handle_line(&mut self, line: &str, events: &UnboundedSender<Event>) -> bool {
        let Some(command) = parse_command(line) else {
            return true;
        };

        match command {
            Command::Fetch(url) => self.start_fetch(url, events),
            Command::Platform(platform) => {
                self.state.update(Action::SelectPlatform(platform));
                self.print(&format!("Platform: {}", platform));
            }
            Command::Get(n) => match self.assets().into_iter().nth(n - 1) {
                Some(asset) => self.start_save(asset, events),
                None => self.notify(Notice::Error(format!("No download option {}", n))),
            },
            Command::All => {
                let assets: Vec<_> = self.assets().into_iter().filter(|a| !a.is_bundle()).collect();
                if assets.is_empty() {
                    self.notify(Notice::Error("Nothing to download yet".to_string()));
                }
                for asset in assets {
                    self.start_save(asset, events);
                }
            }
            Command::Next => self.show_slide(Action::AdvanceSlide),
            Command::Prev => self.show_slide(Action::RetreatSlide),
            Command::Help => self.print(HELP),
            Command::Quit => return false,
            Command::Invalid(message) => self.notify(Notice::Error(message)),
        }

        true
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Fetched { request, outcome } => {
                if self.next_request == request {
                    self.in_flight = None;
                }
                match outcome {
                    Ok(result) => {
                        let is_current = self.state.phase == Phase::Loading { request };
                        let text = render_result(&result, Utc::now());
                        self.state.update(Action::SetResult { request, result });
                        if is_current {
                            self.print(&text);
                            if let Some(slide) = render_slide(&self.state) {
                                self.print(&slide);
                            }
                        }
                    }
                    Err(e) => {
                        let message = e.user_message().map(str::to_string);
                        if let Some(text) = &message {
                            if self.state.phase == (Phase::Loading { request }) {
                                self.print(&render_notice(&Notice::Error(text.clone())));
                            }
                        }
                        info!("Lookup {} ended without a result: {}", request, e);
                        self.state.update(Action::RequestFailed { request, message });
                    }
                }
            }
            Event::Saved { label, outcome } => match outcome {
                Ok(paths) => {
                    for path in paths {
                        self.notify(Notice::Info(format!("Saved {} to {}", label, path.display())));
                    }
                }
                Err(e) => {
                    error!("Failed to save {}: {:#}", label, e);
                    self.notify(Notice::Error(format!("Download of {} failed", label)));
                }
            },
        }
    }

    /// Reads commands from `input` until EOF or `:quit`. Lines that are not
    /// valid UTF-8 are decoded lossily.
    pub async fn run<R: AsyncBufRead + Unpin>(mut self, mut input: R) -> Result<()> {
        let (tx, mut rx) = unbounded_channel();
        let mut buf = Vec::new();

        self.print(HELP);
        let platform = self.state.platform;
        self.print(&format!("Platform: {}", platform));

        loop {
            tokio::select! {
                read = input.read_until(b'\n', &mut buf) => match read {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = String::from_utf8_lossy(&buf).into_owned();
                        buf.clear();
                        if !self.handle_line(&line, &tx) {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read input: {}", e);
                        self.notify(Notice::Error("Could not read input".to_string()));
                        break;
                    }
                },
                Some(event) = rx.recv() => self.handle_event(event),
            }
        }

        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        Ok(())
    }
}
