use crate::media::{DownloadAsset, MediaResult, Platform};

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading { request: RequestId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

#[derive(Debug)]
pub enum Action {
    SelectPlatform(Platform),
    RequestStarted(RequestId),
    SetResult {
        request: RequestId,
        result: MediaResult,
    },
    /// `message` is `None` for failures that should pass silently.
    RequestFailed {
        request: RequestId,
        message: Option<String>,
    },
    AdvanceSlide,
    RetreatSlide,
    Notify(Notice),
}

/// Everything the interactive client shows, owned in one place and changed
/// only through [`UiState::update`].
#[derive(Debug)]
pub struct UiState {
    pub platform: Platform,
    pub phase: Phase,
    pub result: Option<MediaResult>,
    pub slide: usize,
    pub notice: Option<Notice>,
}

impl UiState {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            phase: Phase::Idle,
            result: None,
            slide: 0,
            notice: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    fn is_current(&self, request: RequestId) -> bool {
        self.phase == Phase::Loading { request }
    }

    fn slide_count(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.slides().len())
    }

    /// The slide in view as `(position, total, asset)`, 1-based.
    pub fn current_slide(&self) -> Option<(usize, usize, &DownloadAsset)> {
        let slides = self.result.as_ref()?.slides();
        let total = slides.len();
        slides
            .get(self.slide)
            .map(|asset| (self.slide + 1, total, *asset))
    }

    pub fn update(&mut self, action: Action) {
        match action {
            Action::SelectPlatform(platform) => self.platform = platform,
            Action::RequestStarted(request) => {
                self.phase = Phase::Loading { request };
                self.result = None;
                self.slide = 0;
                self.notice = None;
            }
            Action::SetResult { request, result } => {
                if !self.is_current(request) {
                    return;
                }
                self.phase = Phase::Idle;
                self.slide = 0;
                if result.is_soft_failure() {
                    self.notice = Some(Notice::Error("No downloadable media found.".to_string()));
                }
                self.result = Some(result);
            }
            Action::RequestFailed { request, message } => {
                if !self.is_current(request) {
                    return;
                }
                self.phase = Phase::Idle;
                self.notice = message.map(Notice::Error);
            }
            Action::AdvanceSlide => {
                let total = self.slide_count();
                if total > 0 {
                    self.slide = (self.slide + 1) % total;
                }
            }
            Action::RetreatSlide => {
                let total = self.slide_count();
                if total > 0 {
                    self.slide = (self.slide + total - 1) % total;
                }
            }
            Action::Notify(notice) => self.notice = Some(notice),
        }
    }
}
