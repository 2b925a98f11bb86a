use crate::constants::PROGRESS_TEMPLATE;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressAction {
    Compressing,
    PreparingZip,
}

impl fmt::Display for ProgressAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressAction::Compressing => write!(f, "Compressing"),
            ProgressAction::PreparingZip => write!(f, "Preparing ZIP"),
        }
    }
}

/// Completed/total counter for the running operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
    pub action: ProgressAction,
}

impl BatchProgress {
    pub fn new(total: usize, action: ProgressAction) -> Self {
        Self {
            completed: 0,
            total,
            action,
        }
    }

    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }

    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

impl fmt::Display for BatchProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.action, self.completed, self.total)
    }
}

/// Everything a front end needs to mirror session state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Progress(BatchProgress),
    ProgressHidden,
    Error(String),
    Success(String),
    BatchDownloadEnabled(bool),
}

pub trait EventSink: Send + Sync {
    fn on_event(&self, event: SessionEvent);
}

/// Discards events.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&self, _event: SessionEvent) {}
}

/// Keeps every event in order. Used by tests and demos.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::Error(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::Success(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<BatchProgress> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::Progress(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn on_event(&self, event: SessionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Terminal renderer: a progress bar plus error/success lines.
pub struct IndicatifSink {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl IndicatifSink {
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn update_bar(&self, progress: BatchProgress) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };
        let bar = slot.get_or_insert_with(|| {
            let bar = ProgressBar::new(progress.total as u64);
            if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
                bar.set_style(style);
            }
            bar
        });
        bar.set_length(progress.total as u64);
        bar.set_position(progress.completed as u64);
        bar.set_message(progress.to_string());
    }

    fn hide_bar(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }

    fn print_line(&self, line: String) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.println(line);
                return;
            }
        }
        eprintln!("{}", line);
    }
}

impl EventSink for IndicatifSink {
    fn on_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::Progress(progress) if !self.quiet => self.update_bar(progress),
            SessionEvent::ProgressHidden => self.hide_bar(),
            SessionEvent::Error(text) => self.print_line(format!("❌ {}", text)),
            SessionEvent::Success(text) if !self.quiet => self.print_line(format!("✅ {}", text)),
            _ => {}
        }
    }
}
