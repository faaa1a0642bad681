use std::sync::Arc;

use anyhow::Result;
use reviewbot_core::{Chat, ClassifyError, Config, Message, SentimentClient, SubmitOutcome};
use tokio::task::JoinHandle;

/// What the banner reports about the sentiment server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStatus {
    Checking,
    Ready,
    Unreachable,
}

pub struct App {
    pub should_quit: bool,

    // Conversation
    pub chat: Chat<SentimentClient>,
    pub client: Arc<SentimentClient>,
    pub cursor: usize, // cursor position in the draft, in chars

    // Chat view
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations
    pub stick_to_bottom: bool, // Follow new messages until the user scrolls up

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Server health
    pub server_status: ServerStatus,
    pub health_task: Option<JoinHandle<Result<String, ClassifyError>>>,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Arc::new(SentimentClient::new(
            &config.server_url(),
            config.request_timeout(),
        )?);

        let health_client = Arc::clone(&client);
        let health_task = tokio::spawn(async move { health_client.health().await });

        Ok(Self {
            should_quit: false,

            chat: Chat::new(Arc::clone(&client)),
            client,
            cursor: 0,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            stick_to_bottom: true,

            animation_frame: 0,

            server_status: ServerStatus::Checking,
            health_task: Some(health_task),
        })
    }

    pub fn server_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn messages(&self) -> &[Message] {
        self.chat.session().messages()
    }

    pub fn draft(&self) -> &str {
        self.chat.session().draft()
    }

    pub fn is_awaiting(&self) -> bool {
        self.chat.session().is_awaiting()
    }

    // Draft editing
    pub fn insert_char(&mut self, c: char) {
        let draft = self.chat.session_mut().draft_mut();
        let byte_pos = char_to_byte_index(draft, self.cursor);
        draft.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let draft = self.chat.session_mut().draft_mut();
            let byte_pos = char_to_byte_index(draft, self.cursor);
            draft.remove(byte_pos);
        }
    }

    pub fn delete_at_cursor(&mut self) {
        let draft = self.chat.session_mut().draft_mut();
        if self.cursor < draft.chars().count() {
            let byte_pos = char_to_byte_index(draft, self.cursor);
            draft.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.draft().chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.draft().chars().count();
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        let outcome = self.chat.submit();
        match &outcome {
            SubmitOutcome::Dispatched(_) => {
                self.cursor = 0;
                self.animation_frame = 0;
                // Scroll to bottom so the loading row is visible
                self.scroll_to_bottom();
            }
            SubmitOutcome::Busy => tracing::debug!("submit ignored while a review is being analyzed"),
            SubmitOutcome::Blank => {}
        }
        outcome
    }

    /// Collect finished background work: classification replies and the health probe
    pub async fn poll_background(&mut self) {
        if self.chat.poll_settled().await {
            self.scroll_to_bottom();
        }

        let health_done = self.health_task.as_ref().is_some_and(|task| task.is_finished());
        if health_done {
            if let Some(task) = self.health_task.take() {
                self.server_status = match task.await {
                    Ok(Ok(message)) => {
                        tracing::info!(%message, "sentiment server is ready");
                        ServerStatus::Ready
                    }
                    Ok(Err(err)) => {
                        tracing::warn!(error = %err, "sentiment server health check failed");
                        ServerStatus::Unreachable
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "health check task ended abnormally");
                        ServerStatus::Unreachable
                    }
                };
            }
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_awaiting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
        self.stick_to_bottom = false;
    }

    pub fn scroll_down(&mut self) {
        self.scroll_down_by(1);
    }

    pub fn scroll_page_up(&mut self) {
        let page = (self.visible_height() / 2).max(1);
        self.chat_scroll = self.chat_scroll.saturating_sub(page);
        self.stick_to_bottom = false;
    }

    pub fn scroll_page_down(&mut self) {
        let page = (self.visible_height() / 2).max(1);
        self.scroll_down_by(page);
    }

    fn scroll_down_by(&mut self, rows: u16) {
        let max = self.max_scroll();
        self.chat_scroll = self.chat_scroll.saturating_add(rows).min(max);
        self.stick_to_bottom = self.chat_scroll == max;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        self.chat_scroll = self.max_scroll();
    }

    /// Scroll offset that puts the last chat row on the last visible row
    pub fn max_scroll(&self) -> u16 {
        self.total_chat_lines().saturating_sub(self.visible_height())
    }

    fn visible_height(&self) -> u16 {
        if self.chat_height > 0 { self.chat_height } else { 20 }
    }

    /// Terminal rows the chat log occupies once wrapped, measured on the
    /// same lines `ui` draws so wide Hangul cells are counted correctly
    fn total_chat_lines(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 { self.chat_width } else { 50 };
        crate::ui::chat_line_count(self, wrap_width)
    }
}
