use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::App;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::ScrollUp => app.scroll_up(),
        AppEvent::ScrollDown => app.scroll_down(),
        // Layout is recomputed on the next draw; keep the latest message in view
        AppEvent::Resize => app.scroll_to_bottom(),
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => {
            app.submit();
        }
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::PageUp => app.scroll_page_up(),
        KeyCode::PageDown => app.scroll_page_down(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewbot_core::Config;

    fn app() -> App {
        App::new(&Config {
            server_url: Some("http://127.0.0.1:9".to_string()),
            request_timeout_secs: Some(1),
        })
        .unwrap()
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c)));
        }
    }

    #[tokio::test]
    async fn test_enter_on_blank_draft_does_nothing() {
        let mut app = app();
        type_text(&mut app, "   ");
        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.messages().len(), 1);
        assert!(!app.is_awaiting());
        assert_eq!(app.draft(), "   ");
    }

    #[tokio::test]
    async fn test_enter_submits_typed_review() {
        let mut app = app();
        type_text(&mut app, "음식이 맛있어요");
        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.messages().len(), 2);
        assert_eq!(app.messages()[1].content(), "음식이 맛있어요");
        assert!(app.is_awaiting());
        assert_eq!(app.draft(), "");
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut escaped = app();
        handle_event(&mut escaped, key(KeyCode::Esc));
        assert!(escaped.should_quit);

        let mut interrupted = app();
        handle_event(
            &mut interrupted,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        );
        assert!(interrupted.should_quit);
        assert_eq!(interrupted.draft(), "");
    }

    #[tokio::test]
    async fn test_tick_animates_only_while_pending() {
        let mut app = app();
        handle_event(&mut app, AppEvent::Tick);
        assert_eq!(app.animation_frame, 0);

        type_text(&mut app, "배달이 늦어요");
        handle_event(&mut app, key(KeyCode::Enter));
        handle_event(&mut app, AppEvent::Tick);
        handle_event(&mut app, AppEvent::Tick);
        assert_eq!(app.animation_frame, 2);
        handle_event(&mut app, AppEvent::Tick);
        assert_eq!(app.animation_frame, 0);
    }
}
