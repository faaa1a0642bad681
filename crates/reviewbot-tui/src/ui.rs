use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use reviewbot_core::{Message, MessageBody, Role, Verdict};
use unicode_width::UnicodeWidthChar;
use crate::app::{App, ServerStatus};

const TITLE: &str = "배달 어플 리뷰 감정 분류 봇 🤖";
const SUBTITLE: &str = "파인튜닝된 KLUE/RoBERTa 모델로 리뷰를 긍정/부정 분류합니다.";
const PLACEHOLDER: &str = "리뷰 내용을 여기에 입력하세요.";

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: status banner, header, chat, input, footer
    let [banner_area, header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_banner(app, frame, banner_area);
    render_header(frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_banner(app: &App, frame: &mut Frame, area: Rect) {
    let (text, fg, bg) = match app.server_status {
        ServerStatus::Checking => ("서버 상태 확인 중...".to_string(), Color::Yellow, Color::Reset),
        ServerStatus::Ready => ("감정 분류 모델 로드 완료!".to_string(), Color::Green, Color::Rgb(20, 51, 33)),
        ServerStatus::Unreachable => (
            format!("서버에 연결할 수 없습니다: {}", app.server_url()),
            Color::Red,
            Color::Reset,
        ),
    };

    let banner = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", text),
        Style::default().fg(fg).add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(bg));
    frame.render_widget(banner, area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Text::from(vec![
        Line::from(Span::styled(format!(" {}", TITLE), Style::default().bold())),
        Line::from(Span::styled(format!(" {}", SUBTITLE), Style::default().fg(Color::Gray))),
        Line::default(),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// The three verdict segments on one line, label colored by polarity
fn verdict_line(verdict: &Verdict) -> Line<'static> {
    let label_color = if verdict.is_positive() { Color::Green } else { Color::Red };
    let [lead, label, trail] = verdict.segments();
    Line::from(vec![
        Span::raw(lead.to_string()),
        Span::styled(
            label.to_string(),
            Style::default().fg(label_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(trail.to_string()),
    ])
}

fn message_lines(msg: &Message) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match msg.role() {
        Role::User => lines.push(Line::from(Span::styled(
            "나:",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))),
        Role::Assistant => lines.push(Line::from(Span::styled(
            "봇:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))),
    }

    match msg.body() {
        MessageBody::Text(text) => {
            for line in text.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
        MessageBody::Verdict(verdict) => lines.push(verdict_line(verdict)),
    }

    lines.push(Line::default());
    lines
}

/// Chat log as drawn, without the surrounding block
fn chat_paragraph(app: &App) -> Paragraph<'static> {
    let mut lines: Vec<Line<'static>> = app.messages().iter().flat_map(message_lines).collect();

    if app.is_awaiting() {
        lines.push(Line::from(Span::styled(
            "봇:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("분석 중{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false })
}

/// Rows the chat log takes when wrapped to `width` cells
pub fn chat_line_count(app: &App, width: u16) -> u16 {
    let rows = chat_paragraph(app).line_count(width);
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    // The real size is only known here, so follow the bottom with it
    if app.stick_to_bottom {
        app.chat_scroll = app.max_scroll();
    } else {
        app.chat_scroll = app.chat_scroll.min(app.max_scroll());
    }

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" 대화 ");

    let chat = chat_paragraph(app)
        .block(chat_block)
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

/// Visible part of the draft and the caret column, both measured in terminal
/// cells. Hangul syllables are two cells wide.
fn input_viewport(draft: &str, cursor: usize, inner_width: usize) -> (String, u16) {
    let chars: Vec<(char, usize)> = draft
        .chars()
        .map(|c| (c, c.width().unwrap_or(0)))
        .collect();
    let cursor = cursor.min(chars.len());

    // Drop chars from the left until the caret cell fits inside the box
    let mut start = 0;
    let mut caret_x: usize = chars[..cursor].iter().map(|(_, w)| w).sum();
    while start < cursor && caret_x + 1 > inner_width {
        caret_x -= chars[start].1;
        start += 1;
    }

    let mut used = 0;
    let visible: String = chars[start..]
        .iter()
        .take_while(|(_, w)| {
            used += w;
            used <= inner_width
        })
        .map(|(c, _)| *c)
        .collect();

    (visible, u16::try_from(caret_x).unwrap_or(u16::MAX))
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    // Sending is blocked while a review is being analyzed, typing is not
    let (border_color, title) = if app.is_awaiting() {
        (Color::DarkGray, " 리뷰 입력 (분석 중에는 전송할 수 없습니다) ")
    } else {
        (Color::Yellow, " 리뷰 입력 ")
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let (visible_text, cursor_x) = input_viewport(app.draft(), app.cursor, inner_width);

    let input = if app.draft().is_empty() {
        Paragraph::new(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };

    frame.render_widget(input.block(input_block), area);
    frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().fg(Color::Gray);

    let send_label = if app.is_awaiting() { " 대기 " } else { " 전송 " };

    let footer = Line::from(vec![
        Span::styled(" Enter ", key_style),
        Span::styled(send_label, label_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" 스크롤 ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" 종료 ", label_style),
    ]);

    frame.render_widget(Paragraph::new(footer), area);
}
