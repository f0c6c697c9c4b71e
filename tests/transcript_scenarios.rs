//! End-to-end scenarios: JSON in, view transitions, layout, drawing commands.

use std::fs;

use tempfile::tempdir;
use transcript_viewer::export::{select_recent, ExportSnapshot};
use transcript_viewer::layout::{layout_sequence, CharWidthMeasure, LayoutItem, LayoutStyle, Side};
use transcript_viewer::ui::surface::{draw_page, CommandRecorder};
use transcript_viewer::ui::theme::Palette;
use transcript_viewer::{Message, PageNav, RawMessage, RawText, Transcript, ViewState};

fn message(from_id: &str, date: &str, text: &str, self_id: Option<&str>) -> Message {
    let raw = RawMessage {
        from: Some(from_id.to_string()),
        from_id: Some(from_id.to_string()),
        date: Some(date.to_string()),
        text: RawText::Plain(text.to_string()),
        ..Default::default()
    };
    Message::normalize(&raw, self_id)
}

fn numbered(count: usize) -> Transcript {
    let messages = (1..=count)
        .map(|i| message("user1", "2024-03-05T12:00:00", &format!("message {}", i), None))
        .collect();
    Transcript::new("Numbers", messages)
}

#[test]
fn test_two_messages_one_separator() {
    let self_id = Some("me");
    let messages = vec![
        message("A", "2024-01-01T10:00:00", "hello", self_id),
        message("me", "2024-01-01T10:01:00", "hi back", self_id),
    ];
    let view = ViewState::new(20).load(Transcript::new("Pair", messages));

    let style = LayoutStyle::canvas();
    let page = layout_sequence(view.page_messages(), 800., &style, &mut CharWidthMeasure);

    assert_eq!(page.separator_count(), 1);
    assert!(matches!(page.items[0], LayoutItem::DateSeparator(_)));
    let sides: Vec<Side> = page
        .items
        .iter()
        .filter_map(|item| match item {
            LayoutItem::Message(m) => m.as_bubble().map(|b| b.side),
            LayoutItem::DateSeparator(_) => None,
        })
        .collect();
    assert_eq!(sides, vec![Side::Left, Side::Right]);

    let mut recorder = CommandRecorder::new();
    let drawn = draw_page(&mut recorder, &page, &Palette::dark(), 0., f32::MAX);
    assert_eq!(drawn, 3);
    let texts: Vec<&str> = recorder.texts().collect();
    assert!(texts.contains(&"01.01.2024"));
    assert!(texts.contains(&"hello"));
    assert!(texts.contains(&"hi back"));
    assert!(texts.contains(&"10:01"));
}

#[test]
fn test_forty_five_messages_three_pages() {
    let view = ViewState::new(20).load(numbered(45));
    assert_eq!(view.pagination().total_pages(), 3);

    // Loads land on the newest page
    assert_eq!(view.pagination().current_page(), 2);
    let bodies: Vec<&str> = view.page_messages().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies.first(), Some(&"message 41"));
    assert_eq!(bodies.last(), Some(&"message 45"));
    assert_eq!(bodies.len(), 5);

    let first = view.navigate(PageNav::First).unwrap();
    assert_eq!(first.pagination().current_page(), 0);
    assert!(first.navigate(PageNav::Prev).is_none());

    let last = first.navigate(PageNav::Last).unwrap();
    assert_eq!(last.pagination().current_page(), 2);
    assert!(last.navigate(PageNav::Next).is_none());
}

#[test]
fn test_export_uses_all_when_fewer_than_budget() {
    let view = ViewState::new(20).load(numbered(30));
    let selected = select_recent(view.displayed(), 50);
    assert_eq!(selected.len(), 30);

    let snapshot = ExportSnapshot::from_view(&view, 20);
    assert_eq!(snapshot.len(), 20);
    assert_eq!(snapshot.messages[0].body, "message 11");
    assert_eq!(snapshot.chat_name, "Numbers");
}

#[test]
fn test_long_body_truncated_on_canvas() {
    let body = "x".repeat(500);
    let messages = vec![message("bob", "2024-01-01T10:00:00", &body, None)];
    let view = ViewState::new(20).load(Transcript::new("Long", messages));

    let shown = view.page_messages().next().unwrap().display_text(200);
    assert_eq!(shown.chars().count(), 203);
    assert!(shown.ends_with("..."));

    let style = LayoutStyle::canvas();
    let page = layout_sequence(view.page_messages(), 800., &style, &mut CharWidthMeasure);
    let mut recorder = CommandRecorder::new();
    draw_page(&mut recorder, &page, &Palette::dark(), 0., f32::MAX);
    let drawn: String = recorder
        .texts()
        .filter(|t| t.starts_with('x'))
        .collect();
    assert_eq!(drawn, shown);
}

#[test]
fn test_filter_idempotent_and_ordered() {
    let messages = vec![
        message("a", "2024-01-01T10:00:00", "Apple pie", None),
        message("b", "2024-01-01T10:01:00", "banana", None),
        message("c", "2024-01-01T10:02:00", "pineapple", None),
    ];
    let view = ViewState::new(20).load(Transcript::new("Fruit", messages));

    let once = view.with_query("APPLE");
    let twice = once.with_query("APPLE");
    let bodies = |v: &ViewState| -> Vec<String> { v.displayed().iter().map(|m| m.body.clone()).collect() };
    assert_eq!(bodies(&once), vec!["Apple pie", "pineapple"]);
    assert_eq!(bodies(&once), bodies(&twice));

    let cleared = once.with_query("   ");
    assert_eq!(cleared.displayed().len(), 3);

    let nothing = view.with_query("durian");
    assert!(nothing.displayed().is_empty());
    assert_eq!(nothing.pagination().total_pages(), 1);
    assert_eq!(nothing.pagination().current_page(), 0);
}

#[test]
fn test_load_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("result.json");
    fs::write(
        &path,
        r#"{
            "name": "Family",
            "messages": [
                {"id": 1, "type": "message", "date": "2024-01-01T10:00:00",
                 "from": "Mum", "from_id": "user42", "text": "Dinner at 7"},
                {"id": 2, "type": "message", "date": "2024-01-01T10:05:00",
                 "from": "Me", "from_id": "user6582117962",
                 "text": ["see ", {"type": "bold", "text": "you"}, " there"]},
                {"id": 3, "type": "service", "date": "2024-01-01T11:00:00",
                 "actor": "Mum", "action": "pin_message"},
                {"id": 4, "type": "message", "date": "2024-01-01T12:00:00",
                 "from": "Mum", "from_id": "user42", "photo": "photos/1.jpg", "text": ""}
            ]
        }"#,
    )
    .unwrap();

    let transcript = Transcript::load(&path, Some("6582117962")).unwrap();
    assert_eq!(transcript.name, "Family");
    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript.participant_count(), 2);

    let messages = &transcript.messages;
    assert!(!messages[0].is_own);
    assert!(messages[1].is_own);
    assert_eq!(messages[1].body, "see you there");
    assert!(messages[2].is_service());
    assert!(!messages[3].display_text(200).is_empty());

    let view = ViewState::new(20).load(transcript);
    assert_eq!(view.chat_name(), "Family");
    assert_eq!(view.displayed().len(), 4);
}

#[test]
fn test_load_missing_file_errors() {
    let dir = tempdir().unwrap();
    assert!(Transcript::load(&dir.path().join("nope.json"), None).is_err());
}

mod glob_import {
    use transcript_viewer::*;

    // `Result` here must still be the std two-parameter type
    fn parse_count(raw: &str) -> Result<usize, String> {
        raw.parse().map_err(|_| format!("bad count {}", raw))
    }

    #[test]
    fn test_glob_import_keeps_std_result() {
        assert_eq!(parse_count("3"), Ok(3));
        assert!(parse_count("three").is_err());

        let transcript = Transcript::from_json_str(r#"{"messages": []}"#, None).unwrap();
        assert_eq!(transcript.name, UNKNOWN_CHAT);
        assert!(transcript.is_empty());

        let err: LoadError = Transcript::from_json_str("[", None).unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
