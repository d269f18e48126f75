use mf3270_emulator::{Emulator, EmulatorConfig, EmulatorError, Position};
use mf3270_test_utils::fixtures::data::{
    blank_screen, screen_with, STATUS_CONNECTED, STATUS_LOCKED, STATUS_NOT_CONNECTED,
};
use mf3270_test_utils::{init_test_logging, ScriptedLauncher, ScriptedTransport};
use pretty_assertions::assert_eq;
use std::io;

fn emulator(script: &ScriptedTransport) -> Emulator {
    init_test_logging();
    Emulator::with_transport(EmulatorConfig::default(), script.boxed()).unwrap()
}

fn emulator_with_model(script: &ScriptedTransport, model: &str) -> Emulator {
    init_test_logging();
    let config = EmulatorConfig::default().with_model(model);
    Emulator::with_transport(config, script.boxed()).unwrap()
}

#[tokio::test]
async fn test_string_get_reads_one_line() {
    let script = ScriptedTransport::new();
    script.respond_ok(&["HELLO"]);
    let mut emulator = emulator(&script);

    assert_eq!(emulator.string_get(1, 1, 5).await.unwrap(), "HELLO");
    assert_eq!(script.written(), vec!["ascii(0,0,5)"]);
    assert!(emulator.status().is_connected());
}

#[tokio::test]
async fn test_string_get_rejects_overflow_without_traffic() {
    let script = ScriptedTransport::new();
    let mut emulator = emulator(&script);

    let err = emulator.string_get(1, 77, 10).await.unwrap_err();

    assert!(matches!(err, EmulatorError::XAxisLimit));
    assert_eq!(
        err.to_string(),
        "You have exceeded the x-axis limit of the mainframe screen"
    );
    assert_eq!(script.write_count(), 0);
}

#[tokio::test]
async fn test_string_get_requires_a_single_data_line() {
    let script = ScriptedTransport::new();
    script.respond_ok(&["one", "two"]);
    let mut emulator = emulator(&script);

    let err = emulator.string_get(1, 1, 3).await.unwrap_err();

    assert!(matches!(err, EmulatorError::UnexpectedData(_)));
}

#[tokio::test]
async fn test_move_to_converts_to_zero_based() {
    let script = ScriptedTransport::new();
    script.respond_ok(&[]);
    let mut emulator = emulator(&script);

    emulator.move_to(3, 10).await.unwrap();

    assert_eq!(script.written(), vec!["MoveCursor(2, 9)"]);
}

#[tokio::test]
async fn test_move_to_checks_both_axes() {
    let script = ScriptedTransport::new();
    let mut emulator = emulator(&script);

    assert!(matches!(
        emulator.move_to(25, 1).await,
        Err(EmulatorError::YAxisLimit)
    ));
    assert!(matches!(
        emulator.move_to(1, 81).await,
        Err(EmulatorError::XAxisLimit)
    ));
    assert!(matches!(
        emulator.move_to(0, 1).await,
        Err(EmulatorError::YAxisLimit)
    ));
    assert_eq!(script.write_count(), 0);
}

#[tokio::test]
async fn test_model_5_limits() {
    let script = ScriptedTransport::new();
    script.respond_ok(&[]);
    let mut emulator = emulator_with_model(&script, "3279-5-E");

    emulator.move_to(27, 132).await.unwrap();
    assert!(matches!(
        emulator.move_to(28, 1).await,
        Err(EmulatorError::YAxisLimit)
    ));
    assert_eq!(script.written(), vec!["MoveCursor(26, 131)"]);
}

#[tokio::test]
async fn test_search_string_matches_per_row() {
    let script = ScriptedTransport::new();
    script.respond_screen(&screen_with(24, 80, &[(3, 10, "HELLO")]));
    let mut emulator = emulator(&script);

    assert!(emulator.search_string("HELLO", false).await.unwrap());
    // stops reading at the first matching row
    assert_eq!(script.write_count(), 3);
}

#[tokio::test]
async fn test_search_string_not_found_reads_every_row() {
    let script = ScriptedTransport::new();
    script.respond_screen(&screen_with(24, 80, &[(3, 10, "HELLO")]));
    let mut emulator = emulator(&script);

    assert!(!emulator.search_string("BYE", false).await.unwrap());
    assert_eq!(script.write_count(), 24);
    assert_eq!(script.written()[23], "ascii(23,0,80)");
}

#[tokio::test]
async fn test_search_string_ignore_case() {
    let script = ScriptedTransport::new();
    script.respond_screen(&screen_with(24, 80, &[(1, 1, "Welcome")]));
    let mut emulator = emulator(&script);

    assert!(emulator.search_string("WELCOME", true).await.unwrap());
}

#[tokio::test]
async fn test_search_string_does_not_wrap_rows() {
    let script = ScriptedTransport::new();
    script.respond_screen(&screen_with(24, 80, &[(1, 78, "WRAP")]));
    let mut emulator = emulator(&script);

    assert!(!emulator.search_string("WRAP", false).await.unwrap());
}

#[tokio::test]
async fn test_string_positions_wrap_rows() {
    let script = ScriptedTransport::new();
    script.respond_screen(&screen_with(24, 80, &[(1, 78, "WRAP")]));
    let mut emulator = emulator(&script);

    let positions = emulator.get_string_positions("WRAP", false).await.unwrap();

    assert_eq!(positions, vec![Position::new(1, 78)]);
}

#[tokio::test]
async fn test_string_positions_in_reading_order() {
    let script = ScriptedTransport::new();
    script.respond_screen(&screen_with(
        24,
        80,
        &[(2, 5, "abc"), (2, 40, "ABC"), (24, 78, "abc")],
    ));
    let mut emulator = emulator(&script);

    let positions = emulator.get_string_positions("abc", true).await.unwrap();

    assert_eq!(
        positions,
        vec![Position::new(2, 5), Position::new(2, 40), Position::new(24, 78)]
    );
}

#[tokio::test]
async fn test_string_positions_match_literally() {
    let script = ScriptedTransport::new();
    script.respond_screen(&screen_with(24, 80, &[(5, 1, "a.c (x)")]));
    let mut emulator = emulator(&script);

    let positions = emulator.get_string_positions("(x)", false).await.unwrap();

    assert_eq!(positions, vec![Position::new(5, 5)]);
}

#[tokio::test]
async fn test_read_all_screen_concatenates_rows() {
    let script = ScriptedTransport::new();
    let rows = screen_with(24, 80, &[(1, 1, "top"), (24, 1, "bottom")]);
    script.respond_screen(&rows);
    let mut emulator = emulator(&script);

    let screen = emulator.read_all_screen().await.unwrap();

    assert_eq!(screen, rows.concat());
    assert_eq!(screen.chars().count(), 24 * 80);
}

#[tokio::test]
async fn test_current_position_round_trips_through_move() {
    let script = ScriptedTransport::new();
    script.respond_ok(&["4 24"]).respond_ok(&[]);
    let mut emulator = emulator(&script);

    let position = emulator.get_current_position().await.unwrap();
    assert_eq!(position, Position::new(5, 25));

    emulator.move_to(position.row, position.col).await.unwrap();
    assert_eq!(script.written(), vec!["Query(Cursor)", "MoveCursor(4, 24)"]);
}

#[tokio::test]
async fn test_current_position_rejects_bad_shape() {
    let script = ScriptedTransport::new();
    script.respond_ok(&[]).respond_ok(&["not a cursor"]);
    let mut emulator = emulator(&script);

    assert!(matches!(
        emulator.get_current_position().await,
        Err(EmulatorError::UnexpectedData(_))
    ));
    assert!(matches!(
        emulator.get_current_position().await,
        Err(EmulatorError::UnexpectedData(_))
    ));
}

#[tokio::test]
async fn test_send_string_moves_first() {
    let script = ScriptedTransport::new();
    script.respond_ok(&[]).respond_ok(&[]).respond_ok(&[]);
    let mut emulator = emulator(&script);

    emulator
        .send_string("say \"hi\"", Some(Position::new(2, 5)))
        .await
        .unwrap();
    emulator.send_string("plain", None).await.unwrap();

    assert_eq!(
        script.written(),
        vec![
            "MoveCursor(1, 4)",
            "String(\"say \\\"hi\\\"\")",
            "String(\"plain\")"
        ]
    );
}

#[tokio::test]
async fn test_fill_field() {
    let script = ScriptedTransport::new();
    script.respond_ok(&[]).respond_ok(&[]).respond_ok(&[]);
    let mut emulator = emulator(&script);

    emulator
        .fill_field(Some(Position::new(10, 20)), "USER", 8)
        .await
        .unwrap();

    assert_eq!(
        script.written(),
        vec!["MoveCursor(9, 19)", "DeleteField", "String(\"USER\")"]
    );
}

#[tokio::test]
async fn test_fill_field_truncation() {
    let script = ScriptedTransport::new();
    let mut emulator = emulator(&script);

    let err = emulator.fill_field(None, "TOOLONG", 4).await.unwrap_err();

    assert_eq!(err.to_string(), "length limit 4, but got \"TOOLONG\"");
    assert_eq!(script.write_count(), 0);
}

#[tokio::test]
async fn test_connect_over_pipe_sends_connect_action() {
    let script = ScriptedTransport::new();
    script.respond_ok(&[]);
    let mut emulator = emulator(&script);

    emulator.connect("L:pub400.com:23").await.unwrap();

    assert_eq!(script.connects(), vec!["L:pub400.com:23"]);
    assert_eq!(script.written(), vec!["Connect(L:pub400.com:23)"]);
    assert_eq!(emulator.last_host(), Some("L:pub400.com:23"));
}

#[tokio::test]
async fn test_connect_over_script_port_sends_nothing() {
    let script = ScriptedTransport::detached().self_connecting();
    let mut emulator = emulator(&script);

    emulator.connect("pub400.com:23").await.unwrap();

    assert_eq!(script.write_count(), 0);
    assert_eq!(emulator.last_host(), Some("pub400.com:23"));
}

#[tokio::test]
async fn test_connect_error_keeps_no_host() {
    let script = ScriptedTransport::new();
    script.respond_error("Connection refused");
    let mut emulator = emulator(&script);

    let err = emulator.connect("nowhere:23").await.unwrap_err();

    assert_eq!(err.command_message(), Some("Connection refused"));
    assert_eq!(emulator.last_host(), None);
}

#[tokio::test]
async fn test_reconnect() {
    let script = ScriptedTransport::new();
    script.respond_ok(&[]).respond_ok(&[]).respond_ok(&[]);
    let mut emulator = emulator(&script);

    assert!(matches!(
        emulator.reconnect().await,
        Err(EmulatorError::NoHost)
    ));

    emulator.connect("pub400.com:23").await.unwrap();
    emulator.reconnect().await.unwrap();

    assert_eq!(
        script.written(),
        vec![
            "Connect(pub400.com:23)",
            "Disconnect",
            "Connect(pub400.com:23)"
        ]
    );
}

#[tokio::test]
async fn test_is_connected_reads_connection_state() {
    let script = ScriptedTransport::new();
    script
        .respond(&[], STATUS_CONNECTED, "ok")
        .respond(&[], STATUS_NOT_CONNECTED, "ok");
    let mut emulator = emulator(&script);

    assert!(emulator.is_connected().await.unwrap());
    assert!(!emulator.is_connected().await.unwrap());
    assert_eq!(script.written(), vec!["ignore", "ignore"]);
}

#[tokio::test]
async fn test_is_connected_without_transport() {
    let script = ScriptedTransport::detached();
    let mut emulator = emulator(&script);

    assert!(!emulator.is_connected().await.unwrap());
}

#[tokio::test]
async fn test_wait_for_field() {
    let script = ScriptedTransport::new();
    script
        .respond(&[], STATUS_CONNECTED, "ok")
        .respond(&[], STATUS_LOCKED, "ok");
    let mut emulator = emulator(&script);

    emulator.wait_for_field().await.unwrap();
    let err = emulator.wait_for_field().await.unwrap_err();

    assert_eq!(err.to_string(), "keyboard not unlocked, state was: L");
    assert_eq!(script.written()[0], "Wait(30, InputField)");
}

#[tokio::test]
async fn test_status_kept_after_command_error() {
    let script = ScriptedTransport::new();
    script.respond(&["Keyboard locked"], STATUS_LOCKED, "error");
    let mut emulator = emulator(&script);

    let err = emulator.send_enter().await.unwrap_err();

    assert_eq!(err.to_string(), "Keyboard locked");
    assert_eq!(emulator.status().keyboard.as_deref(), Some("L"));
    assert_eq!(emulator.status().as_str(), STATUS_LOCKED);
}

#[tokio::test]
async fn test_unexpected_result_is_fatal() {
    let script = ScriptedTransport::new();
    script.respond(&[], STATUS_CONNECTED, "weird");
    let mut emulator = emulator(&script);

    let err = emulator.exec_command("Enter").await.unwrap_err();

    assert!(err.to_string().contains("weird"));
}

#[tokio::test]
async fn test_simple_actions() {
    let script = ScriptedTransport::new();
    for _ in 0..4 {
        script.respond_ok(&[]);
    }
    let mut emulator = emulator(&script);

    emulator.send_enter().await.unwrap();
    emulator.delete_field().await.unwrap();
    emulator.delete_char().await.unwrap();
    emulator.save_screen("/tmp/screen.html").await.unwrap();

    assert_eq!(
        script.written(),
        vec![
            "Enter",
            "DeleteField",
            "Delete",
            "PrintText(html,file,/tmp/screen.html)"
        ]
    );
}

#[tokio::test]
async fn test_terminate_is_idempotent() {
    let script = ScriptedTransport::new();
    script.respond(&[], STATUS_CONNECTED, "");
    let mut emulator = emulator(&script);

    emulator.terminate().await.unwrap();
    emulator.terminate().await.unwrap();

    assert!(emulator.is_terminated());
    assert_eq!(script.close_count(), 1);
    assert_eq!(script.written(), vec!["Quit"]);
}

#[tokio::test]
async fn test_terminated_session_is_inert() {
    let script = ScriptedTransport::new();
    let mut emulator = emulator(&script);

    emulator.terminate().await.unwrap();

    assert!(matches!(
        emulator.send_enter().await,
        Err(EmulatorError::Terminated)
    ));
    assert!(matches!(
        emulator.move_to(1, 1).await,
        Err(EmulatorError::Terminated)
    ));
    assert!(matches!(
        emulator.is_connected().await,
        Err(EmulatorError::Terminated)
    ));
    assert_eq!(
        EmulatorError::Terminated.to_string(),
        "This Emulator instance has been terminated"
    );
}

#[tokio::test]
async fn test_terminate_tolerates_closed_emulator() {
    for kind in [io::ErrorKind::BrokenPipe, io::ErrorKind::ConnectionReset] {
        let script = ScriptedTransport::new();
        script.fail_writes_with(kind);
        let mut emulator = emulator(&script);

        emulator.terminate().await.unwrap();

        assert!(emulator.is_terminated());
        assert_eq!(script.close_count(), 1);
    }
}

#[tokio::test]
async fn test_terminate_propagates_other_errors() {
    let script = ScriptedTransport::new();
    script.fail_writes_with(io::ErrorKind::PermissionDenied);
    let mut emulator = emulator(&script);

    assert!(emulator.terminate().await.is_err());
    assert!(!emulator.is_terminated());
    assert_eq!(script.close_count(), 0);
}

#[tokio::test]
async fn test_launcher_receives_model_last() {
    init_test_logging();
    let launcher = ScriptedLauncher::new();
    let config = EmulatorConfig::default()
        .with_model("3279-4-E")
        .with_extra_args(vec!["-charset".into(), "french".into()]);

    let emulator = Emulator::with_launcher(config, &launcher).unwrap();

    let launched = launcher.launched();
    assert_eq!(launched.len(), 1);
    let args = launched[0].args();
    assert_eq!(
        &args[args.len() - 4..],
        &["-charset", "french", "-xrm", "*model: 3279-4-E"]
    );
    assert_eq!(emulator.geometry().rows, 43);
}

#[tokio::test]
async fn test_unknown_model_launches_nothing() {
    let launcher = ScriptedLauncher::new();
    let config = EmulatorConfig::default().with_model("7");

    let err = Emulator::with_launcher(config, &launcher).err().unwrap();

    assert!(matches!(err, EmulatorError::UnknownModel { .. }));
    assert!(launcher.launched().is_empty());
}

#[test]
fn test_blank_screen_fixture_width() {
    let rows = blank_screen(24, 80);
    assert_eq!(rows.len(), 24);
    assert!(rows.iter().all(|row| row.len() == 80));
}
