use crate::commands::ConsoleCommand;
use crate::error::ReceiverError;

#[test]
fn test_commands_and_aliases() {
    let cases = [
        ("start", ConsoleCommand::Start),
        ("stop", ConsoleCommand::Stop),
        ("restart", ConsoleCommand::Restart),
        ("r", ConsoleCommand::Restart),
        ("status", ConsoleCommand::Status),
        ("help", ConsoleCommand::Help),
        ("quit", ConsoleCommand::Quit),
        ("q", ConsoleCommand::Quit),
    ];

    for (input, expected) in cases {
        assert_eq!(input.parse::<ConsoleCommand>().unwrap(), expected, "{input}");
    }
}

#[test]
fn test_commands_ignore_case_and_whitespace() {
    assert_eq!(
        "  RESTART \n".parse::<ConsoleCommand>().unwrap(),
        ConsoleCommand::Restart
    );
}

#[test]
fn test_unknown_command_is_reported() {
    let result = "reboot".parse::<ConsoleCommand>();

    match result {
        Err(ReceiverError::UnknownCommand { input }) => assert_eq!(input, "reboot"),
        other => panic!("expected UnknownCommand, got {other:?}"),
    }
}
