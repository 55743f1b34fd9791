use crate::PlayerCommand;

use std::path::Path;

use googletest::assert_that;
use googletest::prelude::{contains_substring, eq};
use lp_config::PlayerConfig;

fn arg_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
}

#[test]
fn given_default_config_when_built_then_low_latency_arguments() {
    // Given
    let config = PlayerConfig::default();

    // When
    let command = PlayerCommand::from_config(&config);

    // Then
    assert_that!(command.program(), eq(Path::new("ffplay")));
    let args = command.args();
    assert_that!(arg_after(args, "-fflags"), eq(Some("nobuffer")));
    assert_that!(arg_after(args, "-flags"), eq(Some("low_delay")));
    assert_that!(arg_after(args, "-strict"), eq(Some("experimental")));
    assert!(args.iter().any(|arg| arg == "-framedrop"));
    assert!(args.iter().any(|arg| arg == "-infbuf"));
    assert_that!(
        arg_after(args, "-window_title"),
        eq(Some("LINKPLAY Stream (Capture This Window in OBS)"))
    );
}

#[test]
fn given_custom_port_when_built_then_input_is_last_and_listens_on_port() {
    // Given
    let config = PlayerConfig {
        network_port: 6001,
        ..PlayerConfig::default()
    };

    // When
    let command = PlayerCommand::from_config(&config);

    // Then
    let args = command.args();
    assert_that!(args[args.len() - 2].as_str(), eq("-i"));
    assert_that!(args[args.len() - 1].as_str(), eq("udp://@:6001"));
}

#[test]
fn given_extra_args_when_built_then_placed_before_input() {
    // Given
    let config = PlayerConfig {
        extra_args: vec![String::from("-sync"), String::from("ext")],
        ..PlayerConfig::default()
    };

    // When
    let command = PlayerCommand::from_config(&config);

    // Then
    let args = command.args();
    let sync = args.iter().position(|arg| arg == "-sync").unwrap();
    let input = args.iter().position(|arg| arg == "-i").unwrap();
    assert!(sync < input);
    assert_that!(arg_after(args, "-sync"), eq(Some("ext")));
}

#[test]
fn given_title_with_spaces_when_displayed_then_title_is_quoted() {
    // Given
    let config = PlayerConfig {
        executable: String::from("/usr/local/bin/ffplay"),
        window_title: String::from("Studio Feed"),
        ..PlayerConfig::default()
    };

    // When
    let rendered = PlayerCommand::from_config(&config).to_string();

    // Then
    assert_that!(rendered, contains_substring("/usr/local/bin/ffplay -fflags nobuffer"));
    assert_that!(rendered, contains_substring("-window_title \"Studio Feed\""));
    assert_that!(rendered, contains_substring("-i udp://@:5555"));
}

#[test]
fn test_same_config_builds_same_command() {
    let config = PlayerConfig::default();

    assert_eq!(
        PlayerCommand::from_config(&config),
        PlayerCommand::from_config(&config)
    );
}
