use crate::cli::Cli;

use clap::Parser;
use googletest::assert_that;
use googletest::prelude::eq;
use log::LevelFilter;
use lp_config::Config;

#[test]
fn given_flags_when_applied_then_config_is_overridden() {
    // Given
    let cli = Cli::try_parse_from([
        "lp-receiver",
        "--port",
        "6000",
        "--title",
        "Studio Feed",
        "--executable",
        "/opt/ffmpeg/bin/ffplay",
        "--log-level",
        "DEBUG",
    ])
    .unwrap();
    let mut config = Config::default();

    // When
    cli.apply_to(&mut config);

    // Then
    assert_that!(config.player.network_port, eq(6000));
    assert_that!(config.player.window_title, eq("Studio Feed"));
    assert_that!(config.player.executable, eq("/opt/ffmpeg/bin/ffplay"));
    assert_that!(config.logging.level.0, eq(LevelFilter::Debug));
}

#[test]
fn given_no_flags_when_applied_then_config_is_unchanged() {
    // Given
    let cli = Cli::try_parse_from(["lp-receiver"]).unwrap();
    let mut config = Config::default();

    // When
    cli.apply_to(&mut config);

    // Then
    assert_that!(config.player.network_port, eq(5555));
    assert_that!(config.player.executable, eq("ffplay"));
    assert_that!(cli.json, eq(false));
}

#[test]
fn given_out_of_range_port_when_parsed_then_rejected() {
    let result = Cli::try_parse_from(["lp-receiver", "--port", "70000"]);

    assert!(result.is_err());
}

#[test]
fn given_json_flag_when_parsed_then_enabled() {
    let cli = Cli::try_parse_from(["lp-receiver", "--json"]).unwrap();

    assert_that!(cli.json, eq(true));
}
