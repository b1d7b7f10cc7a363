pub mod auth;
pub mod logging;

use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_PORT: &str = "port";
pub const ARG_DSN: &str = "dsn";
pub const ARG_IN_MEMORY: &str = "in-memory";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("userregis")
        .about("User registration and cookie session authentication")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("4000")
                .env("USERREGIS_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long(ARG_DSN)
                .help("PostgreSQL connection string")
                .env("USERREGIS_DSN")
                .hide_env_values(true)
                .required_unless_present(ARG_IN_MEMORY)
                .conflicts_with(ARG_IN_MEMORY),
        )
        .arg(
            Arg::new(ARG_IN_MEMORY)
                .long(ARG_IN_MEMORY)
                .help("Keep accounts in process memory instead of PostgreSQL (development only)")
                .env("USERREGIS_IN_MEMORY")
                .action(ArgAction::SetTrue),
        );

    let command = auth::with_args(command);
    logging::with_args(command)
}
