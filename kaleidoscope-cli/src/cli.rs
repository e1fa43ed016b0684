use clap::builder::FalseyValueParser;
use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    let file_name_help = concat!(
        "Source file to parse. Can be:\n\n",
        "1. a path to a source file\n",
        "2. a single dash to read from stdin\n\n",
        "When no file or code is given, the REPL is started.",
    );

    let binop_help = concat!(
        "Add or override a binary operator, e.g. %=40.\n",
        "Higher precedence binds tighter. Can be repeated.",
    );

    Command::new("Kaleidoscope")
        .version("0.0.0")
        .about("Kaleidoscope lexer and parser")
        .arg(Arg::new("FILE_NAME").index(1).required(false).help(file_name_help))
        .arg(
            Arg::new("code")
                .short('c')
                .long("code")
                .required(false)
                .num_args(1)
                .conflicts_with("FILE_NAME")
                .help("Use this to parse short snippets of code"),
        )
        .arg(
            Arg::new("tokens")
                .short('t')
                .long("tokens")
                .action(ArgAction::SetTrue)
                .help("Show tokens instead of parsing?"),
        )
        .arg(
            Arg::new("ast")
                .short('a')
                .long("ast")
                .action(ArgAction::SetTrue)
                .help("Show the AST of each parsed item?"),
        )
        .arg(
            Arg::new("binop")
                .short('b')
                .long("binop")
                .action(ArgAction::Append)
                .value_name("OP=PREC")
                .help(binop_help),
        )
        .arg(
            Arg::new("history_path")
                .long("history-path")
                .required(false)
                .num_args(1)
                .default_value("~/.config/kaleidoscope/repl-history")
                .help("Path to REPL history file"),
        )
        .arg(
            Arg::new("no_history")
                .long("no-history")
                .action(ArgAction::SetTrue)
                .help("Disable REPL history? [default: history enabled]"),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .action(ArgAction::SetTrue)
                .value_parser(FalseyValueParser::new())
                .env("KALEIDOSCOPE_DEBUG")
                .help("Enable debug logging?"),
        )
}
