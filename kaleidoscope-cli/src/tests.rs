use crate::build_precedence_table;
use crate::cli::build_cli;

#[test]
fn test_cli_definition() {
    build_cli().debug_assert();
}

#[test]
fn test_binop_args_override_in_order() {
    let matches = build_cli()
        .try_get_matches_from(["kaleidoscope", "-b", "%=40", "--binop", "<=5", "-b", "%=50"])
        .unwrap();
    let table = build_precedence_table(&matches).unwrap();
    assert_eq!(table.precedence_of('%'), 50);
    assert_eq!(table.precedence_of('<'), 5);
    assert_eq!(table.precedence_of('+'), 20);
}

#[test]
fn test_bad_binop_arg() {
    let matches = build_cli().try_get_matches_from(["kaleidoscope", "-b", "(=10"]).unwrap();
    assert!(build_precedence_table(&matches).is_err());
}

#[test]
fn test_code_conflicts_with_file_name() {
    let result = build_cli().try_get_matches_from(["kaleidoscope", "-c", "1", "file.kal"]);
    assert!(result.is_err());
}
