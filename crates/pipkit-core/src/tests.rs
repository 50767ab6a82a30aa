use super::*;

fn names(raw: &[&str]) -> Vec<PackageName> {
    raw.iter()
        .map(|name| PackageName::new(*name).expect("fixture name must be valid"))
        .collect()
}

#[test]
fn package_name_accepts_plain_and_path_like_names() {
    assert_eq!(
        PackageName::new("echo").expect("must parse").as_str(),
        "echo"
    );
    assert_eq!(
        PackageName::new("github.com/acme/jwt")
            .expect("must parse")
            .to_string(),
        "github.com/acme/jwt"
    );
}

#[test]
fn package_name_rejects_empty_whitespace_and_traversal() {
    for raw in ["", "go spew", "tab\tname", "../escape", "a//b", "/abs", "trailing/", "a\\b"] {
        let err = PackageName::new(raw).expect_err("name must be rejected");
        assert_eq!(err.kind(), ErrorKind::InvalidName, "raw={raw:?}");
    }
}

#[test]
fn package_name_deserializes_through_validation() {
    #[derive(serde::Deserialize)]
    struct Holder {
        name: PackageName,
    }

    let holder: Holder = toml::from_str("name = \"jwt\"").expect("must parse");
    assert_eq!(holder.name, "jwt");
    assert!(toml::from_str::<Holder>("name = \"\"").is_err());
}

#[test]
fn package_name_ancestors_and_overlap_follow_path_segments() {
    let log = PackageName::new("github.com/acme/log").expect("must parse");
    assert_eq!(
        log.ancestors().collect::<Vec<_>>(),
        vec!["github.com", "github.com/acme"]
    );

    let parsed = names(&["github.com/acme", "github.com/acme/logger", "jwt"]);
    let (acme, logger, jwt) = (&parsed[0], &parsed[1], &parsed[2]);
    assert!(log.overlaps(acme));
    assert!(acme.overlaps(&log));
    assert!(!log.overlaps(&log));
    assert!(!log.overlaps(logger));
    assert!(!jwt.overlaps(acme));
    assert_eq!(jwt.ancestors().count(), 0);
}

#[test]
fn name_conflict_reports_both_names() {
    let err = PipError::NameConflict {
        name: PackageName::new("github.com/acme").expect("valid"),
        conflicts_with: PackageName::new("github.com/acme/log").expect("valid"),
    };
    assert_eq!(err.kind(), ErrorKind::NameConflict);
    assert_eq!(err.code(), "name-conflict");
    assert!(err.to_string().contains("'github.com/acme/log'"));
}

#[test]
fn parse_requirements_reads_one_name_per_line() {
    let parsed = parse_requirements("jwt\ntestify\nfasttemplate\n").expect("must parse");
    assert_eq!(parsed, names(&["jwt", "testify", "fasttemplate"]));
}

#[test]
fn parse_requirements_skips_blank_lines_and_trailing_newline() {
    let parsed = parse_requirements("\n  jwt  \n\r\n\ntestify\r\n\n").expect("must parse");
    assert_eq!(parsed, names(&["jwt", "testify"]));
    assert!(parse_requirements("").expect("empty parses").is_empty());
    assert!(parse_requirements("\n\n").expect("blank parses").is_empty());
}

#[test]
fn parse_requirements_keeps_duplicates() {
    let parsed = parse_requirements("jwt\njwt\n").expect("must parse");
    assert_eq!(parsed, names(&["jwt", "jwt"]));
}

#[test]
fn parse_requirements_rejects_names_with_inner_whitespace() {
    let err = parse_requirements("jwt\ngo spew\n").expect_err("must reject");
    assert_eq!(err.kind(), ErrorKind::InvalidName);
}

#[test]
fn render_requirements_writes_trailing_newline_per_entry() {
    let deps = names(&["go-spew", "go-difflib"]);
    let rendered = render_requirements(&deps);
    assert_eq!(rendered, "go-spew\ngo-difflib\n");
    assert_eq!(parse_requirements(&rendered).expect("must parse"), deps);
}

#[test]
fn error_messages_name_the_offending_packages() {
    let err = PipError::StillNeeded {
        name: PackageName::new("jwt").expect("valid"),
        needed_by: names(&["echo", "gin"]),
    };
    assert_eq!(
        err.to_string(),
        "cannot remove 'jwt' because [echo, gin] need it"
    );
    assert_eq!(err.code(), "still-needed");

    let cycle = PipError::DependencyCycle {
        cycle: names(&["a", "b", "a"]),
    };
    assert_eq!(cycle.to_string(), "dependency cycle detected: a -> b -> a");
    assert_eq!(cycle.kind(), ErrorKind::DependencyCycle);
}

#[test]
fn repair_failed_exposes_inner_error_as_source() {
    use std::error::Error as _;

    let err = PipError::RepairFailed {
        name: PackageName::new("jwt").expect("valid"),
        source: Box::new(PipError::PackageNotFound {
            name: PackageName::new("jwt").expect("valid"),
        }),
    };
    let source = err.source().expect("must carry source");
    assert!(source.to_string().contains("was not found"));
}

#[test]
fn default_config_uses_requirements_txt_and_go_std_namespaces() {
    let config = ManagerConfig::default();
    assert_eq!(config.manifest_file, MANIFEST_FILE);
    assert_eq!(config.std_namespaces.len(), DEFAULT_STD_NAMESPACES.len());
    assert!(config.search_limit.is_none());
    config.validate().expect("default config must be valid");
}

#[test]
fn config_parses_partial_toml_with_defaults() {
    let config = ManagerConfig::from_toml_str(
        r#"
manifest_file = "deps.txt"
search_limit = 5
"#,
    )
    .expect("config must parse");
    assert_eq!(config.manifest_file, "deps.txt");
    assert_eq!(config.search_limit, Some(5));
    assert!(config.is_std_import("fmt"));
}

#[test]
fn config_rejects_unknown_fields_and_bad_values() {
    for raw in [
        "unknown = 1",
        "manifest_file = \"\"",
        "manifest_file = \"../requirements.txt\"",
        "std_namespaces = [\"net\", \"\"]",
        "search_limit = 0",
    ] {
        let err = ManagerConfig::from_toml_str(raw).expect_err("config must be rejected");
        assert_eq!(err.kind(), ErrorKind::InvalidConfig, "raw={raw}");
    }
}

#[test]
fn config_round_trips_through_toml() {
    let config = ManagerConfig {
        manifest_file: "deps.txt".to_string(),
        std_namespaces: vec!["fmt".to_string()],
        search_limit: Some(3),
    };
    let rendered = config.to_toml_string().expect("must render");
    assert_eq!(
        ManagerConfig::from_toml_str(&rendered).expect("must parse"),
        config
    );
}

#[test]
fn std_import_matches_first_segment_only() {
    let config = ManagerConfig::default();
    assert!(config.is_std_import("net"));
    assert!(config.is_std_import("net/http"));
    assert!(config.is_std_import("encoding/json"));
    assert!(!config.is_std_import("netfoo"));
    assert!(!config.is_std_import("logging"));
    assert!(!config.is_std_import("jwt"));
    assert!(!config.is_std_import("github.com/acme/jwt"));
}

#[test]
fn scan_go_imports_reads_grouped_and_single_imports() {
    let src = r#"package main

import ( 	"fmt"
	"os" )
import "net/http"

func main() {
}
"#;
    let imports = scan_go_imports(src).expect("must parse");
    assert_eq!(imports, vec!["fmt", "os", "net/http"]);
}

#[test]
fn scan_go_imports_handles_aliases_comments_and_raw_strings() {
    let src = r#"// Package demo does things.
package demo

/* leading
   block comment */
import (
	j "jwt" // token signing
	_ "github.com/lib/pq"
	. "strings"
	`echo`
)
import spew "go-spew"

var _ = "import \"ignored\""
"#;
    let imports = scan_go_imports(src).expect("must parse");
    assert_eq!(
        imports,
        vec!["jwt", "github.com/lib/pq", "strings", "echo", "go-spew"]
    );
}

#[test]
fn scan_go_imports_stops_at_first_declaration() {
    let src = "package main\nimport \"fmt\"\nfunc main() {}\nimport \"late\"\n";
    assert_eq!(scan_go_imports(src).expect("must parse"), vec!["fmt"]);
}

#[test]
fn scan_go_imports_accepts_semicolons_and_empty_groups() {
    let src = "package main; import (); import \"fmt\"; import ( \"os\"; \"io\" )";
    assert_eq!(
        scan_go_imports(src).expect("must parse"),
        vec!["fmt", "os", "io"]
    );
}

#[test]
fn scan_go_imports_requires_package_clause() {
    let err = scan_go_imports("import \"fmt\"").expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::ImportParse);
}

#[test]
fn scan_go_imports_reports_line_of_unterminated_group() {
    let err = scan_go_imports("package main\n\nimport (\n\t\"fmt\"\n").expect_err("must fail");
    match err {
        PipError::ImportParse { line, reason } => {
            assert_eq!(line, 5);
            assert!(reason.contains("unterminated import group"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scan_go_imports_rejects_unterminated_string() {
    let err = scan_go_imports("package main\nimport \"fmt\n\"").expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::ImportParse);
}

#[test]
fn go_import_scanner_implements_import_parser() {
    let parser: &dyn ImportParser = &GoImportScanner;
    let imports = parser
        .extract_imports("package main\nimport \"testify\"\n")
        .expect("must parse");
    assert_eq!(imports, vec!["testify"]);
}
