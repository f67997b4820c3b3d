use prunecopy::rules::parse_line;
use prunecopy::{ArchiveFormat, Rule, RuleSet, should_ignore};
use std::path::Path;
fn rules(lines: &[&str]) -> RuleSet {
    RuleSet::parse(lines.iter().copied(), &[])
}
#[test]
fn test_unmatched_paths_are_kept() {
    assert!(!RuleSet::new().should_ignore(Path::new("anything/at/all.txt"), false));
    assert!(!RuleSet::new().should_ignore(Path::new("dir"), true));
    let set = rules(&["*.log", "target/"]);
    assert!(!set.should_ignore(Path::new("src/main.rs"), false));
    assert!(!set.should_ignore(Path::new("src"), true));
}
#[test]
fn test_last_match_wins() {
    let set = rules(&["*.log", "!important.log"]);
    assert!(!set.should_ignore(Path::new("important.log"), false));
    assert!(set.should_ignore(Path::new("other.log"), false));
    assert!(!set.should_ignore(Path::new("logs/important.log"), false));
    assert!(set.should_ignore(Path::new("logs/other.log"), false));
}
#[test]
fn test_later_ignore_overrides_earlier_include() {
    let set = rules(&["!keep.txt", "*.txt"]);
    assert!(set.should_ignore(Path::new("keep.txt"), false));
}
#[test]
fn test_directory_rules_only_match_directories() {
    let set = rules(&["build/"]);
    assert!(set.should_ignore(Path::new("build"), true));
    assert!(set.should_ignore(Path::new("crates/core/build"), true));
    assert!(!set.should_ignore(Path::new("build"), false));
}
#[test]
fn test_file_rules_do_not_prune_directories() {
    let set = rules(&["cache"]);
    assert!(!set.should_ignore(Path::new("cache"), true));
    assert!(set.should_ignore(Path::new("cache"), false));
    assert!(set.should_ignore(Path::new("nested/cache"), false));
}
#[test]
fn test_bare_names_are_expanded() {
    let set = rules(&["*.pyc"]);
    let patterns: Vec<Rule> = set.rules().cloned().collect();
    assert_eq!(
        patterns,
        vec![Rule::ignore("**/*.pyc"), Rule::ignore("*.pyc")]
    );
    assert!(set.should_ignore(Path::new("sub/dir/x.pyc"), false));
    assert!(set.should_ignore(Path::new("x.pyc"), false));
}
#[test]
fn test_expansion_rules() {
    assert_eq!(rules(&["docs/api/"]).len(), 2);
    assert_eq!(rules(&["**/tmp/"]).len(), 1);
    assert_eq!(rules(&["/target/"]).len(), 1);
    assert_eq!(rules(&["src/*.rs"]).len(), 1);
    assert_eq!(rules(&["!notes"]).len(), 2);
    assert!(rules(&["!notes"]).rules().all(|r| r.is_include));
}
#[test]
fn test_single_star_stays_within_a_segment() {
    let set = rules(&["src/*.rs"]);
    assert!(set.should_ignore(Path::new("src/main.rs"), false));
    assert!(!set.should_ignore(Path::new("src/bin/main.rs"), false));
    let set = rules(&["src/**/*.rs"]);
    assert!(set.should_ignore(Path::new("src/bin/main.rs"), false));
    let set = rules(&["file?.txt"]);
    assert!(set.should_ignore(Path::new("file1.txt"), false));
    assert!(!set.should_ignore(Path::new("file/.txt"), false));
}
#[test]
fn test_leading_slash_anchors_to_root() {
    let set = rules(&["/target/"]);
    assert!(set.should_ignore(Path::new("target"), true));
    assert!(!set.should_ignore(Path::new("crates/target"), true));
}
#[test]
fn test_matching_is_case_sensitive() {
    let set = rules(&["*.LOG"]);
    assert!(!set.should_ignore(Path::new("a.log"), false));
    assert!(set.should_ignore(Path::new("a.LOG"), false));
}
#[test]
fn test_parse_line() {
    assert_eq!(parse_line(""), None);
    assert_eq!(parse_line("   "), None);
    assert_eq!(parse_line("# comment"), None);
    assert_eq!(parse_line("  # indented comment"), None);
    assert_eq!(parse_line("*.tmp   # trailing"), Some(Rule::ignore("*.tmp")));
    assert_eq!(parse_line("!  keep.tmp"), Some(Rule::include("keep.tmp")));
    assert_eq!(parse_line("  dist/  "), Some(Rule::ignore("dist/")));
}
#[test]
fn test_comments_and_blank_lines_are_skipped() {
    let set = rules(&["# header", "", "*.tmp # scratch", "!keep.tmp"]);
    let patterns: Vec<&str> = set.rules().map(|r| r.pattern.as_str()).collect();
    assert_eq!(patterns, vec!["**/*.tmp", "*.tmp", "**/keep.tmp", "keep.tmp"]);
    assert!(!set.should_ignore(Path::new("keep.tmp"), false));
}
#[test]
fn test_extra_patterns_come_last() {
    let set = RuleSet::parse(["!*.md"], &["README.md".to_string(), "  ".to_string()]);
    assert_eq!(set.len(), 4);
    assert!(set.should_ignore(Path::new("README.md"), false));
    assert!(!set.should_ignore(Path::new("NOTES.md"), false));
}
#[test]
fn test_invalid_glob_matches_literally() {
    let set = rules(&["[abc"]);
    assert!(set.should_ignore(Path::new("[abc"), false));
    assert!(!set.should_ignore(Path::new("a"), false));
}
#[test]
fn test_default_rules() {
    let set = RuleSet::defaults(&[]);
    assert!(set.should_ignore(Path::new(".git"), true));
    assert!(set.should_ignore(Path::new("web/node_modules"), true));
    assert!(set.should_ignore(Path::new("my_build_output"), true));
    assert!(set.should_ignore(Path::new("a/b/c.pyc"), false));
    assert!(set.should_ignore(Path::new("ext.pyd"), false));
    assert!(set.should_ignore(Path::new("photos/.DS_Store"), false));
    assert!(!set.should_ignore(Path::new("build.rs"), false));
    assert!(!set.should_ignore(Path::new("src"), true));
}
#[test]
fn test_appended_rules_are_not_expanded() {
    let mut set = rules(&["*.log"]);
    let before = set.len();
    set.push_ignore("out/");
    set.push_ignore("");
    assert_eq!(set.len(), before + 1);
    assert!(set.should_ignore(Path::new("out"), true));
    assert!(!set.should_ignore(Path::new("nested/out"), true));
}
#[test]
fn test_string_and_function_forms_agree() {
    let set = rules(&["build/", "*.o"]);
    assert!(set.should_ignore_str("build/", true));
    assert!(set.should_ignore_str("build", true));
    assert!(should_ignore("obj/main.o", &set, false));
    assert!(!should_ignore("obj", &set, true));
}
#[test]
fn test_archive_format_detection() {
    assert_eq!(ArchiveFormat::from_path("out/Backup.ZIP"), Some(ArchiveFormat::Zip));
    assert_eq!(ArchiveFormat::from_path("a.tar"), Some(ArchiveFormat::Tar));
    assert_eq!(ArchiveFormat::from_path("a.tar.gz"), Some(ArchiveFormat::TarGz));
    assert_eq!(ArchiveFormat::from_path("a.tgz"), Some(ArchiveFormat::TarGz));
    assert_eq!(ArchiveFormat::from_path("a.gz"), None);
    assert_eq!(ArchiveFormat::from_path("a.rar"), None);
}
