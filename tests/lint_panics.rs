//! Lint: no `.unwrap()` / `.expect(` in library or binary code.
//!
//! Flowify surfaces every failure as `flowify::Error`. A stray unwrap turns a
//! bad save file or a mistimed tap into a crash on the player's phone.
//!
//! This test scans every `.rs` file under `src/` up to its first
//! `#[cfg(test)]` line (test modules live at the bottom of each file) and
//! flags panicking calls.

use std::fs;
use std::path::Path;

const FORBIDDEN: [&str; 2] = [".unwrap()", ".expect("];

/// Scan production code (everything before the test module) for panicking calls.
fn find_panicking_calls(source: &str) -> Vec<(usize, String)> {
    let mut violations = Vec::new();

    for (line_num_0, line) in source.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with("#[cfg(test)]") {
            break;
        }
        // Skip comments
        if trimmed.starts_with("//") {
            continue;
        }

        if FORBIDDEN.iter().any(|pat| line.contains(pat)) {
            violations.push((line_num_0 + 1, trimmed.to_string()));
        }
    }

    violations
}

#[test]
fn no_unwrap_outside_tests() {
    let src_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut all_violations = Vec::new();

    visit_source_files(&src_dir, &mut all_violations);

    if !all_violations.is_empty() {
        let mut msg = String::from(
            "Found unwrap()/expect() outside test modules.\n\
             Return flowify::Error with `?` instead.\n\n",
        );
        for (file, line_num, line) in &all_violations {
            msg.push_str(&format!("  {}:{}: {}\n", file, line_num, line));
        }
        panic!("{}", msg);
    }
}

fn visit_source_files(dir: &Path, violations: &mut Vec<(String, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            visit_source_files(&path, violations);
        } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
            let Ok(source) = fs::read_to_string(&path) else {
                continue;
            };
            let display_path = path.display().to_string();
            for (line_num, line) in find_panicking_calls(&source) {
                violations.push((display_path.clone(), line_num, line));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_unwrap() {
        let source = "let x = parse(s).unwrap();";
        assert_eq!(find_panicking_calls(source).len(), 1);
    }

    #[test]
    fn detects_expect() {
        let source = r#"let x = parse(s).expect("valid");"#;
        assert_eq!(find_panicking_calls(source).len(), 1);
    }

    #[test]
    fn allows_unwrap_or_variants() {
        let source = "let a = x.unwrap_or(0);\nlet b = y.unwrap_or_default();\nlet c = z.unwrap_or_else(f);";
        assert!(find_panicking_calls(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = "// value.unwrap() is fine in docs\n/// also .expect(\"here\")";
        assert!(find_panicking_calls(source).is_empty());
    }

    #[test]
    fn stops_at_test_module() {
        let source = "fn f() {}\n#[cfg(test)]\nmod tests { fn t() { x.unwrap(); } }";
        assert!(find_panicking_calls(source).is_empty());
    }

    #[test]
    fn reports_line_numbers() {
        let source = "fn a() {}\nfn b() { c().unwrap(); }";
        let v = find_panicking_calls(source);
        assert_eq!(v, vec![(2, "fn b() { c().unwrap(); }".to_string())]);
    }
}
