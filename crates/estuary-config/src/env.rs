use std::sync::OnceLock;

use regex::Regex;

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// Expansion happens before deserialization, so config structs use plain
/// `String`/`SecretString`. Lines starting with `#` (TOML comments) pass
/// through unchanged.
pub fn expand_env(input: &str) -> Result<String, String> {
    fn re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"\{\{\s*env\.([A-Za-z0-9_]+)\s*\}\}").expect("must be valid regex"))
    }

    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut last_end = 0;
        for captures in re().captures_iter(line) {
            let overall = captures.get(0).expect("capture group 0 always present");
            let var_name = captures.get(1).expect("var name group always present").as_str();

            output.push_str(&line[last_end..overall.start()]);

            match std::env::var(var_name) {
                Ok(value) => output.push_str(&value),
                Err(_) => return Err(format!("environment variable not found: `{var_name}`")),
            }

            last_end = overall.end();
        }
        output.push_str(&line[last_end..]);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_placeholders() {
        let input = "key = \"value\"";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn single_env_var() {
        temp_env::with_var("ESTUARY_VAR", Some("hello"), || {
            let result = expand_env("key = \"{{ env.ESTUARY_VAR }}\"").unwrap();
            assert_eq!(result, "key = \"hello\"");
        });
    }

    #[test]
    fn missing_env_var() {
        temp_env::with_var_unset("ESTUARY_MISSING", || {
            let err = expand_env("key = \"{{ env.ESTUARY_MISSING }}\"").unwrap_err();
            assert!(err.contains("ESTUARY_MISSING"));
        });
    }

    #[test]
    fn comment_lines_untouched() {
        let input = "# {{ env.NOT_EXPANDED }}\nkey = \"v\"";
        assert_eq!(expand_env(input).unwrap(), input);
    }
}
