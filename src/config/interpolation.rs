// Copyright 2026 The Veracity Project
// SPDX-License-Identifier: Apache-2.0

// ${VAR} interpolation for config string fields. Credentials in
// particular should come from the environment, not the YAML file.

use std::sync::LazyLock;

use regex::Regex;

use super::error::ConfigError;

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("variable pattern must compile")
});

/// Replace every `${NAME}` in the input with the value of the `NAME`
/// environment variable. An unset variable is a hard config error.
pub fn resolve_variables(input: &str) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for caps in VARIABLE.captures_iter(input) {
        let whole = caps.get(0).expect("capture 0 always exists");
        let name = &caps[1];
        let value = std::env::var(name).map_err(|_| ConfigError::UndefinedVariable {
            name: name.to_string(),
        })?;
        out.push_str(&input[last..whole.start()]);
        out.push_str(&value);
        last = whole.end();
    }
    out.push_str(&input[last..]);
    Ok(out)
}
