// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

/// Join a base URL and a path, collapsing the slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let path = path.trim();
    if path.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base, path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://localhost:8181", "/api/management/v1"),
            "http://localhost:8181/api/management/v1"
        );
        assert_eq!(
            join_url("http://localhost:8181/", "api/catalog/v1"),
            "http://localhost:8181/api/catalog/v1"
        );
        assert_eq!(join_url("http://h//", "//x"), "http://h/x");
        assert_eq!(join_url("http://h/", ""), "http://h");
    }
}
