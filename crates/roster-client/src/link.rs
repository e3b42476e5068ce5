//! `Link` response-header parsing.
//!
//! The upstream API pages collections with RFC 8288 link relations:
//!
//! ```text
//! Link: <https://lms/api/v1/courses/1/users?page=2&per_page=100>; rel="current",
//!       <https://lms/api/v1/courses/1/users?page=3&per_page=100>; rel="next",
//!       <https://lms/api/v1/courses/1/users?page=1&per_page=100>; rel="first"
//! ```
//!
//! The `next` relation is absent on the last page.

/// One `<url>; rel="..."` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkValue {
    pub url: String,
    pub rel: String,
}

/// Parse every link value in a header.
///
/// Malformed trailing input is ignored; whatever parsed before it is kept.
pub fn parse_links(header: &str) -> Vec<LinkValue> {
    let mut links = Vec::new();
    let mut rest = header;

    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        let Some(stripped) = rest.strip_prefix('<') else {
            break;
        };
        let Some(end) = stripped.find('>') else {
            break;
        };
        let url = &stripped[..end];
        let after = &stripped[end + 1..];

        // Parameters run until the next link value opens.
        let params_end = after.find('<').unwrap_or(after.len());
        let params = &after[..params_end];
        rest = &after[params_end..];

        let rel = params
            .split(';')
            .filter_map(|p| p.split_once('='))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("rel"))
            .map(|(_, v)| v.trim().trim_end_matches(',').trim().trim_matches('"').to_string());

        if let Some(rel) = rel {
            links.push(LinkValue {
                url: url.trim().to_string(),
                rel,
            });
        }
    }

    links
}

/// URL of the `next` relation, if any.
///
/// `rel` may hold several space-separated relation types.
pub fn next_link(header: &str) -> Option<String> {
    parse_links(header)
        .into_iter()
        .find(|l| {
            l.rel
                .split_whitespace()
                .any(|r| r.eq_ignore_ascii_case("next"))
        })
        .map(|l| l.url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS_STYLE: &str = "<https://lms.example.edu/api/v1/courses/1/users?page=2&per_page=100>; rel=\"current\",\
<https://lms.example.edu/api/v1/courses/1/users?page=3&per_page=100>; rel=\"next\",\
<https://lms.example.edu/api/v1/courses/1/users?page=1&per_page=100>; rel=\"first\",\
<https://lms.example.edu/api/v1/courses/1/users?page=7&per_page=100>; rel=\"last\"";

    #[test]
    fn finds_next_among_many() {
        assert_eq!(
            next_link(CANVAS_STYLE).as_deref(),
            Some("https://lms.example.edu/api/v1/courses/1/users?page=3&per_page=100")
        );
    }

    #[test]
    fn parses_all_relations() {
        let links = parse_links(CANVAS_STYLE);
        let rels: Vec<&str> = links.iter().map(|l| l.rel.as_str()).collect();
        assert_eq!(rels, vec!["current", "next", "first", "last"]);
    }

    #[test]
    fn last_page_has_no_next() {
        let header = "<https://x/a?page=7>; rel=\"current\", <https://x/a?page=1>; rel=\"first\"";
        assert_eq!(next_link(header), None);
    }

    #[test]
    fn unquoted_and_spaced_rel() {
        let header = "<https://x/a?page=2> ; rel = next";
        assert_eq!(next_link(header).as_deref(), Some("https://x/a?page=2"));
    }

    #[test]
    fn multi_valued_rel() {
        let header = "<https://x/a?page=2>; rel=\"prefetch next\"";
        assert_eq!(next_link(header).as_deref(), Some("https://x/a?page=2"));
    }

    #[test]
    fn garbage_yields_nothing() {
        assert!(parse_links("").is_empty());
        assert!(parse_links("not a link header").is_empty());
        assert_eq!(next_link("<https://x/unterminated; rel=\"next\""), None);
    }
}
