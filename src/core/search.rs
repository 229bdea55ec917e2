use crate::domain::model::Referee;
use crate::domain::ports::RefereeGateway;

/// Search box contents split into name tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub first: Option<String>,
    pub last: Option<String>,
}

impl SearchQuery {
    pub fn parse(input: &str) -> Self {
        let mut tokens = input.split_whitespace().map(str::to_string);
        Self {
            first: tokens.next(),
            last: tokens.next(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.last.is_none()
    }
}

/// Resolves one search box value.
///
/// An empty box lists everyone. Otherwise the first token is tried as a
/// first name and, when nobody matches, as a last name.
pub async fn search_referees(gateway: &dyn RefereeGateway, input: &str) -> Vec<Referee> {
    let query = SearchQuery::parse(input);
    let Some(name) = query.first.as_deref() else {
        return gateway.fetch_all().await;
    };

    let by_first_name = gateway.find_by_first_name(name).await;
    if !by_first_name.is_empty() {
        return by_first_name;
    }

    tracing::debug!("No first name matches '{}', trying last names", name);
    gateway.find_by_last_name(name).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_tokens() {
        assert_eq!(
            SearchQuery::parse("Marko Petrovic"),
            SearchQuery {
                first: Some("Marko".to_string()),
                last: Some("Petrovic".to_string())
            }
        );
        assert_eq!(SearchQuery::parse("  Ana ").first.as_deref(), Some("Ana"));
        assert_eq!(SearchQuery::parse("  Ana ").last, None);
        assert!(SearchQuery::parse("").is_empty());
        assert!(SearchQuery::parse("   \t ").is_empty());
    }
}
