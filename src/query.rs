use crate::models::SearchData;

pub const SELECT_APPLICATIONS: &str = "SELECT Company, Role, Location, WorkType, IsHybrid, IsRemote,
        ApplicationDate, ResponseDate, Response, Comment
 FROM Application";

/// A SELECT statement plus the values bound to its `?N` placeholders, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub sql: String,
    pub conditions: Vec<String>,
    pub params: Vec<String>,
}

impl SearchQuery {
    fn push_like(&mut self, column: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        self.params.push(format!("%{}%", escape_like(value)));
        self.conditions
            .push(format!("{} LIKE ?{} ESCAPE '\\'", column, self.params.len()));
    }
}

/// Filters are plain substrings, so LIKE wildcards in them match literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn build_search_query(data: &SearchData) -> SearchQuery {
    let mut query = SearchQuery {
        sql: String::new(),
        conditions: Vec::new(),
        params: Vec::new(),
    };

    query.params.push(data.older_than_date.clone());
    query.conditions.push("ApplicationDate <= ?1".to_string());

    query.push_like("Company", &data.company);
    query.push_like("Role", &data.role);
    query.push_like("Location", &data.location);
    query.push_like("Response", &data.response);

    if data.is_remote {
        query.conditions.push("IsRemote = 1".to_string());
    }
    if data.is_hybrid {
        query.conditions.push("IsHybrid = 1".to_string());
    }

    query.sql = format!(
        "{} WHERE {} ORDER BY id",
        SELECT_APPLICATIONS,
        query.conditions.join(" AND ")
    );
    query
}
