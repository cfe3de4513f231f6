use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::User;

/// Query descriptor for the users table. Every predicate is optional and
/// predicates are combined with AND; an empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub id: Option<Uuid>,
    pub email: Option<String>,
    pub status: Option<bool>,
    pub name_contains: Option<String>,
    pub updated_before: Option<OffsetDateTime>,
    pub updated_after: Option<OffsetDateTime>,
}

impl UserFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn status(mut self, status: bool) -> Self {
        self.status = Some(status);
        self
    }

    pub fn active(self) -> Self {
        self.status(true)
    }

    pub fn name_contains(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    pub fn updated_before(mut self, at: OffsetDateTime) -> Self {
        self.updated_before = Some(at);
        self
    }

    pub fn updated_after(mut self, at: OffsetDateTime) -> Self {
        self.updated_after = Some(at);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Evaluates the filter against a single record, mirroring the SQL form.
    pub fn matches(&self, user: &User) -> bool {
        self.id.map_or(true, |id| user.id == id)
            && self.email.as_deref().map_or(true, |e| user.email == e)
            && self.status.map_or(true, |s| user.status == s)
            && self
                .name_contains
                .as_deref()
                .map_or(true, |n| user.name.contains(n))
            && self.updated_before.map_or(true, |t| user.updated_at < t)
            && self.updated_after.map_or(true, |t| user.updated_at > t)
    }

    /// Appends ` WHERE ...` with bound parameters, or nothing for an empty filter.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut first = true;
        let mut prefix = move || {
            if std::mem::take(&mut first) {
                " WHERE "
            } else {
                " AND "
            }
        };

        if let Some(id) = self.id {
            qb.push(prefix()).push("id = ").push_bind(id);
        }
        if let Some(email) = &self.email {
            qb.push(prefix()).push("email = ").push_bind(email.clone());
        }
        if let Some(status) = self.status {
            qb.push(prefix()).push("status = ").push_bind(status);
        }
        if let Some(name) = &self.name_contains {
            qb.push(prefix())
                .push("name LIKE ")
                .push_bind(format!("%{}%", escape_like(name)))
                .push(" ESCAPE '\\'");
        }
        if let Some(before) = self.updated_before {
            qb.push(prefix()).push("updated_at < ").push_bind(before);
        }
        if let Some(after) = self.updated_after {
            qb.push(prefix()).push("updated_at > ").push_bind(after);
        }
    }
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn user(name: &str, status: bool, updated_at: OffsetDateTime) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "hash".into(),
            cellphone: String::new(),
            status,
            created_at: updated_at,
            updated_at,
        }
    }

    fn sql(filter: &UserFilter) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM users");
        filter.push_where(&mut qb);
        qb.sql().to_owned()
    }

    #[test]
    fn empty_filter_has_no_where_clause() {
        let filter = UserFilter::new();
        assert!(filter.is_empty());
        assert_eq!(sql(&filter), "SELECT * FROM users");
    }

    #[test]
    fn predicates_are_joined_with_and() {
        let now = OffsetDateTime::now_utc();
        let filter = UserFilter::new()
            .active()
            .name_contains("ann")
            .updated_before(now)
            .updated_after(now - Duration::days(1));
        assert_eq!(
            sql(&filter),
            "SELECT * FROM users WHERE status = $1 AND name LIKE $2 ESCAPE '\\' \
             AND updated_at < $3 AND updated_at > $4"
        );
    }

    #[test]
    fn id_and_email_bind_in_order() {
        let filter = UserFilter::new().id(Uuid::nil()).email("a@b.co");
        assert_eq!(sql(&filter), "SELECT * FROM users WHERE id = $1 AND email = $2");
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn matches_name_substring_case_sensitively() {
        let now = OffsetDateTime::now_utc();
        let filter = UserFilter::new().name_contains("ann");
        assert!(filter.matches(&user("Joanna", true, now)));
        assert!(!filter.matches(&user("Ann", true, now)));
        assert!(!filter.matches(&user("Bob", true, now)));
    }

    #[test]
    fn matches_status_and_range_strictly() {
        let now = OffsetDateTime::now_utc();
        let filter = UserFilter::new()
            .status(false)
            .updated_after(now - Duration::hours(1))
            .updated_before(now);
        assert!(filter.matches(&user("a", false, now - Duration::minutes(5))));
        assert!(!filter.matches(&user("b", true, now - Duration::minutes(5))));
        assert!(!filter.matches(&user("c", false, now)));
        assert!(!filter.matches(&user("d", false, now - Duration::hours(1))));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let now = OffsetDateTime::now_utc();
        assert!(UserFilter::new().matches(&user("x", false, now)));
        assert!(UserFilter::new().matches(&user("y", true, now)));
    }
}
