use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::Workflow;

/// Current UTC time in RFC 9557 form, millisecond precision.
pub fn current_datetime_rfc9557() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// A fresh per-call session id, e.g. `trending_5f0c…`.
pub fn new_session_id(workflow: Workflow) -> String {
    format!("{}_{}", workflow.session_prefix(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_unique_and_prefixed() {
        let a = new_session_id(Workflow::ContentIdea);
        let b = new_session_id(Workflow::ContentIdea);
        assert!(a.starts_with("content_"));
        assert_ne!(a, b);
    }

    #[test]
    fn rfc9557_has_millis_and_zulu() {
        let ts = current_datetime_rfc9557();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2024-01-01T00:00:00.000Z".len());
    }
}
