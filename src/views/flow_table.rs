//! Row view-models for the flow table.

use crate::constants::EMPTY_CELL;
use crate::models::Flow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishBadge {
    Published(String),
    Unpublished,
}

impl PublishBadge {
    pub fn label(&self) -> String {
        match self {
            PublishBadge::Published(v) => format!("✓ {}", v),
            PublishBadge::Unpublished => "Unpublished".to_string(),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            PublishBadge::Published(_) => "badge badge-published",
            PublishBadge::Unpublished => "badge badge-unpublished",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub latest_version: String,
    pub published: PublishBadge,
    pub can_execute: bool,
    pub updated_at: String,
    pub selected: bool,
}

impl FlowRow {
    pub fn from_flow(flow: &Flow, selected: bool) -> Self {
        Self {
            id: flow.id.clone(),
            name: flow.name.clone(),
            description: flow.description.clone().unwrap_or_default(),
            latest_version: flow
                .latest_version
                .clone()
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
            published: match &flow.published_version {
                Some(v) => PublishBadge::Published(v.clone()),
                None => PublishBadge::Unpublished,
            },
            can_execute: flow.can_execute(),
            updated_at: flow
                .updated_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
            selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn flow(published: Option<&str>, latest: Option<&str>) -> Flow {
        Flow {
            id: "f-1".into(),
            name: "Order Pipeline".into(),
            description: None,
            latest_version: latest.map(str::to_string),
            published_version: published.map(str::to_string),
            updated_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap()),
        }
    }

    #[test]
    fn missing_latest_version_renders_dash() {
        let row = FlowRow::from_flow(&flow(None, None), false);
        assert_eq!(row.latest_version, "-");
        assert_eq!(row.updated_at, "2024-05-01 10:30");
    }

    #[test]
    fn execute_follows_published_version() {
        let row = FlowRow::from_flow(&flow(None, Some("1.0.0")), false);
        assert!(!row.can_execute);
        assert_eq!(row.published, PublishBadge::Unpublished);
        assert_eq!(row.published.label(), "Unpublished");

        let row = FlowRow::from_flow(&flow(Some("v1"), Some("1.0.0")), false);
        assert!(row.can_execute);
        assert_eq!(row.published, PublishBadge::Published("v1".into()));
        assert_eq!(row.published.label(), "✓ v1");
    }
}
