use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Clone, Debug, FromRow, PartialEq)]
pub struct OrganizationRow {
    pub organization_id: Uuid,
    pub create_time: DateTime<Utc>,
    pub name: String,
    pub logo_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewOrganizationRow {
    pub create_time: DateTime<Utc>,
    pub name: String,
    pub logo_url: Option<String>,
}

/// Fields to overwrite on an existing organization. `None` leaves the field
/// untouched, `Some(None)` clears a nullable field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrganizationChanges {
    pub name: Option<String>,
    pub logo_url: Option<Option<String>>,
}

impl OrganizationRow {
    pub fn apply_update(mut self, changes: OrganizationChanges) -> Self {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(logo_url) = changes.logo_url {
            self.logo_url = logo_url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> OrganizationRow {
        OrganizationRow {
            organization_id: Uuid::new_v4(),
            create_time: Utc::now(),
            name: "Red Cross".to_string(),
            logo_url: Some("https://example.org/logo.png".to_string()),
        }
    }

    #[test]
    fn apply_update_without_changes_is_identity() {
        let row = row();
        assert_eq!(row.clone().apply_update(OrganizationChanges::default()), row);
    }

    #[test]
    fn apply_update_overwrites_only_listed_fields() {
        let row = row();
        let updated = row.clone().apply_update(OrganizationChanges {
            name: Some("Blue Cross".to_string()),
            logo_url: None,
        });
        assert_eq!(updated.name, "Blue Cross");
        assert_eq!(updated.logo_url, row.logo_url);
        assert_eq!(updated.create_time, row.create_time);
    }

    #[test]
    fn apply_update_can_clear_logo() {
        let updated = row().apply_update(OrganizationChanges {
            name: None,
            logo_url: Some(None),
        });
        assert_eq!(updated.logo_url, None);
    }
}
