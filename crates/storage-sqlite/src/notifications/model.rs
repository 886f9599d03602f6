use chrono::NaiveDateTime;
use diesel::prelude::*;

use geocast_core::notifications::Notification;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NotificationDB {
    pub id: String,
    pub user_id: String,
    pub campaign_id: Option<String>,
    pub text: String,
    pub link: Option<String>,
    pub from_admin: bool,
    pub created_at: NaiveDateTime,
}

impl From<NotificationDB> for Notification {
    fn from(db: NotificationDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            campaign_id: db.campaign_id,
            text: db.text,
            link: db.link,
            from_admin: db.from_admin,
            created_at: db.created_at,
        }
    }
}
