use diesel::prelude::*;
use super::{chargers::Charger, users::User};

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(User))]
#[diesel(belongs_to(Charger))]
#[diesel(table_name = crate::schema::favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Favorite {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub charger_id: uuid::Uuid,
}
