use diesel::prelude::*;
use super::chargers::Charger;

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(Charger))]
#[diesel(table_name = crate::schema::connectors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Connector {
    pub id: uuid::Uuid,
    pub charger_id: uuid::Uuid,
    pub connector_type: String,
    pub rated_power_kw: Option<f64>,
    pub voltage_v: Option<i32>,
    pub current_a: Option<i32>,
    pub current_type: Option<String>,
}
