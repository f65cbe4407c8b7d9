use diesel::prelude::*;

/// A charging location as stored after ingestion.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable, PartialEq)]
#[diesel(table_name = crate::schema::chargers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Charger {
    pub id: uuid::Uuid,
    pub external_id: String,
    pub name: Option<String>,
    pub brand_name: Option<String>,
    pub url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub street_name: Option<String>,
    pub municipality: Option<String>,
    pub postal_code: Option<String>,
    pub freeform_address: Option<String>,
    pub charging_availability: Option<String>,
}

/// Every mutable column of a charger. Used as the update half of an upsert,
/// so a missing value overwrites the stored one.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = crate::schema::chargers)]
#[diesel(treat_none_as_null = true)]
pub struct ChargerUpdate {
    pub name: Option<String>,
    pub brand_name: Option<String>,
    pub url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub street_name: Option<String>,
    pub municipality: Option<String>,
    pub postal_code: Option<String>,
    pub freeform_address: Option<String>,
    pub charging_availability: Option<String>,
}

impl From<&Charger> for ChargerUpdate {
    fn from(value: &Charger) -> Self {
        Self {
            name: value.name.clone(),
            brand_name: value.brand_name.clone(),
            url: value.url.clone(),
            latitude: value.latitude,
            longitude: value.longitude,
            street_name: value.street_name.clone(),
            municipality: value.municipality.clone(),
            postal_code: value.postal_code.clone(),
            freeform_address: value.freeform_address.clone(),
            charging_availability: value.charging_availability.clone(),
        }
    }
}
