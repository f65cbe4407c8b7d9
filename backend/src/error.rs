use actix_web::{
    error,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use derive_more::{Display, Error};

#[derive(Debug, Display, Error, PartialEq)]
pub enum Error {
    #[display("An internal error occured. Please try again later")]
    InternalError,
    #[display("Username already registered")]
    UsernameAlreadyExists,
    #[display("An account with this email already exists")]
    EmailAlreadyExists,
    #[display("Invalid credentials")]
    WrongCredentials,
    #[display("Unauthorized")]
    Unauthorized,
    #[display("{_0}")]
    BadRequest(#[error(not(source))] String),
    #[display("User not found")]
    UserNotFound,
    #[display("Charger not found")]
    ChargerNotFound,
    #[display("No chargers found with the specified filters.")]
    NoChargersFound,
    #[display("Charging availability not found for this charger")]
    NoAvailabilityReference,
    #[display("Charger already added to favorites")]
    FavoriteAlreadyExists,
    #[display("Favorite charger not found")]
    FavoriteNotFound,
    #[display("No favorite chargers found.")]
    NoFavoritesFound,
    #[display("The charger data provider could not be reached")]
    UpstreamError,
}

impl error::ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "detail": self.to_string() }).to_string())
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UsernameAlreadyExists => StatusCode::CONFLICT,
            Self::EmailAlreadyExists => StatusCode::CONFLICT,
            Self::WrongCredentials => StatusCode::UNAUTHORIZED,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::ChargerNotFound => StatusCode::NOT_FOUND,
            Self::NoChargersFound => StatusCode::NOT_FOUND,
            Self::NoAvailabilityReference => StatusCode::BAD_REQUEST,
            Self::FavoriteAlreadyExists => StatusCode::CONFLICT,
            Self::FavoriteNotFound => StatusCode::NOT_FOUND,
            Self::NoFavoritesFound => StatusCode::NOT_FOUND,
            Self::UpstreamError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
