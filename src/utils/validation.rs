//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos.
//! Todas devuelven `ValidationError` para poder usarse con
//! `#[validate(custom = "...")]` en los DTOs.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref DEPARTURE_TIME_REGEX: Regex = Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap();
    static ref STATION_CODE_REGEX: Regex = Regex::new(r"^[A-Z0-9]{2,6}(-[A-Z0-9]{1,6})?$").unwrap();
    static ref CARD_EXPIRY_REGEX: Regex = Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").unwrap();
}

/// Validar formato de hora de salida (HH:MM)
pub fn validate_departure_time(value: &str) -> Result<(), ValidationError> {
    if !DEPARTURE_TIME_REGEX.is_match(value) {
        let mut error = ValidationError::new("departure_time");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"HH:MM".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar código de estación (ej: TUN, SFX-01)
pub fn validate_station_code(value: &str) -> Result<(), ValidationError> {
    if !STATION_CODE_REGEX.is_match(value) {
        let mut error = ValidationError::new("station_code");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if clean_phone.len() < 8 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de coordenadas GPS
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !(-180.0..=180.0).contains(&lng) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Validar formato de matrícula de vehículo
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    // Formato tunecino "123 TU 4567" o similar
    let clean_plate = value.replace([' ', '-', '_'], "");
    if clean_plate.chars().count() < 5 || clean_plate.chars().count() > 10 {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que una fecha de inicio no sea posterior a la de fin
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if start > end {
        let mut error = ValidationError::new("date_range");
        error.add_param("start".into(), &start.to_string());
        error.add_param("end".into(), &end.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar número de tarjeta con el algoritmo de Luhn
pub fn validate_card_number(value: &str) -> Result<(), ValidationError> {
    let digits: Vec<u32> = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
        .unwrap_or_default();

    let invalid = || {
        let mut error = ValidationError::new("card_number");
        error.add_param("length".into(), &value.len());
        error
    };

    if digits.len() < 12 || digits.len() > 19 {
        return Err(invalid());
    }

    let checksum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                *d
            }
        })
        .sum();

    if checksum % 10 != 0 {
        return Err(invalid());
    }
    Ok(())
}

/// Validar fecha de expiración de tarjeta (MM/YY)
pub fn validate_card_expiry(value: &str) -> Result<(), ValidationError> {
    if !CARD_EXPIRY_REGEX.is_match(value) {
        let mut error = ValidationError::new("card_expiry");
        error.add_param("format".into(), &"MM/YY".to_string());
        return Err(error);
    }
    Ok(())
}
