use crate::domain::model::GridSpec;
use crate::utils::error::{MsesError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(MsesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(MsesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(MsesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| MsesError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MsesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_grid(field_name: &str, grid: &GridSpec) -> Result<()> {
    validate_positive_number(&format!("{}.points", field_name), grid.points, 2)?;

    if !grid.x_min.is_finite() || !grid.x_max.is_finite() {
        return Err(MsesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("[{}, {}]", grid.x_min, grid.x_max),
            reason: "Grid bounds must be finite".to_string(),
        });
    }

    if grid.x_min >= grid.x_max {
        return Err(MsesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("[{}, {}]", grid.x_min, grid.x_max),
            reason: "x_min must be less than x_max".to_string(),
        });
    }

    Ok(())
}
