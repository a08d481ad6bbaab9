//! Argument coercion
//!
//! Agents send coordinates as strings ("38.6756") as often as numbers, so
//! both are accepted and converted here, before any network call.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ToolError;
use crate::provider::Coordinates;

#[derive(Debug, Deserialize)]
struct CoordinateArgs {
    #[serde(default, alias = "latitude")]
    lat: Option<Value>,
    #[serde(default, alias = "longitude")]
    lng: Option<Value>,
}

/// Parse `{"lat": .., "lng": ..}` into validated coordinates
pub fn parse_coordinates(args: Value) -> Result<Coordinates, ToolError> {
    let args = if args.is_null() { Value::Object(Default::default()) } else { args };
    // Derived Deserialize would also read a sequence positionally
    if !args.is_object() {
        return Err(ToolError::invalid_argument("arguments must be an object"));
    }
    let args: CoordinateArgs =
        serde_json::from_value(args).map_err(|e| ToolError::invalid_argument(e.to_string()))?;

    let latitude = coerce("lat", args.lat)?;
    let longitude = coerce("lng", args.lng)?;

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ToolError::invalid_argument(format!(
            "lat must be between -90 and 90, got {latitude}"
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ToolError::invalid_argument(format!(
            "lng must be between -180 and 180, got {longitude}"
        )));
    }

    Ok(Coordinates::new(latitude, longitude))
}

fn coerce(name: &str, value: Option<Value>) -> Result<f64, ToolError> {
    let parsed = match &value {
        None | Some(Value::Null) => {
            return Err(ToolError::invalid_argument(format!("missing field `{name}`")));
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(ToolError::invalid_argument(format!(
            "{name} must be a number, got {}",
            value.unwrap_or(Value::Null)
        ))),
    }
}
